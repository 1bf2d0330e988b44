//! Task form validation.
//!
//! Validation is pure and total: it never fails, it only reports which
//! fields are unacceptable and why. An empty [`ValidationErrors`] means the
//! draft may be submitted.

use std::collections::BTreeMap;
use std::fmt;

use crate::task::TaskDraft;

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    DueDate,
}

impl Field {
    /// Field name as it appears in the form and in serialized tasks.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::DueDate => "dueDate",
        }
    }
}

/// Field name to message mapping produced by [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors in form order (title first).
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.as_str(), message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a draft's required fields.
///
/// - `title` must contain something other than whitespace.
/// - `dueDate` must be present.
///
/// Every other field accepts any value.
pub fn validate(draft: &TaskDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if draft.title.trim().is_empty() {
        errors.insert(Field::Title, "Title is required");
    }
    if draft.due_date.trim().is_empty() {
        errors.insert(Field::DueDate, "Due date is required");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, due: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            due_date: due.into(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn empty_title_only() {
        let errors = validate(&draft("", "2025-01-01"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::DueDate), None);
    }

    #[test]
    fn blank_title_and_missing_date() {
        let errors = validate(&draft("  ", ""));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::DueDate), Some("Due date is required"));
    }

    #[test]
    fn valid_draft() {
        assert!(validate(&draft("Buy milk", "2025-01-01")).is_empty());
    }

    #[test]
    fn other_fields_are_unconstrained() {
        let mut d = draft("Buy milk", "2025-01-01");
        d.description = "   ".into();
        d.status = crate::fields::Status::Completed;
        d.priority = crate::fields::Priority::Low;
        assert!(validate(&d).is_empty());
    }

    #[test]
    fn display_lists_fields_in_form_order() {
        let errors = validate(&draft("", ""));
        assert_eq!(
            errors.to_string(),
            "title: Title is required; dueDate: Due date is required"
        );
    }
}
