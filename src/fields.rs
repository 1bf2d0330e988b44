//! Enumerations and field types for task management.
//!
//! This module defines the structured values a task carries (status and
//! priority) together with the sorting and due-date filtering options used
//! by the list views.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
///
/// Serialized with the display names used by the hosted record store
/// ("Not Started", "In Progress", "Completed"); kebab-case spellings are
/// accepted when reading.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started", alias = "not-started", alias = "NotStarted")]
    NotStarted,
    #[serde(rename = "In Progress", alias = "in-progress", alias = "InProgress")]
    InProgress,
    #[serde(alias = "completed")]
    Completed,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "low")]
    Low,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "high")]
    High,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Priority,
    Created,
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    ThisWeek,
    Overdue,
    Upcoming,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Completed];

    /// Display name, identical to the wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    /// Lenient parse used when normalising external records.
    ///
    /// Accepts display names, kebab-case and camel-case spellings,
    /// case-insensitively. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Status> {
        match normalise_key(s).as_str() {
            "notstarted" => Some(Status::NotStarted),
            "inprogress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match normalise_key(s).as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Sort rank, highest priority first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalise_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: Status = serde_json::from_str("\"not-started\"").unwrap();
        assert_eq!(back, Status::NotStarted);
        let back: Status = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(back, Status::Completed);
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(Status::parse("In Progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::parse(" NOT STARTED "), Some(Status::NotStarted));
        assert_eq!(Status::parse("blocked"), None);
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn defaults_match_form_defaults() {
        assert_eq!(Status::default(), Status::NotStarted);
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
