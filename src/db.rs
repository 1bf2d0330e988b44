//! On-disk JSON documents and shared formatting helpers.
//!
//! This module provides the `Database` document the local backend persists,
//! atomic JSON read/write helpers reused by the session file, and the
//! date parsing and table printing utilities shared by the commands.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::stats::Stats;
use crate::task::Task;

/// JSON document holding the locally persisted task collection.
///
/// The collection lives under the fixed `tasks` key. A document without that
/// key has never been initialised, which is different from an empty list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl Database {
    /// Load the document, returning an empty one if the file doesn't exist.
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(read_json(path)?.unwrap_or_default())
    }

    /// Save the document using an atomic write.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        write_json(path, self)
    }

    /// Generate the next available task id.
    ///
    /// Ids are decimal strings; anything non-numeric is ignored.
    pub fn next_id(tasks: &[Task]) -> String {
        let max = tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

/// Read and parse a JSON file. `Ok(None)` when the file doesn't exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut buf = String::new();
    File::open(path)?.read_to_string(&mut buf)?;
    let value = serde_json::from_str(&buf).map_err(io::Error::from)?;
    Ok(Some(value))
}

/// Write a value as pretty JSON via temp file + rename.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "next monday", "this friday", bare weekday names
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD", optionally followed by a time part ("2025-01-01T10:00:00Z")
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let split = rest.char_indices().last().map_or(0, |(i, _)| i);
        let (amount, unit) = rest.split_at(split);
        if let Ok(n) = amount.trim().parse::<i64>() {
            let offset = match unit {
                "d" => Duration::try_days(n),
                "w" => Duration::try_weeks(n),
                // Approximate: 30 days per month
                "m" => n.checked_mul(30).and_then(Duration::try_days),
                _ => None,
            };
            // Out-of-range offsets are not dates.
            return offset.and_then(|offset| today.checked_add_signed(offset));
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let days_ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return Some(today + Duration::days(days_ahead));
        }
        if s == format!("next {name}") {
            return Some(today + Duration::days(days_ahead + 7));
        }
    }

    let date_part = s.get(..10).unwrap_or(&s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<6} {:<12} {:<7} {:<11} {:<10} {}",
        "ID", "Status", "Pri", "Due", "Date", "Title"
    );
    for t in tasks {
        println!(
            "{:<6} {:<12} {:<7} {:<11} {:<10} {}",
            truncate(&t.id, 6),
            t.status.as_str(),
            t.priority.as_str(),
            format_due_relative(t.due_date, today),
            t.due_date.format("%Y-%m-%d"),
            t.title
        );
    }
}

/// Print the dashboard overview block.
pub fn print_stats(stats: &Stats) {
    println!("Task Overview");
    println!("  {:<12} {}", "Total", stats.total);
    println!("  {:<12} {}", "Completed", stats.completed);
    println!("  {:<12} {}", "In Progress", stats.in_progress);
    println!("  {:<12} {}", "Upcoming", stats.upcoming);
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};
    use chrono::Utc;

    // A Wednesday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_relative_inputs() {
        assert_eq!(parse_due_input("today", today()), Some(today()));
        assert_eq!(parse_due_input("Tomorrow", today()), Some(d(2025, 1, 16)));
        assert_eq!(parse_due_input("in 3d", today()), Some(d(2025, 1, 18)));
        assert_eq!(parse_due_input("in 2w", today()), Some(d(2025, 1, 29)));
        assert_eq!(parse_due_input("eow", today()), Some(d(2025, 1, 19)));
        assert_eq!(parse_due_input("end of month", today()), Some(d(2025, 1, 31)));
    }

    #[test]
    fn parses_weekdays() {
        assert_eq!(parse_due_input("friday", today()), Some(d(2025, 1, 17)));
        assert_eq!(parse_due_input("wed", today()), Some(today()));
        assert_eq!(parse_due_input("next monday", today()), Some(d(2025, 1, 27)));
        assert_eq!(parse_due_input("this monday", today()), Some(d(2025, 1, 20)));
    }

    #[test]
    fn parses_iso_dates_and_datetimes() {
        assert_eq!(parse_due_input("2025-03-01", today()), Some(d(2025, 3, 1)));
        assert_eq!(
            parse_due_input("2025-03-01T00:00:00.000Z", today()),
            Some(d(2025, 3, 1))
        );
        assert_eq!(parse_due_input("next year", today()), None);
        assert_eq!(parse_due_input("", today()), None);
    }

    #[test]
    fn huge_relative_offsets_are_rejected() {
        assert_eq!(parse_due_input("in 100000000d", today()), None);
        assert_eq!(parse_due_input("in 100000000w", today()), None);
        assert_eq!(parse_due_input("in 100000000m", today()), None);
        assert_eq!(parse_due_input(&format!("in {}m", i64::MAX), today()), None);
        assert_eq!(parse_due_input(&format!("in {}d", i64::MIN), today()), None);
        assert_eq!(parse_due_input("in 3x", today()), None);
    }

    #[test]
    fn december_end_of_month_rolls_year() {
        assert_eq!(parse_due_input("eom", d(2025, 12, 3)), Some(d(2025, 12, 31)));
    }

    #[test]
    fn formats_relative_due() {
        assert_eq!(format_due_relative(today(), today()), "today");
        assert_eq!(format_due_relative(d(2025, 1, 16), today()), "tomorrow");
        assert_eq!(format_due_relative(d(2025, 1, 20), today()), "in 5d");
        assert_eq!(format_due_relative(d(2025, 1, 13), today()), "2d late");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn next_id_skips_non_numeric() {
        let mk = |id: &str| Task {
            id: id.into(),
            title: "t".into(),
            description: String::new(),
            status: Status::NotStarted,
            priority: Priority::Medium,
            due_date: today(),
            created_at: Utc::now(),
        };
        assert_eq!(Database::next_id(&[]), "1");
        assert_eq!(Database::next_id(&[mk("3"), mk("abc"), mk("10")]), "11");
    }

    #[test]
    fn missing_file_loads_uninitialised_document() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::load(&dir.path().join("tasks.json")).unwrap();
        assert!(db.tasks.is_none());
    }

    #[test]
    fn save_then_load_keeps_empty_list_distinct_from_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        Database { tasks: Some(Vec::new()) }.save(&path).unwrap();
        let db = Database::load(&path).unwrap();
        assert_eq!(db.tasks.map(|t| t.len()), Some(0));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Database::load(&path).is_err());
    }
}
