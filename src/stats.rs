//! Dashboard summary statistics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::Status;
use crate::task::Task;

/// Counts shown in the dashboard overview. Always derived, never edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub upcoming: usize,
}

/// Derive the overview counts for `tasks` as seen on `today`.
///
/// `upcoming` counts unfinished tasks due strictly after `today`.
pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> Stats {
    tasks.iter().fold(
        Stats {
            total: tasks.len(),
            ..Stats::default()
        },
        |mut stats, task| {
            match task.status {
                Status::Completed => stats.completed += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::NotStarted => {}
            }
            if task.is_upcoming(today) {
                stats.upcoming += 1;
            }
            stats
        },
    )
}
