//! Header counters for the task list, computed over the full collection.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::bucket::{is_due_on, is_overdue};
use crate::task::Task;

/// Length of the trailing window for `completed_this_week`.
pub const COMPLETED_WINDOW_DAYS: i64 = 7;

/// Summary counts shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub completed_this_week: usize,
}

/// Count totals relative to `now`.
///
/// `overdue` uses the same predicate as the `overdue` bucket, so the two
/// always agree. `completed_this_week` counts completed tasks last modified
/// at or after `now - 7 days`.
pub fn compute_stats(tasks: &[Task], now: NaiveDateTime) -> TaskStats {
    let today = now.date();
    let window_start = now - Duration::days(COMPLETED_WINDOW_DAYS);
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };
    for t in tasks {
        if is_overdue(t, now) {
            stats.overdue += 1;
        }
        if !t.status.is_completed() && is_due_on(t, today) {
            stats.due_today += 1;
        }
        if t.status.is_completed() && t.modified_at.is_some_and(|m| m >= window_start) {
            stats.completed_this_week += 1;
        }
    }
    stats
}
