//! Task list filtering and ordering.
//!
//! Filters compose with AND: a task is kept only if it passes the quick
//! filter, each equality filter that is set, and the search text. The
//! surviving tasks are then ordered by a stable sort, so records that compare
//! equal keep their input order.

use chrono::{Duration, NaiveDateTime};

use crate::bucket::{is_due_on, is_overdue};
use crate::fields::*;
use crate::task::Task;

/// Current selections of the task list. Each UI change produces a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub quick: QuickFilter,
    pub priority: Option<Priority>,
    pub task_type: Option<TaskType>,
    pub status: Option<Status>,
    /// Case-insensitive text; empty means no constraint.
    pub search: String,
    /// `None` keeps the input order.
    pub sort: Option<SortKey>,
}

impl FilterState {
    /// Sort by a key given as text. Unknown keys are logged and leave the
    /// list in input order.
    pub fn sort_by_name(mut self, raw: &str) -> Self {
        self.sort = SortKey::parse(raw);
        if self.sort.is_none() {
            log::warn!("unknown sort key {raw:?}, keeping input order");
        }
        self
    }
}

/// Check a task against a quick filter relative to `now`.
pub fn matches_quick_filter(task: &Task, quick: QuickFilter, now: NaiveDateTime) -> bool {
    let today = now.date();
    match quick {
        QuickFilter::All => true,
        QuickFilter::Today => is_due_on(task, today),
        QuickFilter::Upcoming => task
            .due_day()
            .is_some_and(|d| d > today && d <= today + Duration::days(7)),
        QuickFilter::Overdue => is_overdue(task, now),
        QuickFilter::Completed => task.status.is_completed(),
        QuickFilter::NoDueDate => task.due_date.is_none(),
    }
}

/// Case-insensitive search over title, description and assignee (substring)
/// and tags (whole label). Absent fields never match. An empty query matches
/// everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&q));
    contains(Some(&task.title))
        || contains(task.description.as_deref())
        || contains(task.assignee.as_deref())
        || task.tags.contains_ignore_case(query)
}

/// Apply every active filter in `state`, then order by its sort key.
pub fn filter_and_sort<'a, I>(tasks: I, state: &FilterState, now: NaiveDateTime) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut total = 0usize;
    let mut filtered: Vec<&Task> = tasks
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|t| {
            if !matches_quick_filter(t, state.quick, now) {
                return false;
            }
            if let Some(ref p) = state.priority {
                if t.priority.as_ref() != Some(p) {
                    return false;
                }
            }
            if let Some(ref k) = state.task_type {
                if &t.task_type != k {
                    return false;
                }
            }
            if let Some(ref s) = state.status {
                if &t.status != s {
                    return false;
                }
            }
            matches_search(t, &state.search)
        })
        .collect();

    // All sorts below are stable.
    match state.sort {
        Some(SortKey::DueDate) => {
            filtered.sort_by_key(|t| t.due_date.unwrap_or(NaiveDateTime::MAX))
        }
        Some(SortKey::Priority) => filtered.sort_by_key(|t| priority_rank(t.priority.as_ref())),
        // Newest first; Option orders None lowest, so undated records end up last.
        Some(SortKey::CreatedDate) => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Some(SortKey::Title) => filtered.sort_by_cached_key(|t| t.title.to_lowercase()),
        None => {}
    }

    log::debug!("task filter kept {} of {} ({:?})", filtered.len(), total, state.quick);
    filtered
}
