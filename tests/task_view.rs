//! Cross-module checks for the task list engine: grouping, filtering and
//! counters run over the same snapshots must agree with each other.
//!
//! The property tests sweep a fixed grid of due dates, statuses and
//! priorities across every day of a week rather than sampling randomly.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;

use taskdesk::bucket::group_by_due_date;
use taskdesk::fields::*;
use taskdesk::filter::{filter_and_sort, FilterState};
use taskdesk::stats::compute_stats;
use taskdesk::task::{Tags, Task};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

fn ids(tasks: &[&Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.id).collect()
}

/// Every combination of due offset (days from `base`, with and without a
/// time of day, or none), status and priority.
fn grid(base: NaiveDate) -> Vec<Task> {
    let statuses = [
        Status::Open,
        Status::InProgress,
        Status::Completed,
        Status::Cancelled,
        Status::from("Archived"),
    ];
    let priorities = [Some(Priority::High), Some(Priority::Medium), Some(Priority::Low), None];
    let mut dues: Vec<Option<NaiveDateTime>> = vec![None];
    for offset in -10..=16 {
        let day = base + Duration::days(offset);
        dues.push(Some(day.and_hms_opt(0, 0, 0).unwrap()));
        dues.push(Some(day.and_hms_opt(16, 45, 0).unwrap()));
    }

    let mut tasks = Vec::new();
    let mut id = 0;
    for due in &dues {
        for status in &statuses {
            for priority in &priorities {
                id += 1;
                tasks.push(Task {
                    due_date: *due,
                    status: status.clone(),
                    priority: priority.clone(),
                    title: format!("Task {:03}", id % 37),
                    assignee: (id % 3 == 0).then(|| "Dana".to_string()),
                    tags: if id % 5 == 0 { Tags::parse("lead,renewal") } else { Tags::default() },
                    created_at: Some(at(2024, 5, 1, 0, 0) + Duration::hours(id as i64 % 11)),
                    modified_at: Some(at(2024, 6, 1, 0, 0) + Duration::hours(id as i64 * 7 % 500)),
                    ..Task::new(id, "")
                });
            }
        }
    }
    tasks
}

/// A `now` for each day of the week of 2024-06-10, at various times of day.
fn nows() -> Vec<NaiveDateTime> {
    (0..7)
        .map(|d| at(2024, 6, 10, 0, 0) + Duration::days(d) + Duration::minutes(d * 217))
        .collect()
}

fn filter_states() -> Vec<FilterState> {
    let quicks = [
        QuickFilter::All,
        QuickFilter::Today,
        QuickFilter::Upcoming,
        QuickFilter::Overdue,
        QuickFilter::Completed,
        QuickFilter::NoDueDate,
    ];
    let mut states = Vec::new();
    for quick in quicks {
        for priority in [None, Some(Priority::High)] {
            for search in ["", "dana", "lead", "task 01"] {
                for sort in [
                    None,
                    Some(SortKey::DueDate),
                    Some(SortKey::Priority),
                    Some(SortKey::CreatedDate),
                    Some(SortKey::Title),
                ] {
                    states.push(FilterState {
                        quick,
                        priority: priority.clone(),
                        search: search.to_string(),
                        sort,
                        ..FilterState::default()
                    });
                }
            }
        }
    }
    states
}

#[test]
fn test_grouping_is_a_partition() {
    for now in nows() {
        let tasks = grid(now.date());
        let groups = group_by_due_date(&tasks, now);
        assert_eq!(groups.len(), tasks.len());

        let mut seen: Vec<u64> = groups.iter().flat_map(|(_, ts)| ids(ts)).collect();
        seen.sort_unstable();
        let expected: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(seen, expected, "every task appears exactly once at {now}");

        for t in &groups.no_due_date {
            assert!(t.due_date.is_none());
        }
        for (bucket, ts) in groups.iter() {
            if bucket != Bucket::NoDueDate {
                assert!(ts.iter().all(|t| t.due_date.is_some()));
            }
        }
    }
}

#[test]
fn test_overdue_bucket_matches_overdue_counter() {
    for now in nows() {
        let tasks = grid(now.date());
        let groups = group_by_due_date(&tasks, now);
        let stats = compute_stats(&tasks, now);
        assert_eq!(groups.overdue.len(), stats.overdue, "at {now}");

        let overdue_filter = FilterState { quick: QuickFilter::Overdue, ..FilterState::default() };
        assert_eq!(ids(&filter_and_sort(&tasks, &overdue_filter, now)), ids(&groups.overdue));
        assert!(groups.overdue.iter().all(|t| !t.status.is_completed()));
    }
}

#[test]
fn test_due_today_counter_excludes_completed() {
    for now in nows() {
        let tasks = grid(now.date());
        let groups = group_by_due_date(&tasks, now);
        let open_today = groups.today.iter().filter(|t| !t.status.is_completed()).count();
        assert_eq!(compute_stats(&tasks, now).due_today, open_today);
    }
}

#[test]
fn test_extra_constraint_never_grows_result() {
    let now = at(2024, 6, 12, 13, 0);
    let tasks = grid(now.date());
    for base in filter_states() {
        let n = filter_and_sort(&tasks, &base, now).len();
        let mut narrower = vec![
            FilterState { status: Some(Status::Open), ..base.clone() },
            FilterState { task_type: Some(TaskType::ToDo), ..base.clone() },
        ];
        if base.priority.is_none() {
            narrower.push(FilterState { priority: Some(Priority::Low), ..base.clone() });
        }
        if base.search.is_empty() {
            narrower.push(FilterState { search: "renewal".into(), ..base.clone() });
        }
        if base.quick == QuickFilter::All {
            narrower.push(FilterState { quick: QuickFilter::Overdue, ..base.clone() });
        }
        for state in narrower {
            assert!(filter_and_sort(&tasks, &state, now).len() <= n, "{state:?} grew past {base:?}");
        }
    }
}

#[test]
fn test_filter_is_idempotent() {
    let now = at(2024, 6, 12, 13, 0);
    let tasks = grid(now.date());
    for state in filter_states() {
        let once = filter_and_sort(&tasks, &state, now);
        let twice = filter_and_sort(once.iter().copied(), &state, now);
        assert_eq!(ids(&twice), ids(&once), "{state:?}");
    }
}

#[test]
fn test_sorts_are_stable() {
    let now = at(2024, 6, 12, 13, 0);
    let tasks = grid(now.date());
    let position = |id: u64| tasks.iter().position(|t| t.id == id).unwrap();
    for sort in [SortKey::DueDate, SortKey::Priority, SortKey::CreatedDate, SortKey::Title] {
        let state = FilterState { sort: Some(sort), ..FilterState::default() };
        let out = filter_and_sort(&tasks, &state, now);
        for pair in out.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let tied = match sort {
                SortKey::DueDate => a.due_date == b.due_date,
                SortKey::Priority => {
                    priority_rank(a.priority.as_ref()) == priority_rank(b.priority.as_ref())
                }
                SortKey::CreatedDate => a.created_at == b.created_at,
                SortKey::Title => a.title.to_lowercase() == b.title.to_lowercase(),
            };
            if tied {
                assert!(position(a.id) < position(b.id), "{sort:?} reordered {} and {}", a.id, b.id);
            }
        }
    }
}

// Scenarios pinned to Monday 2024-06-10 00:00.

fn monday() -> NaiveDateTime {
    at(2024, 6, 10, 0, 0)
}

fn task_a() -> Task {
    Task { due_date: Some(at(2024, 6, 9, 0, 0)), status: Status::Open, ..Task::new(1, "A") }
}

fn task_b() -> Task {
    Task { due_date: Some(at(2024, 6, 9, 0, 0)), status: Status::Completed, ..Task::new(2, "B") }
}

#[test]
fn test_open_past_task_is_overdue_everywhere() {
    let tasks = vec![task_a()];
    assert_eq!(ids(&group_by_due_date(&tasks, monday()).overdue), vec![1]);
    assert_eq!(compute_stats(&tasks, monday()).overdue, 1);
}

#[test]
fn test_completed_past_task_is_not_overdue() {
    let tasks = vec![task_b()];
    let groups = group_by_due_date(&tasks, monday());
    assert!(groups.overdue.is_empty());
    assert_eq!(ids(&groups.later), vec![2]);
    assert_eq!(compute_stats(&tasks, monday()).overdue, 0);
}

#[test]
fn test_undated_task_only_in_no_due_date() {
    let tasks = vec![Task::new(3, "C")];
    let groups = group_by_due_date(&tasks, monday());
    assert_eq!(ids(&groups.no_due_date), vec![3]);
    let stats = compute_stats(&tasks, monday());
    assert_eq!((stats.overdue, stats.due_today), (0, 0));
}

#[test]
fn test_overdue_quick_filter_drops_completed() {
    let tasks = vec![task_a(), task_b()];
    let state = FilterState { quick: QuickFilter::Overdue, ..FilterState::default() };
    assert_eq!(ids(&filter_and_sort(&tasks, &state, monday())), vec![1]);
}

#[test]
fn test_priority_sort_keeps_tied_order() {
    let tasks: Vec<Task> = [Priority::Low, Priority::High, Priority::Medium, Priority::High]
        .into_iter()
        .enumerate()
        .map(|(i, p)| Task { priority: Some(p), ..Task::new(i as u64 + 1, format!("t{i}")) })
        .collect();
    let state = FilterState { sort: Some(SortKey::Priority), ..FilterState::default() };
    let out = filter_and_sort(&tasks, &state, monday());
    assert_eq!(ids(&out), vec![2, 4, 3, 1]);
    let priorities: Vec<_> = out.iter().map(|t| t.priority.clone().unwrap()).collect();
    assert_eq!(priorities, vec![Priority::High, Priority::High, Priority::Medium, Priority::Low]);
}

#[test]
fn test_completed_this_week_window() {
    let now = monday();
    let tasks = vec![
        Task {
            status: Status::Completed,
            modified_at: Some(now - Duration::days(6)),
            ..Task::new(1, "six days ago")
        },
        Task {
            status: Status::Completed,
            modified_at: Some(now - Duration::days(8)),
            ..Task::new(2, "eight days ago")
        },
    ];
    assert_eq!(compute_stats(&tasks, now).completed_this_week, 1);
}
