//! Command implementations for the CLI interface.
//!
//! Each handler reads a fresh snapshot from the store, runs the task-list
//! engine over it with the `now` captured once in `main`, and prints the
//! result. Mutating commands go through the store and never touch the engine.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use taskdesk::bucket::group_by_due_date;
use taskdesk::dates::parse_due_input;
use taskdesk::fields::*;
use taskdesk::filter::{filter_and_sort, FilterState};
use taskdesk::stats::compute_stats;
use taskdesk::store::{StoreError, TaskStore};
use taskdesk::task::{NewTask, Tags, TaskPatch};

use crate::output::*;

#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unrecognised due date '{0}'. Use YYYY-MM-DD, 'today', 'tomorrow', a weekday, or 'in Nd'.")]
    BadDue(String),
    #[error("nothing to update")]
    EmptyUpdate,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks with optional filters.
    List {
        /// Quick filter.
        #[arg(long = "filter", value_enum, default_value_t = QuickFilter::All)]
        quick: QuickFilter,
        /// Filter by priority: high | medium | low.
        #[arg(long)]
        priority: Option<Priority>,
        /// Filter by type: call | email | meeting | to-do | follow-up | other.
        #[arg(long = "type")]
        task_type: Option<TaskType>,
        /// Filter by status: open | in-progress | completed | cancelled.
        #[arg(long)]
        status: Option<Status>,
        /// Case-insensitive text matched against title, description, assignee and tags.
        #[arg(long, short)]
        search: Option<String>,
        /// Sort key: due_date | priority | created_date | title.
        #[arg(long, default_value = "due_date")]
        sort: String,
        /// Print tasks under Overdue / Today / Tomorrow / This Week / Later / No Due Date headings.
        #[arg(long)]
        grouped: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the summary counters.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// View a single task.
    View {
        id: u64,
    },

    /// Add a new task.
    Add {
        /// Short title (at most 100 characters).
        title: String,
        #[arg(long = "type")]
        task_type: Option<TaskType>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<Status>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday", "in Nd", optionally followed by HH:MM.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Free-text reference to a lead, deal or contact.
        #[arg(long)]
        related_to: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Update fields on a task.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type")]
        task_type: Option<TaskType>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// Assignee; an empty value clears it.
        #[arg(long)]
        assignee: Option<String>,
        /// Related record; an empty value clears it.
        #[arg(long)]
        related_to: Option<String>,
        /// Description; an empty value clears it.
        #[arg(long)]
        desc: Option<String>,
        /// Add tags. May be repeated and comma-separated.
        #[arg(long = "add-tag")]
        add_tags: Vec<String>,
        /// Remove tags. May be repeated and comma-separated.
        #[arg(long = "rm-tag")]
        rm_tags: Vec<String>,
    },

    /// Mark a task completed.
    Complete {
        id: u64,
    },

    /// Delete a task.
    Delete {
        id: u64,
    },

    /// List distinct tags and counts.
    Tags,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// List tasks with filtering and sorting, under the summary counters.
///
/// If the store cannot be read the view is rendered empty and the error is
/// returned afterwards.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list<S: TaskStore>(
    store: &S,
    now: NaiveDateTime,
    quick: QuickFilter,
    priority: Option<Priority>,
    task_type: Option<TaskType>,
    status: Option<Status>,
    search: Option<String>,
    sort: String,
    grouped: bool,
    limit: Option<usize>,
) -> Result<(), CmdError> {
    let (tasks, load_err) = match store.list_tasks() {
        Ok(tasks) => (tasks, None),
        Err(e) => (Vec::new(), Some(e)),
    };

    let state = FilterState {
        quick,
        priority,
        task_type,
        status,
        search: search.unwrap_or_default(),
        sort: None,
    }
    .sort_by_name(&sort);

    print_stats(&compute_stats(&tasks, now));
    println!();

    let mut filtered = filter_and_sort(&tasks, &state, now);
    if let Some(n) = limit {
        filtered.truncate(n);
    }

    let today = now.date();
    if filtered.is_empty() {
        println!("No tasks found.");
    } else if grouped {
        print_groups(&group_by_due_date(filtered, now), today);
    } else {
        print_table(&filtered, today);
    }

    match load_err {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Print the summary counters over the whole collection.
pub fn cmd_stats<S: TaskStore>(store: &S, now: NaiveDateTime, json: bool) -> Result<(), CmdError> {
    let stats = compute_stats(&store.list_tasks()?, now);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats).map_err(StoreError::from)?);
    } else {
        print_stats(&stats);
    }
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view<S: TaskStore>(store: &S, now: NaiveDateTime, id: u64) -> Result<(), CmdError> {
    let task = store.get_task(id)?;
    print_task(&task, now);
    Ok(())
}

/// Add a new task.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add<S: TaskStore>(
    store: &mut S,
    now: NaiveDateTime,
    title: String,
    task_type: Option<TaskType>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    assignee: Option<String>,
    related_to: Option<String>,
    desc: Option<String>,
    tags: Vec<String>,
) -> Result<(), CmdError> {
    let due_date = due.map(|d| parse_due(&d, now)).transpose()?;
    let task = store.create_task(NewTask {
        title,
        task_type,
        priority,
        status,
        due_date,
        assignee,
        related_to,
        description: desc,
        tags: Tags::from(tags),
    })?;
    println!("Added task {}", task.id);
    Ok(())
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update<S: TaskStore>(
    store: &mut S,
    now: NaiveDateTime,
    id: u64,
    title: Option<String>,
    task_type: Option<TaskType>,
    priority: Option<Priority>,
    status: Option<Status>,
    due: Option<String>,
    clear_due: bool,
    assignee: Option<String>,
    related_to: Option<String>,
    desc: Option<String>,
    add_tags: Vec<String>,
    rm_tags: Vec<String>,
) -> Result<(), CmdError> {
    let due_date = if clear_due {
        Some(None)
    } else {
        due.map(|d| parse_due(&d, now).map(Some)).transpose()?
    };

    let tags = if add_tags.is_empty() && rm_tags.is_empty() {
        None
    } else {
        let current = store.get_task(id)?.tags;
        let rm = Tags::from(rm_tags);
        let mut merged: Vec<String> = current
            .iter()
            .filter(|t| !rm.contains_ignore_case(t))
            .map(str::to_string)
            .collect();
        merged.extend(Tags::from(add_tags).iter().map(str::to_string));
        Some(Tags::from(merged))
    };

    let patch = TaskPatch {
        title,
        task_type,
        priority: priority.map(Some),
        status,
        due_date,
        assignee: assignee.map(Some),
        related_to: related_to.map(Some),
        description: desc.map(Some),
        tags,
    };
    if patch.is_empty() {
        return Err(CmdError::EmptyUpdate);
    }
    let task = store.update_task(id, patch)?;
    println!("Updated task {}", task.id);
    Ok(())
}

/// Mark a task as completed.
pub fn cmd_complete<S: TaskStore>(store: &mut S, id: u64) -> Result<(), CmdError> {
    let task = store.update_task(id, TaskPatch::complete())?;
    println!("Completed task {} - {}", task.id, task.title);
    Ok(())
}

/// Delete a task.
pub fn cmd_delete<S: TaskStore>(store: &mut S, id: u64) -> Result<(), CmdError> {
    store.delete_task(id)?;
    println!("Deleted task {id}");
    Ok(())
}

/// List all distinct tags with their usage counts.
pub fn cmd_tags<S: TaskStore>(store: &S) -> Result<(), CmdError> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for t in store.list_tasks()? {
        for tag in t.tags.iter() {
            *counts.entry(tag.to_string()).or_default() += 1;
        }
    }
    println!("{:<24} Count", "Tag");
    for (tag, c) in counts {
        println!("{:<24} {}", truncate(&tag, 24), c);
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn parse_due(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, CmdError> {
    parse_due_input(raw, now.date()).ok_or_else(|| CmdError::BadDue(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taskdesk::store::JsonStore;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn store(dir: &tempfile::TempDir) -> JsonStore {
        JsonStore::new(dir.path().join("tasks.json")).with_clock(fixed_now)
    }

    fn add(store: &mut JsonStore, title: &str, due: Option<&str>, tags: &str) {
        cmd_add(
            store,
            fixed_now(),
            title.into(),
            None,
            None,
            None,
            due.map(str::to_string),
            None,
            None,
            None,
            vec![tags.to_string()],
        )
        .unwrap();
    }

    fn list_all(store: &JsonStore) -> Result<(), CmdError> {
        cmd_list(store, fixed_now(), QuickFilter::All, None, None, None, None, "due_date".into(), true, None)
    }

    #[test]
    fn test_list_over_unreadable_store_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        std::fs::write(s.path(), "{ not json").unwrap();
        let res = list_all(&s);
        assert!(matches!(res, Err(CmdError::Store(StoreError::StorageUnavailable(_)))));
        // The store is not rewritten by a failed listing.
        assert_eq!(std::fs::read_to_string(s.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_complete_moves_task_out_of_overdue() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        add(&mut s, "Chase invoice", Some("2024-06-07"), "");
        add(&mut s, "Demo", Some("2024-06-12"), "");

        let before = s.list_tasks().unwrap();
        let overdue: Vec<u64> = group_by_due_date(&before, fixed_now()).overdue.iter().map(|t| t.id).collect();
        assert_eq!(overdue, vec![1]);
        assert_eq!(compute_stats(&before, fixed_now()).overdue, 1);

        cmd_complete(&mut s, 1).unwrap();
        list_all(&s).unwrap();

        let after = s.list_tasks().unwrap();
        let groups = group_by_due_date(&after, fixed_now());
        assert!(groups.overdue.is_empty());
        assert_eq!(groups.later.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        let stats = compute_stats(&after, fixed_now());
        assert_eq!((stats.overdue, stats.completed_this_week), (0, 1));
    }

    #[test]
    fn test_update_merges_added_and_removed_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        add(&mut s, "Renewal call", None, "lead,renewal");

        cmd_update(
            &mut s,
            fixed_now(),
            1,
            None,
            None,
            None,
            None,
            None,
            false,
            None,
            None,
            None,
            vec!["hot".into()],
            vec!["LEAD".into()],
        )
        .unwrap();

        let task = s.get_task(1).unwrap();
        assert_eq!(task.tags.join(), "renewal,hot");
        assert_eq!(task.title, "Renewal call");
    }

    #[test]
    fn test_update_rejects_bad_due_and_empty_patch() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        add(&mut s, "Send deck", None, "");

        let bad = cmd_update(
            &mut s, fixed_now(), 1, None, None, None, None, Some("in 99999999999d".into()), false,
            None, None, None, vec![], vec![],
        );
        assert!(matches!(bad, Err(CmdError::BadDue(_))));

        let empty = cmd_update(
            &mut s, fixed_now(), 1, None, None, None, None, None, false, None, None, None, vec![], vec![],
        );
        assert!(matches!(empty, Err(CmdError::EmptyUpdate)));
    }
}
