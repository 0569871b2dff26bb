//! Plain-text rendering for the CLI.

use chrono::{NaiveDate, NaiveDateTime};

use taskdesk::bucket::{bucket_for, TaskGroups};
use taskdesk::dates::{format_due_relative, format_timestamp};
use taskdesk::stats::TaskStats;
use taskdesk::task::Task;

/// One-line header with the four counters.
pub fn print_stats(stats: &TaskStats) {
    println!(
        "Total {}  |  Overdue {}  |  Due today {}  |  Completed this week {}",
        stats.total, stats.overdue, stats.due_today, stats.completed_this_week
    );
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<5} {:<10} {:<12} {:<7} {:<16} {:<14} Title [tags]",
        "ID", "Type", "Status", "Pri", "Due", "Assignee"
    );
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.iter().collect::<Vec<_>>().join(", "))
        };
        println!(
            "{:<5} {:<10} {:<12} {:<7} {:<16} {:<14} {}{}",
            t.id,
            truncate(t.task_type.as_str(), 10),
            truncate(t.status.as_str(), 12),
            t.priority.as_ref().map_or("-", |p| p.as_str()),
            truncate(&format_due_relative(t.due_date, today), 16),
            truncate(t.assignee.as_deref().unwrap_or("-"), 14),
            t.title,
            tags
        );
    }
}

/// Print non-empty buckets in display order, each under a heading.
pub fn print_groups(groups: &TaskGroups<'_>, today: NaiveDate) {
    let mut first = true;
    for (bucket, tasks) in groups.iter() {
        if tasks.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;
        println!("== {} ({}) ==", bucket.heading(), tasks.len());
        print_table(tasks, today);
    }
}

/// Print every field of one task.
pub fn print_task(task: &Task, now: NaiveDateTime) {
    let today = now.date();
    let stamp = |d: Option<NaiveDateTime>| d.map(format_timestamp).unwrap_or_else(|| "-".into());
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Type:         {}", task.task_type);
    println!("Status:       {}", task.status);
    println!("Priority:     {}", task.priority.as_ref().map_or("-", |p| p.as_str()));
    println!(
        "Due:          {}",
        match task.due_date {
            Some(d) => format!("{} ({})", format_timestamp(d), format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Group:        {}", bucket_for(task, now).heading());
    println!("Assignee:     {}", task.assignee.as_deref().unwrap_or("-"));
    println!("Related to:   {}", task.related_to.as_deref().unwrap_or("-"));
    println!("Tags:         {}", if task.tags.is_empty() { "-".into() } else { task.tags.join() });
    println!("Created:      {}", stamp(task.created_at));
    println!("Modified:     {}", stamp(task.modified_at));
    println!("Description:\n{}\n", task.description.as_deref().unwrap_or("-"));
}

/// Clip `s` to `width` columns, marking the cut with an ellipsis.
pub fn truncate(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    match s.char_indices().nth(width) {
        None => s.to_string(),
        Some(_) => {
            let keep = s.char_indices().nth(width - 1).map_or(s.len(), |(i, _)| i);
            format!("{}…", &s[..keep])
        }
    }
}
