//! Date-relative grouping of tasks for display.
//!
//! Every task lands in exactly one [`Bucket`]. Rules are checked in order and
//! the first match wins:
//!
//! 1. no due date: `noDueDate`
//! 2. due before the start of today and not completed: `overdue`
//! 3. due on today's date: `today`
//! 4. due on tomorrow's date: `tomorrow`
//! 5. due after tomorrow but no later than Sunday of the current ISO week
//!    (weeks run Monday to Sunday): `thisWeek`
//! 6. everything else: `later`
//!
//! A completed task whose due date has passed therefore never shows as
//! overdue; being in the past it is neither today, tomorrow nor later this
//! week, so it falls through to `later`.
//!
//! [`is_overdue`] is the one definition of "overdue"; the quick filter and the
//! summary counters call it too.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::dates::{start_of_day, week_bounds};
use crate::fields::Bucket;
use crate::task::Task;

/// Due strictly before the start of today's date and not completed.
///
/// Compares against midnight rather than the current instant, so a task due
/// earlier today stays in `today` for the whole day.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    let sod = start_of_day(now);
    !task.status.is_completed() && task.due_date.is_some_and(|due| due < sod)
}

/// Due on the given calendar date, whatever the status.
pub fn is_due_on(task: &Task, day: NaiveDate) -> bool {
    task.due_day() == Some(day)
}

/// Classify one task relative to `now`.
pub fn bucket_for(task: &Task, now: NaiveDateTime) -> Bucket {
    let Some(due) = task.due_day() else {
        return Bucket::NoDueDate;
    };
    if is_overdue(task, now) {
        return Bucket::Overdue;
    }
    let today = now.date();
    let tomorrow = today + Duration::days(1);
    if due == today {
        return Bucket::Today;
    }
    if due == tomorrow {
        return Bucket::Tomorrow;
    }
    let (_, week_end) = week_bounds(today);
    if due > tomorrow && due <= week_end {
        return Bucket::ThisWeek;
    }
    Bucket::Later
}

/// Tasks split into the six display buckets, input order kept within each.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskGroups<'a> {
    pub overdue: Vec<&'a Task>,
    pub today: Vec<&'a Task>,
    pub tomorrow: Vec<&'a Task>,
    pub this_week: Vec<&'a Task>,
    pub later: Vec<&'a Task>,
    pub no_due_date: Vec<&'a Task>,
}

impl<'a> TaskGroups<'a> {
    pub fn get(&self, bucket: Bucket) -> &[&'a Task] {
        match bucket {
            Bucket::Overdue => &self.overdue,
            Bucket::Today => &self.today,
            Bucket::Tomorrow => &self.tomorrow,
            Bucket::ThisWeek => &self.this_week,
            Bucket::Later => &self.later,
            Bucket::NoDueDate => &self.no_due_date,
        }
    }

    fn get_mut(&mut self, bucket: Bucket) -> &mut Vec<&'a Task> {
        match bucket {
            Bucket::Overdue => &mut self.overdue,
            Bucket::Today => &mut self.today,
            Bucket::Tomorrow => &mut self.tomorrow,
            Bucket::ThisWeek => &mut self.this_week,
            Bucket::Later => &mut self.later,
            Bucket::NoDueDate => &mut self.no_due_date,
        }
    }

    /// Buckets in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[&'a Task])> + '_ {
        Bucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }

    /// Total number of tasks across all buckets.
    pub fn len(&self) -> usize {
        Bucket::ALL.iter().map(|&b| self.get(b).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `tasks` into date buckets relative to `now`.
pub fn group_by_due_date<'a, I>(tasks: I, now: NaiveDateTime) -> TaskGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups = TaskGroups::default();
    for task in tasks {
        groups.get_mut(bucket_for(task, now)).push(task);
    }
    groups
}
