//! Task record and the create/patch inputs accepted by the store.
//!
//! A `Task` is what the record API hands back: enums for type, priority and
//! status, a parsed due timestamp, and tags split out of the stored
//! comma-separated string.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// Longest title the record API accepts, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task title is required")]
    EmptyTitle,
    #[error("task title must be 100 characters or less (got {0})")]
    TitleTooLong(usize),
}

/// One actionable CRM item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<NaiveDateTime>,
}

impl Task {
    /// A bare open To-Do with the given id and title and nothing else set.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            task_type: TaskType::default(),
            priority: None,
            status: Status::default(),
            due_date: None,
            assignee: None,
            related_to: None,
            description: None,
            tags: Tags::default(),
            created_at: None,
            modified_at: None,
        }
    }

    /// Calendar date of the due timestamp, if any.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date())
    }
}

/// Labels attached to a task.
///
/// Stored as one comma-separated string; held here as the list of trimmed,
/// non-empty labels in their original order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn parse(raw: &str) -> Self {
        Tags(
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Comma-joined form written back to the store.
    pub fn join(&self) -> String {
        self.0.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whole-label match ignoring case; "lead" does not match "ead".
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        self.0.iter().any(|t| t.to_lowercase() == needle)
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Tags::parse(&tags.join(","))
    }
}

impl From<Option<String>> for Tags {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Tags::parse).unwrap_or_default()
    }
}

impl From<Tags> for String {
    fn from(tags: Tags) -> Self {
        tags.join()
    }
}

/// Trim and check a title against the store's rules.
pub fn validate_title(raw: &str) -> Result<String, TaskError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(TaskError::TitleTooLong(len));
    }
    Ok(title.to_string())
}

/// Fields for a task about to be created. Unset type, priority and status
/// fall back to To-Do, Medium and Open.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDateTime>,
    pub assignee: Option<String>,
    pub related_to: Option<String>,
    pub description: Option<String>,
    pub tags: Tags,
}

impl NewTask {
    /// Validate and turn into a record. `id` and timestamps come from the store.
    pub fn into_task(self, id: u64, now: NaiveDateTime) -> Result<Task, TaskError> {
        Ok(Task {
            id,
            title: validate_title(&self.title)?,
            task_type: self.task_type.unwrap_or_default(),
            priority: Some(self.priority.unwrap_or_default()),
            status: self.status.unwrap_or_default(),
            due_date: self.due_date,
            assignee: non_blank(self.assignee),
            related_to: non_blank(self.related_to),
            description: non_blank(self.description),
            tags: self.tags,
            created_at: Some(now),
            modified_at: Some(now),
        })
    }
}

/// Partial update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub task_type: Option<TaskType>,
    pub priority: Option<Option<Priority>>,
    pub status: Option<Status>,
    pub due_date: Option<Option<NaiveDateTime>>,
    pub assignee: Option<Option<String>>,
    pub related_to: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Tags>,
}

impl TaskPatch {
    /// Patch that only marks the task completed.
    pub fn complete() -> Self {
        TaskPatch {
            status: Some(Status::Completed),
            ..TaskPatch::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.task_type.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
            && self.related_to.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }

    /// Write the present fields onto `task`. The task is untouched if the
    /// patch fails validation.
    pub fn apply(self, task: &mut Task, now: NaiveDateTime) -> Result<(), TaskError> {
        let title = self.title.as_deref().map(validate_title).transpose()?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(t) = self.task_type {
            task.task_type = t;
        }
        if let Some(p) = self.priority {
            task.priority = p;
        }
        if let Some(s) = self.status {
            task.status = s;
        }
        if let Some(d) = self.due_date {
            task.due_date = d;
        }
        if let Some(a) = self.assignee {
            task.assignee = non_blank(a);
        }
        if let Some(r) = self.related_to {
            task.related_to = non_blank(r);
        }
        if let Some(d) = self.description {
            task.description = non_blank(d);
        }
        if let Some(t) = self.tags {
            task.tags = t;
        }
        task.modified_at = Some(now);
        Ok(())
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Serde adapter for optional timestamps. Values that fail to parse read as
/// absent so one corrupt record cannot break a listing.
mod lenient_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::dates::{format_timestamp, parse_timestamp};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_str(&format_timestamp(*dt)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Value::deserialize(d)?;
        let parsed = match &raw {
            Value::Null => return Ok(None),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => parse_timestamp(s),
            _ => None,
        };
        if parsed.is_none() {
            log::warn!("ignoring malformed timestamp {raw}");
        }
        Ok(parsed)
    }
}
