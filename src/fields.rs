//! Enumerations and field types for CRM tasks.
//!
//! The record store keeps task type, priority and status as free strings. Each
//! of them maps to a closed enum here, with an `Unknown` variant that keeps the
//! raw stored value so equality filters stay well-defined for records written
//! by other clients.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What kind of action a task represents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Call,
    Email,
    Meeting,
    #[default]
    ToDo,
    FollowUp,
    Other,
    Unknown(String),
}

impl TaskType {
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Call => "Call",
            TaskType::Email => "Email",
            TaskType::Meeting => "Meeting",
            TaskType::ToDo => "To-Do",
            TaskType::FollowUp => "Follow-up",
            TaskType::Other => "Other",
            TaskType::Unknown(raw) => raw,
        }
    }

    fn known(s: &str) -> Option<Self> {
        match normalise(s).as_str() {
            "call" => Some(TaskType::Call),
            "email" => Some(TaskType::Email),
            "meeting" => Some(TaskType::Meeting),
            "to-do" | "todo" => Some(TaskType::ToDo),
            "follow-up" | "followup" => Some(TaskType::FollowUp),
            "other" => Some(TaskType::Other),
            _ => None,
        }
    }

    fn from_input(s: &str) -> Option<Self> {
        TaskType::known(s)
    }
}

/// Task importance. Sorting ranks High first, then Medium, then Low.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Unknown(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unknown(raw) => raw,
        }
    }

    fn known(s: &str) -> Option<Self> {
        match normalise(s).as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    fn from_input(s: &str) -> Option<Self> {
        Priority::known(s)
    }
}

/// Sort rank for an optional priority (High=0, Medium=1, Low=2, anything else=3).
pub fn priority_rank(p: Option<&Priority>) -> u8 {
    match p {
        Some(Priority::High) => 0,
        Some(Priority::Medium) => 1,
        Some(Priority::Low) => 2,
        Some(Priority::Unknown(_)) | None => 3,
    }
}

/// Task lifecycle status. `Completed` is terminal for overdue accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
    Unknown(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Cancelled => "Cancelled",
            Status::Unknown(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }

    fn known(s: &str) -> Option<Self> {
        match normalise(s).as_str() {
            "open" => Some(Status::Open),
            "in-progress" | "inprogress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            "cancelled" | "canceled" => Some(Status::Cancelled),
            _ => None,
        }
    }

    /// Stored "Done" stays `Unknown`; on the command line it means Completed.
    fn from_input(s: &str) -> Option<Self> {
        match normalise(s).as_str() {
            "done" => Some(Status::Completed),
            _ => Status::known(s),
        }
    }
}

/// Lowercase and fold spaces/underscores to hyphens so "In Progress",
/// "in_progress" and "in-progress" compare equal.
fn normalise(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '_'], "-")
}

/// Error for command-line values that name no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised {field} '{value}'")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

macro_rules! string_enum_impls {
    ($ty:ident, $field:literal) => {
        impl From<String> for $ty {
            fn from(raw: String) -> Self {
                $ty::known(&raw).unwrap_or($ty::Unknown(raw))
            }
        }

        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                $ty::from(raw.to_string())
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> Self {
                match v {
                    $ty::Unknown(raw) => raw,
                    other => other.as_str().to_string(),
                }
            }
        }

        /// Strict parse for user input: unknown values are rejected instead
        /// of being carried as `Unknown`.
        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::from_input(s).ok_or_else(|| UnknownValue {
                    field: $field,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum_impls!(TaskType, "task type");
string_enum_impls!(Priority, "priority");
string_enum_impls!(Status, "status");

/// Preset filter over due date and completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum QuickFilter {
    #[default]
    All,
    Today,
    Upcoming,
    Overdue,
    Completed,
    NoDueDate,
}

/// Available orderings for the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    Priority,
    CreatedDate,
    Title,
}

impl SortKey {
    /// Lenient parse. Returns `None` for keys the list does not know how to
    /// order by; callers leave the order untouched in that case.
    pub fn parse(s: &str) -> Option<SortKey> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "due_date" | "due" => Some(SortKey::DueDate),
            "priority" => Some(SortKey::Priority),
            "created_date" | "created" => Some(SortKey::CreatedDate),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }
}

/// Date-relative group a task is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Later,
    NoDueDate,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 6] = [
        Bucket::Overdue,
        Bucket::Today,
        Bucket::Tomorrow,
        Bucket::ThisWeek,
        Bucket::Later,
        Bucket::NoDueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Overdue => "overdue",
            Bucket::Today => "today",
            Bucket::Tomorrow => "tomorrow",
            Bucket::ThisWeek => "thisWeek",
            Bucket::Later => "later",
            Bucket::NoDueDate => "noDueDate",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::ThisWeek => "This Week",
            Bucket::Later => "Later",
            Bucket::NoDueDate => "No Due Date",
        }
    }
}
