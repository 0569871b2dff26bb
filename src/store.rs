//! Task storage.
//!
//! [`TaskStore`] is the narrow contract the task list relies on: list, get,
//! create, update, delete. [`JsonStore`] implements it over a single JSON
//! document on disk. Every call reads a fresh snapshot of the file, and
//! mutations write the whole document back atomically.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::task::{NewTask, Task, TaskError, TaskPatch};

/// Number of records returned by `list_tasks` unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("task not found: {0}")]
    NotFound(u64),
    #[error(transparent)]
    Invalid(#[from] TaskError),
    #[error("failed to write task store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode task store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistence contract for tasks.
pub trait TaskStore {
    /// Current snapshot, ordered by due date with undated tasks last.
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;
    fn get_task(&self, id: u64) -> Result<Task, StoreError>;
    /// Assigns the id and creation/modification timestamps.
    fn create_task(&mut self, new: NewTask) -> Result<Task, StoreError>;
    /// Writes only the fields present in `patch` and bumps `modified_at`.
    fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task, StoreError>;
    fn delete_task(&mut self, id: u64) -> Result<(), StoreError>;
}

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Document {
    fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// File-backed task store.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    page_size: usize,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore {
            path: path.into(),
            page_size: DEFAULT_PAGE_SIZE,
            clock: local_now,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Replace the source of creation/modification timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is an empty store; an unreadable or
    /// undecodable one is reported rather than replaced.
    fn load(&self) -> Result<Document, StoreError> {
        if !self.path.exists() {
            log::debug!("task store {} does not exist yet", self.path.display());
            return Ok(Document::default());
        }
        let unavailable = |e: &dyn std::fmt::Display| {
            log::error!("cannot load task store {}: {e}", self.path.display());
            StoreError::StorageUnavailable(format!("{}: {e}", self.path.display()))
        };
        let buf = fs::read_to_string(&self.path).map_err(|e| unavailable(&e))?;
        serde_json::from_str(&buf).map_err(|e| unavailable(&e))
    }

    /// Atomic-ish write via temp + rename.
    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(doc)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl TaskStore for JsonStore {
    fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.load()?.tasks;
        tasks.sort_by_key(|t| t.due_date.unwrap_or(NaiveDateTime::MAX));
        tasks.truncate(self.page_size);
        Ok(tasks)
    }

    fn get_task(&self, id: u64) -> Result<Task, StoreError> {
        self.load()?
            .tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn create_task(&mut self, new: NewTask) -> Result<Task, StoreError> {
        let mut doc = self.load()?;
        let task = new.into_task(doc.next_id(), (self.clock)())?;
        doc.tasks.push(task.clone());
        self.save(&doc)?;
        log::info!("created task {}", task.id);
        Ok(task)
    }

    fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut doc = self.load()?;
        let now = (self.clock)();
        let task = doc.get_mut(id).ok_or(StoreError::NotFound(id))?;
        patch.apply(task, now)?;
        let updated = task.clone();
        self.save(&doc)?;
        log::info!("updated task {id}");
        Ok(updated)
    }

    fn delete_task(&mut self, id: u64) -> Result<(), StoreError> {
        let mut doc = self.load()?;
        let before = doc.tasks.len();
        doc.tasks.retain(|t| t.id != id);
        if doc.tasks.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.save(&doc)?;
        log::info!("deleted task {id}");
        Ok(())
    }
}
