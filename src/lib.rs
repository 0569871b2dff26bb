//! # taskdesk
//!
//! The task list engine behind a sales CRM's Tasks view.
//!
//! Given a snapshot of task records and the current time, the engine
//! answers three questions, all as pure functions:
//!
//! - which tasks match the current selections, and in what order
//!   ([`filter::filter_and_sort`])
//! - which date-relative group each task belongs to
//!   ([`bucket::group_by_due_date`])
//! - what the header counters are ([`stats::compute_stats`])
//!
//! Records come from a [`store::TaskStore`]; [`store::JsonStore`] keeps them
//! in a local JSON file. "Now" is always passed in, never read inside the
//! engine.

pub mod bucket;
pub mod dates;
pub mod fields;
pub mod filter;
pub mod stats;
pub mod store;
pub mod task;
