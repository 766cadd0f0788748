//! Study Planner Library
//!
//! An in-memory planning model for subjects and their tasks, calendar events
//! and timed focus sessions, plus the derived views a UI needs (due today,
//! overdue, completion stats, sorted timelines).
//!
//! # Architecture
//!
//! - **Store**: [`PlanningStore`] owns the canonical collections and applies
//!   every mutation, writing a snapshot after each one
//! - **Domain**: the `planner` module holds the data model, patches and the
//!   pure derived-view functions in [`views`]
//! - **Collaborators**: a [`Clock`] supplies today, instants and ids; a
//!   [`SnapshotStore`] keeps named string blobs (memory or files, optionally
//!   committed to git)
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use study_planner::{FixedClock, MemoryStorage, PlanningStore, Priority};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let mut store = PlanningStore::load(MemoryStorage::new(), FixedClock::new(today));
//!
//! let yesterday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! store
//!     .add_task(1, "Problem set 4", Some(yesterday), Some(Priority::High))
//!     .unwrap();
//!
//! assert_eq!(store.overdue_tasks().len(), 1);
//! assert_eq!(store.stats().pending, 1);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod formatting;
mod git_ops;
pub mod planner;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PlannerConfig;
pub use error::{EntityKind, StoreError};
pub use git_ops::GitOps;
pub use planner::views;
pub use planner::{
    Event, EventDraft, FlatTask, FocusSession, FocusSummary, PlannerData, Priority, SortBy,
    Subject, SubjectDraft, SubjectPatch, Task, TaskPatch, TaskStats,
};
pub use storage::{FileStorage, MemoryStorage, SnapshotStore};
pub use store::PlanningStore;
