//! Planner domain models and derived views
//!
//! - `model`: subjects, tasks, events, focus sessions and their drafts
//! - `patch`: partial updates for tasks and subjects
//! - `planner_data`: the canonical collections and lookups over them
//! - `views`: read-only projections (flattened lists, filters, sorts, stats)

mod model;
mod patch;
mod planner_data;
pub mod views;

pub use model::{
    Event, EventDraft, FocusSession, Priority, Subject, SubjectDraft, Task, default_subjects,
    local_date_today,
};
pub use patch::{SubjectPatch, TaskPatch};
pub use planner_data::PlannerData;
pub use views::{FlatTask, FocusSummary, SortBy, TaskStats};
