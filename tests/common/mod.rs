//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use study_planner::{FixedClock, MemoryStorage, PlanningStore, Priority, Subject, Task};

pub type TestStore = PlanningStore<MemoryStorage, FixedClock>;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A store over empty memory storage with "today" fixed to `today`
pub fn store_on(today: NaiveDate) -> TestStore {
    PlanningStore::load(MemoryStorage::new(), FixedClock::new(today))
}

/// Create a test task with minimal fields
pub fn create_test_task(id: u64, due: NaiveDate, priority: Priority, completed: bool) -> Task {
    Task {
        id,
        title: format!("Task {}", id),
        due_date: due,
        completed,
        priority,
        pinned: false,
    }
}

/// Create a test subject owning `tasks`
pub fn create_test_subject(id: u64, name: &str, tasks: Vec<Task>) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        color: "bg-blue-500".to_string(),
        expanded: true,
        tasks,
    }
}
