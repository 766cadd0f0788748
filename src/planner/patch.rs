//! Partial updates for tasks and subjects
//!
//! Each patch names every field it may touch. Fields left as `None` keep
//! their current value. Deserializing a patch with an unknown key fails.

use super::model::{Priority, Subject, Task};
use crate::error::StoreError;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub pinned: Option<bool>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Check the patch without touching any task
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(StoreError::Blank { field: "title" });
        }
        Ok(())
    }

    /// Merge the patch into `task`. Call `validate` first.
    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(pinned) = self.pinned {
            task.pinned = pinned;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub expanded: Option<bool>,
}

impl SubjectPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(StoreError::Blank { field: "name" });
        }
        Ok(())
    }

    pub(crate) fn apply(self, subject: &mut Subject) {
        if let Some(name) = self.name {
            subject.name = name;
        }
        if let Some(color) = self.color {
            subject.color = color;
        }
        if let Some(expanded) = self.expanded {
            subject.expanded = expanded;
        }
    }
}
