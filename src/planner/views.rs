//! Derived views over planner collections
//!
//! Pure functions: they read subjects, events and focus sessions and return
//! new values. Nothing here mutates its input, and "today" is always passed
//! in by the caller.

use super::model::{Event, FocusSession, Subject, Task};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A task tagged with its owning subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTask {
    #[serde(flatten)]
    pub task: Task,
    pub subject_id: u64,
    pub subject_name: String,
    pub subject_color: String,
}

impl AsRef<Task> for FlatTask {
    fn as_ref(&self) -> &Task {
        &self.task
    }
}

/// Sort order for task lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "dueDate", alias = "due_date", alias = "due-date")]
    DueDate,
    #[serde(rename = "priority")]
    Priority,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dueDate" | "due_date" | "due-date" => Ok(SortBy::DueDate),
            "priority" => Ok(SortBy::Priority),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid options are: dueDate, priority",
                s
            )),
        }
    }
}

/// Task counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Focus-session totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSummary {
    pub sessions: usize,
    pub total_duration: u64,
    pub today_duration: u64,
}

/// Every task of every subject, in subject-then-task insertion order
pub fn flatten_tasks(subjects: &[Subject]) -> Vec<FlatTask> {
    subjects
        .iter()
        .flat_map(|subject| {
            subject.tasks.iter().map(move |task| FlatTask {
                task: task.clone(),
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                subject_color: subject.color.clone(),
            })
        })
        .collect()
}

/// Stable sort into a new sequence
///
/// Works for a single subject's tasks as well as for flattened tasks.
pub fn sort_tasks<T>(tasks: &[T], sort_by: SortBy) -> Vec<T>
where
    T: AsRef<Task> + Clone,
{
    let mut sorted = tasks.to_vec();
    match sort_by {
        SortBy::Priority => sorted.sort_by_key(|t| t.as_ref().priority.rank()),
        SortBy::DueDate => sorted.sort_by_key(|t| t.as_ref().due_date),
    }
    sorted
}

pub fn stats(subjects: &[Subject]) -> TaskStats {
    let (total, completed) = subjects
        .iter()
        .flat_map(|s| s.tasks.iter())
        .fold((0, 0), |(total, completed), task| {
            (total + 1, completed + usize::from(task.completed))
        });
    TaskStats {
        total,
        completed,
        pending: total - completed,
    }
}

fn filter_tasks(subjects: &[Subject], keep: impl Fn(&Task) -> bool) -> Vec<FlatTask> {
    flatten_tasks(subjects)
        .into_iter()
        .filter(|flat| keep(&flat.task))
        .collect()
}

/// Incomplete tasks due strictly before `today`
pub fn overdue_tasks(subjects: &[Subject], today: NaiveDate) -> Vec<FlatTask> {
    filter_tasks(subjects, |t| t.due_date < today && !t.completed)
}

/// Incomplete tasks due on `today`
pub fn due_today_tasks(subjects: &[Subject], today: NaiveDate) -> Vec<FlatTask> {
    filter_tasks(subjects, |t| t.due_date == today && !t.completed)
}

/// All tasks due on `date`, completed or not
pub fn tasks_due_on(subjects: &[Subject], date: NaiveDate) -> Vec<FlatTask> {
    filter_tasks(subjects, |t| t.due_date == date)
}

pub fn pinned_tasks(subjects: &[Subject]) -> Vec<FlatTask> {
    filter_tasks(subjects, |t| t.pinned)
}

pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.date == date).collect()
}

pub fn focus_summary(sessions: &[FocusSession], today: NaiveDate) -> FocusSummary {
    sessions.iter().fold(FocusSummary::default(), |mut acc, s| {
        acc.sessions += 1;
        acc.total_duration += u64::from(s.duration);
        if s.date == today {
            acc.today_duration += u64::from(s.duration);
        }
        acc
    })
}

/// Summed durations per day, oldest first
pub fn focus_totals_by_date(sessions: &[FocusSession]) -> BTreeMap<NaiveDate, u64> {
    let mut totals = BTreeMap::new();
    for session in sessions {
        *totals.entry(session.date).or_insert(0) += u64::from(session.duration);
    }
    totals
}
