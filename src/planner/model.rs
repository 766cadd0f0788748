use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Task priority
///
/// Serialized lowercase (`"high"`, `"medium"`, `"low"`) to match the snapshot format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high sorts first
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: high, medium, low",
                s
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(name)
    }
}

/// A unit of work owned by exactly one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    /// Calendar date with no time component (format: YYYY-MM-DD)
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub pinned: bool,
}

impl AsRef<Task> for Task {
    fn as_ref(&self) -> &Task {
        self
    }
}

fn default_expanded() -> bool {
    true
}

/// A top-level grouping (e.g. a course) that owns its tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    /// Presentation color tag (e.g. "bg-blue-500")
    pub color: String,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Subject {
    pub fn find_task(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn find_task_mut(&mut self, task_id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

/// Data for creating a subject
///
/// `id` is optional: when absent the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectDraft {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub color: String,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

impl SubjectDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            expanded: true,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A standalone calendar entry
///
/// Fields other than `id`, `title` and `date` are kept verbatim in `extra`
/// and written back flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            extra: Map::new(),
        }
    }

    /// Attach a caller-defined field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A recorded interval of focused work
///
/// `timestamp` (epoch milliseconds) is the identity used for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub date: NaiveDate,
    /// Caller-defined unit, used consistently
    pub duration: u32,
    pub timestamp: i64,
}

/// The seed collection used when no subjects have been saved yet
pub fn default_subjects() -> Vec<Subject> {
    vec![
        Subject {
            id: 1,
            name: "Subject 1".to_string(),
            color: "bg-blue-500".to_string(),
            expanded: true,
            tasks: Vec::new(),
        },
        Subject {
            id: 2,
            name: "Subject 2".to_string(),
            color: "bg-green-500".to_string(),
            expanded: true,
            tasks: Vec::new(),
        },
    ]
}
