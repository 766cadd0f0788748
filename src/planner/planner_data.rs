use super::model::{Event, FocusSession, Subject, Task, default_subjects};

/// The canonical planner collections
///
/// Vecs keep insertion order, which every derived view and every snapshot
/// relies on. Ids are looked up by linear scan; a personal planner holds a
/// few hundred items at most.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerData {
    pub(crate) subjects: Vec<Subject>,
    pub(crate) events: Vec<Event>,
    pub(crate) focus_sessions: Vec<FocusSession>,
}

impl Default for PlannerData {
    fn default() -> Self {
        Self {
            subjects: default_subjects(),
            events: Vec::new(),
            focus_sessions: Vec::new(),
        }
    }
}

impl PlannerData {
    /// Create the seed state: two empty subjects, no events, no sessions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from already-loaded collections
    pub fn from_parts(
        subjects: Vec<Subject>,
        events: Vec<Event>,
        focus_sessions: Vec<FocusSession>,
    ) -> Self {
        Self {
            subjects,
            events,
            focus_sessions,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn focus_sessions(&self) -> &[FocusSession] {
        &self.focus_sessions
    }

    pub fn find_subject(&self, id: u64) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub(crate) fn find_subject_mut(&mut self, id: u64) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id == id)
    }

    pub fn find_task(&self, subject_id: u64, task_id: u64) -> Option<&Task> {
        self.find_subject(subject_id)?.find_task(task_id)
    }

    pub(crate) fn find_task_mut(&mut self, subject_id: u64, task_id: u64) -> Option<&mut Task> {
        self.find_subject_mut(subject_id)?.find_task_mut(task_id)
    }

    /// Task ids are unique across all subjects, not just within one
    pub fn contains_task_id(&self, task_id: u64) -> bool {
        self.subjects
            .iter()
            .any(|s| s.tasks.iter().any(|t| t.id == task_id))
    }

    pub fn contains_subject_id(&self, id: u64) -> bool {
        self.subjects.iter().any(|s| s.id == id)
    }

    pub fn contains_event_id(&self, id: u64) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    /// Largest focus-session timestamp, if any session exists
    pub fn latest_session_timestamp(&self) -> Option<i64> {
        self.focus_sessions.iter().map(|s| s.timestamp).max()
    }

    /// Remove a subject together with all of its tasks
    pub(crate) fn remove_subject(&mut self, id: u64) -> Option<Subject> {
        let pos = self.subjects.iter().position(|s| s.id == id)?;
        Some(self.subjects.remove(pos))
    }

    pub(crate) fn remove_task(&mut self, subject_id: u64, task_id: u64) -> Option<Task> {
        let subject = self.find_subject_mut(subject_id)?;
        let pos = subject.tasks.iter().position(|t| t.id == task_id)?;
        Some(subject.tasks.remove(pos))
    }

    pub(crate) fn remove_event(&mut self, id: u64) -> Option<Event> {
        let pos = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(pos))
    }

    /// Remove the first session carrying `timestamp`
    pub(crate) fn remove_focus_session(&mut self, timestamp: i64) -> Option<FocusSession> {
        let pos = self
            .focus_sessions
            .iter()
            .position(|s| s.timestamp == timestamp)?;
        Some(self.focus_sessions.remove(pos))
    }
}
