//! The planning store: canonical state plus every mutation
//!
//! A [`PlanningStore`] owns the planner collections, an injected [`Clock`]
//! and a [`SnapshotStore`]. Each successful mutation rewrites the blob of the
//! collection it touched. Write failures are logged and counted; the
//! in-memory state stays authoritative and the store keeps serving.
//!
//! The three collections are persisted independently, so a crash between two
//! writes can leave their blobs out of step with each other.
//!
//! A blob that exists but cannot be read or parsed at load time is held: the
//! store serves the default collection in its place but never writes over
//! the held blob until `persist_all()` is called explicitly.

use crate::clock::Clock;
use crate::error::{EntityKind, StoreError};
use crate::planner::views::{self, FlatTask, FocusSummary, SortBy, TaskStats};
use crate::planner::{
    Event, EventDraft, FocusSession, PlannerData, Priority, Subject, SubjectDraft, SubjectPatch,
    Task, TaskPatch, default_subjects,
};
use crate::storage::{EVENTS_KEY, FOCUS_SESSIONS_KEY, SUBJECTS_KEY, SnapshotStore};
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Which collection a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Collection {
    Subjects,
    Events,
    FocusSessions,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Subjects => SUBJECTS_KEY,
            Collection::Events => EVENTS_KEY,
            Collection::FocusSessions => FOCUS_SESSIONS_KEY,
        }
    }
}

pub struct PlanningStore<S: SnapshotStore, C: Clock> {
    data: PlannerData,
    storage: S,
    clock: C,
    persist_failures: usize,
    held: HashSet<Collection>,
}

/// Outcome of reading one collection blob
struct Loaded<T> {
    items: Vec<T>,
    /// A blob was present but unusable
    unreadable: bool,
}

/// Read one collection blob, falling back to `default` when it is absent or unusable
fn load_collection<S, T>(storage: &S, key: &str, default: impl FnOnce() -> Vec<T>) -> Loaded<T>
where
    S: SnapshotStore,
    T: DeserializeOwned,
{
    let unusable = |default: Vec<T>| Loaded {
        items: default,
        unreadable: true,
    };
    match storage.load(key) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(items) => Loaded {
                items,
                unreadable: false,
            },
            Err(e) => {
                log::warn!("holding corrupt '{}' snapshot: {}", key, e);
                unusable(default())
            }
        },
        Ok(None) => Loaded {
            items: default(),
            unreadable: false,
        },
        Err(e) => {
            log::warn!("holding unreadable '{}' snapshot: {:#}", key, e);
            unusable(default())
        }
    }
}

fn save_blob<S, T>(storage: &mut S, key: &str, items: &[T]) -> anyhow::Result<()>
where
    S: SnapshotStore,
    T: Serialize,
{
    let blob = serde_json::to_string(items)?;
    storage.save(key, &blob)
}

impl<S: SnapshotStore, C: Clock> PlanningStore<S, C> {
    /// Load state from `storage`
    ///
    /// No subjects saved yet means the two default subjects. Missing events or
    /// sessions mean empty collections. Never fails: a blob that cannot be
    /// read or parsed is logged, replaced by its default in memory, and held
    /// so later mutations do not overwrite it.
    pub fn load(storage: S, clock: C) -> Self {
        let subjects = load_collection(&storage, SUBJECTS_KEY, default_subjects);
        let events = load_collection(&storage, EVENTS_KEY, Vec::new);
        let focus_sessions = load_collection(&storage, FOCUS_SESSIONS_KEY, Vec::new);
        log::info!(
            "loaded {} subject(s), {} event(s), {} focus session(s)",
            subjects.items.len(),
            events.items.len(),
            focus_sessions.items.len()
        );

        let mut held = HashSet::new();
        for (collection, unreadable) in [
            (Collection::Subjects, subjects.unreadable),
            (Collection::Events, events.unreadable),
            (Collection::FocusSessions, focus_sessions.unreadable),
        ] {
            if unreadable {
                held.insert(collection);
            }
        }

        let mut store = Self::with_data(
            PlannerData::from_parts(subjects.items, events.items, focus_sessions.items),
            storage,
            clock,
        );
        store.held = held;
        store
    }

    /// Start from explicit state, without reading `storage`
    pub fn with_data(data: PlannerData, storage: S, clock: C) -> Self {
        Self {
            data,
            storage,
            clock,
            persist_failures: 0,
            held: HashSet::new(),
        }
    }

    pub fn data(&self) -> &PlannerData {
        &self.data
    }

    pub fn subjects(&self) -> &[Subject] {
        self.data.subjects()
    }

    pub fn events(&self) -> &[Event] {
        self.data.events()
    }

    pub fn focus_sessions(&self) -> &[FocusSession] {
        self.data.focus_sessions()
    }

    pub fn subject(&self, id: u64) -> Option<&Subject> {
        self.data.find_subject(id)
    }

    pub fn task(&self, subject_id: u64, task_id: u64) -> Option<&Task> {
        self.data.find_task(subject_id, task_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of snapshot writes that failed since the store was created
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    /// Snapshot keys whose stored blob could not be loaded and is left untouched
    pub fn held_keys(&self) -> Vec<&'static str> {
        [
            Collection::Subjects,
            Collection::Events,
            Collection::FocusSessions,
        ]
        .into_iter()
        .filter(|c| self.held.contains(c))
        .map(Collection::key)
        .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn persist(&mut self, collection: Collection) {
        let key = collection.key();
        if self.held.contains(&collection) {
            log::warn!("not writing '{}': stored snapshot is held", key);
            return;
        }
        let result = match collection {
            Collection::Subjects => save_blob(&mut self.storage, key, self.data.subjects()),
            Collection::Events => save_blob(&mut self.storage, key, self.data.events()),
            Collection::FocusSessions => {
                save_blob(&mut self.storage, key, self.data.focus_sessions())
            }
        };
        if let Err(e) = result {
            self.persist_failures += 1;
            log::warn!("failed to persist '{}' snapshot: {:#}", key, e);
        }
    }

    /// Write all three collections
    ///
    /// Releases held blobs: their in-memory replacements overwrite them.
    pub fn persist_all(&mut self) {
        if !self.held.is_empty() {
            log::warn!("overwriting held snapshot(s): {:?}", self.held_keys());
            self.held.clear();
        }
        self.persist(Collection::Subjects);
        self.persist(Collection::Events);
        self.persist(Collection::FocusSessions);
    }

    // ------------------------------------------------------------------
    // Subjects
    // ------------------------------------------------------------------

    pub fn toggle_subject_expanded(&mut self, subject_id: u64) -> Result<(), StoreError> {
        let subject = self
            .data
            .find_subject_mut(subject_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Subject, subject_id))?;
        subject.expanded = !subject.expanded;
        log::debug!("subject {} expanded={}", subject_id, subject.expanded);
        self.persist(Collection::Subjects);
        Ok(())
    }

    /// Append a subject with no tasks and return its id
    pub fn add_subject(&mut self, draft: SubjectDraft) -> Result<u64, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Blank { field: "name" });
        }
        let id = match draft.id {
            Some(id) if self.data.contains_subject_id(id) => {
                return Err(StoreError::DuplicateSubjectId(id));
            }
            Some(id) => id,
            None => self.fresh_id(|data, id| data.contains_subject_id(id)),
        };
        self.data.subjects.push(Subject {
            id,
            name: draft.name,
            color: draft.color,
            expanded: draft.expanded,
            tasks: Vec::new(),
        });
        log::debug!("added subject {}", id);
        self.persist(Collection::Subjects);
        Ok(id)
    }

    pub fn update_subject(
        &mut self,
        subject_id: u64,
        patch: SubjectPatch,
    ) -> Result<(), StoreError> {
        patch.validate()?;
        let subject = self
            .data
            .find_subject_mut(subject_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Subject, subject_id))?;
        patch.apply(subject);
        log::debug!("updated subject {}", subject_id);
        self.persist(Collection::Subjects);
        Ok(())
    }

    /// Remove a subject and every task it owns
    pub fn delete_subject(&mut self, subject_id: u64) -> Result<Subject, StoreError> {
        let removed = self
            .data
            .remove_subject(subject_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Subject, subject_id))?;
        log::debug!(
            "deleted subject {} with {} task(s)",
            subject_id,
            removed.tasks.len()
        );
        self.persist(Collection::Subjects);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    fn task_mut(&mut self, subject_id: u64, task_id: u64) -> Result<&mut Task, StoreError> {
        if !self.data.contains_subject_id(subject_id) {
            return Err(StoreError::not_found(EntityKind::Subject, subject_id));
        }
        self.data
            .find_task_mut(subject_id, task_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Task, task_id))
    }

    pub fn toggle_task_completed(&mut self, subject_id: u64, task_id: u64) -> Result<(), StoreError> {
        let task = self.task_mut(subject_id, task_id)?;
        task.completed = !task.completed;
        log::debug!("task {} completed={}", task_id, task.completed);
        self.persist(Collection::Subjects);
        Ok(())
    }

    pub fn toggle_task_pinned(&mut self, subject_id: u64, task_id: u64) -> Result<(), StoreError> {
        let task = self.task_mut(subject_id, task_id)?;
        task.pinned = !task.pinned;
        log::debug!("task {} pinned={}", task_id, task.pinned);
        self.persist(Collection::Subjects);
        Ok(())
    }

    /// Append a task to a subject and return its id
    ///
    /// `due_date` defaults to today, `priority` to medium. The title is kept
    /// as given but must contain something other than whitespace.
    pub fn add_task(
        &mut self,
        subject_id: u64,
        title: &str,
        due_date: Option<NaiveDate>,
        priority: Option<Priority>,
    ) -> Result<u64, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::Blank { field: "title" });
        }
        if !self.data.contains_subject_id(subject_id) {
            return Err(StoreError::not_found(EntityKind::Subject, subject_id));
        }

        let id = self.fresh_id(|data, id| data.contains_task_id(id));
        let task = Task {
            id,
            title: title.to_string(),
            due_date: due_date.unwrap_or_else(|| self.clock.today()),
            completed: false,
            priority: priority.unwrap_or_default(),
            pinned: false,
        };
        if let Some(subject) = self.data.find_subject_mut(subject_id) {
            subject.tasks.push(task);
        }
        log::debug!("added task {} to subject {}", id, subject_id);
        self.persist(Collection::Subjects);
        Ok(id)
    }

    pub fn update_task(
        &mut self,
        subject_id: u64,
        task_id: u64,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        patch.validate()?;
        let task = self.task_mut(subject_id, task_id)?;
        patch.apply(task);
        log::debug!("updated task {}", task_id);
        self.persist(Collection::Subjects);
        Ok(())
    }

    pub fn delete_task(&mut self, subject_id: u64, task_id: u64) -> Result<Task, StoreError> {
        self.task_mut(subject_id, task_id)?;
        let removed = self
            .data
            .remove_task(subject_id, task_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Task, task_id))?;
        log::debug!("deleted task {} from subject {}", task_id, subject_id);
        self.persist(Collection::Subjects);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event(&mut self, draft: EventDraft) -> Result<u64, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Blank { field: "title" });
        }
        let id = self.fresh_id(|data, id| data.contains_event_id(id));
        let mut extra = draft.extra;
        // id, title and date are owned by the event itself
        for key in ["id", "title", "date"] {
            extra.remove(key);
        }
        self.data.events.push(Event {
            id,
            title: draft.title,
            date: draft.date,
            extra,
        });
        log::debug!("added event {}", id);
        self.persist(Collection::Events);
        Ok(id)
    }

    pub fn delete_event(&mut self, event_id: u64) -> Result<Event, StoreError> {
        let removed = self
            .data
            .remove_event(event_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Event, event_id))?;
        log::debug!("deleted event {}", event_id);
        self.persist(Collection::Events);
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Focus sessions
    // ------------------------------------------------------------------

    /// Record a session dated today and return its timestamp
    ///
    /// The timestamp is forced past every existing one, so it is unique
    /// within the collection even if the clock repeats an instant. Fails
    /// when a loaded session already sits at `i64::MAX`.
    pub fn add_focus_session(&mut self, duration: u32) -> Result<i64, StoreError> {
        let now = self.clock.now();
        let timestamp = match self.data.latest_session_timestamp() {
            Some(latest) if latest >= now => latest
                .checked_add(1)
                .ok_or(StoreError::TimestampExhausted)?,
            _ => now,
        };
        self.data.focus_sessions.push(FocusSession {
            date: self.clock.today(),
            duration,
            timestamp,
        });
        log::debug!("added focus session {} ({})", timestamp, duration);
        self.persist(Collection::FocusSessions);
        Ok(timestamp)
    }

    /// Remove the session recorded at `timestamp`
    ///
    /// Should a loaded snapshot contain duplicate timestamps, only the first
    /// matching session is removed.
    pub fn delete_focus_session(&mut self, timestamp: i64) -> Result<FocusSession, StoreError> {
        let removed = self
            .data
            .remove_focus_session(timestamp)
            .ok_or_else(|| StoreError::not_found(EntityKind::FocusSession, timestamp))?;
        log::debug!("deleted focus session {}", timestamp);
        self.persist(Collection::FocusSessions);
        Ok(removed)
    }

    /// Draw ids from the clock until one is free in the target collection
    fn fresh_id(&self, taken: impl Fn(&PlannerData, u64) -> bool) -> u64 {
        loop {
            let id = self.clock.new_id();
            if !taken(&self.data, id) {
                return id;
            }
        }
    }

    // ------------------------------------------------------------------
    // Views bound to the clock's "today"
    // ------------------------------------------------------------------

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn all_tasks(&self) -> Vec<FlatTask> {
        views::flatten_tasks(self.subjects())
    }

    pub fn sorted_tasks(&self, sort_by: SortBy) -> Vec<FlatTask> {
        views::sort_tasks(&self.all_tasks(), sort_by)
    }

    pub fn stats(&self) -> TaskStats {
        views::stats(self.subjects())
    }

    pub fn overdue_tasks(&self) -> Vec<FlatTask> {
        views::overdue_tasks(self.subjects(), self.clock.today())
    }

    pub fn due_today_tasks(&self) -> Vec<FlatTask> {
        views::due_today_tasks(self.subjects(), self.clock.today())
    }

    pub fn focus_summary(&self) -> FocusSummary {
        views::focus_summary(self.focus_sessions(), self.clock.today())
    }
}
