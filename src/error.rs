use std::fmt;
use thiserror::Error;

/// The kind of entity a store operation referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Subject,
    Task,
    Event,
    FocusSession,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Subject => "subject",
            EntityKind::Task => "task",
            EntityKind::Event => "event",
            EntityKind::FocusSession => "focus session",
        };
        f.write_str(name)
    }
}

/// Errors returned by planning store operations
///
/// A failed operation leaves the store unchanged and writes no snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("subject id {0} already exists")]
    DuplicateSubjectId(u64),

    #[error("no focus session timestamp left after the latest one")]
    TimestampExhausted,
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
