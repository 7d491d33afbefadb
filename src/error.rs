//! Engine error types

use std::fmt;

use thiserror::Error;

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Profile,
    Lesson,
    Badge,
    Session,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Lesson => "lesson",
            Self::Badge => "badge",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the progression engine and its stores
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed input, e.g. an unknown hint index or a submission on a finished session
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A compare-and-swap lost the race more times than the retry budget allows
    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    /// Transient failure of the backing store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl EngineError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn profile_not_found(user_id: &str) -> Self {
        Self::not_found(EntityKind::Profile, user_id)
    }

    pub fn lesson_not_found(lesson_id: &str) -> Self {
        Self::not_found(EntityKind::Lesson, lesson_id)
    }

    /// Whether the caller may retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::StoreUnavailable(_))
    }

    /// Text safe to show to an end user. Store internals are never exposed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound { kind, .. } => format!("That {kind} does not exist."),
            Self::Conflict(_) | Self::StoreUnavailable(_) => {
                "Something went wrong, please try again.".to_string()
            }
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        tracing::debug!("store error: {err}");
        Self::StoreUnavailable(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
