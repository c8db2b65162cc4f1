//! Note entity and title validation

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

/// Validated note title.
///
/// The only rule is non-emptiness; whitespace is kept as given and there is
/// no length cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTitle(String);

impl NoteTitle {
    /// Create a new note title.
    ///
    /// # Example
    /// ```
    /// use noter_server::models::NoteTitle;
    ///
    /// assert!(NoteTitle::new("Groceries").is_ok());
    /// assert!(NoteTitle::new("").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NoteTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persisted note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with a fresh id and both timestamps set to now.
    ///
    /// Timestamps are truncated to microseconds, the precision of
    /// `TIMESTAMPTZ`, so the note returned from create equals the one read back.
    pub fn new(title: NoteTitle) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            title: title.into_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
