//! Application state shared across handlers

use std::sync::Arc;

use crate::db::{Database, HealthProbe, NoteRepo, NoteStore};

/// Shared application state
///
/// Both handles point at the same pool in production; they are separate so
/// tests can swap either one.
#[derive(Clone)]
pub struct AppState {
    notes: Arc<dyn NoteStore>,
    probe: Arc<dyn HealthProbe>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteStore>, probe: Arc<dyn HealthProbe>) -> Self {
        Self { notes, probe }
    }

    pub fn from_database(db: Database) -> Self {
        Self::new(Arc::new(NoteRepo::new(db.clone())), Arc::new(db))
    }

    pub fn notes(&self) -> &dyn NoteStore {
        self.notes.as_ref()
    }

    pub fn probe(&self) -> &dyn HealthProbe {
        self.probe.as_ref()
    }
}
