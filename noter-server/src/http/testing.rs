//! In-memory doubles and request helpers for router tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use tower::ServiceExt;
use uuid::Uuid;

use super::state::AppState;
use crate::db::{DbError, HealthProbe, NoteStore};
use crate::models::Note;

/// Note store backed by a Vec, optionally failing every call.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
    fail: bool,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryNoteStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn insert_at(&self, title: &str, at: DateTime<Utc>) {
        self.notes.lock().unwrap().push(Note {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            created_at: at,
            updated_at: at,
        });
    }

    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(&self, op: &'static str) -> Result<(), DbError> {
        if self.fail {
            return Err(DbError::query(op, sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn create(&self, note: &Note) -> Result<(), DbError> {
        self.check("create note")?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.notes.lock().unwrap().push(note.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Note>, DbError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check("get notes")?;
        let mut notes = self.snapshot();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn get(&self, id: Uuid) -> Result<Note, DbError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check("get note by ID")?;
        self.snapshot()
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| DbError::NotFound {
                resource: "note",
                id: id.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FakeProbe {
    Healthy,
    Failing,
    /// Never answers within any reasonable deadline
    Hanging,
}

#[async_trait]
impl HealthProbe for FakeProbe {
    async fn ping(&self) -> Result<(), DbError> {
        match self {
            Self::Healthy => Ok(()),
            Self::Failing => Err(DbError::Ping(sqlx::Error::PoolClosed)),
            Self::Hanging => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }
    }
}

pub fn test_state(probe: FakeProbe) -> AppState {
    test_state_with(Arc::new(MemoryNoteStore::default()), probe)
}

pub fn test_state_with(store: Arc<MemoryNoteStore>, probe: FakeProbe) -> AppState {
    AppState::new(store, Arc::new(probe))
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
