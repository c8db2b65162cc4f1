//! Note repository
//!
//! - create: INSERT inside a transaction
//! - list: newest first, empty Vec when there are no rows
//! - get: by primary key, NotFound when absent

use async_trait::async_trait;
use uuid::Uuid;

use super::{Database, DbError};
use crate::models::Note;

/// Storage operations the HTTP layer needs for notes.
#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    async fn create(&self, note: &Note) -> Result<(), DbError>;

    async fn list(&self) -> Result<Vec<Note>, DbError>;

    async fn get(&self, id: Uuid) -> Result<Note, DbError>;
}

/// PostgreSQL-backed note repository
#[derive(Debug, Clone)]
pub struct NoteRepo {
    db: Database,
}

impl NoteRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteStore for NoteRepo {
    async fn create(&self, note: &Note) -> Result<(), DbError> {
        let note = note.clone();
        self.db
            .with_transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(
                        r#"
                        INSERT INTO notes (id, title, created_at, updated_at)
                        VALUES ($1, $2, $3, $4)
                        "#,
                    )
                    .bind(note.id)
                    .bind(&note.title)
                    .bind(note.created_at)
                    .bind(note.updated_at)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| DbError::query("create note", e))?;
                    Ok(())
                })
            })
            .await
    }

    async fn list(&self) -> Result<Vec<Note>, DbError> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, created_at, updated_at
            FROM notes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| DbError::query("get notes", e))
    }

    async fn get(&self, id: Uuid) -> Result<Note, DbError> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(|e| DbError::query("get note by ID", e))?
        .ok_or_else(|| DbError::NotFound {
            resource: "note",
            id: id.to_string(),
        })
    }
}
