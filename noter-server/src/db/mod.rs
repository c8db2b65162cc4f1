//! Database layer - connection pool, migrations and the note repository
//!
//! - One `PgPool` per process, cloned into whatever needs it
//! - Migrations are embedded and applied at startup
//! - Multi-statement writes go through `Database::with_transaction`

pub mod error;
pub mod migrations;
pub mod notes;
pub mod pool;

pub use error::{DbError, DbErrorKind};
pub use migrations::run_migrations;
pub use notes::{NoteRepo, NoteStore};
pub use pool::{Database, HealthProbe};
