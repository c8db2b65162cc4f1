//! Domain models with validation at construction
//!
//! User input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod note;
pub mod validation;

pub use note::{Note, NoteTitle};
pub use validation::ValidationError;
