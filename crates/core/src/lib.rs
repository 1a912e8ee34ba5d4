//! Songbook domain layer.
//!
//! Pure types and logic shared by the persistence and HTTP crates: the id
//! type, the error taxonomy, and parsing/validation of song request bodies.
//! Nothing in here touches the database.

pub mod error;
pub mod song;
pub mod types;
