//! Song entity model.
//!
//! The request DTOs ([`NewSong`], [`SongPatch`]) live in `songbook_core::song`
//! because they are parsed and validated before any database work happens.

use std::fmt;

use serde::Serialize;
use sqlx::FromRow;
use songbook_core::types::{Date, DbId};

pub use songbook_core::song::{NewSong, SongPatch};

/// A row from the `songs` table.
///
/// Serializes to exactly the wire shape: every column, `null` for absent
/// optional values.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Song {
    pub id: DbId,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_date: Option<Date>,
    pub genre: Option<String>,
    pub likes: Option<i32>,
    /// Duration in seconds.
    pub running_time: Option<i32>,
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_none<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map_or_else(|| "None".to_string(), ToString::to_string)
        }

        write!(
            f,
            "{} {} {} {} {}",
            self.title,
            or_none(&self.artist),
            or_none(&self.album),
            or_none(&self.release_date),
            or_none(&self.genre),
        )
    }
}
