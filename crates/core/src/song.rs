//! Wire parsing and validation for song request bodies.
//!
//! Bodies are read field by field from a JSON object so every problem is
//! reported against the field that caused it, then length rules are checked
//! with `validator`. The resulting [`FieldErrors`] map is what clients see
//! in a 400 response.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::types::Date;

const MISSING: &str = "Missing data for required field.";
const NULL_NOT_ALLOWED: &str = "Field may not be null.";
const INVALID_INPUT: &str = "Invalid input type.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_AN_INTEGER: &str = "Not a valid integer.";
const NOT_A_DATE: &str = "Not a valid date.";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A validated song ready to insert. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewSong {
    #[validate(length(min = 1, max = 255, message = "Length must be between 1 and 255."))]
    pub title: String,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub artist: Option<String>,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub album: Option<String>,
    pub release_date: Option<Date>,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub genre: Option<String>,
    pub likes: Option<i32>,
    /// Duration in seconds.
    pub running_time: Option<i32>,
}

impl NewSong {
    /// A song with only a title; every optional field is absent.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
            release_date: None,
            genre: None,
            likes: None,
            running_time: None,
        }
    }
}

/// A partial update. `None` means the field was absent from the body and
/// must be left untouched. For nullable columns, `Some(None)` means the body
/// carried an explicit `null` and the column is cleared.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SongPatch {
    #[validate(length(min = 1, max = 255, message = "Length must be between 1 and 255."))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub artist: Option<Option<String>>,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub album: Option<Option<String>>,
    pub release_date: Option<Option<Date>>,
    #[validate(length(max = 255, message = "Longer than maximum length 255."))]
    pub genre: Option<Option<String>>,
    pub likes: Option<Option<i32>>,
    pub running_time: Option<Option<i32>>,
}

impl SongPatch {
    /// True when the body named none of the song fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of a like request.
///
/// Only the presence of a `likes` key matters; its value is never read, so
/// `{"likes": false}` still counts as a like.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeRequest {
    pub has_likes_key: bool,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse and validate the body of a create request.
pub fn parse_new_song(body: &[u8]) -> Result<NewSong, CoreError> {
    let object = parse_object(body)?;
    let mut reader = FieldReader::new(&object);

    let title = match reader.read::<String>("title", NOT_A_STRING) {
        Some(Some(title)) => Some(title),
        Some(None) => {
            reader.errors.add("title", NULL_NOT_ALLOWED);
            None
        }
        None if !object.contains_key("title") => {
            reader.errors.add("title", MISSING);
            None
        }
        None => None,
    };
    let artist = reader.read("artist", NOT_A_STRING).flatten();
    let album = reader.read("album", NOT_A_STRING).flatten();
    let release_date = reader.read("release_date", NOT_A_DATE).flatten();
    let genre = reader.read("genre", NOT_A_STRING).flatten();
    let likes = reader.read("likes", NOT_AN_INTEGER).flatten();
    let running_time = reader.read("running_time", NOT_AN_INTEGER).flatten();

    let mut errors = reader.errors;
    let Some(title) = title else {
        return Err(CoreError::InvalidFields(errors));
    };

    let song = NewSong {
        title,
        artist,
        album,
        release_date,
        genre,
        likes,
        running_time,
    };
    if let Err(rule_errors) = song.validate() {
        merge(&mut errors, rule_errors.into());
    }
    errors.into_result()?;
    Ok(song)
}

/// Parse and validate the body of a partial update.
///
/// An empty body is an empty patch.
pub fn parse_song_patch(body: &[u8]) -> Result<SongPatch, CoreError> {
    if is_blank(body) {
        return Ok(SongPatch::default());
    }
    let object = parse_object(body)?;
    let mut reader = FieldReader::new(&object);

    let title = match reader.read::<String>("title", NOT_A_STRING) {
        Some(None) => {
            reader.errors.add("title", NULL_NOT_ALLOWED);
            None
        }
        other => other.flatten(),
    };
    let patch = SongPatch {
        title,
        artist: reader.read("artist", NOT_A_STRING),
        album: reader.read("album", NOT_A_STRING),
        release_date: reader.read("release_date", NOT_A_DATE),
        genre: reader.read("genre", NOT_A_STRING),
        likes: reader.read("likes", NOT_AN_INTEGER),
        running_time: reader.read("running_time", NOT_AN_INTEGER),
    };

    let mut errors = reader.errors;
    if let Err(rule_errors) = patch.validate() {
        merge(&mut errors, rule_errors.into());
    }
    errors.into_result()?;
    Ok(patch)
}

/// Parse the body of a like request. An empty body carries no `likes` key.
pub fn parse_like_request(body: &[u8]) -> Result<LikeRequest, CoreError> {
    if is_blank(body) {
        return Ok(LikeRequest::default());
    }
    let object = parse_object(body)?;
    Ok(LikeRequest {
        has_likes_key: object.contains_key("likes"),
    })
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, CoreError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => {
            let mut errors = FieldErrors::new();
            errors.add(FieldErrors::SCHEMA, INVALID_INPUT);
            Err(CoreError::InvalidFields(errors))
        }
    }
}

fn merge(into: &mut FieldErrors, from: FieldErrors) {
    for field in from.fields() {
        for message in from.get(field) {
            into.add(field, message.clone());
        }
    }
}

/// Typed, presence-aware access to the fields of a JSON object.
struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: FieldErrors::new(),
        }
    }

    /// `None` if the key is absent or its value has the wrong type (the
    /// latter is recorded), `Some(None)` for an explicit `null`.
    ///
    /// Strings holding a NUL character are rejected here; PostgreSQL text
    /// columns cannot store them.
    fn read<T: DeserializeOwned>(
        &mut self,
        field: &'static str,
        invalid: &'static str,
    ) -> Option<Option<T>> {
        let value = self.object.get(field)?;
        if value.is_null() {
            return Some(None);
        }
        if value.as_str().is_some_and(|s| s.contains('\0')) {
            self.errors.add(field, invalid);
            return None;
        }
        match T::deserialize(value) {
            Ok(parsed) => Some(Some(parsed)),
            Err(_) => {
                self.errors.add(field, invalid);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Like count after one like: a song that was never liked goes to 1.
pub fn next_like_count(current: Option<i32>) -> i32 {
    current.map_or(1, |likes| likes.saturating_add(1))
}

/// Sum of running times in minutes. Songs without a running time add 0.
pub fn total_running_minutes<I>(running_times: I) -> f64
where
    I: IntoIterator<Item = Option<i32>>,
{
    let seconds: i64 = running_times
        .into_iter()
        .map(|secs| i64::from(secs.unwrap_or(0)))
        .sum();
    seconds as f64 / 60.0
}
