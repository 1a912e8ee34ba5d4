//! Handlers for the `/songs` resource.
//!
//! Bodies arrive as raw bytes and go through `songbook_core::song` parsing so
//! malformed input is reported per field instead of as an extractor rejection.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use songbook_core::song::{
    parse_like_request, parse_new_song, parse_song_patch, total_running_minutes,
};
use songbook_core::types::DbId;
use songbook_db::models::song::Song;
use songbook_db::repositories::SongRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for the collection listing.
#[derive(Debug, Serialize)]
pub struct SongList {
    pub songs: Vec<Song>,
    /// Sum of every song's running time, in minutes.
    pub total_running_time: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/songs
pub async fn list(State(state): State<AppState>) -> AppResult<Json<SongList>> {
    let songs = SongRepo::list(&state.pool).await?;
    let total_running_time = total_running_minutes(songs.iter().map(|s| s.running_time));
    Ok(Json(SongList {
        songs,
        total_running_time,
    }))
}

/// POST /api/songs
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Song>)> {
    let input = parse_new_song(&body)?;
    let song = SongRepo::create(&state.pool, &input).await?;
    tracing::info!(song_id = song.id, song = %song, "Song created");
    Ok((StatusCode::CREATED, Json(song)))
}

/// GET /api/songs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Song>> {
    let song = SongRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::song_not_found(id))?;
    Ok(Json(song))
}

/// PUT /api/songs/{id}
///
/// Only the fields present in the body are changed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<Song>> {
    let patch = parse_song_patch(&body)?;
    let song = SongRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::song_not_found(id))?;
    tracing::info!(song_id = id, "Song updated");
    Ok(Json(song))
}

/// DELETE /api/songs/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if SongRepo::delete(&state.pool, id).await? {
        tracing::info!(song_id = id, "Song deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::song_not_found(id))
    }
}

/// PUT /api/songs/{id}/like
///
/// Increments the like count when the body carries a `likes` key, whatever
/// its value. Without the key the song is returned unchanged.
pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<Song>> {
    let request = parse_like_request(&body)?;
    if !request.has_likes_key {
        return get_by_id(State(state), Path(id)).await;
    }
    let song = SongRepo::like(&state.pool, id)
        .await?
        .ok_or(AppError::song_not_found(id))?;
    tracing::info!(song_id = id, likes = ?song.likes, "Song liked");
    Ok(Json(song))
}
