//! Repository for the `songs` table.

use sqlx::PgPool;
use songbook_core::song::next_like_count;
use songbook_core::types::DbId;

use crate::models::song::{NewSong, Song, SongPatch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, artist, album, release_date, genre, likes, running_time";

/// Provides CRUD and like operations for songs.
pub struct SongRepo;

impl SongRepo {
    /// Insert a new song, returning the created row with its assigned id.
    pub async fn create(pool: &PgPool, input: &NewSong) -> Result<Song, sqlx::Error> {
        let query = format!(
            "INSERT INTO songs \
                (title, artist, album, release_date, genre, likes, running_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Song>(&query)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.album)
            .bind(input.release_date)
            .bind(&input.genre)
            .bind(input.likes)
            .bind(input.running_time)
            .fetch_one(pool)
            .await
    }

    /// Find a song by its id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM songs WHERE id = $1");
        sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every song in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Song>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM songs ORDER BY id");
        sqlx::query_as::<_, Song>(&query).fetch_all(pool).await
    }

    /// Apply a partial update in a single statement.
    ///
    /// `title` uses `COALESCE` since it can never be cleared. Nullable columns
    /// take a presence flag so an explicit `null` clears the value while an
    /// absent field keeps it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SongPatch,
    ) -> Result<Option<Song>, sqlx::Error> {
        let query = format!(
            "UPDATE songs SET \
                title        = COALESCE($2, title), \
                artist       = CASE WHEN $3  THEN $4  ELSE artist END, \
                album        = CASE WHEN $5  THEN $6  ELSE album END, \
                release_date = CASE WHEN $7  THEN $8  ELSE release_date END, \
                genre        = CASE WHEN $9  THEN $10 ELSE genre END, \
                likes        = CASE WHEN $11 THEN $12 ELSE likes END, \
                running_time = CASE WHEN $13 THEN $14 ELSE running_time END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let (artist_set, artist) = presence(&input.artist);
        let (album_set, album) = presence(&input.album);
        let (release_date_set, release_date) = presence(&input.release_date);
        let (genre_set, genre) = presence(&input.genre);
        let (likes_set, likes) = presence(&input.likes);
        let (running_time_set, running_time) = presence(&input.running_time);

        sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(artist_set)
            .bind(artist)
            .bind(album_set)
            .bind(album)
            .bind(release_date_set)
            .bind(release_date.copied())
            .bind(genre_set)
            .bind(genre)
            .bind(likes_set)
            .bind(likes.copied())
            .bind(running_time_set)
            .bind(running_time.copied())
            .fetch_optional(pool)
            .await
    }

    /// Delete a song by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record one like.
    ///
    /// The row is locked with `SELECT ... FOR UPDATE` for the duration of the
    /// transaction so concurrent likes on the same song are serialized.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn like(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(Option<i32>,)> =
            sqlx::query_as("SELECT likes FROM songs WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((likes,)) = current else {
            return Ok(None);
        };

        let query = format!("UPDATE songs SET likes = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let song = sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .bind(next_like_count(likes))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(song_id = id, likes = ?song.likes, "Like recorded");
        Ok(Some(song))
    }
}

/// Split a patch field into the presence flag and the value to write.
fn presence<T>(field: &Option<Option<T>>) -> (bool, Option<&T>) {
    match field {
        Some(value) => (true, value.as_ref()),
        None => (false, None),
    }
}
