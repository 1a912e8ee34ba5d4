//! Repository structs, one per table.

pub mod song_repo;

pub use song_repo::SongRepo;
