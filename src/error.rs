//! Typed failures raised by the core. None of these are fatal: the repository
//! logs persistence errors and carries on, and the UI turns playback errors
//! into a status line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {key}: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("key-value store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("sound file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("this button has no sound yet")]
    Unplayable,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open sound: {0}")]
    Open(#[source] io::Error),
}
