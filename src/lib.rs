//! Core library for the sound board terminal app.
//!
//! Boards and their buttons live in a [`BoardRepository`], which persists the
//! whole collection plus the selected board index to a [`KeyValueStore`] after
//! every change. Playback and sound picking sit behind their own modules so the
//! `bin` target only wires them together.
pub mod audio;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod picker;
pub mod repository;
pub mod ui;

pub use audio::{player_from_config, AudioPlayer, CommandPlayer, SystemPlayer};
pub use config::{AppConfig, PlayerCommand};
pub use db::{data_dir, open_database, KeyValueStore, MemoryStore, SqliteStore};
pub use error::{PersistenceError, PlaybackError};
pub use logging::init_logging;
pub use models::{AppState, ButtonColor, SoundBoard, SoundButton, SoundLocator, SoundSlot};
pub use picker::{FileBrowser, PickOutcome};
pub use repository::BoardRepository;
pub use ui::{run_app, App};
