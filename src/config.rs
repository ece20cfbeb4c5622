use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "config.json";

/// External program used to play sounds. The file path is appended after
/// `args`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// User configuration, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Player to spawn for each sound. Without one, sounds are handed to the
    /// system default application and cannot be stopped from here.
    #[serde(default)]
    pub player: Option<PlayerCommand>,

    /// Directory the sound picker opens in.
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,

    /// File extensions the picker offers (without the dot).
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,

    /// Default tracing level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_audio_extensions() -> Vec<String> {
    ["wav", "mp3", "m4a", "aac", "ogg", "flac", "aiff", "caf"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: None,
            sounds_dir: None,
            audio_extensions: default_audio_extensions(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config in {}", config_path.display()))?;
        Ok(config)
    }
}

/// Case-insensitive extension check; entries may be written with or without
/// the leading dot.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
