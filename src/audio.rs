//! Playback seam. The core only ever asks for "play this locator" or "stop";
//! progress and completion are not its business.

use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::PlayerCommand;
use crate::error::PlaybackError;
use crate::models::SoundLocator;

pub trait AudioPlayer {
    /// Start playing `locator`, replacing whatever was playing before.
    fn play(&mut self, locator: &SoundLocator) -> Result<(), PlaybackError>;

    /// Stop playback. Calling this with nothing playing does nothing.
    fn stop(&mut self);

    fn is_playing(&mut self) -> bool;
}

/// Plays sounds by spawning an external command-line player (`afplay`,
/// `paplay`, `ffplay -nodisp -autoexit`, ...) with the file path appended to
/// its arguments. Stopping kills the child.
pub struct CommandPlayer {
    command: PlayerCommand,
    child: Option<Child>,
}

impl CommandPlayer {
    pub fn new(command: PlayerCommand) -> Self {
        Self {
            command,
            child: None,
        }
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&mut self, locator: &SoundLocator) -> Result<(), PlaybackError> {
        // A failed play must not leave the previous sound running.
        self.stop();

        let path = locator.as_path();
        if !path.exists() {
            return Err(PlaybackError::NotFound(path.to_path_buf()));
        }

        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        info!(pid = child.id(), sound = %locator, "started playback");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(Some(_)) = child.try_wait() {
            debug!("player already exited");
            return;
        }

        // Reap only after a successful kill.
        match child.kill() {
            Ok(()) => {
                if let Err(err) = child.wait() {
                    warn!(error = %err, "failed to reap player process");
                }
                debug!("stopped playback");
            }
            Err(err) => warn!(pid = child.id(), error = %err, "failed to kill player process"),
        }
    }

    fn is_playing(&mut self) -> bool {
        let finished = match self.child.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => return false,
        };
        if finished {
            self.child = None;
        }
        !finished
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Hands the file to whatever application the desktop associates with it.
/// Fire-and-forget: once launched, the sound is out of our hands, so `stop`
/// has nothing to do.
#[derive(Default)]
pub struct SystemPlayer;

impl AudioPlayer for SystemPlayer {
    fn play(&mut self, locator: &SoundLocator) -> Result<(), PlaybackError> {
        let path = locator.as_path();
        if !path.exists() {
            return Err(PlaybackError::NotFound(path.to_path_buf()));
        }
        open::that_detached(path).map_err(PlaybackError::Open)?;
        info!(sound = %locator, "handed sound to system player");
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_playing(&mut self) -> bool {
        false
    }
}

/// Pick the player the configuration asks for.
pub fn player_from_config(command: Option<&PlayerCommand>) -> Box<dyn AudioPlayer> {
    match command {
        Some(command) => Box::new(CommandPlayer::new(command.clone())),
        None => Box::new(SystemPlayer),
    }
}
