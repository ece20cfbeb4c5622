//! Domain models that get serialized into the key-value store and passed
//! throughout the TUI. These types stay light-weight data holders so the
//! repository can focus on mutation rules and the UI on presentation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a button when the caller submits an empty one.
pub const PLACEHOLDER_TITLE: &str = "Untitled Sound";

/// Opaque reference to an audio resource chosen through the picker. On the
/// terminal this is a filesystem path, but nothing outside the audio layer
/// should rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundLocator(String);

impl SoundLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Last path component, used for compact display in forms and cards.
    pub fn file_name(&self) -> String {
        self.as_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl fmt::Display for SoundLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a button has a sound attached yet. Persisted as a nullable
/// `soundLocator` field, but everything in-process works with the explicit
/// variants so "not playable" is never a hidden null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<SoundLocator>", into = "Option<SoundLocator>")]
pub enum SoundSlot {
    #[default]
    Unset,
    Set(SoundLocator),
}

impl SoundSlot {
    pub fn locator(&self) -> Option<&SoundLocator> {
        match self {
            SoundSlot::Unset => None,
            SoundSlot::Set(locator) => Some(locator),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, SoundSlot::Set(_))
    }
}

impl From<Option<SoundLocator>> for SoundSlot {
    fn from(value: Option<SoundLocator>) -> Self {
        match value {
            Some(locator) => SoundSlot::Set(locator),
            None => SoundSlot::Unset,
        }
    }
}

impl From<SoundSlot> for Option<SoundLocator> {
    fn from(value: SoundSlot) -> Self {
        match value {
            SoundSlot::Set(locator) => Some(locator),
            SoundSlot::Unset => None,
        }
    }
}

/// Cosmetic tint of a button card. Stored alongside the button so the grid
/// looks the same after a restart; older data without the field falls back to
/// the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Purple,
    Gray,
}

impl ButtonColor {
    pub const ALL: [ButtonColor; 7] = [
        ButtonColor::Red,
        ButtonColor::Orange,
        ButtonColor::Yellow,
        ButtonColor::Green,
        ButtonColor::Blue,
        ButtonColor::Purple,
        ButtonColor::Gray,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ButtonColor::Red => "Red",
            ButtonColor::Orange => "Orange",
            ButtonColor::Yellow => "Yellow",
            ButtonColor::Green => "Green",
            ButtonColor::Blue => "Blue",
            ButtonColor::Purple => "Purple",
            ButtonColor::Gray => "Gray",
        }
    }

    /// Step through the palette, wrapping at either end.
    pub fn cycle(self, offset: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let current = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as isize;
        Self::ALL[(current + offset).rem_euclid(len) as usize]
    }
}

/// A single playable tile on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundButton {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "soundLocator", default)]
    pub sound: SoundSlot,
    #[serde(default)]
    pub color: ButtonColor,
}

impl SoundButton {
    /// Build a button with a fresh id. Blank titles are replaced with
    /// [`PLACEHOLDER_TITLE`]; anything else is kept as given.
    pub fn new(title: &str, sound: SoundSlot, color: ButtonColor) -> Self {
        let title = if title.trim().is_empty() {
            PLACEHOLDER_TITLE.to_string()
        } else {
            title.to_string()
        };
        Self {
            id: Uuid::new_v4(),
            title,
            sound,
            color,
        }
    }
}

/// Named collection of buttons. Button order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundBoard {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub buttons: Vec<SoundButton>,
}

impl SoundBoard {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            buttons: Vec::new(),
        }
    }
}

/// Everything the UI needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub boards: Vec<SoundBoard>,
    pub selected_board_index: usize,
}

impl AppState {
    /// The board the selection points at, or `None` when there are no boards.
    pub fn selected_board(&self) -> Option<&SoundBoard> {
        self.boards.get(self.selected_board_index)
    }
}
