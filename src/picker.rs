//! Modal sound picker. The browser walks the filesystem showing directories
//! and audio files only; activating a file resolves the pick, and leaving the
//! modal resolves to [`PickOutcome::Cancelled`].

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::has_extension;
use crate::models::{SoundLocator, SoundSlot};

/// How a picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(SoundLocator),
    Cancelled,
}

impl From<PickOutcome> for SoundSlot {
    /// A cancelled pick is the same as never having picked.
    fn from(outcome: PickOutcome) -> Self {
        match outcome {
            PickOutcome::Picked(locator) => SoundSlot::Set(locator),
            PickOutcome::Cancelled => SoundSlot::Unset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEntry {
    Parent,
    Dir(PathBuf),
    File(PathBuf),
}

impl BrowserEntry {
    pub fn label(&self) -> String {
        match self {
            BrowserEntry::Parent => "../".to_string(),
            BrowserEntry::Dir(path) => format!("{}/", file_label(path)),
            BrowserEntry::File(path) => file_label(path),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct FileBrowser {
    dir: PathBuf,
    entries: Vec<BrowserEntry>,
    selected: usize,
    extensions: Vec<String>,
}

impl FileBrowser {
    /// Open the browser in `dir`, listing files matching `extensions`.
    pub fn open(dir: &Path, extensions: &[String]) -> Result<Self> {
        let mut browser = Self {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
            selected: 0,
            extensions: extensions.to_vec(),
        };
        browser.reload()?;
        Ok(browser)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current_entry(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    pub fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Act on the highlighted entry: directories are entered, files resolve
    /// the pick.
    pub fn activate(&mut self) -> Result<Option<PickOutcome>> {
        match self.current_entry().cloned() {
            Some(BrowserEntry::Parent) => {
                self.go_up()?;
                Ok(None)
            }
            Some(BrowserEntry::Dir(path)) => {
                self.change_dir(path)?;
                Ok(None)
            }
            Some(BrowserEntry::File(path)) => {
                Ok(Some(PickOutcome::Picked(SoundLocator::from_path(&path))))
            }
            None => Ok(None),
        }
    }

    pub fn go_up(&mut self) -> Result<()> {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.change_dir(parent)?;
        }
        Ok(())
    }

    fn change_dir(&mut self, dir: PathBuf) -> Result<()> {
        let previous = std::mem::replace(&mut self.dir, dir);
        if let Err(err) = self.reload() {
            self.dir = previous;
            return Err(err);
        }
        self.selected = 0;
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        let read = fs::read_dir(&self.dir)
            .with_context(|| format!("cannot open {}", self.dir.display()))?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read.flatten() {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden {
                continue;
            }
            if path.is_dir() {
                dirs.push(path);
            } else if has_extension(&path, &self.extensions) {
                files.push(path);
            }
        }
        dirs.sort_by(|a, b| compare_names(a, b));
        files.sort_by(|a, b| compare_names(a, b));

        let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
        if self.dir.parent().is_some() {
            entries.push(BrowserEntry::Parent);
        }
        entries.extend(dirs.into_iter().map(BrowserEntry::Dir));
        entries.extend(files.into_iter().map(BrowserEntry::File));

        self.entries = entries;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        Ok(())
    }
}

fn compare_names(a: &Path, b: &Path) -> Ordering {
    file_label(a)
        .to_lowercase()
        .cmp(&file_label(b).to_lowercase())
}
