//! The board/button state container. One instance is built at startup from
//! whatever the store holds and handed to the UI; every mutation goes through
//! here and is written back to the store before the method returns.
//!
//! Out-of-range indexes are absorbed as no-ops. They only come from the UI
//! acting on a snapshot that a previous mutation just invalidated, so there
//! is nothing useful to report.

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::db::KeyValueStore;
use crate::error::PersistenceError;
use crate::models::{AppState, ButtonColor, SoundBoard, SoundButton, SoundSlot};

/// Store key holding the JSON-encoded board list.
pub const BOARDS_KEY: &str = "soundBoards";
/// Store key holding the selected board index.
pub const SELECTED_INDEX_KEY: &str = "selectedBoardIndex";

pub struct BoardRepository<S: KeyValueStore> {
    store: S,
    state: AppState,
}

impl<S: KeyValueStore> BoardRepository<S> {
    /// Hydrate the repository from `store`. Unreadable board data leaves the
    /// list empty rather than half-populated; a stale selection is clamped.
    pub fn load(store: S) -> Self {
        let boards = match decode_boards(&store) {
            Ok(boards) => boards,
            Err(err) => {
                warn!(error = %err, "discarding unreadable board data");
                Vec::new()
            }
        };

        let stored_index = match store.get_int(SELECTED_INDEX_KEY) {
            Ok(value) => value.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "failed to read selected board index");
                0
            }
        };

        let mut state = AppState {
            boards,
            selected_board_index: 0,
        };
        state.selected_board_index = clamp_index(stored_index, state.boards.len());

        info!(
            boards = state.boards.len(),
            selected = state.selected_board_index,
            "loaded board state"
        );
        Self { store, state }
    }

    pub fn current_state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append an empty board. Name validation is the caller's job.
    pub fn add_board(&mut self, name: &str) -> &AppState {
        let board = SoundBoard::new(name);
        info!(board = %board.id, name, "adding board");
        self.state.boards.push(board);
        self.persist_boards();
        &self.state
    }

    pub fn delete_board(&mut self, index: usize) -> &AppState {
        if index >= self.state.boards.len() {
            debug!(index, len = self.state.boards.len(), "delete_board out of range");
            return &self.state;
        }

        let removed = self.state.boards.remove(index);
        info!(board = %removed.id, name = %removed.name, "deleted board");

        let previous = self.state.selected_board_index;
        if previous >= self.state.boards.len() {
            self.state.selected_board_index = self.state.boards.len().saturating_sub(1);
        }

        self.persist_boards();
        if self.state.selected_board_index != previous {
            self.persist_selection();
        }
        &self.state
    }

    /// Append a button to the board at `board_index`. An empty title becomes
    /// the placeholder.
    pub fn add_button_to_board(
        &mut self,
        board_index: usize,
        title: &str,
        sound: SoundSlot,
    ) -> &AppState {
        self.add_colored_button(board_index, title, sound, ButtonColor::default())
    }

    pub fn add_colored_button(
        &mut self,
        board_index: usize,
        title: &str,
        sound: SoundSlot,
        color: ButtonColor,
    ) -> &AppState {
        let Some(board) = self.state.boards.get_mut(board_index) else {
            debug!(board_index, "add_button_to_board out of range");
            return &self.state;
        };

        let button = SoundButton::new(title, sound, color);
        info!(board = %board.id, button = %button.id, title = %button.title, "adding button");
        board.buttons.push(button);
        self.persist_boards();
        &self.state
    }

    pub fn delete_button(&mut self, board_index: usize, button_id: Uuid) -> &AppState {
        let Some(board) = self.state.boards.get_mut(board_index) else {
            debug!(board_index, "delete_button out of range");
            return &self.state;
        };

        let before = board.buttons.len();
        board.buttons.retain(|button| button.id != button_id);
        if board.buttons.len() == before {
            debug!(board_index, button = %button_id, "delete_button found nothing");
        } else {
            info!(board = %board.id, button = %button_id, "deleted button");
        }

        self.persist_boards();
        &self.state
    }

    /// Move the selection. Only the scalar is written back.
    pub fn set_selected_board_index(&mut self, index: usize) -> &AppState {
        if index >= self.state.boards.len() {
            debug!(index, len = self.state.boards.len(), "selection out of range");
            return &self.state;
        }

        self.state.selected_board_index = index;
        self.persist_selection();
        &self.state
    }

    fn persist_boards(&mut self) {
        if let Err(err) = encode_boards(&mut self.store, &self.state.boards) {
            error!(error = %err, "failed to persist boards");
        }
    }

    fn persist_selection(&mut self) {
        let index = self.state.selected_board_index as i64;
        if let Err(err) = self.store.set_int(SELECTED_INDEX_KEY, index) {
            error!(error = %err, "failed to persist selected board index");
        }
    }
}

fn decode_boards<S: KeyValueStore>(store: &S) -> Result<Vec<SoundBoard>, PersistenceError> {
    match store.get(BOARDS_KEY)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
            key: BOARDS_KEY,
            source,
        }),
        None => Ok(Vec::new()),
    }
}

fn encode_boards<S: KeyValueStore>(
    store: &mut S,
    boards: &[SoundBoard],
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(boards).map_err(|source| PersistenceError::Encode {
        key: BOARDS_KEY,
        source,
    })?;
    store.set(BOARDS_KEY, &raw)
}

fn clamp_index(stored: i64, len: usize) -> usize {
    if len == 0 || stored < 0 {
        return 0;
    }
    (stored as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{SoundLocator, PLACEHOLDER_TITLE};

    fn empty() -> BoardRepository<MemoryStore> {
        BoardRepository::load(MemoryStore::new())
    }

    fn with_boards(names: &[&str]) -> BoardRepository<MemoryStore> {
        let mut repo = empty();
        for name in names {
            repo.add_board(name);
        }
        repo
    }

    fn locator(path: &str) -> SoundSlot {
        SoundSlot::Set(SoundLocator::new(path))
    }

    #[test]
    fn add_board_to_empty_state() {
        let mut repo = empty();
        let state = repo.add_board("Music");
        assert_eq!(state.boards.len(), 1);
        assert_eq!(state.boards[0].name, "Music");
        assert!(state.boards[0].buttons.is_empty());
        assert_eq!(state.selected_board_index, 0);
    }

    #[test]
    fn add_board_persists_list() {
        let mut repo = empty();
        repo.add_board("Music");
        let raw = repo.store().raw(BOARDS_KEY).unwrap();
        let boards: Vec<SoundBoard> = serde_json::from_str(raw).unwrap();
        assert_eq!(boards[0].name, "Music");
    }

    #[test]
    fn delete_button_by_id() {
        let mut repo = with_boards(&["Music"]);
        repo.add_button_to_board(0, "Air Horn", locator("/s/horn.mp3"));
        let id = repo.current_state().boards[0].buttons[0].id;

        let state = repo.delete_button(0, id);
        assert!(state.boards[0].buttons.is_empty());
    }

    #[test]
    fn delete_button_unknown_id_is_noop() {
        let mut repo = with_boards(&["Music"]);
        repo.add_button_to_board(0, "Air Horn", locator("/s/horn.mp3"));
        repo.delete_button(0, Uuid::new_v4());
        repo.delete_button(5, Uuid::new_v4());
        assert_eq!(repo.current_state().boards[0].buttons.len(), 1);
    }

    #[test]
    fn delete_selected_last_board_reclamps() {
        let mut repo = with_boards(&["A", "B", "C"]);
        repo.set_selected_board_index(2);

        let state = repo.delete_board(2);
        assert_eq!(state.boards.len(), 2);
        assert_eq!(state.selected_board_index, 1);
        assert_eq!(repo.store().raw(SELECTED_INDEX_KEY), Some("1"));
    }

    #[test]
    fn delete_board_out_of_range_is_noop() {
        let mut repo = with_boards(&["A"]);
        let before = repo.current_state().clone();
        repo.delete_board(1);
        assert_eq!(repo.current_state(), &before);
    }

    #[test]
    fn deleting_everything_resets_selection_to_zero() {
        let mut repo = with_boards(&["A", "B"]);
        repo.set_selected_board_index(1);
        repo.delete_board(1);
        repo.delete_board(0);
        assert!(repo.current_state().boards.is_empty());
        assert_eq!(repo.current_state().selected_board_index, 0);
        assert!(repo.current_state().selected_board().is_none());
    }

    #[test]
    fn empty_title_uses_placeholder() {
        let mut repo = with_boards(&["Music"]);
        let state = repo.add_button_to_board(0, "", locator("/s/clap.wav"));
        assert_eq!(state.boards[0].buttons[0].title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn add_button_out_of_range_leaves_store_untouched() {
        let mut repo = with_boards(&["Music"]);
        let before = repo.store().raw(BOARDS_KEY).unwrap().to_string();

        repo.add_button_to_board(3, "Ghost", locator("/s/ghost.wav"));

        assert_eq!(repo.store().raw(BOARDS_KEY).unwrap(), before);
        assert!(repo.current_state().boards[0].buttons.is_empty());
    }

    #[test]
    fn buttons_keep_insertion_order() {
        let mut repo = with_boards(&["Music"]);
        for title in ["one", "two", "three"] {
            repo.add_button_to_board(0, title, SoundSlot::Unset);
        }
        let titles: Vec<&str> = repo.current_state().boards[0]
            .buttons
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[test]
    fn set_selection_writes_only_scalar() {
        let mut repo = with_boards(&["A", "B"]);
        let boards_before = repo.store().raw(BOARDS_KEY).unwrap().to_string();

        repo.set_selected_board_index(1);

        assert_eq!(repo.store().raw(SELECTED_INDEX_KEY), Some("1"));
        assert_eq!(repo.store().raw(BOARDS_KEY).unwrap(), boards_before);
    }

    #[test]
    fn set_selection_out_of_range_is_ignored() {
        let mut repo = with_boards(&["A", "B"]);
        repo.set_selected_board_index(1);
        repo.set_selected_board_index(9);
        assert_eq!(repo.current_state().selected_board_index, 1);
    }

    #[test]
    fn reload_round_trips_state() {
        let mut repo = with_boards(&["Music", "Effects"]);
        repo.add_colored_button(0, "Air Horn", locator("/s/horn.mp3"), ButtonColor::Red);
        repo.add_button_to_board(1, "Pending", SoundSlot::Unset);
        repo.set_selected_board_index(1);
        let expected = repo.current_state().clone();

        let reloaded = BoardRepository::load(repo.store().clone());
        assert_eq!(reloaded.current_state(), &expected);
    }

    #[test]
    fn corrupt_boards_load_as_empty() {
        let store = MemoryStore::with_entries([
            (BOARDS_KEY, "[{\"id\": \"broken\""),
            (SELECTED_INDEX_KEY, "4"),
        ]);
        let repo = BoardRepository::load(store);
        assert!(repo.current_state().boards.is_empty());
        assert_eq!(repo.current_state().selected_board_index, 0);
    }

    #[test]
    fn stale_selection_is_clamped_on_load() {
        let mut repo = with_boards(&["A", "B"]);
        let mut store = repo.store().clone();
        store.set_int(SELECTED_INDEX_KEY, 12).unwrap();
        repo = BoardRepository::load(store);
        assert_eq!(repo.current_state().selected_board_index, 1);
    }

    #[test]
    fn failed_write_keeps_in_memory_mutation() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        let mut repo = BoardRepository::load(store);

        let state = repo.add_board("Music");
        assert_eq!(state.boards.len(), 1);
        assert_eq!(repo.store().raw(BOARDS_KEY), None);

        repo.add_button_to_board(0, "Still works", SoundSlot::Unset);
        assert_eq!(repo.current_state().boards[0].buttons.len(), 1);
    }
}
