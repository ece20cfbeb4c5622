use soundboard_manager::{
    open_database, BoardRepository, ButtonColor, KeyValueStore, SoundLocator, SoundSlot,
    SqliteStore,
};

fn open_repo(dir: &std::path::Path) -> BoardRepository<SqliteStore> {
    let conn = open_database(dir).unwrap();
    BoardRepository::load(SqliteStore::new(conn))
}

#[test]
fn state_survives_reopening_the_database() {
    let temp = tempfile::tempdir().unwrap();

    let saved = {
        let mut repo = open_repo(temp.path());
        repo.add_board("Music");
        repo.add_board("Effects");
        repo.add_button_to_board(0, "Intro", SoundSlot::Set(SoundLocator::new("/s/intro.mp3")));
        repo.add_colored_button(1, "", SoundSlot::Unset, ButtonColor::Red);
        repo.set_selected_board_index(1);
        repo.current_state().clone()
    };

    let reopened = open_repo(temp.path());
    assert_eq!(reopened.current_state(), &saved);
    assert_eq!(reopened.current_state().boards[1].buttons[0].title, "Untitled Sound");
}

#[test]
fn deletions_are_persisted() {
    let temp = tempfile::tempdir().unwrap();

    {
        let mut repo = open_repo(temp.path());
        repo.add_board("A");
        repo.add_board("B");
        repo.add_button_to_board(0, "Horn", SoundSlot::Set(SoundLocator::new("/s/horn.wav")));
        let id = repo.current_state().boards[0].buttons[0].id;
        repo.delete_button(0, id);
        repo.set_selected_board_index(1);
        repo.delete_board(1);
    }

    let reopened = open_repo(temp.path());
    let state = reopened.current_state();
    assert_eq!(state.boards.len(), 1);
    assert_eq!(state.boards[0].name, "A");
    assert!(state.boards[0].buttons.is_empty());
    assert_eq!(state.selected_board_index, 0);
    assert_eq!(reopened.store().get_int("selectedBoardIndex").unwrap(), Some(0));
}

#[test]
fn stored_json_uses_nullable_sound_locator() {
    let temp = tempfile::tempdir().unwrap();
    let mut repo = open_repo(temp.path());
    repo.add_board("A");
    repo.add_button_to_board(0, "Silent", SoundSlot::Unset);

    let raw = repo.store().get("soundBoards").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let button = &value[0]["buttons"][0];
    assert!(button["soundLocator"].is_null());
    assert_eq!(button["title"], "Silent");
}
