//! Binary entry point: bring up config, logging and the SQLite store, hydrate
//! the repository, and drive the Ratatui event loop until the user exits.
use soundboard_manager::{
    data_dir, init_logging, open_database, player_from_config, run_app, App, AppConfig,
    BoardRepository, SqliteStore,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let data_dir = data_dir()?;
    let config = AppConfig::load(&data_dir)?;
    init_logging(&data_dir, &config.log_level)?;

    let conn = open_database(&data_dir)?;
    let repo = BoardRepository::load(SqliteStore::new(conn));
    info!(
        boards = repo.current_state().boards.len(),
        "sound board started"
    );

    let player = player_from_config(config.player.as_ref());
    let mut app = App::new(repo, player, config);
    run_app(&mut app)
}
