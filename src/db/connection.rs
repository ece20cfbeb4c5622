use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".soundboard";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "soundboard.sqlite";

/// Resolve the absolute path to the application data directory inside the
/// user's home. The database, config file and log all live there.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Open (creating if needed) the database inside `data_dir` and make sure the
/// key-value table exists.
pub fn open_database(data_dir: &Path) -> Result<Connection> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;

    let conn = Connection::open(data_dir.join(DB_FILE_NAME))
        .context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Run the lazy migration. The store is a single flat table, so this is the
/// whole schema.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_store table")?;

    Ok(())
}
