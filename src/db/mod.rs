//! Persistence module split across logical submodules.

mod connection;
mod kv;
mod memory;

pub use connection::{data_dir, ensure_schema, open_database};
pub use kv::{KeyValueStore, SqliteStore};
pub use memory::MemoryStore;
