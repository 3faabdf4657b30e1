//! SQLite persistence: the key/value table, the store contract and its blobs.
mod kv;
mod migrations;
mod store;

use anyhow::Result;
use rusqlite::Connection;

pub use kv::{delete_value, query_value, upsert_value};
pub use store::{
    BACKUP_KEY, Collection, LAST_BACKUP_KEY, PartialCollections, SETTINGS_KEY, SqliteStore, Store,
    load_all, load_json, save_json,
};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Opens a throwaway in-memory database with the schema in place.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./fleetlog.db` when no data dir is found.
pub fn default_db_path() -> String {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join("fleetlog");
        std::fs::create_dir_all(&app_dir).ok();
        app_dir.join("fleetlog.db").to_string_lossy().into_owned()
    } else {
        "fleetlog.db".to_string()
    }
}
