//! Raw key/value queries against the `kv_store` table.
use chrono::Local;
use rusqlite::{Connection, OptionalExtension};

pub fn query_value(key: &str, conn: &Connection) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
}

/// Writes the whole value for `key`, replacing whatever was there.
pub fn upsert_value(key: &str, value: &str, conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value, Local::now().to_rfc3339()),
    )?;
    Ok(())
}

pub fn delete_value(key: &str, conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
    Ok(())
}
