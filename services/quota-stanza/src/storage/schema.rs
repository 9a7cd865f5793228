use rusqlite::Connection;

use super::error::StorageError;

pub const USERS_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    uname TEXT NOT NULL UNIQUE
);
"#;

pub const LIMITS_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS limits (
    device TEXT NOT NULL,
    usr_id INTEGER NOT NULL REFERENCES users(id),
    block_soft INTEGER,
    block_hard INTEGER,
    block_unit TEXT,
    block_grace INTEGER,
    block_grace_unit TEXT,
    files_soft INTEGER,
    files_hard INTEGER,
    files_unit TEXT,
    files_grace INTEGER,
    files_grace_unit TEXT
);
"#;

pub const LIMITS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_limits_usr_id ON limits(usr_id);
"#;

/// Creates the tables the stanza builder reads from. Only fixtures call this;
/// the production store is provisioned by the quota administration tooling.
pub fn init_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(USERS_TABLE_SCHEMA)?;
    conn.execute_batch(LIMITS_TABLE_SCHEMA)?;
    conn.execute_batch(LIMITS_INDEXES)?;
    Ok(())
}
