use std::path::PathBuf;

use rusqlite;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access database '{}': {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("limits table has {columns} columns, expected at least {expected}")]
    MalformedLimits { columns: usize, expected: usize },
}
