use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StanzaError {
    #[error("Fatal error: User '{0}' is not in the database.")]
    UnknownUser(String),
    #[error(transparent)]
    StorageError(#[from] StorageError),
    #[error("unable to write stanza file {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StanzaError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StanzaError::UnknownUser(_) => 4,
            StanzaError::StorageError(StorageError::Unavailable { .. }) => 3,
            StanzaError::StorageError(_) | StanzaError::WriteFailed { .. } => 1,
        }
    }
}
