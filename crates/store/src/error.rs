use std::path::PathBuf;

use sketchform_core::error::CoreError;

/// Failures of the underlying blob storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RecordStoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The in-memory change was applied but could not be written.
    #[error("Change applied but not saved: {0}")]
    Persist(#[source] StoreError),
}
