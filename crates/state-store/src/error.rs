use thiserror::Error;

/// Errors that can occur when interacting with the state store.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// A serialization/deserialization error occurred.
    ///
    /// Records are written from typed documents, so a record that fails to
    /// deserialize indicates a corrupted store or a programming error, not a
    /// caller mistake.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred while writing or reading a snapshot file.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for state store operations.
pub type Result<T> = std::result::Result<T, StateStoreError>;
