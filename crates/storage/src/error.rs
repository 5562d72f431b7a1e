//! Error types for the CPT store.

use cpt_common::RecordError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by `CptStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid connection configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not login to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Not connected to database")]
    NotConnected,

    #[error("Schema check failed: {0}")]
    Schema(#[source] sqlx::Error),

    /// The add was rolled back; nothing was persisted.
    #[error("Error adding CPT for owner '{owner}': {cause}")]
    Persistence {
        owner: String,
        #[source]
        cause: PersistenceCause,
    },

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl StoreError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence { .. })
    }
}

/// Underlying failure of an add.
#[derive(Debug, Error)]
pub enum PersistenceCause {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("cannot read raw file '{path}': {source}")]
    RawFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a stored row was left out of a query result.
#[derive(Debug, Error)]
pub enum ConversionWarning {
    #[error("cannot decode row: {0}")]
    Decode(#[from] sqlx::Error),

    #[error("invalid metadata: {0}")]
    Invalid(#[from] RecordError),
}
