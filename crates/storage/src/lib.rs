//! Storage for CPT records.
//!
//! One PostgreSQL table holds the extracted metadata next to the verbatim
//! file content, keyed by the owning party.

pub mod config;
pub mod error;
pub mod store;

pub use config::ConnectionParams;
pub use error::{ConversionWarning, PersistenceCause, StoreError, StoreResult};
pub use store::CptStore;
