//! Subcommand implementations.
//!
//! JSON output goes to the writer passed in (stdout from the binary); logs go
//! through `tracing`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cpt_common::MetadataRecord;
use serde::Serialize;
use storage::{ConnectionParams, CptStore};
use tracing::{error, info};

/// Outcome of a command that processes several files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// One line of `inspect` output.
#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    file: String,
    #[serde(flatten)]
    metadata: &'a MetadataRecord,
}

/// Open a store session.
pub async fn connect(params: &ConnectionParams) -> Result<CptStore> {
    let mut store = CptStore::new();
    store
        .connect(params)
        .await
        .with_context(|| format!("connecting to {}:{}/{}", params.host, params.port, params.database))?;
    Ok(store)
}

/// Create the table if needed. Returns `true` when it was created.
pub async fn init(store: &CptStore) -> Result<bool> {
    let created = store.ensure_schema().await.context("creating CPT table")?;
    if created {
        info!("CPT table created");
    } else {
        info!("CPT table already exists");
    }
    Ok(created)
}

/// Extract each file and write its metadata as one JSON line.
///
/// Files that fail are logged and counted; the rest are still processed.
pub fn inspect<W: Write>(files: &[PathBuf], out: &mut W) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for file in files {
        match gef_parser::extract_metadata_file(file) {
            Ok(metadata) => {
                let line = FileMetadata {
                    file: file.display().to_string(),
                    metadata: &metadata,
                };
                serde_json::to_writer(&mut *out, &line)?;
                writeln!(out)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(file = %file.display(), error = %e, "Could not extract metadata");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Extract and store each file for `owner`.
///
/// Failures are per file: one bad file does not stop the batch.
pub async fn ingest(store: &CptStore, owner: &str, files: &[PathBuf]) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for file in files {
        match ingest_file(store, owner, file).await {
            Ok(id) => {
                info!(file = %file.display(), id, "Ingested");
                summary.succeeded += 1;
            }
            Err(e) => {
                error!(file = %file.display(), error = %format!("{e:#}"), "Ingest failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        owner = %owner,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Ingest finished"
    );
    Ok(summary)
}

async fn ingest_file(store: &CptStore, owner: &str, file: &Path) -> Result<i32> {
    let metadata = gef_parser::extract_metadata_file(file)?;
    let id = store.add_file(owner, &metadata, file).await?;
    Ok(id)
}

/// Write every record stored for `owner` as one JSON line. Returns the count.
pub async fn list<W: Write>(store: &CptStore, owner: &str, out: &mut W) -> Result<usize> {
    let records = store
        .query(owner)
        .await
        .with_context(|| format!("querying CPTs of '{}'", owner))?;

    for record in &records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }

    Ok(records.len())
}
