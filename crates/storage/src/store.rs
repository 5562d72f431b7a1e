//! CPT store on PostgreSQL.

use std::path::Path;

use cpt_common::{format_scaled, MetadataRecord, RecordError, StoredRecord, GEOGRAPHIC_SCALE, PLANE_SCALE};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgConnection, Row};
use tracing::{debug, info, warn};

use crate::config::ConnectionParams;
use crate::error::{ConversionWarning, PersistenceCause, StoreError, StoreResult};

/// Session-backed store for CPT metadata and raw files.
///
/// Holds a single database connection between `connect` and `disconnect`.
/// Operations are not meant to be issued concurrently on one instance.
#[derive(Debug, Default)]
pub struct CptStore {
    pool: Option<PgPool>,
}

impl CptStore {
    /// Create a disconnected store.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Open the database session.
    ///
    /// On failure the store is left disconnected.
    pub async fn connect(&mut self, params: &ConnectionParams) -> StoreResult<()> {
        if let Some(previous) = self.pool.take() {
            previous.close().await;
        }

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(params.connect_timeout())
            .connect_with(params.connect_options())
            .await
            .map_err(StoreError::Connection)?;

        info!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            "Connected to CPT database"
        );
        self.pool = Some(pool);
        Ok(())
    }

    /// Close the session. Safe to call when not connected.
    pub async fn disconnect(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            debug!("Disconnected from CPT database");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.as_ref().is_some_and(|pool| !pool.is_closed())
    }

    fn pool(&self) -> StoreResult<&PgPool> {
        match &self.pool {
            Some(pool) if !pool.is_closed() => Ok(pool),
            _ => Err(StoreError::NotConnected),
        }
    }

    /// Create the records table if it does not exist yet.
    ///
    /// Returns `true` when the table was created. An existing table is never
    /// altered.
    pub async fn ensure_schema(&self) -> StoreResult<bool> {
        let pool = self.pool()?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = 'cpts')",
        )
        .fetch_one(pool)
        .await
        .map_err(StoreError::Schema)?;

        if exists {
            debug!("Table cpts already present");
            return Ok(false);
        }

        // Split SQL statements and execute them individually
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(pool)
                    .await
                    .map_err(StoreError::Schema)?;
            }
        }

        info!("Created table cpts");
        Ok(true)
    }

    /// Store metadata and raw content for `owner` in one transaction.
    ///
    /// Returns the id of the new record. On failure the transaction is
    /// rolled back and nothing is persisted.
    pub async fn add(&self, owner: &str, metadata: &MetadataRecord, raw: &str) -> StoreResult<i32> {
        let pool = self.pool()?;
        let record = StoredRecord::new(owner, metadata, raw);
        let fail = |e: sqlx::Error| StoreError::Persistence {
            owner: owner.to_string(),
            cause: PersistenceCause::Database(e),
        };

        let mut tx = pool.begin().await.map_err(fail)?;

        match insert_record(&mut tx, &record).await {
            Ok(id) => {
                tx.commit().await.map_err(fail)?;
                info!(id, owner = %owner, name = %metadata.name, "Stored CPT");
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(owner = %owner, error = %rollback_err, "Rollback failed");
                }
                warn!(owner = %owner, name = %metadata.name, error = %e, "Error adding CPT");
                Err(fail(e))
            }
        }
    }

    /// Read the raw file at `path` and store it with `metadata`.
    pub async fn add_file<P: AsRef<Path>>(
        &self,
        owner: &str,
        metadata: &MetadataRecord,
        path: P,
    ) -> StoreResult<i32> {
        // Checked first so a disconnected store reports that, not a file error
        self.pool()?;

        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Persistence {
                owner: owner.to_string(),
                cause: PersistenceCause::RawFile {
                    path: path.display().to_string(),
                    source,
                },
            })?;

        self.add(owner, metadata, &raw).await
    }

    /// All metadata stored for `owner`, in no particular order.
    ///
    /// Rows that cannot be turned back into valid metadata are logged and
    /// skipped.
    pub async fn query(&self, owner: &str) -> StoreResult<Vec<MetadataRecord>> {
        let pool = self.pool()?;

        let rows = sqlx::query(
            "SELECT id, name, \
             x::FLOAT8 AS x, y::FLOAT8 AS y, z::FLOAT8 AS z, \
             lat::FLOAT8 AS lat, lon::FLOAT8 AS lon, date \
             FROM cpts WHERE owner = $1",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(StoreError::Query)?;

        let mut result = Vec::with_capacity(rows.len());
        for row in &rows {
            match metadata_from_row(row) {
                Ok(metadata) => result.push(metadata),
                Err(warning) => {
                    let id: Option<i32> = row.try_get("id").ok();
                    warn!(id = ?id, owner = %owner, error = %warning, "Skipping stored CPT");
                }
            }
        }

        Ok(result)
    }

    /// The verbatim file content stored under `id`.
    pub async fn fetch_raw(&self, id: i32) -> StoreResult<Option<String>> {
        let pool = self.pool()?;

        sqlx::query_scalar::<_, String>("SELECT raw FROM cpts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(StoreError::Query)
    }

    /// Number of records stored for `owner`, including unconvertible ones.
    pub async fn count(&self, owner: &str) -> StoreResult<i64> {
        let pool = self.pool()?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cpts WHERE owner = $1")
            .bind(owner)
            .fetch_one(pool)
            .await
            .map_err(StoreError::Query)
    }
}

/// Numbers are bound as decimal text at column scale, so the stored value is
/// exactly `MetadataRecord::quantized` of the input.
async fn insert_record(conn: &mut PgConnection, record: &StoredRecord) -> Result<i32, sqlx::Error> {
    let m = &record.metadata;

    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO cpts (
            owner, name,
            x, y, z,
            lat, lon,
            date, raw
        ) VALUES (
            $1, $2,
            $3::NUMERIC, $4::NUMERIC, $5::NUMERIC,
            $6::NUMERIC, $7::NUMERIC,
            $8, $9
        )
        RETURNING id
        "#,
    )
    .bind(&record.owner)
    .bind(&m.name)
    .bind(format_scaled(m.x, PLANE_SCALE))
    .bind(format_scaled(m.y, PLANE_SCALE))
    .bind(format_scaled(m.z, PLANE_SCALE))
    .bind(format_scaled(m.lat, GEOGRAPHIC_SCALE))
    .bind(format_scaled(m.lon, GEOGRAPHIC_SCALE))
    .bind(&m.date)
    .bind(&record.raw)
    .fetch_one(conn)
    .await
}

fn metadata_from_row(row: &PgRow) -> Result<MetadataRecord, ConversionWarning> {
    let row = MetadataRow::from_row(row)?;
    Ok(MetadataRecord::try_from(row)?)
}

/// Internal row type for metadata queries.
#[derive(FromRow)]
struct MetadataRow {
    name: String,
    x: f64,
    y: f64,
    z: f64,
    lat: f64,
    lon: f64,
    date: String,
}

impl TryFrom<MetadataRow> for MetadataRecord {
    type Error = RecordError;

    fn try_from(row: MetadataRow) -> Result<Self, Self::Error> {
        let metadata = MetadataRecord {
            name: row.name,
            x: row.x,
            y: row.y,
            z: row.z,
            lat: row.lat,
            lon: row.lon,
            date: row.date,
        };
        metadata.validate()?;
        Ok(metadata)
    }
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS cpts (
    id SERIAL PRIMARY KEY,
    owner VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    x NUMERIC(8, 2) NOT NULL,
    y NUMERIC(8, 2) NOT NULL,
    z NUMERIC(8, 2) NOT NULL,
    lat NUMERIC(12, 10) NOT NULL,
    lon NUMERIC(12, 10) NOT NULL,
    date VARCHAR NOT NULL CHECK (char_length(date) IN (0, 8)),
    raw TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cpts_owner ON cpts(owner);
"#;
