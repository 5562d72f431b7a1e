//! Store tests.
//!
//! The connection tests run everywhere. Tests that need PostgreSQL are skipped
//! unless `CPT_TEST_DB_HOST` (and optionally the other `CPT_TEST_DB_*`
//! variables) point at a database the tests may create a table in.

use cpt_common::MetadataRecord;
use gef_parser::extract_metadata;
use sqlx::postgres::PgPoolOptions;
use storage::{ConnectionParams, CptStore, PersistenceCause, StoreError};
use test_utils::{
    require_database, unique_owner, write_temp_gef, GefBuilder, GEF_COMPLETE, GEF_DUPLICATE_TAGS,
    GEF_NO_TAGS, GEF_UNICODE, TEST_DB_PREFIX,
};

async fn connected_store() -> CptStore {
    let params = ConnectionParams::from_env_prefix(TEST_DB_PREFIX).unwrap();
    let mut store = CptStore::new();
    store.connect(&params).await.unwrap();
    store.ensure_schema().await.unwrap();
    store
}

fn sample_metadata() -> MetadataRecord {
    MetadataRecord {
        name: "CPT-01".to_string(),
        x: 123456.78,
        y: 654321.00,
        z: -1.25,
        lat: 53.8734259849,
        lon: 4.9077062490,
        date: "20210307".to_string(),
    }
}

// ============================================================================
// Connection lifecycle
// ============================================================================

#[tokio::test]
async fn test_connect_failure_leaves_store_disconnected() {
    let params = ConnectionParams {
        host: "127.0.0.1".to_string(),
        port: 1,
        connect_timeout_secs: 2,
        ..Default::default()
    };

    let mut store = CptStore::new();
    let err = store.connect(&params).await.unwrap_err();

    assert!(matches!(err, StoreError::Connection(_)));
    assert!(err.to_string().starts_with("Could not login to database"));
    assert!(!store.is_connected());
    assert!(matches!(store.query("anyone").await, Err(StoreError::NotConnected)));
}

#[tokio::test]
async fn test_disconnect_clears_state() {
    require_database!();
    let mut store = connected_store().await;
    assert!(store.is_connected());

    store.disconnect().await;
    assert!(!store.is_connected());
    assert!(matches!(store.count("anyone").await, Err(StoreError::NotConnected)));

    // Second disconnect is a no-op
    store.disconnect().await;
}

// ============================================================================
// Schema
// ============================================================================

#[tokio::test]
async fn test_ensure_schema_idempotent() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("schema");

    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();

    assert!(!store.ensure_schema().await.unwrap());
    assert!(!store.ensure_schema().await.unwrap());

    assert_eq!(store.count(&owner).await.unwrap(), 1);
    assert_eq!(store.query(&owner).await.unwrap(), vec![sample_metadata()]);
}

#[tokio::test]
async fn test_ensure_schema_creates_table_in_empty_schema() {
    require_database!();
    let base = ConnectionParams::from_env_prefix(TEST_DB_PREFIX).unwrap();
    let schema = unique_owner("cpt_schema").replace('-', "_");

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(base.connect_options())
        .await
        .unwrap();
    sqlx::query(&format!("CREATE SCHEMA \"{}\"", schema))
        .execute(&admin)
        .await
        .unwrap();

    let params = ConnectionParams {
        schema: Some(schema.clone()),
        ..base
    };
    let mut store = CptStore::new();
    store.connect(&params).await.unwrap();

    assert!(store.ensure_schema().await.unwrap());
    assert!(!store.ensure_schema().await.unwrap());

    let checks: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pg_constraint c \
         JOIN pg_class t ON c.conrelid = t.oid \
         JOIN pg_namespace n ON t.relnamespace = n.oid \
         WHERE n.nspname = $1 AND t.relname = 'cpts' AND c.contype = 'c'",
    )
    .bind(&schema)
    .fetch_one(&admin)
    .await
    .unwrap();
    assert_eq!(checks, 1);

    let indexes: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pg_indexes WHERE schemaname = $1 AND indexname = 'idx_cpts_owner'",
    )
    .bind(&schema)
    .fetch_one(&admin)
    .await
    .unwrap();
    assert_eq!(indexes, 1);

    // The new table is the one the session writes to
    let owner = unique_owner("fresh");
    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    let in_schema: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\".cpts", schema))
        .fetch_one(&admin)
        .await
        .unwrap();
    assert_eq!(in_schema, 1);

    store.disconnect().await;
    sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", schema))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;
}

// ============================================================================
// Round trips
// ============================================================================

#[tokio::test]
async fn test_metadata_roundtrip() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("roundtrip");

    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    let records = store.query(&owner).await.unwrap();

    assert_eq!(records, vec![sample_metadata()]);
}

#[tokio::test]
async fn test_extracted_metadata_roundtrip_at_stored_precision() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("extracted");

    let extracted = extract_metadata(GEF_COMPLETE, "complete.gef").unwrap();
    store.add(&owner, &extracted, GEF_COMPLETE).await.unwrap();
    let records = store.query(&owner).await.unwrap();

    assert_eq!(records, vec![extracted.quantized()]);
}

#[tokio::test]
async fn test_roundtrip_rounds_once_at_column_scale() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("scale");

    // Rounding through 15 significant digits first would store ...891
    let metadata = MetadataRecord {
        lat: 52.123456789049996,
        lon: 51.8645041989,
        x: 100.005,
        ..sample_metadata()
    };
    store.add(&owner, &metadata, GEF_COMPLETE).await.unwrap();

    let records = store.query(&owner).await.unwrap();
    assert_eq!(records, vec![metadata.quantized()]);
    assert_eq!(records[0].lat, 52.123456789);
}

#[tokio::test]
async fn test_extracted_positions_roundtrip_at_stored_precision() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("grid");

    let mut expected = Vec::new();
    for i in 0..40 {
        let x = 13_000.0 + 6_543.21 * i as f64;
        let y = 306_000.0 + 7_891.37 * i as f64;
        let content = GefBuilder::new()
            .test_id(&format!("P{:02}", i))
            .position(31000, x, y)
            .elevation(31000, -0.37 * i as f64)
            .data_rows(3)
            .build();
        let metadata = extract_metadata(&content, "grid.gef").unwrap();
        store.add(&owner, &metadata, &content).await.unwrap();
        expected.push(metadata.quantized());
    }

    let mut records = store.query(&owner).await.unwrap();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(records, expected);
}

#[tokio::test]
async fn test_default_metadata_roundtrip() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("defaults");

    let metadata = extract_metadata(GEF_NO_TAGS, "empty.gef").unwrap();
    store.add(&owner, &metadata, GEF_NO_TAGS).await.unwrap();

    assert_eq!(store.query(&owner).await.unwrap(), vec![MetadataRecord::default()]);
}

#[tokio::test]
async fn test_raw_roundtrip() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("raw");

    let metadata = extract_metadata(GEF_UNICODE, "unicode.gef").unwrap();
    let id = store.add(&owner, &metadata, GEF_UNICODE).await.unwrap();

    assert_eq!(store.fetch_raw(id).await.unwrap().as_deref(), Some(GEF_UNICODE));
    assert_eq!(store.fetch_raw(-1).await.unwrap(), None);
}

#[tokio::test]
async fn test_add_file() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("file");

    let file = write_temp_gef(GEF_DUPLICATE_TAGS);
    let metadata = gef_parser::extract_metadata_file(file.path()).unwrap();
    let id = store.add_file(&owner, &metadata, file.path()).await.unwrap();

    assert_eq!(store.fetch_raw(id).await.unwrap().as_deref(), Some(GEF_DUPLICATE_TAGS));
    assert_eq!(store.query(&owner).await.unwrap()[0].name, "SECOND");
}

#[tokio::test]
async fn test_add_file_missing() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("missing");

    let dir = std::env::temp_dir().join(unique_owner("cpt-store-test"));
    let err = store
        .add_file(&owner, &sample_metadata(), dir.join("missing.gef"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Persistence {
            cause: PersistenceCause::RawFile { .. },
            ..
        }
    ));
    assert_eq!(store.count(&owner).await.unwrap(), 0);
}

// ============================================================================
// Owner isolation
// ============================================================================

#[tokio::test]
async fn test_query_only_returns_owner_records() {
    require_database!();
    let store = connected_store().await;
    let alice = unique_owner("alice");
    let bob = unique_owner("bob");

    let first = MetadataRecord {
        name: "A-1".to_string(),
        ..sample_metadata()
    };
    let second = MetadataRecord {
        name: "A-2".to_string(),
        ..sample_metadata()
    };
    let other = MetadataRecord {
        name: "B-1".to_string(),
        ..sample_metadata()
    };

    store.add(&alice, &first, GEF_COMPLETE).await.unwrap();
    store.add(&bob, &other, GEF_COMPLETE).await.unwrap();
    store.add(&alice, &second, GEF_COMPLETE).await.unwrap();

    let mut names: Vec<String> = store
        .query(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["A-1", "A-2"]);

    let bob_records = store.query(&bob).await.unwrap();
    assert_eq!(bob_records, vec![other]);

    assert!(store.query(&unique_owner("nobody")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_name_and_owner_allowed() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("dup");

    let a = store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    let b = store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(store.query(&owner).await.unwrap().len(), 2);
}

// ============================================================================
// Failures and rollback
// ============================================================================

#[tokio::test]
async fn test_constraint_violation_rolls_back() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("rollback");

    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    let before = store.count(&owner).await.unwrap();

    let bad_date = MetadataRecord {
        date: "2021".to_string(),
        ..sample_metadata()
    };
    let err = store.add(&owner, &bad_date, GEF_COMPLETE).await.unwrap_err();
    assert!(err.is_persistence());

    assert_eq!(store.count(&owner).await.unwrap(), before);

    // The session is still usable afterwards
    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    assert_eq!(store.count(&owner).await.unwrap(), before + 1);
}

#[tokio::test]
async fn test_numeric_overflow_rolls_back() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("overflow");

    let too_far = MetadataRecord {
        x: 12_345_678.0,
        ..sample_metadata()
    };
    let err = store.add(&owner, &too_far, GEF_COMPLETE).await.unwrap_err();

    match err {
        StoreError::Persistence { owner: failed_owner, cause } => {
            assert_eq!(failed_owner, owner);
            assert!(matches!(cause, PersistenceCause::Database(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.count(&owner).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unconvertible_rows_are_skipped() {
    require_database!();
    let store = connected_store().await;
    let owner = unique_owner("skip");

    let nan = MetadataRecord {
        name: "NAN".to_string(),
        z: f64::NAN,
        ..sample_metadata()
    };
    let letters = MetadataRecord {
        name: "LETTERS".to_string(),
        date: "abcdefgh".to_string(),
        ..sample_metadata()
    };

    store.add(&owner, &sample_metadata(), GEF_COMPLETE).await.unwrap();
    store.add(&owner, &nan, GEF_COMPLETE).await.unwrap();
    store.add(&owner, &letters, GEF_COMPLETE).await.unwrap();

    assert_eq!(store.count(&owner).await.unwrap(), 3);
    assert_eq!(store.query(&owner).await.unwrap(), vec![sample_metadata()]);
}
