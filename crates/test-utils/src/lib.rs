//! Shared test utilities for the cpt-store workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional test data and databases
//! - A GEF header builder
//! - Common GEF fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_database, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Environment variable that enables database tests.
pub const TEST_DB_HOST_VAR: &str = "CPT_TEST_DB_HOST";

/// Prefix of the connection variables used by database tests.
pub const TEST_DB_PREFIX: &str = "CPT_TEST_DB";

/// Macro to skip a test if the required file is not found.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_sample_parsing() {
///     let path = require_test_file!("sample.gef");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro to skip a test when no test database is configured.
///
/// Database tests connect with the `CPT_TEST_DB_*` variables; they only
/// run when `CPT_TEST_DB_HOST` is set.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_database;
///
/// #[tokio::test]
/// async fn test_roundtrip() {
///     require_database!();
///     // connect with ConnectionParams::from_env_prefix(test_utils::TEST_DB_PREFIX)
/// }
/// ```
#[macro_export]
macro_rules! require_database {
    () => {{
        if std::env::var($crate::TEST_DB_HOST_VAR).is_err() {
            eprintln!(
                "SKIPPED: {} not set, no test database available.",
                $crate::TEST_DB_HOST_VAR
            );
            return;
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// A unique owner name, so tests sharing one database do not see each other's rows.
pub fn unique_owner(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
