//! Common types shared across the cpt-store crates.

pub mod error;
pub mod record;
pub mod srid;

pub use error::{RecordError, RecordResult};
pub use record::{format_scaled, MetadataRecord, StoredRecord, GEOGRAPHIC_SCALE, PLANE_SCALE};
pub use srid::{EPSG_RD_NEW, EPSG_WGS84, GEF_RD_NEW};
