//! GEF (Geotechnical Exchange Format) metadata extraction.
//!
//! A GEF CPT file starts with a header of `#KEYWORD= value, value, ...`
//! lines followed by the measurement block. Only four header keywords are
//! read here:
//!
//! - `#XYID= code, x, y[, dx, dy]` - plane position, reprojected to WGS 84
//! - `#ZID= code, z[, dz]` - surface elevation
//! - `#TESTID= name` - test identifier
//! - `#STARTDATE= yyyy, mm, dd` - start date of the test
//!
//! Everything else in the file is ignored.

pub mod error;
pub mod extractor;
pub mod tags;

use std::path::Path;

use cpt_common::MetadataRecord;
use projection::default_registry;

pub use error::{ParseError, ParseResult, TagError};
pub use extractor::MetadataExtractor;
pub use tags::GefTag;

/// Extract metadata from GEF content using the default transform registry.
///
/// `origin` names the content in error messages, usually the file path.
pub fn extract_metadata(content: &str, origin: &str) -> ParseResult<MetadataRecord> {
    MetadataExtractor::new(default_registry()).extract(content, origin)
}

/// Read a GEF file and extract its metadata using the default transform registry.
pub fn extract_metadata_file<P: AsRef<Path>>(path: P) -> ParseResult<MetadataRecord> {
    MetadataExtractor::new(default_registry()).extract_file(path)
}
