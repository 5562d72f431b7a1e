//! Sounding metadata and stored record types.
//!
//! `MetadataRecord` is what the extractor derives from a GEF file and what
//! queries hand back. `StoredRecord` is the owned, persisted entity: the
//! metadata plus the owner and the verbatim file content. The two are kept
//! apart so storage identity never leaks into parsing code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};

/// Fractional digits persisted for x, y and z.
pub const PLANE_SCALE: usize = 2;

/// Fractional digits persisted for lat and lon.
pub const GEOGRAPHIC_SCALE: usize = 10;

/// Metadata extracted from a single CPT file.
///
/// All fields default to zero / empty when the corresponding tag is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Test identifier (`#TESTID`)
    pub name: String,
    /// Easting in the source reference system
    pub x: f64,
    /// Northing in the source reference system
    pub y: f64,
    /// Surface elevation reference (`#ZID`)
    pub z: f64,
    /// WGS 84 latitude derived from (x, y)
    pub lat: f64,
    /// WGS 84 longitude derived from (x, y)
    pub lon: f64,
    /// Start date as `YYYYMMDD`, or empty
    pub date: String,
}

impl MetadataRecord {
    /// Interpret `date` as a calendar date.
    ///
    /// Returns `None` for an empty date or one that is not a real day.
    pub fn start_date(&self) -> Option<NaiveDate> {
        if self.date.len() != 8 {
            return None;
        }
        NaiveDate::parse_from_str(&self.date, "%Y%m%d").ok()
    }

    /// Check that the record has the shape the store persists.
    pub fn validate(&self) -> RecordResult<()> {
        let is_date = self.date.is_empty()
            || (self.date.len() == 8 && self.date.bytes().all(|b| b.is_ascii_digit()));
        if !is_date {
            return Err(RecordError::InvalidDate(self.date.clone()));
        }

        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("z", self.z),
            ("lat", self.lat),
            ("lon", self.lon),
        ] {
            if !value.is_finite() {
                return Err(RecordError::NonFinite { field, value });
            }
        }

        Ok(())
    }

    /// Round the numeric fields to the precision they are stored with.
    ///
    /// Equals what a store round trip returns, since the store persists the
    /// same `format_scaled` text.
    pub fn quantized(&self) -> Self {
        Self {
            name: self.name.clone(),
            x: round_to_scale(self.x, PLANE_SCALE),
            y: round_to_scale(self.y, PLANE_SCALE),
            z: round_to_scale(self.z, PLANE_SCALE),
            lat: round_to_scale(self.lat, GEOGRAPHIC_SCALE),
            lon: round_to_scale(self.lon, GEOGRAPHIC_SCALE),
            date: self.date.clone(),
        }
    }
}

/// A persisted CPT: metadata plus owner and raw file content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Primary key, `None` until the store assigns one
    pub id: Option<i32>,
    pub owner: String,
    pub metadata: MetadataRecord,
    /// Original file content, verbatim
    pub raw: String,
}

impl StoredRecord {
    /// Build an unsaved record from its three inputs.
    pub fn new(owner: impl Into<String>, metadata: &MetadataRecord, raw: impl Into<String>) -> Self {
        Self {
            id: None,
            owner: owner.into(),
            metadata: metadata.clone(),
            raw: raw.into(),
        }
    }

    /// Strip storage identity and owner.
    pub fn into_metadata(self) -> MetadataRecord {
        self.metadata
    }
}

/// Decimal text of `value` with exactly `scale` fractional digits.
///
/// Rounds the exact binary value once, so the text is what a fixed-scale
/// decimal column holds for it.
pub fn format_scaled(value: f64, scale: usize) -> String {
    format!("{:.*}", scale, value)
}

fn round_to_scale(value: f64, scale: usize) -> f64 {
    format_scaled(value, scale).parse().unwrap_or(value)
}
