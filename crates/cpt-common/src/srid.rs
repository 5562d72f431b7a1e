//! Spatial reference system codes.
//!
//! GEF files carry their own code list for coordinate systems. `31000` is
//! the Dutch national grid (RD New), known to EPSG as 28992.

/// GEF code for RD New (Amersfoort / RD New) coordinates.
pub const GEF_RD_NEW: i64 = 31000;

/// EPSG code for Amersfoort / RD New.
pub const EPSG_RD_NEW: u32 = 28992;

/// EPSG code for WGS 84 geographic coordinates.
pub const EPSG_WGS84: u32 = 4326;
