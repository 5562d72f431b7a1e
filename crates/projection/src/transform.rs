//! Plane-to-geographic transforms and the registry of supported source codes.
//!
//! A GEF file names its coordinate system with a numeric code. The registry
//! maps every code we can handle to a transform producing WGS 84
//! longitude/latitude. It is built once and only ever read afterwards, so a
//! single instance can be shared by any number of threads.

use std::collections::HashMap;
use std::fmt;

use cpt_common::{EPSG_RD_NEW, EPSG_WGS84, GEF_RD_NEW};
use once_cell::sync::Lazy;

use crate::ellipsoid::{BESSEL_1841, WGS84};
use crate::helmert::Helmert;
use crate::stereographic::ObliqueStereographic;

/// A transform from projected plane coordinates to geographic coordinates.
pub trait CoordinateTransform: Send + Sync {
    /// EPSG code of the projected source system.
    fn source_srid(&self) -> u32;

    /// EPSG code of the geographic target system.
    fn target_srid(&self) -> u32;

    /// Convert (x/easting, y/northing) in meters to (lon, lat) in degrees.
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64);
}

/// Amersfoort / RD New (EPSG:28992) to WGS 84 (EPSG:4326).
///
/// Inverse oblique stereographic onto the Bessel ellipsoid, then a Helmert
/// shift from the Amersfoort datum to WGS 84. Heights are taken as zero on
/// the Bessel ellipsoid; they do not feed back into the horizontal result
/// at a level that matters for 10-digit degrees.
#[derive(Debug, Clone)]
pub struct RdNewToWgs84 {
    projection: ObliqueStereographic,
    datum_shift: Helmert,
}

impl RdNewToWgs84 {
    pub fn new() -> Self {
        Self {
            projection: ObliqueStereographic::rd_new(),
            datum_shift: Helmert::amersfoort_to_wgs84(),
        }
    }

    /// Convert WGS 84 (lon, lat) in degrees back to RD (x, y) in meters.
    pub fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y, z) = WGS84.geodetic_to_ecef(lon.to_radians(), lat.to_radians(), 0.0);
        let (x, y, z) = self.datum_shift.inverse().apply(x, y, z);
        let (lon_b, lat_b, _) = BESSEL_1841.ecef_to_geodetic(x, y, z);
        self.projection.forward(lon_b, lat_b)
    }
}

impl Default for RdNewToWgs84 {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateTransform for RdNewToWgs84 {
    fn source_srid(&self) -> u32 {
        EPSG_RD_NEW
    }

    fn target_srid(&self) -> u32 {
        EPSG_WGS84
    }

    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let (lon_b, lat_b) = self.projection.inverse(x, y);
        let (ex, ey, ez) = BESSEL_1841.geodetic_to_ecef(lon_b, lat_b, 0.0);
        let (wx, wy, wz) = self.datum_shift.apply(ex, ey, ez);
        let (lon, lat, _) = WGS84.ecef_to_geodetic(wx, wy, wz);
        (lon.to_degrees(), lat.to_degrees())
    }
}

/// Supported file-level reference system codes and their transforms.
pub struct TransformRegistry {
    transforms: HashMap<i64, Box<dyn CoordinateTransform>>,
}

impl TransformRegistry {
    /// An empty registry; every code is unsupported.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register a transform for a file-level code, replacing any previous one.
    pub fn with_transform(mut self, code: i64, transform: impl CoordinateTransform + 'static) -> Self {
        self.transforms.insert(code, Box::new(transform));
        self
    }

    pub fn get(&self, code: i64) -> Option<&dyn CoordinateTransform> {
        self.transforms.get(&code).map(|t| t.as_ref())
    }

    pub fn is_supported(&self, code: i64) -> bool {
        self.transforms.contains_key(&code)
    }

    /// Supported codes in ascending order.
    pub fn codes(&self) -> Vec<i64> {
        let mut codes: Vec<i64> = self.transforms.keys().copied().collect();
        codes.sort_unstable();
        codes
    }
}

impl Default for TransformRegistry {
    /// One entry: GEF code 31000 (RD New) to WGS 84.
    fn default() -> Self {
        Self::empty().with_transform(GEF_RD_NEW, RdNewToWgs84::new())
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("codes", &self.codes())
            .finish()
    }
}

static DEFAULT_REGISTRY: Lazy<TransformRegistry> = Lazy::new(TransformRegistry::default);

/// The process-wide default registry, built on first use.
pub fn default_registry() -> &'static TransformRegistry {
    &DEFAULT_REGISTRY
}
