//! Coordinate reference system transformations.
//!
//! Implements the projections and datum shifts needed to turn GEF plane
//! coordinates into WGS 84 longitude/latitude, without external dependencies.

pub mod ellipsoid;
pub mod helmert;
pub mod stereographic;
pub mod transform;

pub use ellipsoid::Ellipsoid;
pub use helmert::Helmert;
pub use stereographic::ObliqueStereographic;
pub use transform::{default_registry, CoordinateTransform, RdNewToWgs84, TransformRegistry};
