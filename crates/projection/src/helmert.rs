//! Seven-parameter Helmert datum transformation on geocentric coordinates.

/// Arc-seconds to radians.
const ARCSEC: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Helmert parameters in the position vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert {
    /// Translations (meters)
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations (arc-seconds)
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale difference (parts per million)
    pub scale_ppm: f64,
}

impl Helmert {
    /// Amersfoort to WGS 84.
    pub fn amersfoort_to_wgs84() -> Self {
        Self {
            tx: 565.2369,
            ty: 50.0087,
            tz: 465.658,
            rx: -0.406857,
            ry: 0.350733,
            rz: -1.87035,
            scale_ppm: 4.0812,
        }
    }

    /// Transform an ECEF point from the source to the target datum.
    pub fn apply(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let (rx, ry, rz) = (self.rx * ARCSEC, self.ry * ARCSEC, self.rz * ARCSEC);
        let m = 1.0 + self.scale_ppm * 1e-6;

        (
            self.tx + m * (x - rz * y + ry * z),
            self.ty + m * (rz * x + y - rx * z),
            self.tz + m * (-ry * x + rx * y + z),
        )
    }

    /// Parameters for the reverse direction.
    ///
    /// Negating all seven parameters is the small-angle approximation;
    /// the residual is a few millimeters at these magnitudes.
    pub fn inverse(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
            scale_ppm: -self.scale_ppm,
        }
    }
}
