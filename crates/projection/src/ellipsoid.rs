//! Reference ellipsoids and geodetic <-> geocentric (ECEF) conversion.

/// A reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub semi_major_axis: f64,
    /// Inverse flattening (1/f)
    pub inverse_flattening: f64,
}

/// Bessel 1841, used by the Amersfoort datum.
pub const BESSEL_1841: Ellipsoid = Ellipsoid {
    semi_major_axis: 6377397.155,
    inverse_flattening: 299.1528128,
};

/// WGS 84.
pub const WGS84: Ellipsoid = Ellipsoid {
    semi_major_axis: 6378137.0,
    inverse_flattening: 298.257223563,
};

impl Ellipsoid {
    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    /// First eccentricity.
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Radius of curvature in the prime vertical at latitude `lat` (radians).
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let s = lat.sin();
        self.semi_major_axis / (1.0 - self.e2() * s * s).sqrt()
    }

    /// Geodetic (radians, meters) to earth-centered earth-fixed (meters).
    pub fn geodetic_to_ecef(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        let nu = self.prime_vertical_radius(lat);
        let x = (nu + h) * lat.cos() * lon.cos();
        let y = (nu + h) * lat.cos() * lon.sin();
        let z = (nu * (1.0 - self.e2()) + h) * lat.sin();
        (x, y, z)
    }

    /// Earth-centered earth-fixed (meters) to geodetic (radians, meters).
    ///
    /// Returns `(lon, lat, h)`. Iterates on latitude until it moves less
    /// than 1e-12 radians.
    pub fn ecef_to_geodetic(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        let mut lat = z.atan2(p * (1.0 - e2));
        let mut h;
        let mut iterations = 0;
        loop {
            let nu = self.prime_vertical_radius(lat);
            h = p / lat.cos() - nu;
            let next = z.atan2(p * (1.0 - e2 * nu / (nu + h)));
            let delta = (next - lat).abs();
            lat = next;
            iterations += 1;
            if delta < 1e-12 || iterations >= 20 {
                break;
            }
        }

        (lon, lat, h)
    }
}
