//! Oblique Stereographic projection (EPSG method 9809, "double stereographic").
//!
//! The ellipsoid is first mapped conformally onto a sphere, which is then
//! projected stereographically from the antipode of the origin. This is the
//! projection behind the Dutch national grid (RD New, EPSG:28992).
//!
//! Formulas follow IOGP Guidance Note 7-2, section 3.2.2.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use crate::ellipsoid::{Ellipsoid, BESSEL_1841};

/// Oblique Stereographic projection parameters.
#[derive(Debug, Clone)]
pub struct ObliqueStereographic {
    /// Latitude of natural origin (radians)
    pub lat0: f64,
    /// Longitude of natural origin (radians)
    pub lon0: f64,
    /// Scale factor at natural origin
    pub k0: f64,
    /// False easting (meters)
    pub false_easting: f64,
    /// False northing (meters)
    pub false_northing: f64,
    pub ellipsoid: Ellipsoid,
    /// Radius of the conformal sphere
    r: f64,
    /// Conformal longitude scaling
    n: f64,
    /// Conformal latitude constant
    c: f64,
    /// Conformal latitude of the origin
    chi0: f64,
}

impl ObliqueStereographic {
    /// Create a projection from origin parameters in degrees.
    pub fn new(
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    ) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let e2 = ellipsoid.e2();
        let e = ellipsoid.e();
        let a = ellipsoid.semi_major_axis;

        let sin0 = lat0.sin();
        let rho0 = a * (1.0 - e2) / (1.0 - e2 * sin0 * sin0).powf(1.5);
        let nu0 = a / (1.0 - e2 * sin0 * sin0).sqrt();
        let r = (rho0 * nu0).sqrt();
        let n = (1.0 + e2 * lat0.cos().powi(4) / (1.0 - e2)).sqrt();

        let s1 = (1.0 + sin0) / (1.0 - sin0);
        let s2 = (1.0 - e * sin0) / (1.0 + e * sin0);
        let w1 = (s1 * s2.powf(e)).powf(n);
        let sin_chi00 = (w1 - 1.0) / (w1 + 1.0);
        let c = (n + sin0) * (1.0 - sin_chi00) / ((n - sin0) * (1.0 + sin_chi00));
        let w2 = c * w1;
        let chi0 = ((w2 - 1.0) / (w2 + 1.0)).asin();

        Self {
            lat0,
            lon0,
            k0,
            false_easting,
            false_northing,
            ellipsoid,
            r,
            n,
            c,
            chi0,
        }
    }

    /// Amersfoort / RD New (EPSG:28992).
    pub fn rd_new() -> Self {
        Self::new(
            52.15616055555555, // lat0
            5.38763888888889,  // lon0
            0.9999079,         // k0
            155000.0,          // false easting
            463000.0,          // false northing
            BESSEL_1841,
        )
    }

    /// Projected (easting, northing) in meters to geodetic (lon, lat) in radians.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let two_rk0 = 2.0 * self.r * self.k0;
        let g = two_rk0 * (FRAC_PI_4 - self.chi0 / 2.0).tan();
        let h = 2.0 * two_rk0 * self.chi0.tan() + g;

        let de = easting - self.false_easting;
        let dn = northing - self.false_northing;

        let i = (de / (h + dn)).atan();
        let j = (de / (g - dn)).atan() - i;
        let chi = self.chi0 + 2.0 * ((dn - de * (j / 2.0).tan()) / two_rk0).atan();
        let big_lambda = j + 2.0 * i + self.lon0;
        let lon = (big_lambda - self.lon0) / self.n + self.lon0;

        let psi = 0.5 * ((1.0 + chi.sin()) / (self.c * (1.0 - chi.sin()))).ln() / self.n;
        let lat = self.latitude_from_isometric(psi);

        (lon, lat)
    }

    /// Geodetic (lon, lat) in radians to projected (easting, northing) in meters.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let e = self.ellipsoid.e();
        let sin_lat = lat.sin();

        let sa = (1.0 + sin_lat) / (1.0 - sin_lat);
        let sb = (1.0 - e * sin_lat) / (1.0 + e * sin_lat);
        let w = self.c * (sa * sb.powf(e)).powf(self.n);
        let chi = ((w - 1.0) / (w + 1.0)).asin();
        let dlambda = self.n * (lon - self.lon0);

        let b = 1.0 + chi.sin() * self.chi0.sin() + chi.cos() * self.chi0.cos() * dlambda.cos();
        let two_rk0 = 2.0 * self.r * self.k0;

        let easting = self.false_easting + two_rk0 * chi.cos() * dlambda.sin() / b;
        let northing = self.false_northing
            + two_rk0 * (chi.sin() * self.chi0.cos() - chi.cos() * self.chi0.sin() * dlambda.cos())
                / b;

        (easting, northing)
    }

    /// Solve geodetic latitude from isometric latitude by fixed-point iteration.
    fn latitude_from_isometric(&self, psi: f64) -> f64 {
        let e = self.ellipsoid.e();
        let e2 = self.ellipsoid.e2();

        let mut lat = 2.0 * psi.exp().atan() - FRAC_PI_2;
        for _ in 0..20 {
            let sin_lat = lat.sin();
            let psi_i = ((lat / 2.0 + FRAC_PI_4).tan()
                * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).powf(e / 2.0))
            .ln();
            let next = lat - (psi_i - psi) * lat.cos() * (1.0 - e2 * sin_lat * sin_lat) / (1.0 - e2);
            let delta = (next - lat).abs();
            lat = next;
            if delta < 1e-14 {
                break;
            }
        }
        lat
    }
}
