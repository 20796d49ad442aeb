//! Coordinate reference systems and reprojection to WGS84.
//!
//! Only the projections that German hydrological datasets are published in are
//! supported:
//!
//! - **EPSG:4326 / EPSG:4258**: geographic WGS84 / ETRS89, passed through
//! - **EPSG:3035**: ETRS89 Lambert Azimuthal Equal Area (Europe)
//! - **EPSG:25828–25838**: ETRS89 / UTM zones 28N–38N
//! - **EPSG:32601–32660**: WGS 84 / UTM zones 1N–60N
//! - **EPSG:3857**: Web Mercator
//!
//! ETRS89 and WGS84 differ by well under a metre in Germany; like the default
//! PROJ pipeline, no datum shift is applied between them.
//!
//! Formulas follow IOGP Guidance Note 7-2. The LAEA inverse is solved by
//! iteration and the transverse Mercator uses the Krüger series, so forward and
//! inverse agree to well below a millimetre.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::{CamelsError, Result};

/// An ellipsoid given by semi-major axis and inverse flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub inv_f: f64,
}

/// GRS 1980, used by ETRS89.
pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    inv_f: 298.257_222_101,
};

/// WGS 84.
pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    inv_f: 298.257_223_563,
};

impl Ellipsoid {
    fn f(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// First eccentricity.
    fn e(&self) -> f64 {
        let f = self.f();
        (2.0 * f - f * f).sqrt()
    }
}

/// A supported coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    /// Longitude/latitude in degrees (EPSG:4326, EPSG:4258).
    Geographic,
    /// ETRS89-extended / LAEA Europe (EPSG:3035).
    EtrsLaea,
    /// Universal Transverse Mercator, northern hemisphere.
    Utm { zone: u8, ellipsoid: Ellipsoid },
    /// Pseudo-Mercator on the WGS84 sphere (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Look up a CRS by EPSG code.
    ///
    /// # Errors
    ///
    /// Returns [`CamelsError::UnsupportedCrs`] for codes outside the supported
    /// set.
    ///
    /// # Examples
    ///
    /// ```
    /// use camels::crs::Crs;
    ///
    /// assert_eq!(Crs::from_epsg(4326).unwrap(), Crs::Geographic);
    /// assert_eq!(Crs::from_epsg(3035).unwrap(), Crs::EtrsLaea);
    /// assert!(Crs::from_epsg(31467).is_err());
    /// ```
    pub fn from_epsg(code: i32) -> Result<Self> {
        match code {
            4326 | 4258 => Ok(Crs::Geographic),
            3035 => Ok(Crs::EtrsLaea),
            3857 => Ok(Crs::WebMercator),
            25828..=25838 => Ok(Crs::Utm {
                zone: (code - 25800) as u8,
                ellipsoid: GRS80,
            }),
            32601..=32660 => Ok(Crs::Utm {
                zone: (code - 32600) as u8,
                ellipsoid: WGS84,
            }),
            _ => Err(CamelsError::UnsupportedCrs { code }),
        }
    }

    /// Whether coordinates in this CRS are already longitude/latitude.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic)
    }

    /// Convert projected `[x, y]` to `[lon, lat]` in degrees.
    pub fn to_wgs84(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Crs::Geographic => (x, y),
            Crs::EtrsLaea => Laea::etrs89().inverse(x, y),
            Crs::Utm { zone, ellipsoid } => {
                TransverseMercator::utm(*zone, *ellipsoid).inverse(x, y)
            }
            Crs::WebMercator => web_mercator_inverse(x, y),
        }
    }

    /// Convert `[lon, lat]` in degrees to projected `[x, y]`.
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Crs::Geographic => (lon, lat),
            Crs::EtrsLaea => Laea::etrs89().forward(lon, lat),
            Crs::Utm { zone, ellipsoid } => {
                TransverseMercator::utm(*zone, *ellipsoid).forward(lon, lat)
            }
            Crs::WebMercator => web_mercator_forward(lon, lat),
        }
    }
}

/// Ellipsoidal Lambert Azimuthal Equal Area, oblique aspect.
struct Laea {
    e: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    qp: f64,
    rq: f64,
    d: f64,
    sin_beta0: f64,
    cos_beta0: f64,
}

impl Laea {
    /// Parameters of EPSG:3035.
    fn etrs89() -> Self {
        Self::new(GRS80, 52.0, 10.0, 4_321_000.0, 3_210_000.0)
    }

    fn new(
        ellipsoid: Ellipsoid,
        lat0_deg: f64,
        lon0_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.a;
        let e = ellipsoid.e();
        let lat0 = lat0_deg.to_radians();

        let qp = authalic_q(FRAC_PI_2.sin(), e);
        let q0 = authalic_q(lat0.sin(), e);
        let beta0 = (q0 / qp).asin();
        let rq = a * (qp / 2.0).sqrt();
        let d = a * (lat0.cos() / (1.0 - e * e * lat0.sin().powi(2)).sqrt()) / (rq * beta0.cos());

        Self {
            e,
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
            qp,
            rq,
            d,
            sin_beta0: beta0.sin(),
            cos_beta0: beta0.cos(),
        }
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let q = authalic_q(lat.sin(), self.e);
        let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
        let (sin_beta, cos_beta) = beta.sin_cos();

        let b = self.rq
            * (2.0 / (1.0 + self.sin_beta0 * sin_beta + self.cos_beta0 * cos_beta * dlon.cos()))
                .sqrt();

        let x = self.false_easting + b * self.d * cos_beta * dlon.sin();
        let y = self.false_northing
            + (b / self.d) * (self.cos_beta0 * sin_beta - self.sin_beta0 * cos_beta * dlon.cos());
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.false_easting;
        let dy = y - self.false_northing;

        let rho = ((dx / self.d).powi(2) + (self.d * dy).powi(2)).sqrt();
        if rho < 1e-10 {
            let lat0 = geodetic_from_authalic(self.sin_beta0.asin(), self.e, self.qp);
            return (self.lon0.to_degrees(), lat0.to_degrees());
        }

        let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let beta = (cos_c * self.sin_beta0 + self.d * dy * sin_c * self.cos_beta0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (dx * sin_c).atan2(
                self.d * rho * self.cos_beta0 * cos_c - self.d * self.d * dy * self.sin_beta0 * sin_c,
            );

        let lat = geodetic_from_authalic(beta, self.e, self.qp);
        (lon.to_degrees(), lat.to_degrees())
    }
}

/// The authalic `q` function of Snyder eq. 3-12.
fn authalic_q(sin_lat: f64, e: f64) -> f64 {
    let e_sin = e * sin_lat;
    (1.0 - e * e)
        * (sin_lat / (1.0 - e_sin * e_sin) - (1.0 / (2.0 * e)) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
}

/// Invert `q(φ) = qp·sin β` for the geodetic latitude φ (Snyder eq. 3-16).
fn geodetic_from_authalic(beta: f64, e: f64, qp: f64) -> f64 {
    let q = qp * beta.sin();
    if (q.abs() - qp).abs() < 1e-12 {
        return FRAC_PI_2.copysign(q);
    }

    let e2 = e * e;
    let mut lat = (q / 2.0).clamp(-1.0, 1.0).asin();
    for _ in 0..20 {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let one_minus = 1.0 - e2 * sin_lat * sin_lat;
        let delta = one_minus * one_minus / (2.0 * cos_lat)
            * (q / (1.0 - e2) - sin_lat / one_minus
                + (1.0 / (2.0 * e)) * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).ln());
        lat += delta;
        if delta.abs() < 1e-14 {
            break;
        }
    }
    lat
}

/// Transverse Mercator via the Krüger n-series (IOGP 7-2, "JHS formulas").
struct TransverseMercator {
    e: f64,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    b: f64,
    forward: [f64; 4],
    inverse: [f64; 4],
}

impl TransverseMercator {
    fn utm(zone: u8, ellipsoid: Ellipsoid) -> Self {
        let lon0 = f64::from(zone) * 6.0 - 183.0;
        Self::new(ellipsoid, lon0, 0.9996, 500_000.0, 0.0)
    }

    fn new(
        ellipsoid: Ellipsoid,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = ellipsoid.f();
        let n = f / (2.0 - f);
        let (n2, n3, n4) = (n * n, n * n * n, n * n * n * n);

        let b = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let forward = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4,
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4,
            49561.0 / 161280.0 * n4,
        ];
        let inverse = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4,
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4,
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4,
            4397.0 / 161280.0 * n4,
        ];

        Self {
            e: ellipsoid.e(),
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            b,
            forward,
            inverse,
        }
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let q = lat.tan().asinh() - self.e * (self.e * lat.sin()).atanh();
        let beta = q.sinh().atan();
        let eta0 = (beta.cos() * dlon.sin()).atanh();
        let xi0 = (beta.sin() * eta0.cosh()).asin();

        let mut xi = xi0;
        let mut eta = eta0;
        for (i, h) in self.forward.iter().enumerate() {
            let k = 2.0 * (i + 1) as f64;
            xi += h * (k * xi0).sin() * (k * eta0).cosh();
            eta += h * (k * xi0).cos() * (k * eta0).sinh();
        }

        let x = self.false_easting + self.k0 * self.b * eta;
        let y = self.false_northing + self.k0 * self.b * xi;
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let eta1 = (x - self.false_easting) / (self.b * self.k0);
        let xi1 = (y - self.false_northing) / (self.b * self.k0);

        let mut xi0 = xi1;
        let mut eta0 = eta1;
        for (i, h) in self.inverse.iter().enumerate() {
            let k = 2.0 * (i + 1) as f64;
            xi0 -= h * (k * xi1).sin() * (k * eta1).cosh();
            eta0 -= h * (k * xi1).cos() * (k * eta1).sinh();
        }

        let beta = (xi0.sin() / eta0.cosh()).asin();
        let q1 = beta.tan().asinh();

        let mut q = q1;
        for _ in 0..20 {
            let next = q1 + self.e * (self.e * q.tanh()).atanh();
            let done = (next - q).abs() < 1e-15;
            q = next;
            if done {
                break;
            }
        }

        let lat = q.sinh().atan();
        let lon = self.lon0 + (eta0.tanh() / beta.cos()).asin();
        (lon.to_degrees(), lat.to_degrees())
    }
}

const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

fn web_mercator_forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = WEB_MERCATOR_RADIUS * lon_deg.to_radians();
    let y = WEB_MERCATOR_RADIUS * (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn web_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = x / WEB_MERCATOR_RADIUS;
    let lat = 2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - FRAC_PI_2;
    (lon.to_degrees(), lat.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: (f64, f64), expected: (f64, f64), tolerance: f64) {
        assert!(
            (actual.0 - expected.0).abs() < tolerance && (actual.1 - expected.1).abs() < tolerance,
            "{actual:?} != {expected:?} (tolerance {tolerance})"
        );
    }

    #[test]
    fn test_laea_reference_point() {
        // IOGP 7-2 worked example for EPSG:3035
        let projected = Crs::EtrsLaea.from_wgs84(5.0, 50.0);
        assert_close(projected, (3_962_799.45, 2_999_718.85), 0.05);

        let geographic = Crs::EtrsLaea.to_wgs84(3_962_799.45, 2_999_718.85);
        assert_close(geographic, (5.0, 50.0), 1e-6);
    }

    #[test]
    fn test_laea_projection_origin() {
        let projected = Crs::EtrsLaea.from_wgs84(10.0, 52.0);
        assert_close(projected, (4_321_000.0, 3_210_000.0), 1e-6);

        let geographic = Crs::EtrsLaea.to_wgs84(4_321_000.0, 3_210_000.0);
        assert_close(geographic, (10.0, 52.0), 1e-9);
    }

    #[test]
    fn test_laea_round_trip_across_germany() {
        for &(x, y) in &[
            (4_100_000.0, 2_700_000.0),
            (4_250_000.0, 3_300_000.0),
            (4_650_000.0, 3_550_000.0),
            (4_550_000.0, 2_780_000.0),
        ] {
            let (lon, lat) = Crs::EtrsLaea.to_wgs84(x, y);
            assert!((5.0..16.0).contains(&lon), "lon {lon}");
            assert!((47.0..56.0).contains(&lat), "lat {lat}");
            assert_close(Crs::EtrsLaea.from_wgs84(lon, lat), (x, y), 1e-4);
        }
    }

    #[test]
    fn test_utm_central_meridian_and_equator() {
        let crs = Crs::from_epsg(25832).unwrap();
        assert_close(crs.from_wgs84(9.0, 0.0), (500_000.0, 0.0), 1e-6);

        let (x, _) = crs.from_wgs84(9.0, 51.0);
        assert!((x - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_utm_round_trip() {
        let crs = Crs::from_epsg(25832).unwrap();
        for &(lon, lat) in &[(7.6, 51.9), (9.0, 48.2), (11.4, 53.5), (6.1, 50.8)] {
            let (x, y) = crs.from_wgs84(lon, lat);
            assert!((5_300_000.0..6_000_000.0).contains(&y), "northing {y}");
            assert_close(crs.to_wgs84(x, y), (lon, lat), 1e-8);
        }

        let crs = Crs::from_epsg(32633).unwrap();
        let (x, y) = crs.from_wgs84(13.4, 52.5);
        assert_close(crs.to_wgs84(x, y), (13.4, 52.5), 1e-8);
    }

    #[test]
    fn test_web_mercator_round_trip() {
        let (x, y) = Crs::WebMercator.from_wgs84(180.0, 0.0);
        assert!((x - 20_037_508.342789244).abs() < 1e-6);
        assert!(y.abs() < 1e-6);

        let (x, y) = Crs::WebMercator.from_wgs84(8.4, 49.0);
        assert_close(Crs::WebMercator.to_wgs84(x, y), (8.4, 49.0), 1e-9);
    }

    #[test]
    fn test_geographic_is_identity() {
        assert!(Crs::from_epsg(4258).unwrap().is_geographic());
        assert_eq!(Crs::Geographic.to_wgs84(8.0, 50.0), (8.0, 50.0));
    }

    #[test]
    fn test_unsupported_codes() {
        for code in [0, 2154, 31467, 25827, 25839, 32700] {
            assert!(matches!(
                Crs::from_epsg(code),
                Err(CamelsError::UnsupportedCrs { .. })
            ));
        }
    }
}
