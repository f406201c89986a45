#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

//! Conversion between geodetic coordinates and the Universal Transverse
//! Mercator (UTM) / generic Transverse Mercator projections.
//!
//! All angles are in radians, all linear quantities in meters.
//!
//! ```
//! use geoproj::{ProjectionConfig, Hemisphere};
//!
//! let config = ProjectionConfig::default();
//! let utm = config.geodetic_to_utm(15_f64.to_radians(), 58_f64.to_radians()).unwrap();
//!
//! assert_eq!(utm.zone(), 33);
//! assert_eq!(utm.hemisphere(), Hemisphere::North);
//! assert!((utm.easting() - 500_000.0).abs() < 1e-6);
//!
//! let (lon, lat) = config.utm_to_geodetic(&utm).unwrap();
//! assert!((lon - 15_f64.to_radians()).abs() < 1e-10);
//! assert!((lat - 58_f64.to_radians()).abs() < 1e-10);
//! ```

use thiserror::Error;

pub mod config;
pub mod ellipsoid;
pub mod geodetic;
pub(crate) mod utility;
pub mod utm;

pub use config::{
    current_config, set_ellipsoid, set_ellipsoid_parameters, set_zone_override, zone_override, ProjectionConfig,
};
pub use ellipsoid::Ellipsoid;
pub use geodetic::GeodeticCoord;
pub use projections::transverse_mercator::{TransverseMercator, TransverseMercatorParams};
pub use utm::{Hemisphere, UtmCoordinate};

pub mod projections {
    pub mod transverse_mercator;
}

pub(crate) mod constants;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Semi-major axis {0} must be greater than zero")]
    InvalidSemiMajorAxis(f64),
    #[error("Inverse flattening {0} not in range [250, 350]")]
    InvalidFlattening(f64),
    #[error("Zone override {0} not in range [0, 60]")]
    InvalidZoneOverride(i32),
    #[error("Origin latitude {0} rad outside of valid range")]
    OriginLatitude(f64),
    #[error("Central meridian {0} rad outside of valid range [-pi, 2pi]")]
    CentralMeridian(f64),
    #[error("Scale factor {0} not in range [0.3, 3.0]")]
    ScaleFactor(f64),
    #[error("Latitude {0} rad outside of valid range")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} rad outside of valid range [-pi, 2pi]")]
    LongitudeOutOfRange(f64),
    #[error("Longitude is {delta} rad from the central meridian, more than 90 degrees")]
    LongitudeRange { delta: f64 },
    #[error("Easting {0} outside of valid range")]
    EastingOutOfRange(f64),
    #[error("Northing {0} outside of valid range")]
    NorthingOutOfRange(f64),
    #[error("Zone override {override_zone} is not within 1 of the computed zone {zone}")]
    ZoneOverride { zone: i32, override_zone: i32 },
    #[error("Zone {0} not in range [1, 60]")]
    InvalidZone(i32),
    #[error("Invalid hemisphere '{0}', expected 'N' or 'S'")]
    InvalidHemisphere(char),
    #[error("Inverse projection degenerate at footpoint latitude {0} rad")]
    Convergence(f64),
    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),
    #[error("UTM string is invalid: {0}")]
    InvalidUtmString(String),
}

pub trait ParseCoord {
    /// Parses a coordinate from its textual form.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or describes an invalid
    /// coordinate.
    fn parse_coord(value: &str) -> Result<Self, Error>
    where Self: Sized;
}

/// Parses any coordinate type implementing [`ParseCoord`].
///
/// # Errors
///
/// Propagates the error of the target type's parser.
///
/// # Usage
///
/// ```
/// use geoproj::UtmCoordinate;
///
/// let coord: UtmCoordinate = geoproj::from_str("33N 500000 6428710.159").unwrap();
/// assert_eq!(coord.zone(), 33);
/// ```
pub fn from_str<S, T>(value: S) -> Result<T, Error>
where
    S: AsRef<str>,
    T: ParseCoord
{
    T::parse_coord(value.as_ref())
}

/// Converts a geodetic position to UTM using the process-wide configuration.
///
/// # Errors
///
/// See [`ProjectionConfig::geodetic_to_utm`].
pub fn convert_geodetic_to_utm(longitude: f64, latitude: f64) -> Result<UtmCoordinate, Error> {
    current_config().geodetic_to_utm(longitude, latitude)
}

/// Converts a UTM coordinate to `(longitude, latitude)` using the process-wide
/// configuration.
///
/// # Errors
///
/// See [`ProjectionConfig::utm_to_geodetic`].
pub fn convert_utm_to_geodetic(coordinate: &UtmCoordinate) -> Result<(f64, f64), Error> {
    current_config().utm_to_geodetic(coordinate)
}

trait ThisOrThat {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T;
}

impl ThisOrThat for bool {
    fn ternary<T>(&self, r#true: T, r#false: T) -> T {
        if *self { r#true } else { r#false }
    }
}
