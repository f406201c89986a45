use std::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    fmt::Display,
};

use crate::{
    config::{current_config, ProjectionConfig},
    utm::UtmCoordinate,
    Error,
};

/// A geodetic position, longitude and latitude in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticCoord {
    #[cfg_attr(feature = "serde", serde(alias = "lon"))]
    pub(crate) longitude: f64,
    #[cfg_attr(feature = "serde", serde(alias = "lat"))]
    pub(crate) latitude: f64,
}

impl GeodeticCoord {
    /// Tries to create a position from longitude and latitude in radians.
    /// First checks if the values are valid:
    /// * Latitude must be in range `[-pi/2, pi/2]`
    /// * Longitude must be in range `[-pi, 2pi]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::LatitudeOutOfRange`] or [`Error::LongitudeOutOfRange`].
    pub fn create(longitude: f64, latitude: f64) -> Result<GeodeticCoord, Error> {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            Err(Error::LatitudeOutOfRange(latitude))
        } else if !(-PI..=TAU).contains(&longitude) {
            Err(Error::LongitudeOutOfRange(longitude))
        } else {
            Ok(Self { longitude, latitude })
        }
    }

    /// Same as [`GeodeticCoord::create`], from degrees.
    ///
    /// # Errors
    ///
    /// See [`GeodeticCoord::create`].
    ///
    /// # Usage
    ///
    /// ```
    /// use geoproj::GeodeticCoord;
    ///
    /// let coord = GeodeticCoord::from_degrees(-73.985278, 40.748333).unwrap();
    /// assert!((coord.latitude() - 40.748333_f64.to_radians()).abs() < 1e-15);
    ///
    /// assert!(GeodeticCoord::from_degrees(0.0, 95.0).is_err());
    /// assert!(GeodeticCoord::from_degrees(-200.0, 0.0).is_err());
    /// ```
    pub fn from_degrees(longitude: f64, latitude: f64) -> Result<GeodeticCoord, Error> {
        GeodeticCoord::create(longitude.to_radians(), latitude.to_radians())
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Converts to UTM, see [`ProjectionConfig::geodetic_to_utm`].
    ///
    /// # Errors
    ///
    /// See [`ProjectionConfig::geodetic_to_utm`].
    ///
    /// ```
    /// use geoproj::{GeodeticCoord, ProjectionConfig};
    ///
    /// let coord = GeodeticCoord::from_degrees(25.0, 75.0).unwrap();
    /// let utm = coord.to_utm(&ProjectionConfig::default()).unwrap();
    ///
    /// assert_eq!(utm.zone(), 35);
    /// ```
    pub fn to_utm(&self, config: &ProjectionConfig) -> Result<UtmCoordinate, Error> {
        config.geodetic_to_utm(self.longitude, self.latitude)
    }
}

impl From<GeodeticCoord> for (f64, f64) {
    fn from(value: GeodeticCoord) -> Self {
        (value.longitude, value.latitude)
    }
}

impl TryFrom<UtmCoordinate> for GeodeticCoord {
    type Error = Error;

    /// Converts with the process-wide configuration, see [`current_config`].
    fn try_from(value: UtmCoordinate) -> Result<Self, Self::Error> {
        let (longitude, latitude) = current_config().utm_to_geodetic(&value)?;
        Ok(Self { longitude, latitude })
    }
}

/// Prints `"<longitude> <latitude>"` in degrees.
impl Display for GeodeticCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let lon = buf.format(self.longitude.to_degrees());
        let mut buf = ryu::Buffer::new();
        let lat = buf.format(self.latitude.to_degrees());
        write!(f, "{lon} {lat}")
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;
    use crate::utm::Hemisphere;

    #[test]
    fn validation() {
        assert!(GeodeticCoord::create(0., FRAC_PI_2).is_ok());
        assert!(GeodeticCoord::create(TAU, 0.).is_ok());
        assert_eq!(GeodeticCoord::create(0., 1.6), Err(Error::LatitudeOutOfRange(1.6)));
        assert_eq!(GeodeticCoord::create(-3.2, 0.), Err(Error::LongitudeOutOfRange(-3.2)));
    }

    #[test]
    fn display_in_degrees() {
        let coord = GeodeticCoord::create(0.5_f64.to_radians(), (-10_f64).to_radians()).unwrap();
        assert_eq!(coord.to_string(), "0.5 -10.0");
    }

    #[test]
    fn from_utm() {
        let utm = UtmCoordinate::create(33, Hemisphere::North, 500_000., 6_428_710.158_933).unwrap();
        let coord = GeodeticCoord::try_from(utm).unwrap();

        assert_float_eq!(coord.longitude(), 15_f64.to_radians(), abs <= 1e-12);
        assert_float_eq!(coord.latitude(), 58_f64.to_radians(), abs <= 1e-10);

        let (lon, lat): (f64, f64) = coord.into();
        assert_float_eq!(lon, coord.longitude(), abs <= 0.);
        assert_float_eq!(lat, coord.latitude(), abs <= 0.);
    }
}
