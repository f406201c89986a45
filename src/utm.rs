use std::{
    f64::consts::{PI, TAU},
    fmt::Display,
    str::FromStr,
};

use log::{debug, trace};

use crate::{
    config::ProjectionConfig,
    constants::{
        UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_K0, UTM_MAX_EASTING, UTM_MAX_LAT_DEG,
        UTM_MAX_NORTHING, UTM_MIN_EASTING, UTM_MIN_LAT_DEG, UTM_MIN_NORTHING,
    },
    ellipsoid::Ellipsoid,
    projections::transverse_mercator::{TransverseMercator, TransverseMercatorParams},
    utility::{dms, GeoMath},
    Error, ParseCoord, ThisOrThat,
};

pub mod zonespec {
    pub const NO_OVERRIDE: i32 = 0;
    pub const MINZONE: i32 = 1;
    pub const MAXZONE: i32 = 60;
    /// First zone east of the Greenwich meridian
    pub const GREENWICH: i32 = 31;
}

// Added to negative longitudes before zone selection, so values a hair
// below zero wrap past 2pi into the first zone east of Greenwich
const LON_NUDGE: f64 = 1.0e-10;

// Slack on the latitude band for inverse results, absorbs rounding at the band edges
const BAND_SLACK: f64 = 1.0e-10;

fn latitude_band() -> (f64, f64) {
    (UTM_MIN_LAT_DEG.to_radians(), UTM_MAX_LAT_DEG.to_radians())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// The hemisphere of `latitude`; the equator belongs to the north.
    pub fn from_latitude(latitude: f64) -> Hemisphere {
        (latitude < 0.).ternary(Hemisphere::South, Hemisphere::North)
    }

    /// UTM false northing: `10 000 000` m in the south, `0` in the north.
    pub fn false_northing(self) -> f64 {
        (self == Hemisphere::South).ternary(UTM_FALSE_NORTHING_SOUTH, 0.)
    }
}

impl TryFrom<char> for Hemisphere {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'N' | 'n' => Ok(Hemisphere::North),
            'S' | 's' => Ok(Hemisphere::South),
            _ => Err(Error::InvalidHemisphere(value)),
        }
    }
}

impl From<Hemisphere> for char {
    fn from(value: Hemisphere) -> Self {
        match value {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

/// A UTM coordinate: zone, hemisphere, easting and northing (meters).
///
/// Obtained from [`ProjectionConfig::geodetic_to_utm`] or built with
/// [`UtmCoordinate::create`]. Never modified once built.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmCoordinate {
    pub(crate) zone: i32,
    pub(crate) hemisphere: Hemisphere,
    pub(crate) easting: f64,
    pub(crate) northing: f64,
}

impl UtmCoordinate {
    /// Internal-only constructor that doesn't check the coordinate
    pub(crate) fn new(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> UtmCoordinate {
        Self {
            zone,
            hemisphere,
            easting,
            northing,
        }
    }

    /// Tries to create a UTM point from its constituent parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZone`] if the zone is outside `[1, 60]`,
    /// [`Error::EastingOutOfRange`] if the easting is outside
    /// `[100 000, 900 000]` and [`Error::NorthingOutOfRange`] if the northing
    /// is outside `[0, 10 000 000]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use geoproj::{Error, Hemisphere, UtmCoordinate};
    ///
    /// let coord = UtmCoordinate::create(18, Hemisphere::North, 585664.121, 4511315.422).unwrap();
    /// assert_eq!(coord.zone(), 18);
    /// assert!(coord.is_north());
    ///
    /// assert_eq!(
    ///     UtmCoordinate::create(70, Hemisphere::North, 585664.121, 4511315.422),
    ///     Err(Error::InvalidZone(70)),
    /// );
    /// assert_eq!(
    ///     UtmCoordinate::create(18, Hemisphere::North, 50000.0, 4511315.422),
    ///     Err(Error::EastingOutOfRange(50000.0)),
    /// );
    /// ```
    pub fn create(zone: i32, hemisphere: Hemisphere, easting: f64, northing: f64) -> Result<UtmCoordinate, Error> {
        check_zone(zone)?;
        check_coords(easting, northing)?;

        Ok(UtmCoordinate::new(zone, hemisphere, easting, northing))
    }

    pub fn zone(&self) -> i32 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn is_north(&self) -> bool {
        self.hemisphere == Hemisphere::North
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Converts to `(longitude, latitude)` in radians, see
    /// [`ProjectionConfig::utm_to_geodetic`].
    ///
    /// # Errors
    ///
    /// See [`ProjectionConfig::utm_to_geodetic`].
    pub fn to_geodetic(&self, config: &ProjectionConfig) -> Result<(f64, f64), Error> {
        config.utm_to_geodetic(self)
    }
}

impl ProjectionConfig {
    /// Converts a geodetic position (radians) to UTM.
    ///
    /// The zone follows the standard 6 degree scheme with the Norway and
    /// Svalbard exceptions, then the zone override if one is configured.
    ///
    /// # Errors
    ///
    /// * [`Error::LatitudeOutOfRange`] outside `[-80.5, 84.5]` degrees
    /// * [`Error::LongitudeOutOfRange`] outside `[-pi, 2pi]`
    /// * [`Error::ZoneOverride`] if the override is not adjacent to the computed zone
    /// * [`Error::EastingOutOfRange`] / [`Error::NorthingOutOfRange`] if the
    ///   projected point falls outside the UTM grid
    ///
    /// # Usage
    ///
    /// ```
    /// use geoproj::{Hemisphere, ProjectionConfig};
    ///
    /// let config = ProjectionConfig::default();
    /// let coord = config
    ///     .geodetic_to_utm((-73.985278_f64).to_radians(), 40.748333_f64.to_radians())
    ///     .unwrap();
    ///
    /// assert_eq!(coord.zone(), 18);
    /// assert_eq!(coord.hemisphere(), Hemisphere::North);
    /// assert!((coord.easting() - 585664.121).abs() < 1e-3);
    /// assert!((coord.northing() - 4511315.422).abs() < 1e-3);
    /// ```
    pub fn geodetic_to_utm(&self, longitude: f64, latitude: f64) -> Result<UtmCoordinate, Error> {
        let (min_lat, max_lat) = latitude_band();
        if !(min_lat..=max_lat).contains(&latitude) {
            return Err(Error::LatitudeOutOfRange(latitude));
        }

        if !(-PI..=TAU).contains(&longitude) {
            return Err(Error::LongitudeOutOfRange(longitude));
        }

        let zone = apply_override(standard_zone(longitude, latitude), self.zone_override)?;
        let hemisphere = Hemisphere::from_latitude(latitude);

        let tm = utm_projection(&self.ellipsoid, zone, hemisphere)?;
        trace!("UTM zone {zone}{hemisphere}, central meridian {}", tm.params().central_meridian);

        let (easting, northing) = tm.geodetic_to_tm(longitude, latitude)?;
        check_coords(easting, northing)?;

        Ok(UtmCoordinate::new(zone, hemisphere, easting, northing))
    }

    /// Converts a UTM coordinate to `(longitude, latitude)` in radians, the
    /// longitude in `(-pi, pi]`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidZone`], [`Error::EastingOutOfRange`] or
    ///   [`Error::NorthingOutOfRange`] for an out of range input
    /// * [`Error::NorthingOutOfRange`] if the result lies outside the UTM
    ///   latitude band
    /// * [`Error::Convergence`] if the inverse series break down
    pub fn utm_to_geodetic(&self, coordinate: &UtmCoordinate) -> Result<(f64, f64), Error> {
        let UtmCoordinate { zone, hemisphere, easting, northing } = *coordinate;

        check_zone(zone)?;
        check_coords(easting, northing)?;

        let tm = utm_projection(&self.ellipsoid, zone, hemisphere)?;
        let (longitude, latitude) = tm.tm_to_geodetic(easting, northing)?;

        let (min_lat, max_lat) = latitude_band();
        if !(min_lat - BAND_SLACK..=max_lat + BAND_SLACK).contains(&latitude) {
            return Err(Error::NorthingOutOfRange(northing));
        }

        Ok((longitude, latitude))
    }
}

/// Longitude of the central meridian of `zone`, in radians. Zones 1 to 30
/// come out in `(pi, 2pi)`.
pub fn central_meridian(zone: i32) -> f64 {
    let width = dms::ZONE_WIDTH;
    let degrees = if zone >= zonespec::GREENWICH {
        width * zone - 183
    } else {
        width * zone + 177
    };

    f64::from(degrees) * PI / f64::from(dms::HD)
}

fn utm_projection(ellipsoid: &Ellipsoid, zone: i32, hemisphere: Hemisphere) -> Result<TransverseMercator, Error> {
    let params = TransverseMercatorParams::new(
        0.,
        central_meridian(zone),
        UTM_FALSE_EASTING,
        hemisphere.false_northing(),
        UTM_K0,
    );

    TransverseMercator::create(ellipsoid, params)
}

// Map lon/lat (radians) to the UTM zone, degree comparisons truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn standard_zone(longitude: f64, latitude: f64) -> i32 {
    let longitude = (longitude < 0.).ternary(longitude + TAU + LON_NUDGE, longitude);
    let width = f64::from(dms::ZONE_WIDTH);

    let mut zone = if longitude < PI {
        (f64::from(zonespec::GREENWICH) + longitude.degrees() / width) as i32
    } else {
        (longitude.degrees() / width - 29.) as i32
    };

    if zone > zonespec::MAXZONE {
        zone = zonespec::MINZONE;
    }

    let lat_deg = latitude.trunc_degrees();
    let lon_deg = longitude.trunc_degrees();

    // The Norway exception
    if lat_deg > 55 && lat_deg < 64 {
        if lon_deg > -1 && lon_deg < 3 {
            zone = 31;
        }
        if lon_deg > 2 && lon_deg < 12 {
            zone = 32;
        }
    }

    // The Svalbard exception
    if lat_deg > 71 {
        if lon_deg > -1 && lon_deg < 9 {
            zone = 31;
        }
        if lon_deg > 8 && lon_deg < 21 {
            zone = 33;
        }
        if lon_deg > 20 && lon_deg < 33 {
            zone = 35;
        }
        if lon_deg > 32 && lon_deg < 42 {
            zone = 37;
        }
    }

    zone
}

// The override wins if it is the computed zone's neighbour, across the antimeridian too.
fn apply_override(zone: i32, override_zone: i32) -> Result<i32, Error> {
    if override_zone == zonespec::NO_OVERRIDE {
        return Ok(zone);
    }

    let wraps = (zone == zonespec::MINZONE && override_zone == zonespec::MAXZONE)
        || (zone == zonespec::MAXZONE && override_zone == zonespec::MINZONE);

    if wraps || (zone - 1..=zone + 1).contains(&override_zone) {
        if override_zone != zone {
            debug!("UTM zone {zone} overridden by zone {override_zone}");
        }
        Ok(override_zone)
    } else {
        Err(Error::ZoneOverride { zone, override_zone })
    }
}

fn check_zone(zone: i32) -> Result<(), Error> {
    if (zonespec::MINZONE..=zonespec::MAXZONE).contains(&zone) {
        Ok(())
    } else {
        Err(Error::InvalidZone(zone))
    }
}

pub(crate) fn check_coords(easting: f64, northing: f64) -> Result<(), Error> {
    if !(UTM_MIN_EASTING..=UTM_MAX_EASTING).contains(&easting) {
        return Err(Error::EastingOutOfRange(easting));
    }

    if !(UTM_MIN_NORTHING..=UTM_MAX_NORTHING).contains(&northing) {
        return Err(Error::NorthingOutOfRange(northing));
    }

    Ok(())
}

impl ParseCoord for UtmCoordinate {
    /// Parses `"<zone><N|S> <easting> <northing>"`, e.g. `"33N 500000.0 6428710.159"`.
    fn parse_coord(value: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidUtmString(value.to_string());

        let mut pieces = value.split_whitespace();
        let (Some(zone_hemi), Some(easting), Some(northing), None) =
            (pieces.next(), pieces.next(), pieces.next(), pieces.next())
        else {
            return Err(invalid());
        };

        let hemi = zone_hemi.chars().last().ok_or_else(invalid)?;
        let zone = zone_hemi[..zone_hemi.len() - hemi.len_utf8()]
            .parse::<i32>()
            .map_err(|_| invalid())?;
        let hemisphere = Hemisphere::try_from(hemi)?;

        let easting = easting.parse::<f64>().map_err(|_| invalid())?;
        let northing = northing.parse::<f64>().map_err(|_| invalid())?;

        UtmCoordinate::create(zone, hemisphere, easting, northing)
    }
}

impl FromStr for UtmCoordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UtmCoordinate::parse_coord(s)
    }
}

impl Display for UtmCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = ryu::Buffer::new();
        let easting = buf.format(self.easting);
        let mut buf = ryu::Buffer::new();
        let northing = buf.format(self.northing);
        write!(
            f,
            "{}{} {easting} {northing}",
            self.zone,
            self.hemisphere,
        )
    }
}
