// Semi-major axis a
pub(crate) const WGS84_A: f64 = 6_378_137.;
// Flattening
#[allow(clippy::unreadable_literal)]
pub(crate) const WGS84_F: f64 = 1.0 / 298.257223563;

// Accepted range of the inverse flattening
pub(crate) const MIN_INV_F: f64 = 250.;
pub(crate) const MAX_INV_F: f64 = 350.;

// UTM central scale factor
pub(crate) const UTM_K0: f64 = 9996.0 / 10_000.;
pub(crate) const UTM_FALSE_EASTING: f64 = 500_000.;
pub(crate) const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.;

pub(crate) const UTM_MIN_LAT_DEG: f64 = -80.5;
pub(crate) const UTM_MAX_LAT_DEG: f64 = 84.5;
pub(crate) const UTM_MIN_EASTING: f64 = 100_000.;
pub(crate) const UTM_MAX_EASTING: f64 = 900_000.;
pub(crate) const UTM_MIN_NORTHING: f64 = 0.;
pub(crate) const UTM_MAX_NORTHING: f64 = 10_000_000.;

// Transverse Mercator limits
pub(crate) const TM_MAX_LAT_DEG: f64 = 89.99;
pub(crate) const TM_MIN_SCALE_FACTOR: f64 = 0.3;
pub(crate) const TM_MAX_SCALE_FACTOR: f64 = 3.0;
// Longitudes further than this from the central meridian trigger a distortion warning
pub(crate) const TM_DISTORTION_DEG: f64 = 9.;
