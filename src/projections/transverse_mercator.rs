use std::f64::consts::{FRAC_PI_2, PI, TAU};

use log::warn;

use crate::{
    constants::{TM_DISTORTION_DEG, TM_MAX_LAT_DEG, TM_MAX_SCALE_FACTOR, TM_MIN_SCALE_FACTOR},
    ellipsoid::Ellipsoid,
    utility::GeoMath,
    Error,
};

// Longitude differences below this are snapped to the central meridian
const DLAM_EPS: f64 = 2.0e-10;
// Easting offsets below this (meters) are snapped to the central meridian
const DE_EPS: f64 = 1.0e-4;
// cos(footpoint latitude) below this makes the inverse series degenerate
const MIN_COS_FOOTPOINT: f64 = 1.0e-10;

fn max_lat() -> f64 {
    TM_MAX_LAT_DEG.to_radians()
}

/// The defining parameters of a Transverse Mercator projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransverseMercatorParams {
    /// Latitude of origin, radians
    pub origin_latitude: f64,
    /// Longitude of the central meridian, radians
    pub central_meridian: f64,
    /// Easting at the central meridian, meters
    pub false_easting: f64,
    /// Northing at the origin latitude, meters
    pub false_northing: f64,
    /// Scale factor along the central meridian
    pub scale_factor: f64,
}

impl TransverseMercatorParams {
    pub fn new(
        origin_latitude: f64,
        central_meridian: f64,
        false_easting: f64,
        false_northing: f64,
        scale_factor: f64,
    ) -> TransverseMercatorParams {
        Self {
            origin_latitude,
            central_meridian,
            false_easting,
            false_northing,
            scale_factor,
        }
    }
}

/// A Transverse Mercator projection bound to one ellipsoid and one set of
/// [`TransverseMercatorParams`].
///
/// The engine is immutable: everything derived from the parameters is
/// computed in [`TransverseMercator::create`], and conversions only borrow
/// it, so one value can be shared freely between threads.
///
/// # Usage
///
/// ```
/// use geoproj::{Ellipsoid, TransverseMercator, TransverseMercatorParams};
///
/// let params = TransverseMercatorParams::new(0.0, 9_f64.to_radians(), 500_000.0, 0.0, 0.9996);
/// let tm = TransverseMercator::create(&Ellipsoid::default(), params).unwrap();
///
/// let (easting, northing) = tm.geodetic_to_tm(10_f64.to_radians(), 56_f64.to_radians()).unwrap();
/// let (lon, lat) = tm.tm_to_geodetic(easting, northing).unwrap();
///
/// assert!((lon - 10_f64.to_radians()).abs() < 1e-10);
/// assert!((lat - 56_f64.to_radians()).abs() < 1e-10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    params: TransverseMercatorParams,
    // Meridian arc from the equator to the origin latitude
    origin_arc: f64,
    // Largest offsets from the false origin the inverse accepts
    max_easting_delta: f64,
    max_northing_delta: f64,
}

impl TransverseMercator {
    /// Validates the projection parameters and precomputes the quantities
    /// shared by the forward and inverse transforms.
    ///
    /// A central meridian in `(pi, 2pi]` is shifted into `(-pi, pi]`.
    ///
    /// # Errors
    ///
    /// * [`Error::OriginLatitude`] if the origin latitude is beyond +-89.99 degrees
    /// * [`Error::CentralMeridian`] if the central meridian is outside `[-pi, 2pi]`
    /// * [`Error::ScaleFactor`] if the scale factor is outside `[0.3, 3.0]`
    pub fn create(ellipsoid: &Ellipsoid, params: TransverseMercatorParams) -> Result<TransverseMercator, Error> {
        let max_lat = max_lat();
        if !(-max_lat..=max_lat).contains(&params.origin_latitude) {
            return Err(Error::OriginLatitude(params.origin_latitude));
        }

        if !(-PI..=TAU).contains(&params.central_meridian) {
            return Err(Error::CentralMeridian(params.central_meridian));
        }

        if !(TM_MIN_SCALE_FACTOR..=TM_MAX_SCALE_FACTOR).contains(&params.scale_factor) {
            return Err(Error::ScaleFactor(params.scale_factor));
        }

        // The unscaled extent of the projection at 90 degrees from the
        // central meridian bounds what the inverse accepts
        let (max_easting_delta, _) = forward_series(ellipsoid, 1., FRAC_PI_2, 0.);
        let (_, max_northing_delta) = forward_series(ellipsoid, 1., FRAC_PI_2, max_lat);

        Ok(Self {
            ellipsoid: *ellipsoid,
            params: TransverseMercatorParams {
                central_meridian: params.central_meridian.ang_normalize(),
                ..params
            },
            origin_arc: ellipsoid.meridional_arc(params.origin_latitude),
            max_easting_delta,
            max_northing_delta,
        })
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// The validated parameters, with the central meridian in `(-pi, pi]`.
    pub fn params(&self) -> &TransverseMercatorParams {
        &self.params
    }

    /// Projects a geodetic position (radians) to `(easting, northing)` in meters.
    ///
    /// # Errors
    ///
    /// * [`Error::LatitudeOutOfRange`] if the latitude is beyond +-89.99 degrees
    /// * [`Error::LongitudeOutOfRange`] if the longitude is outside `[-pi, 2pi]`
    /// * [`Error::LongitudeRange`] if the longitude is more than 90 degrees
    ///   from the central meridian
    pub fn geodetic_to_tm(&self, longitude: f64, latitude: f64) -> Result<(f64, f64), Error> {
        let max_lat = max_lat();
        if !(-max_lat..=max_lat).contains(&latitude) {
            return Err(Error::LatitudeOutOfRange(latitude));
        }

        if !(-PI..=TAU).contains(&longitude) {
            return Err(Error::LongitudeOutOfRange(longitude));
        }

        let mut dlam = (longitude - self.params.central_meridian).ang_normalize();
        if dlam.abs() > FRAC_PI_2 {
            return Err(Error::LongitudeRange { delta: dlam });
        }

        self.check_distortion(dlam);

        if dlam.abs() < DLAM_EPS {
            dlam = 0.;
        }

        let k0 = self.params.scale_factor;
        let (x, y) = forward_series(&self.ellipsoid, k0, dlam, latitude);

        let easting = self.params.false_easting + x;
        let northing = self.params.false_northing + y - k0 * self.origin_arc;

        Ok((easting, northing))
    }

    /// Inverse of [`TransverseMercator::geodetic_to_tm`]: returns
    /// `(longitude, latitude)` in radians, longitude in `(-pi, pi]`.
    ///
    /// # Errors
    ///
    /// * [`Error::EastingOutOfRange`] / [`Error::NorthingOutOfRange`] if the
    ///   input is further from the false origin than the projection reaches
    /// * [`Error::Convergence`] if the footpoint latitude is at a pole or the
    ///   series produce a non-finite result
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn tm_to_geodetic(&self, easting: f64, northing: f64) -> Result<(f64, f64), Error> {
        let TransverseMercatorParams {
            central_meridian,
            false_easting,
            false_northing,
            scale_factor: k0,
            ..
        } = self.params;

        if easting < false_easting - self.max_easting_delta
            || easting > false_easting + self.max_easting_delta
        {
            return Err(Error::EastingOutOfRange(easting));
        }

        if northing < false_northing - self.max_northing_delta
            || northing > false_northing + self.max_northing_delta
        {
            return Err(Error::NorthingOutOfRange(northing));
        }

        let ellps = &self.ellipsoid;
        let arc = self.origin_arc + (northing - false_northing) / k0;
        let phi = ellps.footpoint_latitude(arc);

        let c = phi.cos();
        if c.abs() < MIN_COS_FOOTPOINT {
            return Err(Error::Convergence(phi));
        }

        let sr = ellps.meridional_radius(phi);
        let sn = ellps.prime_vertical_radius(phi);

        let t = phi.tan();
        let tan2 = t * t;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let eta = ellps.second_eccentricity_squared() * c * c;
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;

        let mut de = easting - false_easting;
        if de.abs() < DE_EPS {
            de = 0.;
        }

        // Latitude
        let t10 = t / (2. * sr * sn * k0.powi(2));
        let t11 = t * (5. + 3. * tan2 + eta - 4. * eta2 - 9. * tan2 * eta)
            / (24. * sr * sn.powi(3) * k0.powi(4));
        let t12 = t * (61. + 90. * tan2 + 46. * eta + 45. * tan4
            - 252. * tan2 * eta - 3. * eta2 + 100. * eta3
            - 66. * tan2 * eta2 - 90. * tan4 * eta + 88. * eta4
            + 225. * tan4 * eta2 + 84. * tan2 * eta3 - 192. * tan2 * eta4)
            / (720. * sr * sn.powi(5) * k0.powi(6));
        let t13 = t * (1385. + 3633. * tan2 + 4095. * tan4 + 1575. * tan6)
            / (40320. * sr * sn.powi(7) * k0.powi(8));

        let mut latitude = phi
            - de.powi(2) * t10
            + de.powi(4) * t11
            - de.powi(6) * t12
            + de.powi(8) * t13;

        // Difference in longitude
        let t14 = 1. / (sn * c * k0);
        let t15 = (1. + 2. * tan2 + eta) / (6. * sn.powi(3) * c * k0.powi(3));
        let t16 = (5. + 6. * eta + 28. * tan2 - 3. * eta2
            + 8. * tan2 * eta + 24. * tan4 - 4. * eta3
            + 4. * tan2 * eta2 + 24. * tan2 * eta3)
            / (120. * sn.powi(5) * c * k0.powi(5));
        let t17 = (61. + 662. * tan2 + 1320. * tan4 + 720. * tan6)
            / (5040. * sn.powi(7) * c * k0.powi(7));

        let dlam = de * t14
            - de.powi(3) * t15
            + de.powi(5) * t16
            - de.powi(7) * t17;

        if !(latitude.is_finite() && dlam.is_finite()) {
            return Err(Error::Convergence(phi));
        }

        let mut longitude = central_meridian + dlam;

        // Fold back over the pole
        if latitude > FRAC_PI_2 {
            latitude = PI - latitude;
            longitude += PI;
        }
        else if latitude < -FRAC_PI_2 {
            latitude = -(latitude + PI);
            longitude += PI;
        }

        self.check_distortion(dlam);

        Ok((longitude.ang_normalize(), latitude))
    }

    fn check_distortion(&self, dlam: f64) {
        if dlam.abs() > TM_DISTORTION_DEG.to_radians() {
            warn!(
                "Longitude {:.4} rad from central meridian {:.4} rad, projection will be distorted",
                dlam,
                self.params.central_meridian,
            );
        }
    }
}

/// The forward series: `(x, y)` where `x` is the scaled easting offset from
/// the central meridian and `y` the scaled northing from the equator.
#[allow(clippy::similar_names)]
fn forward_series(ellps: &Ellipsoid, k0: f64, dlam: f64, latitude: f64) -> (f64, f64) {
    let (s, c) = latitude.sin_cos();
    let c2 = c * c;
    let c3 = c2 * c;
    let c5 = c3 * c2;
    let c7 = c5 * c2;
    let t = latitude.tan();
    let tan2 = t * t;
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;
    let eta = ellps.second_eccentricity_squared() * c2;
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let eta4 = eta3 * eta;

    let sn = ellps.prime_vertical_radius(latitude);

    // Northing
    let t1 = ellps.meridional_arc(latitude) * k0;
    let t2 = sn * s * c * k0 / 2.;
    let t3 = sn * s * c3 * k0 * (5. - tan2 + 9. * eta + 4. * eta2) / 24.;
    let t4 = sn * s * c5 * k0 * (61. - 58. * tan2 + tan4
        + 270. * eta - 330. * tan2 * eta + 445. * eta2
        + 324. * eta3 - 680. * tan2 * eta2 + 88. * eta4
        - 600. * tan2 * eta3 - 192. * tan2 * eta4) / 720.;
    let t5 = sn * s * c7 * k0 * (1385. - 3111. * tan2 + 543. * tan4 - tan6) / 40320.;

    let y = t1
        + dlam.powi(2) * t2
        + dlam.powi(4) * t3
        + dlam.powi(6) * t4
        + dlam.powi(8) * t5;

    // Easting
    let t6 = sn * c * k0;
    let t7 = sn * c3 * k0 * (1. - tan2 + eta) / 6.;
    let t8 = sn * c5 * k0 * (5. - 18. * tan2 + tan4
        + 14. * eta - 58. * tan2 * eta + 13. * eta2 + 4. * eta3
        - 64. * tan2 * eta2 - 24. * tan2 * eta3) / 120.;
    let t9 = sn * c7 * k0 * (61. - 479. * tan2 + 179. * tan4 - tan6) / 5040.;

    let x = dlam * t6
        + dlam.powi(3) * t7
        + dlam.powi(5) * t8
        + dlam.powi(7) * t9;

    (x, y)
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    fn utm33() -> TransverseMercator {
        let params = TransverseMercatorParams::new(0., 15_f64.to_radians(), 500_000., 0., 0.9996);
        TransverseMercator::create(&Ellipsoid::default(), params).unwrap()
    }

    // Ordnance Survey National Grid on the Airy 1830 ellipsoid
    fn national_grid() -> TransverseMercator {
        let params = TransverseMercatorParams::new(
            49_f64.to_radians(),
            (-2_f64).to_radians(),
            400_000.,
            -100_000.,
            0.999_601_271_7,
        );
        TransverseMercator::create(&Ellipsoid::named("AA").unwrap(), params).unwrap()
    }

    #[test]
    fn parameter_validation() {
        let ellps = Ellipsoid::default();
        let create = |lat0: f64, lon0: f64, k0: f64| {
            TransverseMercator::create(&ellps, TransverseMercatorParams::new(lat0, lon0, 0., 0., k0))
        };

        assert!(matches!(create(FRAC_PI_2, 0., 1.), Err(Error::OriginLatitude(_))));
        assert!(matches!(create(-1.6, 0., 1.), Err(Error::OriginLatitude(_))));
        assert!(matches!(create(0., -3.2, 1.), Err(Error::CentralMeridian(_))));
        assert!(matches!(create(0., 6.3, 1.), Err(Error::CentralMeridian(_))));
        assert!(matches!(create(0., 0., 0.), Err(Error::ScaleFactor(_))));
        assert!(matches!(create(0., 0., -0.9996), Err(Error::ScaleFactor(_))));
        assert!(matches!(create(0., 0., 3.5), Err(Error::ScaleFactor(_))));

        assert!(create(0., 0., 0.3).is_ok());
        assert!(create(0., TAU, 3.0).is_ok());
    }

    #[test]
    fn central_meridian_is_normalized() {
        let params = TransverseMercatorParams::new(0., 270_f64.to_radians(), 0., 0., 1.);
        let tm = TransverseMercator::create(&Ellipsoid::default(), params).unwrap();

        assert_float_eq!(tm.params().central_meridian, (-90_f64).to_radians(), abs <= 1e-12);
    }

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let tm = utm33();
        let lat = 58_f64.to_radians();
        let (easting, northing) = tm.geodetic_to_tm(15_f64.to_radians(), lat).unwrap();

        assert_float_eq!(easting, 500_000., abs <= 1e-9);
        assert_float_eq!(northing, 0.9996 * tm.ellipsoid().meridional_arc(lat), abs <= 1e-6);
        assert_float_eq!(northing, 6_428_710.159, abs <= 1e-3);
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let tm = national_grid();
        let (easting, northing) = tm.geodetic_to_tm((-2_f64).to_radians(), 49_f64.to_radians()).unwrap();

        assert_float_eq!(easting, 400_000., abs <= 1e-9);
        assert_float_eq!(northing, -100_000., abs <= 1e-6);
    }

    #[test]
    fn national_grid_reference_point() {
        // Caister water tower, from the Ordnance Survey's guide to coordinate systems
        let tm = national_grid();
        let lat = (52. + 39. / 60. + 27.2531 / 3600_f64).to_radians();
        let lon = (1. + 43. / 60. + 4.5177 / 3600_f64).to_radians();

        let (easting, northing) = tm.geodetic_to_tm(lon, lat).unwrap();
        assert_float_eq!(easting, 651_409.903, abs <= 1e-3);
        assert_float_eq!(northing, 313_177.270, abs <= 1e-3);

        let (lon_back, lat_back) = tm.tm_to_geodetic(651_409.903, 313_177.270).unwrap();
        assert_float_eq!(lon_back, lon, abs <= 1e-9);
        assert_float_eq!(lat_back, lat, abs <= 1e-9);
    }

    #[test]
    fn round_trip() {
        // The national grid reaches the inverse's northing limit south of 45S
        for (tm, south) in [(utm33(), -80), (national_grid(), -40)] {
            let lon0 = tm.params().central_meridian;
            for lat_deg in (south..=80).step_by(5) {
                for dlam_deg in [-3.0, -1.25, 0.0, 0.5, 2.75] {
                    let lat = f64::from(lat_deg).to_radians();
                    let lon = lon0 + f64::to_radians(dlam_deg);

                    let (easting, northing) = tm.geodetic_to_tm(lon, lat).unwrap();
                    let (lon_back, lat_back) = tm.tm_to_geodetic(easting, northing).unwrap();

                    assert_float_eq!(lon_back, lon, abs <= 1e-10);
                    assert_float_eq!(lat_back, lat, abs <= 1e-10);
                }
            }
        }
    }

    #[test]
    fn forward_domain() {
        let tm = utm33();

        assert!(matches!(
            tm.geodetic_to_tm(0.3, 89.995_f64.to_radians()),
            Err(Error::LatitudeOutOfRange(_))
        ));
        assert!(matches!(tm.geodetic_to_tm(-3.5, 0.5), Err(Error::LongitudeOutOfRange(_))));
        assert!(matches!(tm.geodetic_to_tm(6.5, 0.5), Err(Error::LongitudeOutOfRange(_))));
        assert!(matches!(
            tm.geodetic_to_tm(120_f64.to_radians(), 0.5),
            Err(Error::LongitudeRange { .. })
        ));
        // Wraps around the antimeridian
        assert!(matches!(
            tm.geodetic_to_tm(200_f64.to_radians(), 0.5),
            Err(Error::LongitudeRange { .. })
        ));
        // Far from the central meridian, but still accepted
        assert!(tm.geodetic_to_tm(60_f64.to_radians(), 0.5).is_ok());
    }

    #[test]
    fn longitude_above_pi_is_wrapped() {
        let params = TransverseMercatorParams::new(0., 177_f64.to_radians(), 500_000., 0., 0.9996);
        let tm = TransverseMercator::create(&Ellipsoid::default(), params).unwrap();

        let west = tm.geodetic_to_tm((-179_f64).to_radians(), 0.2).unwrap();
        let east = tm.geodetic_to_tm(181_f64.to_radians(), 0.2).unwrap();

        assert_float_eq!(west.0, east.0, abs <= 1e-6);
        assert_float_eq!(west.1, east.1, abs <= 1e-6);
        assert!(west.0 > 500_000.);
    }

    #[test]
    fn inverse_domain() {
        let tm = utm33();

        assert!(matches!(tm.tm_to_geodetic(500_000. + 2.0e7, 0.), Err(Error::EastingOutOfRange(_))));
        assert!(matches!(tm.tm_to_geodetic(500_000. - 2.0e7, 0.), Err(Error::EastingOutOfRange(_))));
        assert!(matches!(tm.tm_to_geodetic(500_000., 1.1e7), Err(Error::NorthingOutOfRange(_))));
        assert!(matches!(tm.tm_to_geodetic(500_000., -1.1e7), Err(Error::NorthingOutOfRange(_))));
    }

    #[test]
    fn pole_is_degenerate() {
        let tm = utm33();
        let pole = 0.9996 * tm.ellipsoid().meridional_arc(FRAC_PI_2);

        assert!(matches!(tm.tm_to_geodetic(600_000., pole), Err(Error::Convergence(_))));
    }

    #[test]
    fn inverse_longitude_is_normalized() {
        let params = TransverseMercatorParams::new(0., 180_f64.to_radians(), 500_000., 0., 0.9996);
        let tm = TransverseMercator::create(&Ellipsoid::default(), params).unwrap();

        let (easting, northing) = tm.geodetic_to_tm((-178_f64).to_radians(), 0.7).unwrap();
        let (lon, lat) = tm.tm_to_geodetic(easting, northing).unwrap();

        assert_float_eq!(lon, (-178_f64).to_radians(), abs <= 1e-10);
        assert_float_eq!(lat, 0.7, abs <= 1e-10);
    }
}
