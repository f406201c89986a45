//! The reference ellipsoid and the meridian geometry derived from it.

use crate::{
    constants::{MAX_INV_F, MIN_INV_F, WGS84_A, WGS84_F},
    utility::polyval,
    Error,
};

// (code, name, semi-major axis, inverse flattening)
#[allow(clippy::unreadable_literal)]
const ELLIPSOIDS: [(&str, &str, f64, f64); 8] = [
    ("WE", "wgs84", 6_378_137.0, 298.257223563),
    ("RF", "grs80", 6_378_137.0, 298.257222101),
    ("CC", "clarke1866", 6_378_206.4, 294.9786982),
    ("CD", "clarke1880", 6_378_249.145, 293.465),
    ("BR", "bessel1841", 6_377_397.155, 299.1528128),
    ("BN", "bessel1841_namibia", 6_377_483.865, 299.1528128),
    ("IN", "intl1924", 6_378_388.0, 297.0),
    ("AA", "airy1830", 6_377_563.396, 299.3249646),
];

// Meridional arc coefficients A'..E' / a, polynomials in n (highest power first)
const ARC_COEFF: [[f64; 6]; 5] = [
    [-81. / 64., 81. / 64., -5. / 4., 5. / 4., -1., 1.],
    [55. / 64., -7. / 8., 7. / 8., -1., 1., 0.],
    [-3. / 4., 3. / 4., -1., 1., 0., 0.],
    [11. / 16., -1., 1., 0., 0., 0.],
    [-1., 1., 0., 0., 0., 0.],
];
const ARC_SCALE: [f64; 5] = [1., 3. / 2., 15. / 16., 35. / 48., 315. / 512.];

// Footpoint latitude coefficients, polynomials in n (highest power first)
const FOOT_COEFF: [&[f64]; 4] = [
    &[-27. / 32., 0., 3. / 2., 0.],
    &[-55. / 32., 0., 21. / 16., 0., 0.],
    &[151. / 96., 0., 0., 0.],
    &[1097. / 512., 0., 0., 0., 0.],
];

/// A biaxial reference ellipsoid, validated on construction.
///
/// Every quantity the Transverse Mercator series need is derived once in
/// [`Ellipsoid::create`], so changing the ellipsoid means building a new
/// value; there is no cached state to invalidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
    e2: f64,
    n: f64,
    arc: [f64; 5],
    foot: [f64; 4],
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::new(WGS84_A, WGS84_F)
    }
}

impl Ellipsoid {
    /// Internal-only constructor that doesn't check the parameters
    pub(crate) fn new(a: f64, f: f64) -> Ellipsoid {
        let e2 = f * (2. - f);
        let n = f / (2. - f);

        let mut arc = [0_f64; 5];
        for (i, coeff) in arc.iter_mut().enumerate() {
            *coeff = a * ARC_SCALE[i] * polyval(&ARC_COEFF[i], n);
        }

        let mut foot = [0_f64; 4];
        for (i, coeff) in foot.iter_mut().enumerate() {
            *coeff = polyval(FOOT_COEFF[i], n);
        }

        Self { a, f, e2, n, arc, foot }
    }

    /// Creates an ellipsoid from its semi-major axis (meters) and flattening.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSemiMajorAxis`] if `a <= 0` and
    /// [`Error::InvalidFlattening`] if `1/f` is outside `[250, 350]`.
    ///
    /// # Usage
    ///
    /// ```
    /// use geoproj::{Ellipsoid, Error};
    ///
    /// assert!(Ellipsoid::create(6_378_137.0, 1.0 / 298.257).is_ok());
    /// assert!(matches!(
    ///     Ellipsoid::create(6_378_137.0, 1.0 / 200.0),
    ///     Err(Error::InvalidFlattening(_)),
    /// ));
    /// ```
    pub fn create(a: f64, f: f64) -> Result<Ellipsoid, Error> {
        if !(a > 0. && a.is_finite()) {
            return Err(Error::InvalidSemiMajorAxis(a));
        }

        let inv_f = 1. / f;
        if !(MIN_INV_F..=MAX_INV_F).contains(&inv_f) {
            return Err(Error::InvalidFlattening(inv_f));
        }

        Ok(Ellipsoid::new(a, f))
    }

    /// Looks up a predefined ellipsoid by its two letter code (`"WE"`,
    /// `"CC"`, ...) or by name (`"wgs84"`, `"clarke1866"`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEllipsoid`] if nothing matches.
    ///
    /// ```
    /// use geoproj::Ellipsoid;
    ///
    /// let bessel = Ellipsoid::named("BR").unwrap();
    /// assert_eq!(bessel.semi_major_axis(), 6_377_397.155);
    /// assert_eq!(bessel, Ellipsoid::named("bessel1841").unwrap());
    /// ```
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        ELLIPSOIDS
            .iter()
            .find(|(code, long_name, _, _)| *code == name || long_name.eq_ignore_ascii_case(name))
            .map(|&(_, _, a, inv_f)| Ellipsoid::new(a, 1. / inv_f))
            .ok_or_else(|| Error::UnknownEllipsoid(name.to_string()))
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub fn flattening(&self) -> f64 {
        self.f
    }

    pub fn inverse_flattening(&self) -> f64 {
        1. / self.f
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.a * (1. - self.f)
    }

    /// First eccentricity squared, *e²*
    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    /// Second eccentricity squared, *e'² = e² / (1 - e²)*
    pub fn second_eccentricity_squared(&self) -> f64 {
        1. / (1. - self.e2) - 1.
    }

    /// Third flattening, *n = (a - b) / (a + b)*
    pub fn third_flattening(&self) -> f64 {
        self.n
    }

    /// Radius of curvature in the prime vertical, *ν*
    pub fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        self.a / self.curvature_denom(latitude)
    }

    /// Radius of curvature in the meridian, *ρ*
    pub fn meridional_radius(&self, latitude: f64) -> f64 {
        self.a * (1. - self.e2) / self.curvature_denom(latitude).powi(3)
    }

    fn curvature_denom(&self, latitude: f64) -> f64 {
        (1. - self.e2 * latitude.sin().powi(2)).sqrt()
    }

    /// Length of the meridian arc from the equator to `latitude`.
    pub fn meridional_arc(&self, latitude: f64) -> f64 {
        let [ap, bp, cp, dp, ep] = self.arc;

        ap * latitude
            - bp * (2. * latitude).sin()
            + cp * (4. * latitude).sin()
            - dp * (6. * latitude).sin()
            + ep * (8. * latitude).sin()
    }

    /// The latitude whose meridian arc equals `arc`. Closed form, inverse of
    /// [`Ellipsoid::meridional_arc`] to the same order in *n*.
    pub fn footpoint_latitude(&self, arc: f64) -> f64 {
        let mu = arc / self.arc[0];

        mu + self
            .foot
            .iter()
            .zip(1..)
            .map(|(coeff, k)| coeff * (f64::from(2 * k) * mu).sin())
            .sum::<f64>()
    }
}
