//! Projection configuration: the reference ellipsoid and the UTM zone
//! override.
//!
//! [`ProjectionConfig`] is a plain value; pass it around to convert with a
//! specific ellipsoid. The free functions in this module manage one
//! process-wide instance used by [`crate::convert_geodetic_to_utm`] and
//! [`crate::convert_utm_to_geodetic`]. Writers validate first and then swap in
//! a complete new value, so a reader always sees a consistent configuration.

use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use log::debug;

use crate::{ellipsoid::Ellipsoid, utm::zonespec, Error};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectionConfig {
    pub(crate) ellipsoid: Ellipsoid,
    pub(crate) zone_override: i32,
}

impl ProjectionConfig {
    /// Creates a configuration for `ellipsoid` without a zone override.
    pub fn new(ellipsoid: Ellipsoid) -> ProjectionConfig {
        Self {
            ellipsoid,
            zone_override: zonespec::NO_OVERRIDE,
        }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// The UTM zone override, `0` when there is none.
    pub fn zone_override(&self) -> i32 {
        self.zone_override
    }

    pub fn with_ellipsoid(self, ellipsoid: Ellipsoid) -> ProjectionConfig {
        Self { ellipsoid, ..self }
    }

    /// Returns a copy forcing UTM zone selection toward `zone`; `0` clears the
    /// override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZoneOverride`] if `zone` is outside `[0, 60]`.
    ///
    /// ```
    /// use geoproj::ProjectionConfig;
    ///
    /// let config = ProjectionConfig::default().with_zone_override(32).unwrap();
    /// assert_eq!(config.zone_override(), 32);
    /// assert!(config.with_zone_override(61).is_err());
    /// ```
    pub fn with_zone_override(self, zone: i32) -> Result<ProjectionConfig, Error> {
        if !(zonespec::NO_OVERRIDE..=zonespec::MAXZONE).contains(&zone) {
            return Err(Error::InvalidZoneOverride(zone));
        }

        Ok(Self { zone_override: zone, ..self })
    }
}

lazy_static! {
    static ref CONFIG: RwLock<Arc<ProjectionConfig>> = RwLock::new(Arc::default());
}

/// A snapshot of the process-wide configuration.
pub fn current_config() -> Arc<ProjectionConfig> {
    // The lock only ever guards a complete value, so a poisoned lock is still usable
    Arc::clone(&CONFIG.read().unwrap_or_else(PoisonError::into_inner))
}

fn update<F>(f: F) -> Result<(), Error>
where
    F: FnOnce(ProjectionConfig) -> Result<ProjectionConfig, Error>,
{
    let mut guard = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    let config = f(**guard)?;

    debug!("Projection configuration replaced: {config:?}");
    *guard = Arc::new(config);

    Ok(())
}

/// Sets the process-wide ellipsoid.
///
/// # Errors
///
/// See [`Ellipsoid::create`]; the configuration is unchanged on error.
pub fn set_ellipsoid_parameters(semi_major_axis: f64, flattening: f64) -> Result<(), Error> {
    let ellipsoid = Ellipsoid::create(semi_major_axis, flattening)?;
    update(|config| Ok(config.with_ellipsoid(ellipsoid)))
}

/// Sets the process-wide ellipsoid to a predefined one, see [`Ellipsoid::named`].
///
/// # Errors
///
/// Returns [`Error::UnknownEllipsoid`] if `name` is not a known ellipsoid.
pub fn set_ellipsoid(name: &str) -> Result<(), Error> {
    let ellipsoid = Ellipsoid::named(name)?;
    update(|config| Ok(config.with_ellipsoid(ellipsoid)))
}

/// Sets the process-wide UTM zone override, `0` clears it.
///
/// # Errors
///
/// Returns [`Error::InvalidZoneOverride`] if `zone` is outside `[0, 60]`.
pub fn set_zone_override(zone: i32) -> Result<(), Error> {
    update(|config| config.with_zone_override(zone))
}

/// The process-wide UTM zone override, `0` when there is none.
pub fn zone_override() -> i32 {
    current_config().zone_override
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_override_range() {
        let config = ProjectionConfig::default();

        assert_eq!(config.zone_override(), 0);
        assert_eq!(config.with_zone_override(-1), Err(Error::InvalidZoneOverride(-1)));
        assert_eq!(config.with_zone_override(61), Err(Error::InvalidZoneOverride(61)));
        assert_eq!(config.with_zone_override(60).unwrap().zone_override(), 60);
        assert_eq!(
            config.with_zone_override(12).and_then(|c| c.with_zone_override(0)),
            Ok(config)
        );
    }

    #[test]
    fn builders_keep_other_fields() {
        let clarke = Ellipsoid::named("CC").unwrap();
        let config = ProjectionConfig::default()
            .with_zone_override(5)
            .unwrap()
            .with_ellipsoid(clarke);

        assert_eq!(config.zone_override(), 5);
        assert_eq!(*config.ellipsoid(), clarke);
        assert_eq!(ProjectionConfig::new(clarke).zone_override(), 0);
    }
}
