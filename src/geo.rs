//! Geographic Location Module
//!
//! Observer position on a spherical Earth plus the time zone whose wall clock
//! keys every produced series.

use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ===================== CONSTANTS =====================

/// Lowest practical site altitude in meters (Dead Sea shore)
pub const MIN_ALTITUDE_M: f64 = -500.0;

/// Highest site altitude in meters for which the ISA troposphere formulas hold
pub const MAX_ALTITUDE_M: f64 = 11_000.0;

// ===================== LOCATION =====================

/// Site of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Altitude above mean sea level in meters
    pub altitude: f64,
    /// Latitude in decimal degrees, north positive
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive
    pub longitude: f64,
    /// Time zone of the site's wall clock
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    Tz::UTC
}

impl GeoLocation {
    /// Create a validated location.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLocation`] if a coordinate is out of range
    pub fn new(altitude: f64, latitude: f64, longitude: f64, timezone: Tz) -> Result<Self> {
        let location = Self { altitude, latitude, longitude, timezone };
        location.validate()?;
        Ok(location)
    }

    /// Check the coordinate invariants.
    pub fn validate(&self) -> Result<()> {
        check_latitude(self.latitude).map_err(Error::InvalidLocation)?;
        check_longitude(self.longitude).map_err(Error::InvalidLocation)?;
        check_altitude(self.altitude).map_err(Error::InvalidLocation)?;
        Ok(())
    }

    /// Same site, different wall clock.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// UTC offset of the site's time zone at the given instant, in hours.
    pub fn utc_offset_hours<T: TimeZone>(&self, instant: &DateTime<T>) -> f64 {
        let local = instant.with_timezone(&self.timezone);
        local.offset().fix().local_minus_utc() as f64 / 3600.0
    }
}

// ===================== RANGE CHECKS =====================

pub fn check_latitude(v: f64) -> std::result::Result<f64, String> {
    if !(-90.0..=90.0).contains(&v) {
        return Err(format!("Latitude must be between -90 and 90, got {}", v));
    }
    Ok(v)
}

pub fn check_longitude(v: f64) -> std::result::Result<f64, String> {
    if !(-180.0..=180.0).contains(&v) {
        return Err(format!("Longitude must be between -180 and 180, got {}", v));
    }
    Ok(v)
}

pub fn check_altitude(v: f64) -> std::result::Result<f64, String> {
    if !v.is_finite() || !(MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&v) {
        return Err(format!(
            "Altitude must be between {} and {} meters, got {}",
            MIN_ALTITUDE_M, MAX_ALTITUDE_M, v
        ));
    }
    Ok(v)
}

// ===================== TESTS =====================
