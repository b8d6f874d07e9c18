//! Irradiance Module
//!
//! Clear-sky beam irradiance on horizontal and tilted surfaces, swept over a
//! day at one-minute resolution and windowed to daylight.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::constants::{
    AIR_ALT_ADJUSTMENT_FACTOR, AIR_SCALE_HEIGHT, CLEAR_SKY_TRANSMITTANCE, OPTICAL_DEPTH,
    SOLAR_CONSTANT,
};
use crate::daytime::DayBoundary;
use crate::error::Result;
use crate::geo::GeoLocation;
use crate::series::TimeSeries;
use crate::solar::{PositionModel, SolarPosition, coarse_elevation};
use crate::time::minute_sweep;

// ===================== HORIZONTAL SURFACE =====================

/// Clear-sky irradiance on a horizontal surface in W/m².
///
/// # Arguments
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees, east positive
/// * `site_altitude` - Site altitude in meters
/// * `instant` - Time of observation
///
/// # Returns
/// Irradiance in (0, 1361] while the sun is up, 0 otherwise
pub fn horizontal_irradiance<T: TimeZone>(
    lat: f64,
    lon: f64,
    site_altitude: f64,
    instant: &DateTime<T>,
) -> f64 {
    let elevation = coarse_elevation(lat, lon, instant);
    if elevation <= 0.0 {
        return 0.0;
    }

    let air_mass = (-site_altitude / AIR_SCALE_HEIGHT).exp() / elevation.to_radians().sin();
    SOLAR_CONSTANT * (-OPTICAL_DEPTH * air_mass).exp()
}

/// Horizontal irradiance for every minute of `date` in the zone `tz`.
pub fn daily_series(location: &GeoLocation, date: NaiveDate, tz: &Tz) -> Result<TimeSeries> {
    Ok(minute_sweep(tz, date)?
        .map(|t| {
            let value =
                horizontal_irradiance(location.latitude, location.longitude, location.altitude, &t);
            (t, value)
        })
        .collect())
}

// ===================== TILTED SURFACE =====================

/// Relative air mass, `None` with the sun at or below the horizon.
pub fn air_mass(solar_altitude: f64) -> Option<f64> {
    if solar_altitude <= 0.0 {
        return None;
    }
    Some(1.0 / solar_altitude.to_radians().sin())
}

/// Fraction of the beam reaching the site.
///
/// An undefined air mass transmits nothing.
pub fn atmospheric_transmission(air_mass: Option<f64>, site_altitude: f64) -> f64 {
    match air_mass {
        Some(am) => {
            let altitude_factor = (AIR_ALT_ADJUSTMENT_FACTOR * site_altitude).exp();
            CLEAR_SKY_TRANSMITTANCE.powf(am * altitude_factor)
        }
        None => 0.0,
    }
}

/// Angle between the sun's rays and the plane normal.
///
/// # Arguments
/// * `sun` - Sun altitude and azimuth in degrees
/// * `tilt` - Plane tilt from horizontal in degrees
/// * `plane_azimuth` - Direction the plane faces in degrees (180 = South)
///
/// # Returns
/// Angle of incidence in degrees (0 = sun perpendicular to the plane)
pub fn angle_of_incidence(sun: &SolarPosition, tilt: f64, plane_azimuth: f64) -> f64 {
    let alt = sun.altitude.to_radians();
    let tilt = tilt.to_radians();
    let delta_az = (sun.azimuth - plane_azimuth).to_radians();

    let cos_aoi = alt.sin() * tilt.cos() + alt.cos() * tilt.sin() * delta_az.cos();
    cos_aoi.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Beam irradiance on a tilted plane in W/m², never negative.
pub fn irradiance_on_plane(
    sun: &SolarPosition,
    site_altitude: f64,
    tilt: f64,
    plane_azimuth: f64,
) -> f64 {
    if sun.altitude <= 0.0 {
        return 0.0;
    }

    let transmission = atmospheric_transmission(air_mass(sun.altitude), site_altitude);
    let cos_aoi = angle_of_incidence(sun, tilt, plane_azimuth).to_radians().cos();

    (SOLAR_CONSTANT * transmission * cos_aoi).max(0.0)
}

/// Plane irradiance for every minute of `date` in the zone `tz`.
pub fn plane_series(
    location: &GeoLocation,
    date: NaiveDate,
    tz: &Tz,
    tilt: f64,
    plane_azimuth: f64,
    model: PositionModel,
) -> Result<TimeSeries> {
    Ok(minute_sweep(tz, date)?
        .map(|t| {
            let sun = model.position(location, &t);
            (t, irradiance_on_plane(&sun, location.altitude, tilt, plane_azimuth))
        })
        .collect())
}

// ===================== DAYLIGHT WINDOW =====================

/// Keep the samples whose time of day lies in `[sunrise, sunset)`.
///
/// The boundary must be expressed in the series' zone. When sunset's time of
/// day precedes sunrise's (the window wraps past midnight) the kept range is
/// `t >= sunrise || t < sunset`. A sun that never sets keeps every sample, one
/// that never rises keeps none.
pub fn window_to_daylight<Z: TimeZone>(
    series: &TimeSeries,
    boundary: &DayBoundary<DateTime<Z>>,
) -> TimeSeries {
    match boundary {
        DayBoundary::RegularDay { sunrise, sunset, .. } => {
            let start = sunrise.time();
            let end = sunset.time();
            series.filter(|t, _| {
                let tod = t.time();
                if start <= end { tod >= start && tod < end } else { tod >= start || tod < end }
            })
        }
        DayBoundary::AllDay { .. } => series.clone(),
        DayBoundary::AllNight { .. } => TimeSeries::new(),
    }
}

// ===================== TESTS =====================
