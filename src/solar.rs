//! Solar Position Calculation Module
//!
//! Two sun-position strategies behind one capability:
//!
//! - **Coarse**: declination from a sine of the day of year, hour angle from the
//!   local clock. Cheap, good to about a degree, used by the irradiance sweeps.
//! - **Ephemeris**: Meeus low-precision solar coordinates (Julian day, equation of
//!   the centre, nutation-corrected obliquity, sidereal time) with an atmospheric
//!   refraction correction. Good to about 0.01° between 1801 and 2099.
//!
//! [`PositionModel`] selects between them.

use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike, Utc};

use crate::constants::{
    APPARENT_LONG_CORR_1, APPARENT_LONG_CORR_2, C1, C1_RATE_1, C1_RATE_2, C2, C2_RATE, C3,
    DAYS_PER_CENTURY, DAYS_PER_YEAR, EARTH_AXIS_TILT, ECCENTRICITY, ECCENTRICITY_RATE_1,
    ECCENTRICITY_RATE_2, EPHEMERIS_DECIMALS, EQUINOX_DAY_OFFSET, GMST, GMST_COEFF_1, GMST_COEFF_2,
    GMST_RATE, GRAVITY_TIMES_MOLAR, J2000, JULIAN_MONTH_FACTOR, JULIAN_OFFSET, JULIAN_YEAR_FACTOR,
    KELVIN_OFFSET, LAPSE_RATE, MEAN_ANOMALY, MEAN_ANOMALY_RATE, MEAN_ANOMALY_RATE_CORR,
    MEAN_LONG_SUN, MEAN_LONG_SUN_RATE, MEAN_LONG_SUN_RATE_CORR, OBLIQUITY_CORR, OBLIQUITY_J2000,
    OBLIQUITY_RATE_1, OBLIQUITY_RATE_2, OBLIQUITY_RATE_3, OMEGA, OMEGA_RATE,
    REFRACTION_MIN_ALTITUDE, SEA_LEVEL_PRESSURE, SEA_LEVEL_TEMP_K, SEMI_MAJOR_AXIS_AU,
};
use crate::daytime::{rev180, revolution};
use crate::geo::GeoLocation;

// ===================== TYPES =====================

/// Sun position as seen from the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Altitude above the horizon in degrees
    pub altitude: f64,
    /// Azimuth in degrees (0 = North, 90 = East, 180 = South)
    pub azimuth: f64,
}

/// Full output of the precise ephemeris, truncated to four decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisPosition {
    pub julian_day: f64,
    /// Apparent right ascension in degrees
    pub right_ascension: f64,
    /// Apparent declination in degrees
    pub declination: f64,
    /// Local hour angle in degrees, [0, 360)
    pub hour_angle: f64,
    /// Altitude without refraction in degrees
    pub geometric_altitude: f64,
    /// Refraction correction in degrees
    pub refraction: f64,
    /// Apparent altitude (geometric + refraction) in degrees
    pub altitude: f64,
    /// Azimuth in degrees (0 = North, 90 = East)
    pub azimuth: f64,
    /// Earth–Sun distance in AU
    pub distance: f64,
}

impl From<EphemerisPosition> for SolarPosition {
    fn from(p: EphemerisPosition) -> Self {
        SolarPosition { altitude: p.altitude, azimuth: p.azimuth }
    }
}

// ===================== STRATEGY =====================

/// Sun-position strategy used by the irradiance sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionModel {
    /// Declination/hour-angle approximation
    #[default]
    Coarse,
    /// Meeus ephemeris with refraction; `temperature` in °C, ISA value if `None`
    Ephemeris { temperature: Option<f64> },
}

impl PositionModel {
    /// Sun position at `instant` for the observer at `location`.
    pub fn position<T: TimeZone>(
        &self,
        location: &GeoLocation,
        instant: &DateTime<T>,
    ) -> SolarPosition {
        match self {
            PositionModel::Coarse => {
                coarse_position(location.latitude, location.longitude, instant)
            }
            PositionModel::Ephemeris { temperature } => {
                ephemeris_position(instant, location, *temperature).into()
            }
        }
    }
}

// ===================== COARSE MODEL =====================

/// Solar declination in degrees from the day of year.
pub fn declination(day_of_year: u32) -> f64 {
    let angle =
        2.0 * std::f64::consts::PI / DAYS_PER_YEAR * (day_of_year as f64 - EQUINOX_DAY_OFFSET);
    EARTH_AXIS_TILT * angle.sin()
}

/// Hour angle in degrees, positive in the afternoon.
///
/// Solar time is the wall-clock hour corrected by the distance between the
/// observer's longitude and the meridian of the instant's UTC offset.
pub fn hour_angle<T: TimeZone>(lon: f64, instant: &DateTime<T>) -> f64 {
    let offset_hours = instant.offset().fix().local_minus_utc() as f64 / 3600.0;
    let local_hours =
        instant.hour() as f64 + instant.minute() as f64 / 60.0 + instant.second() as f64 / 3600.0;

    let solar_time = local_hours + 4.0 * (lon - 15.0 * offset_hours) / 60.0;
    15.0 * (solar_time - 12.0)
}

/// Sun elevation in degrees from the coarse declination model.
///
/// # Arguments
/// * `lat` - Latitude in degrees
/// * `lon` - Longitude in degrees, east positive
/// * `instant` - Time of observation, in any zone
pub fn coarse_elevation<T: TimeZone>(lat: f64, lon: f64, instant: &DateTime<T>) -> f64 {
    let decl = declination(instant.ordinal());
    let ha = hour_angle(lon, instant);
    asind(sind(lat) * sind(decl) + cosd(lat) * cosd(decl) * cosd(ha))
}

/// Sun altitude and azimuth from the coarse declination model.
pub fn coarse_position<T: TimeZone>(lat: f64, lon: f64, instant: &DateTime<T>) -> SolarPosition {
    let decl = declination(instant.ordinal());
    let ha = hour_angle(lon, instant);
    let altitude = asind(sind(lat) * sind(decl) + cosd(lat) * cosd(decl) * cosd(ha));

    // Azimuth is undefined with the sun at the zenith or the observer at a pole
    let denom = cosd(altitude) * cosd(lat);
    let mut azimuth = if denom.abs() < 1e-12 {
        180.0
    } else {
        ((sind(decl) - sind(altitude) * sind(lat)) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    };

    // Afternoon branch
    if rev180(ha) > 0.0 {
        azimuth = revolution(360.0 - azimuth);
    }

    SolarPosition { altitude, azimuth }
}

// ===================== PRECISE EPHEMERIS =====================

/// Julian day of an instant (Gregorian calendar, UT).
pub fn julian_day<T: TimeZone>(instant: &DateTime<T>) -> f64 {
    let utc = instant.with_timezone(&Utc);

    let mut year = utc.year() as f64;
    let mut month = utc.month() as f64;
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }

    let day = utc.day() as f64
        + (utc.hour() as f64
            + utc.minute() as f64 / 60.0
            + (utc.second() as f64 + utc.nanosecond() as f64 * 1e-9) / 3600.0)
            / 24.0;

    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (JULIAN_YEAR_FACTOR * (year + 4716.0)).floor() + (JULIAN_MONTH_FACTOR * (month + 1.0)).floor()
        + day
        + b
        - JULIAN_OFFSET
}

/// Sun position from the precise ephemeris.
///
/// # Arguments
/// * `instant` - Time of observation, in any zone
/// * `location` - Observer position; altitude drives the pressure estimate
/// * `temperature` - Air temperature in °C, ISA temperature at the site if `None`
///
/// # Returns
/// All intermediate coordinates, truncated to four decimals
pub fn ephemeris_position<T: TimeZone>(
    instant: &DateTime<T>,
    location: &GeoLocation,
    temperature: Option<f64>,
) -> EphemerisPosition {
    let jd = julian_day(instant);
    let t = (jd - J2000) / DAYS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;

    // Mean elements
    let l0 = revolution(MEAN_LONG_SUN + MEAN_LONG_SUN_RATE * t + MEAN_LONG_SUN_RATE_CORR * t2);
    let m = revolution(MEAN_ANOMALY + MEAN_ANOMALY_RATE * t - MEAN_ANOMALY_RATE_CORR * t2);
    let e = ECCENTRICITY - ECCENTRICITY_RATE_1 * t - ECCENTRICITY_RATE_2 * t2;

    // Equation of the centre
    let c = (C1 - C1_RATE_1 * t - C1_RATE_2 * t2) * sind(m)
        + (C2 - C2_RATE * t) * sind(2.0 * m)
        + C3 * sind(3.0 * m);
    let true_longitude = l0 + c;
    let true_anomaly = m + c;

    // Apparent longitude and true obliquity
    let omega = OMEGA - OMEGA_RATE * t;
    let lambda = true_longitude - APPARENT_LONG_CORR_1 - APPARENT_LONG_CORR_2 * sind(omega);
    let eps0 = OBLIQUITY_J2000
        - (OBLIQUITY_RATE_1 * t + OBLIQUITY_RATE_2 * t2 - OBLIQUITY_RATE_3 * t3) / 3600.0;
    let eps = eps0 + OBLIQUITY_CORR * cosd(omega);

    let ra = revolution(atan2d(cosd(eps) * sind(lambda), cosd(lambda)));
    let decl = asind(sind(eps) * sind(lambda));

    // Sidereal time and hour angle
    let gmst = revolution(GMST + GMST_RATE * (jd - J2000) + GMST_COEFF_1 * t2 - t3 / GMST_COEFF_2);
    let lst = revolution(gmst + location.longitude);
    let ha = revolution(lst - ra);

    let lat = location.latitude;
    let geometric = asind(sind(lat) * sind(decl) + cosd(lat) * cosd(decl) * cosd(ha));
    let azimuth =
        revolution(atan2d(sind(ha), cosd(ha) * sind(lat) - tand(decl) * cosd(lat)) + 180.0);

    let pressure = atmospheric_pressure(location.altitude);
    let temperature = temperature.unwrap_or_else(|| isa_temperature(location.altitude));
    let refraction = refraction(geometric, pressure, temperature);

    let distance = SEMI_MAJOR_AXIS_AU * (1.0 - e * e) / (1.0 + e * cosd(true_anomaly));

    EphemerisPosition {
        julian_day: truncate(jd, EPHEMERIS_DECIMALS),
        right_ascension: truncate(ra, EPHEMERIS_DECIMALS),
        declination: truncate(decl, EPHEMERIS_DECIMALS),
        hour_angle: truncate(ha, EPHEMERIS_DECIMALS),
        geometric_altitude: truncate(geometric, EPHEMERIS_DECIMALS),
        refraction: truncate(refraction, EPHEMERIS_DECIMALS),
        altitude: truncate(geometric + refraction, EPHEMERIS_DECIMALS),
        azimuth: truncate(azimuth, EPHEMERIS_DECIMALS),
        distance: truncate(distance, EPHEMERIS_DECIMALS),
    }
}

// ===================== ATMOSPHERE =====================

/// ISA air pressure in hPa at the given altitude.
pub fn atmospheric_pressure(altitude_m: f64) -> f64 {
    SEA_LEVEL_PRESSURE
        * (1.0 - LAPSE_RATE * altitude_m / SEA_LEVEL_TEMP_K).powf(GRAVITY_TIMES_MOLAR / LAPSE_RATE)
}

/// ISA air temperature in °C at the given altitude.
pub fn isa_temperature(altitude_m: f64) -> f64 {
    SEA_LEVEL_TEMP_K - LAPSE_RATE * altitude_m - KELVIN_OFFSET
}

/// Atmospheric refraction in degrees for a geometric altitude (Sæmundsson).
///
/// Zero at or below −1°, where the empirical formula no longer holds.
///
/// # Arguments
/// * `geometric_altitude` - True altitude in degrees
/// * `pressure` - Air pressure in hPa
/// * `temperature` - Air temperature in °C
pub fn refraction(geometric_altitude: f64, pressure: f64, temperature: f64) -> f64 {
    if geometric_altitude <= REFRACTION_MIN_ALTITUDE {
        return 0.0;
    }

    let h = geometric_altitude;
    let arcmin = 1.02 / tand(h + 10.3 / (h + 5.11));
    arcmin / 60.0 * (pressure / 1010.0) * (283.0 / (KELVIN_OFFSET + temperature))
}

// ===================== HELPER FUNCTIONS =====================

/// Drop (not round) everything after `decimals` places.
pub fn truncate(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).trunc() / factor
}

fn sind(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cosd(x: f64) -> f64 {
    x.to_radians().cos()
}

fn tand(x: f64) -> f64 {
    x.to_radians().tan()
}

fn asind(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin().to_degrees()
}

fn atan2d(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::Utc;
    use chrono_tz::Europe::Berlin;
    use chrono_tz::Tz;

    fn freiburg() -> GeoLocation {
        GeoLocation::new(200.0, 48.105, 7.909, Berlin).unwrap()
    }

    #[test]
    fn test_declination_extremes() {
        assert_abs_diff_eq!(declination(81), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(declination(172), 23.44, epsilon = 0.01);
        assert_abs_diff_eq!(declination(355), -23.44, epsilon = 0.05);
    }

    #[test]
    fn test_coarse_zenith_at_equinox() {
        // Day 81 of 2023 is March 22; sun overhead at the equator at noon UT
        let noon = Utc.with_ymd_and_hms(2023, 3, 22, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(coarse_elevation(0.0, 0.0, &noon), 90.0, epsilon = 1e-9);
        let pos = coarse_position(0.0, 0.0, &noon);
        assert!(pos.azimuth.is_finite());
    }

    #[test]
    fn test_coarse_offset_applied_once() {
        // The same instant seen through different zones yields the same position
        let utc = Utc.with_ymd_and_hms(2025, 6, 21, 10, 30, 0).unwrap();
        let berlin = utc.with_timezone(&Berlin);
        let tokyo = utc.with_timezone(&Tz::Asia__Tokyo);

        let a = coarse_position(48.105, 7.909, &utc);
        let b = coarse_position(48.105, 7.909, &berlin);
        let c = coarse_position(48.105, 7.909, &tokyo);

        assert_abs_diff_eq!(a.altitude, b.altitude, epsilon = 1e-9);
        assert_abs_diff_eq!(a.azimuth, b.azimuth, epsilon = 1e-9);
        assert_abs_diff_eq!(a.altitude, c.altitude, epsilon = 1e-9);
    }

    #[test]
    fn test_coarse_azimuth_branches() {
        let morning = Utc.with_ymd_and_hms(2025, 6, 21, 9, 0, 0).unwrap();
        let afternoon = Utc.with_ymd_and_hms(2025, 6, 21, 15, 0, 0).unwrap();

        let am = coarse_position(48.0, 0.0, &morning);
        let pm = coarse_position(48.0, 0.0, &afternoon);

        assert!(am.azimuth > 90.0 && am.azimuth < 180.0, "morning azimuth {}", am.azimuth);
        assert!(pm.azimuth > 180.0 && pm.azimuth < 270.0, "afternoon azimuth {}", pm.azimuth);
        assert_abs_diff_eq!(am.altitude, pm.altitude, epsilon = 1e-9);
        assert_abs_diff_eq!(am.azimuth + pm.azimuth, 360.0, epsilon = 1e-9);
        assert_abs_diff_eq!(am.azimuth, 108.41, epsilon = 0.01);
    }

    #[test]
    fn test_coarse_azimuth_after_local_midnight() {
        // Solar time past 24h must still land on the morning (eastern) side
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 23, 0, 0).unwrap();
        let pos = coarse_position(69.65, 150.0, &t);
        assert!(pos.azimuth < 180.0, "azimuth {}", pos.azimuth);
    }

    #[test]
    fn test_coarse_pole_has_finite_azimuth() {
        let t = Utc.with_ymd_and_hms(2025, 6, 21, 12, 0, 0).unwrap();
        let pos = coarse_position(90.0, 0.0, &t);
        assert!(pos.azimuth.is_finite());
        assert_abs_diff_eq!(pos.altitude, declination(172), epsilon = 1e-9);
    }

    #[test]
    fn test_julian_day() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(julian_day(&j2000), 2_451_545.0);

        let t = Utc.with_ymd_and_hms(1987, 4, 10, 0, 0, 0).unwrap();
        assert_eq!(julian_day(&t), 2_446_895.5);

        // Sputnik 1 launch
        let t = Utc.with_ymd_and_hms(1957, 10, 4, 19, 26, 24).unwrap();
        assert_abs_diff_eq!(julian_day(&t), 2_436_116.31, epsilon = 1e-6);

        // Zone does not matter
        let local = j2000.with_timezone(&Berlin);
        assert_eq!(julian_day(&local), 2_451_545.0);
    }

    #[test]
    fn test_ephemeris_meeus_example() {
        // Meeus, Astronomical Algorithms, example 25.a (1992 October 13.0)
        let t = Utc.with_ymd_and_hms(1992, 10, 13, 0, 0, 0).unwrap();
        let site = GeoLocation::new(0.0, 0.0, 0.0, Tz::UTC).unwrap();
        let pos = ephemeris_position(&t, &site, None);

        assert_abs_diff_eq!(pos.right_ascension, 198.38083, epsilon = 1e-3);
        assert_abs_diff_eq!(pos.declination, -7.78507, epsilon = 1e-3);
        assert_abs_diff_eq!(pos.distance, 0.99766, epsilon = 1e-4);
    }

    #[test]
    fn test_ephemeris_freiburg_winter_solstice() {
        // Reference: PSA (Blanco-Muriel 2001) with Bennett refraction at
        // ISA pressure and temperature for 200 m: altitude 10.7058°, azimuth 215.3976°
        let t = Berlin.with_ymd_and_hms(2025, 12, 21, 15, 0, 0).unwrap();
        let pos = ephemeris_position(&t, &freiburg(), None);

        assert_abs_diff_eq!(pos.altitude, 10.7058, epsilon = 0.05);
        assert_abs_diff_eq!(pos.azimuth, 215.3976, epsilon = 0.05);
        assert!(pos.refraction > 0.07 && pos.refraction < 0.1);
        assert_abs_diff_eq!(pos.altitude, pos.geometric_altitude + pos.refraction, epsilon = 2e-4);
        assert!(pos.distance > 0.983 && pos.distance < 0.985);
    }

    #[test]
    fn test_ephemeris_output_truncated() {
        let t = Berlin.with_ymd_and_hms(2025, 12, 21, 15, 0, 0).unwrap();
        let pos = ephemeris_position(&t, &freiburg(), None);
        for v in [pos.right_ascension, pos.declination, pos.altitude, pos.azimuth] {
            let scaled = v * 1e4;
            assert_abs_diff_eq!(scaled, scaled.round(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ephemeris_below_horizon_has_no_refraction() {
        let t = Berlin.with_ymd_and_hms(2025, 12, 21, 23, 0, 0).unwrap();
        let pos = ephemeris_position(&t, &freiburg(), None);
        assert!(pos.geometric_altitude < -1.0);
        assert_eq!(pos.refraction, 0.0);
        assert_eq!(pos.altitude, pos.geometric_altitude);
    }

    #[test]
    fn test_models_agree_roughly() {
        let site = freiburg();
        let t = Berlin.with_ymd_and_hms(2025, 12, 21, 15, 0, 0).unwrap();

        let coarse = PositionModel::Coarse.position(&site, &t);
        let precise = PositionModel::Ephemeris { temperature: None }.position(&site, &t);

        assert_abs_diff_eq!(coarse.altitude, precise.altitude, epsilon = 1.0);
        assert_abs_diff_eq!(coarse.azimuth, precise.azimuth, epsilon = 1.0);
        assert_eq!(PositionModel::default(), PositionModel::Coarse);
    }

    #[test]
    fn test_atmospheric_pressure() {
        assert_relative_eq!(atmospheric_pressure(0.0), 1013.25);
        assert_abs_diff_eq!(atmospheric_pressure(200.0), 989.45, epsilon = 0.01);
        assert!(atmospheric_pressure(3000.0) < 710.0);
        assert_abs_diff_eq!(isa_temperature(0.0), 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(isa_temperature(1000.0), 8.5, epsilon = 1e-9);
    }

    #[test]
    fn test_refraction() {
        // About 29 arcmin at the horizon under standard conditions
        let horizon = refraction(0.0, 1013.25, 15.0);
        assert!(horizon > 0.45 && horizon < 0.5, "horizon refraction {}", horizon);

        // Under one arcminute at 45°
        assert!(refraction(45.0, 1013.25, 15.0) < 1.0 / 60.0);

        // Cold dense air bends more
        assert!(refraction(5.0, 1013.25, -20.0) > refraction(5.0, 1013.25, 30.0));

        assert_eq!(refraction(-1.0, 1013.25, 15.0), 0.0);
        assert_eq!(refraction(-5.0, 1013.25, 15.0), 0.0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(1.23456789, 4), 1.2345);
        assert_eq!(truncate(-1.23456789, 4), -1.2345);
        assert_eq!(truncate(2.0, 4), 2.0);
    }
}
