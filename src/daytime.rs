//! Day Boundary Module
//!
//! Sunrise, sunset and day length for a calendar date, after Paul Schlyter's
//! public-domain SUNRISET algorithm. Valid for dates between 1801 and 2099.
//!
//! The solver works in UT hours relative to 0h UT of the requested date and
//! never fails for circumpolar conditions: a sun that stays above or below the
//! requested altitude all day is reported as [`DayBoundary::AllDay`] or
//! [`DayBoundary::AllNight`].

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::constants::{
    ASTRONOMICAL_TWILIGHT_ALTITUDE, CIVIL_TWILIGHT_ALTITUDE, NAUTICAL_TWILIGHT_ALTITUDE,
    SUN_RADIUS_AT_1AU, SUNRISE_SUNSET_ALTITUDE, SUNRISET_ECCENTRICITY,
    SUNRISET_ECCENTRICITY_RATE, SUNRISET_MEAN_ANOMALY, SUNRISET_MEAN_ANOMALY_RATE,
    SUNRISET_OBLIQUITY, SUNRISET_OBLIQUITY_RATE, SUNRISET_PERIHELION, SUNRISET_PERIHELION_RATE,
};
use crate::time::hours_to_duration;

// ===================== HORIZON =====================

/// Sun altitude the solver searches the crossing for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Horizon {
    /// Visual sunrise/sunset of the upper limb (−35′)
    #[default]
    SunriseSunset,
    /// Sun centre at −6°
    CivilTwilight,
    /// Sun centre at −12°
    NauticalTwilight,
    /// Sun centre at −18°
    AstronomicalTwilight,
    /// Any altitude in degrees, optionally corrected to the upper limb
    Custom { altitude: f64, upper_limb: bool },
}

impl Horizon {
    /// Target altitude in degrees before any limb correction.
    pub fn altitude(&self) -> f64 {
        match self {
            Horizon::SunriseSunset => SUNRISE_SUNSET_ALTITUDE,
            Horizon::CivilTwilight => CIVIL_TWILIGHT_ALTITUDE,
            Horizon::NauticalTwilight => NAUTICAL_TWILIGHT_ALTITUDE,
            Horizon::AstronomicalTwilight => ASTRONOMICAL_TWILIGHT_ALTITUDE,
            Horizon::Custom { altitude, .. } => *altitude,
        }
    }

    /// Whether the crossing refers to the sun's upper limb instead of its centre.
    pub fn upper_limb(&self) -> bool {
        match self {
            Horizon::SunriseSunset => true,
            Horizon::Custom { upper_limb, .. } => *upper_limb,
            _ => false,
        }
    }
}

// ===================== RESULT =====================

/// Outcome of the day-boundary solver.
///
/// `T` is either UT hours (`f64`) or a calendar instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayBoundary<T> {
    /// The sun crosses the target altitude twice
    RegularDay { sunrise: T, transit: T, sunset: T },
    /// The sun stays above the target altitude for 24 hours
    AllDay { transit: T },
    /// The sun stays below the target altitude for 24 hours
    AllNight { transit: T },
}

impl<T> DayBoundary<T> {
    /// Time when the sun is due south (or north, south of the subsolar point).
    pub fn transit(&self) -> &T {
        match self {
            DayBoundary::RegularDay { transit, .. } => transit,
            DayBoundary::AllDay { transit } => transit,
            DayBoundary::AllNight { transit } => transit,
        }
    }

    pub fn sunrise(&self) -> Option<&T> {
        match self {
            DayBoundary::RegularDay { sunrise, .. } => Some(sunrise),
            _ => None,
        }
    }

    pub fn sunset(&self) -> Option<&T> {
        match self {
            DayBoundary::RegularDay { sunset, .. } => Some(sunset),
            _ => None,
        }
    }

    pub fn is_circumpolar(&self) -> bool {
        !matches!(self, DayBoundary::RegularDay { .. })
    }

    /// Apply `f` to every time stored in the boundary.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> DayBoundary<U> {
        match self {
            DayBoundary::RegularDay { sunrise, transit, sunset } => DayBoundary::RegularDay {
                sunrise: f(sunrise),
                transit: f(transit),
                sunset: f(sunset),
            },
            DayBoundary::AllDay { transit } => DayBoundary::AllDay { transit: f(transit) },
            DayBoundary::AllNight { transit } => DayBoundary::AllNight { transit: f(transit) },
        }
    }
}

impl DayBoundary<f64> {
    /// Length of the day in hours (24 above, 0 below the target altitude).
    pub fn day_length_hours(&self) -> f64 {
        match self {
            DayBoundary::RegularDay { sunrise, sunset, .. } => sunset - sunrise,
            DayBoundary::AllDay { .. } => 24.0,
            DayBoundary::AllNight { .. } => 0.0,
        }
    }

    /// Convert UT hours of `date` into instants of the zone `tz`.
    pub fn to_instants<Z: TimeZone>(self, date: NaiveDate, tz: &Z) -> DayBoundary<DateTime<Z>> {
        let midnight = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
        self.map(|hours| (midnight + hours_to_duration(hours)).with_timezone(tz))
    }
}

impl<Z: TimeZone> DayBoundary<DateTime<Z>> {
    /// Length of the day (24 hours above, zero below the target altitude).
    pub fn day_length(&self) -> Duration {
        match self {
            DayBoundary::RegularDay { sunrise, sunset, .. } => sunset.clone() - sunrise.clone(),
            DayBoundary::AllDay { .. } => Duration::hours(24),
            DayBoundary::AllNight { .. } => Duration::zero(),
        }
    }
}

// ===================== SOLVER =====================

/// Compute sunrise, transit and sunset in UT hours of `date`.
///
/// # Arguments
/// * `date` - Calendar date (1801-2099)
/// * `lat` - Latitude in degrees, north positive
/// * `lon` - Longitude in degrees, east positive
/// * `horizon` - Altitude the sun has to cross
///
/// # Returns
/// Hours relative to 0h UT of `date`; may be negative or exceed 24
pub fn sunrise_sunset_hours(
    date: NaiveDate,
    lat: f64,
    lon: f64,
    horizon: Horizon,
) -> DayBoundary<f64> {
    // Days since 2000 Jan 0.0 at 12h local mean solar time
    let d = days_since_2000_jan_0(date) as f64 + 0.5 - lon / 360.0;

    let sidereal = revolution(gmst0(d) + 180.0 + lon);
    let (ra, decl, r) = sun_ra_dec(d);

    // Time when the sun is at south, hours UT
    let transit = 12.0 - rev180(sidereal - ra) / 15.0;

    let mut altitude = horizon.altitude();
    if horizon.upper_limb() {
        altitude -= SUN_RADIUS_AT_1AU / r;
    }

    let cos_t = (sind(altitude) - sind(lat) * sind(decl)) / (cosd(lat) * cosd(decl));

    if cos_t >= 1.0 {
        DayBoundary::AllNight { transit }
    } else if cos_t <= -1.0 {
        DayBoundary::AllDay { transit }
    } else {
        let t = acosd(cos_t) / 15.0;
        DayBoundary::RegularDay { sunrise: transit - t, transit, sunset: transit + t }
    }
}

/// Compute the day boundary as instants of the zone `tz`.
pub fn sunrise_sunset<Z: TimeZone>(
    date: NaiveDate,
    lat: f64,
    lon: f64,
    horizon: Horizon,
    tz: &Z,
) -> DayBoundary<DateTime<Z>> {
    sunrise_sunset_hours(date, lat, lon, horizon).to_instants(date, tz)
}

/// Day length in hours from the sun's declination alone.
///
/// Cheaper than [`sunrise_sunset_hours`]: neither right ascension nor
/// sidereal time is needed. Returns 0 when the sun stays below the horizon
/// and 24 when it stays above.
pub fn day_length_hours(date: NaiveDate, lat: f64, lon: f64, horizon: Horizon) -> f64 {
    let d = days_since_2000_jan_0(date) as f64 + 0.5 - lon / 360.0;

    let obliquity = SUNRISET_OBLIQUITY - SUNRISET_OBLIQUITY_RATE * d;
    let (slon, r) = sun_pos(d);

    let sin_decl = sind(obliquity) * sind(slon);
    let cos_decl = (1.0 - sin_decl * sin_decl).sqrt();

    let mut altitude = horizon.altitude();
    if horizon.upper_limb() {
        altitude -= SUN_RADIUS_AT_1AU / r;
    }

    let cos_t = (sind(altitude) - sind(lat) * sin_decl) / (cosd(lat) * cos_decl);

    if cos_t >= 1.0 {
        0.0
    } else if cos_t <= -1.0 {
        24.0
    } else {
        (2.0 / 15.0) * acosd(cos_t)
    }
}

// ===================== HELPERS =====================

/// Days elapsed since 2000 Jan 0.0 (1999-12-31 0h UT).
pub fn days_since_2000_jan_0(date: NaiveDate) -> i64 {
    let y = date.year() as i64;
    let m = date.month() as i64;
    let d = date.day() as i64;
    367 * y - (7 * (y + (m + 9) / 12)) / 4 + (275 * m) / 9 + d - 730_530
}

/// Sun's ecliptic longitude (degrees) and distance (AU) at day `d`.
fn sun_pos(d: f64) -> (f64, f64) {
    let m = revolution(SUNRISET_MEAN_ANOMALY + SUNRISET_MEAN_ANOMALY_RATE * d);
    let w = SUNRISET_PERIHELION + SUNRISET_PERIHELION_RATE * d;
    let e = SUNRISET_ECCENTRICITY - SUNRISET_ECCENTRICITY_RATE * d;

    // Eccentric anomaly, one iteration of Kepler's equation
    let ea = m + e.to_degrees() * sind(m) * (1.0 + e * cosd(m));
    let x = cosd(ea) - e;
    let y = (1.0 - e * e).sqrt() * sind(ea);

    let r = (x * x + y * y).sqrt();
    let v = atan2d(y, x);

    let mut lon = v + w;
    if lon >= 360.0 {
        lon -= 360.0;
    }
    (lon, r)
}

/// Sun's right ascension, declination (degrees) and distance (AU) at day `d`.
fn sun_ra_dec(d: f64) -> (f64, f64, f64) {
    let (lon, r) = sun_pos(d);

    // Ecliptic rectangular coordinates, z = 0
    let x = r * cosd(lon);
    let y = r * sind(lon);

    let obliquity = SUNRISET_OBLIQUITY - SUNRISET_OBLIQUITY_RATE * d;

    // Rotate to equatorial; x unchanged
    let z = y * sind(obliquity);
    let y = y * cosd(obliquity);

    (atan2d(y, x), atan2d(z, (x * x + y * y).sqrt()), r)
}

/// Greenwich mean sidereal time at 0h UT, generalized to any instant.
///
/// Equals the sun's mean longitude plus 180°.
fn gmst0(d: f64) -> f64 {
    revolution(
        (180.0 + SUNRISET_MEAN_ANOMALY + SUNRISET_PERIHELION)
            + (SUNRISET_MEAN_ANOMALY_RATE + SUNRISET_PERIHELION_RATE) * d,
    )
}

/// Reduce an angle to [0, 360).
pub(crate) fn revolution(x: f64) -> f64 {
    x - 360.0 * (x / 360.0).floor()
}

/// Reduce an angle to [-180, 180).
pub(crate) fn rev180(x: f64) -> f64 {
    x - 360.0 * (x / 360.0 + 0.5).floor()
}

fn sind(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cosd(x: f64) -> f64 {
    x.to_radians().cos()
}

fn acosd(x: f64) -> f64 {
    x.acos().to_degrees()
}

fn atan2d(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

// ===================== TESTS =====================
