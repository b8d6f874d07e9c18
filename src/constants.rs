//! Astronomical and Atmospheric Constants
//!
//! Shared by the day-boundary solver, the coarse declination model and the
//! precise ephemeris. Orbital elements follow Meeus, "Astronomical Algorithms"
//! (low-precision solar coordinates) and Schlyter's SUNRISET.

// ===================== JULIAN DATES =====================

/// Julian day of the J2000.0 epoch (2000-01-01 12:00 TT)
pub const J2000: f64 = 2_451_545.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Calendar-to-JD conversion factors (Meeus ch. 7)
pub const JULIAN_YEAR_FACTOR: f64 = 365.25;
pub const JULIAN_MONTH_FACTOR: f64 = 30.6001;
pub const JULIAN_OFFSET: f64 = 1524.5;

// ===================== SOLAR ORBIT (EPHEMERIS) =====================

/// Geometric mean longitude of the sun: L0 = a + b·T + c·T²
pub const MEAN_LONG_SUN: f64 = 280.46646;
pub const MEAN_LONG_SUN_RATE: f64 = 36_000.76983;
pub const MEAN_LONG_SUN_RATE_CORR: f64 = 0.0003032;

/// Mean anomaly of the sun: M = a + b·T − c·T²
pub const MEAN_ANOMALY: f64 = 357.52911;
pub const MEAN_ANOMALY_RATE: f64 = 35_999.05029;
pub const MEAN_ANOMALY_RATE_CORR: f64 = 0.0001537;

/// Eccentricity of Earth's orbit: e = a − b·T − c·T²
pub const ECCENTRICITY: f64 = 0.016708634;
pub const ECCENTRICITY_RATE_1: f64 = 0.000042037;
pub const ECCENTRICITY_RATE_2: f64 = 0.0000001267;

/// Equation of the centre, three terms
pub const C1: f64 = 1.914602;
pub const C1_RATE_1: f64 = 0.004817;
pub const C1_RATE_2: f64 = 0.000014;
pub const C2: f64 = 0.019993;
pub const C2_RATE: f64 = 0.000101;
pub const C3: f64 = 0.000289;

/// Longitude of the moon's ascending node, used for nutation
pub const OMEGA: f64 = 125.04;
pub const OMEGA_RATE: f64 = 1934.136;

/// Mean obliquity of the ecliptic at J2000 (23°26'21.448") and its rates in arcseconds
pub const OBLIQUITY_J2000: f64 = 23.0 + 26.0 / 60.0 + 21.448 / 3600.0;
pub const OBLIQUITY_RATE_1: f64 = 46.815;
pub const OBLIQUITY_RATE_2: f64 = 0.00059;
pub const OBLIQUITY_RATE_3: f64 = 0.001813;
pub const OBLIQUITY_CORR: f64 = 0.00256;

/// Aberration and nutation correction for the apparent longitude
pub const APPARENT_LONG_CORR_1: f64 = 0.00569;
pub const APPARENT_LONG_CORR_2: f64 = 0.00478;

/// Greenwich mean sidereal time polynomial (degrees)
pub const GMST: f64 = 280.46061837;
pub const GMST_RATE: f64 = 360.98564736629;
pub const GMST_COEFF_1: f64 = 0.000387933;
pub const GMST_COEFF_2: f64 = 38_710_000.0;

/// Mean Earth–Sun distance factor for the radius vector
pub const SEMI_MAJOR_AXIS_AU: f64 = 1.000001018;

// ===================== SOLAR ORBIT (DAY BOUNDARY) =====================

/// Mean anomaly at 2000 Jan 0.0 and daily rate (degrees)
pub const SUNRISET_MEAN_ANOMALY: f64 = 356.0470;
pub const SUNRISET_MEAN_ANOMALY_RATE: f64 = 0.9856002585;

/// Longitude of perihelion at 2000 Jan 0.0 and daily rate (degrees)
pub const SUNRISET_PERIHELION: f64 = 282.9404;
pub const SUNRISET_PERIHELION_RATE: f64 = 4.70935e-5;

/// Eccentricity at 2000 Jan 0.0 and daily rate
pub const SUNRISET_ECCENTRICITY: f64 = 0.016709;
pub const SUNRISET_ECCENTRICITY_RATE: f64 = 1.151e-9;

/// Obliquity at 2000 Jan 0.0 and daily rate (degrees)
pub const SUNRISET_OBLIQUITY: f64 = 23.4393;
pub const SUNRISET_OBLIQUITY_RATE: f64 = 3.563e-7;

/// Sun's apparent radius at 1 AU in degrees
pub const SUN_RADIUS_AT_1AU: f64 = 0.2666;

// ===================== HORIZONS =====================

/// Sun altitude at visual rise/set (refraction at the horizon, 35 arcmin)
pub const SUNRISE_SUNSET_ALTITUDE: f64 = -35.0 / 60.0;
pub const CIVIL_TWILIGHT_ALTITUDE: f64 = -6.0;
pub const NAUTICAL_TWILIGHT_ALTITUDE: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT_ALTITUDE: f64 = -18.0;

// ===================== COARSE MODEL =====================

/// Days per year used by the declination approximation
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Inclination of Earth's axis in degrees
pub const EARTH_AXIS_TILT: f64 = 23.44;

/// Day of year of the March equinox offset in the declination sine
pub const EQUINOX_DAY_OFFSET: f64 = 81.0;

// ===================== IRRADIANCE =====================

/// Solar constant (Total Solar Irradiance) in W/m²
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// Clear-sky optical depth for the horizontal model
pub const OPTICAL_DEPTH: f64 = 0.2;

/// Scale height of the atmosphere in meters
pub const AIR_SCALE_HEIGHT: f64 = 8500.0;

/// Exponential air-density decrease per meter of site altitude
pub const AIR_ALT_ADJUSTMENT_FACTOR: f64 = -0.0001184;

/// Clear-sky transmittance per unit air mass (tilted-surface model)
pub const CLEAR_SKY_TRANSMITTANCE: f64 = 0.7;

// ===================== ATMOSPHERE =====================

/// ISA sea level pressure in hPa
pub const SEA_LEVEL_PRESSURE: f64 = 1013.25;

/// ISA sea level temperature in Kelvin (15 °C)
pub const SEA_LEVEL_TEMP_K: f64 = 288.15;

/// ISA tropospheric lapse rate in K/m
pub const LAPSE_RATE: f64 = 0.0065;

/// g·M/R in K/m
pub const GRAVITY_TIMES_MOLAR: f64 = 0.034163;

/// Offset between Celsius and Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

/// Lowest geometric altitude (degrees) for which the refraction formula holds
pub const REFRACTION_MIN_ALTITUDE: f64 = -1.0;

/// Decimal places kept (by truncation) in ephemeris output
pub const EPHEMERIS_DECIMALS: i32 = 4;
