//! Time and Timezone Utilities Module
//!
//! Provides date parsing, timezone resolution, day sweeps, and formatting utilities.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_english::{Dialect, parse_date_string};
use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use log::warn;

use crate::error::{Error, Result};

// ===================== DATE PARSING =====================

/// Parse a calendar date relative to `anchor`.
///
/// Accepts what `chrono-english` understands ("2025-06-21", "tomorrow",
/// "next friday", "3 days ago"; slashed dates use the US dialect) plus the
/// European `DD.MM.YYYY`.
///
/// # Arguments
/// * `s` - Date expression
/// * `anchor` - Current instant in the target zone; relative dates count from it
///
/// # Errors
/// Returns an error if the date expression is not understood
pub fn parse_date(s: &str, anchor: &DateTime<Tz>) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
        return Ok(d);
    }

    parse_date_string(s, *anchor, Dialect::Us)
        .map(|dt| dt.with_timezone(&anchor.timezone()).date_naive())
        .map_err(|e| Error::InvalidTime(format!("Invalid date '{}': {}", s, e)))
}

/// Parse a time of day as `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    ["%H:%M:%S", "%H:%M"]
        .into_iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| Error::InvalidTime(format!("Invalid time '{}'. Use HH:MM or HH:MM:SS", s)))
}

// ===================== TIMEZONE UTILITIES =====================

/// Get the system's configured timezone.
///
/// Falls back to UTC if the system timezone cannot be determined.
pub fn system_timezone() -> Tz {
    get_timezone().ok().and_then(|s| s.parse().ok()).unwrap_or(Tz::UTC)
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| Error::Config(format!("unknown time zone '{}'", name)))
}

// ===================== DAY SWEEP =====================

/// First valid instant of a calendar day in the given zone.
///
/// Uses 00:00; on a DST gap at midnight falls forward to 01:00. Ambiguous
/// midnights resolve to the earlier instant.
pub fn start_of_day(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    for hour in [0, 1] {
        let naive = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| Error::InvalidTime(format!("{} {:02}:00", date, hour)))?;
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(t) => return Ok(t),
            LocalResult::Ambiguous(t, _) => return Ok(t),
            LocalResult::None => {
                warn!("{} {:02}:00 does not exist in {}, trying next hour", date, hour, tz);
            }
        }
    }
    Err(Error::InvalidTime(format!("{} has no valid start of day in {}", date, tz)))
}

/// Resolve a local wall-clock time on `date`.
///
/// Ambiguous times (DST fold) resolve to the earlier instant; times inside a
/// DST gap are an error.
pub fn resolve_local(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(t) => Ok(t),
        LocalResult::Ambiguous(early, late) => {
            warn!(
                "{} {} is ambiguous in {}, using {} (not {})",
                date,
                time,
                tz,
                early.format("%H:%M:%S %Z"),
                late.format("%H:%M:%S %Z")
            );
            Ok(early)
        }
        LocalResult::None => Err(Error::InvalidTime(format!(
            "{} {} does not exist in {} (DST gap)",
            date, time, tz
        ))),
    }
}

/// Instants of one local calendar day at one-minute resolution.
///
/// Runs from the start of `date` up to the start of the next day, so a DST
/// change yields 1380 or 1500 samples instead of 1440.
pub fn minute_sweep(tz: &Tz, date: NaiveDate) -> Result<impl Iterator<Item = DateTime<Tz>>> {
    let start = start_of_day(tz, date)?;
    let end = date
        .succ_opt()
        .and_then(|next| start_of_day(tz, next).ok())
        .unwrap_or(start + Duration::days(1));
    let minutes = (end - start).num_minutes();
    Ok((0..minutes).map(move |m| start + Duration::minutes(m)))
}

/// Convert fractional hours into a duration with millisecond resolution.
pub fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

// ===================== FORMATTING =====================

/// Format a duration in seconds as "Xh Ym Zs".
///
/// # Arguments
/// * `seconds` - Duration in seconds (can be negative, abs value is used)
///
/// # Returns
/// Formatted string like "5h 30m 45s"
pub fn format_hms(seconds: i64) -> String {
    let total_seconds = seconds.abs();
    if total_seconds == 0 {
        return "0s".to_string();
    }

    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    let mut parts = Vec::new();
    if h > 0 {
        parts.push(format!("{}h", h));
    }
    if m > 0 {
        parts.push(format!("{}m", m));
    }
    if s > 0 {
        parts.push(format!("{}s", s));
    }

    parts.join(" ")
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::America::Sao_Paulo;
    use chrono_tz::Europe::Berlin;
    use chrono_tz::Pacific::Apia;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn anchor() -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(2025, 12, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        let now = anchor();
        assert_eq!(parse_date("2023-10-01", &now).unwrap(), d(2023, 10, 1));
        assert_eq!(parse_date("01.10.2023", &now).unwrap(), d(2023, 10, 1));
        assert_eq!(parse_date(" 21.06.2025 ", &now).unwrap(), d(2025, 6, 21));
    }

    #[test]
    fn test_parse_date_relative() {
        let now = anchor();
        assert_eq!(parse_date("tomorrow", &now).unwrap(), d(2025, 12, 22));
        assert_eq!(parse_date("yesterday", &now).unwrap(), d(2025, 12, 20));
    }

    #[test]
    fn test_parse_date_relative_to_target_zone() {
        // 23:30 UTC is already the next day in Berlin
        let late = Tz::UTC.with_ymd_and_hms(2025, 12, 21, 23, 30, 0).unwrap();
        let berlin = late.with_timezone(&Berlin);
        assert_eq!(parse_date("tomorrow", &late).unwrap(), d(2025, 12, 22));
        assert_eq!(parse_date("tomorrow", &berlin).unwrap(), d(2025, 12, 23));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("banana", &anchor()).is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Berlin").unwrap(), Berlin);
        assert!(matches!(parse_timezone("Mars/Olympus_Mons"), Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_time_of_day() {
        let afternoon = NaiveTime::from_hms_opt(13, 28, 0).unwrap();
        assert_eq!(parse_time_of_day("13:28").unwrap(), afternoon);
        assert_eq!(
            parse_time_of_day("05:06:07").unwrap(),
            NaiveTime::from_hms_opt(5, 6, 7).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("noon").is_err());
    }

    #[test]
    fn test_resolve_local() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();

        let regular = resolve_local(&Berlin, d(2025, 6, 21), t(15, 0)).unwrap();
        assert_eq!(regular.hour(), 15);

        // 02:30 happens twice when DST ends; the CEST instant comes first
        let fold = resolve_local(&Berlin, d(2025, 10, 26), t(2, 30)).unwrap();
        assert_eq!(fold.format("%Z").to_string(), "CEST");

        // 02:30 does not exist when DST starts
        assert!(resolve_local(&Berlin, d(2025, 3, 30), t(2, 30)).is_err());
    }

    #[test]
    fn test_start_of_day_regular() {
        let t = start_of_day(&Berlin, d(2025, 3, 30)).unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 0));
    }

    #[test]
    fn test_start_of_day_midnight_dst_gap() {
        // Brazil (2018) switched to DST at 00:00, so midnight did not exist
        let t = start_of_day(&Sao_Paulo, d(2018, 11, 4)).unwrap();
        assert_eq!(t.hour(), 1);
    }

    #[test]
    fn test_start_of_day_skipped_day() {
        // Samoa skipped Dec 30, 2011 entirely
        assert!(start_of_day(&Apia, d(2011, 12, 30)).is_err());
    }

    #[test]
    fn test_minute_sweep_covers_day() {
        let sweep: Vec<_> = minute_sweep(&Tz::UTC, d(2023, 10, 1)).unwrap().collect();
        assert_eq!(sweep.len(), 1440);
        assert_eq!((sweep[0].hour(), sweep[0].minute()), (0, 0));
        assert_eq!((sweep[1439].hour(), sweep[1439].minute()), (23, 59));
        assert!(sweep.windows(2).all(|w| w[1] - w[0] == Duration::minutes(1)));
    }

    #[test]
    fn test_minute_sweep_dst_days() {
        // Spring forward: 23 hours
        let spring: Vec<_> = minute_sweep(&Berlin, d(2025, 3, 30)).unwrap().collect();
        assert_eq!(spring.len(), 1380);
        let last = spring[spring.len() - 1];
        assert_eq!((last.day(), last.hour(), last.minute()), (30, 23, 59));

        // Fall back: 25 hours, 02:xx appears twice
        let autumn: Vec<_> = minute_sweep(&Berlin, d(2025, 10, 26)).unwrap().collect();
        assert_eq!(autumn.len(), 1500);
        let last = autumn[autumn.len() - 1];
        assert_eq!((last.day(), last.hour(), last.minute()), (26, 23, 59));
        assert_eq!(autumn.iter().filter(|t| t.hour() == 2).count(), 120);

        // Midnight gap: 01:00 to the next midnight
        let brazil: Vec<_> = minute_sweep(&Sao_Paulo, d(2018, 11, 4)).unwrap().collect();
        assert_eq!(brazil.len(), 1380);
    }

    #[test]
    fn test_hours_to_duration() {
        assert_eq!(hours_to_duration(1.5), Duration::minutes(90));
        assert_eq!(hours_to_duration(-0.25), Duration::minutes(-15));
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(3661), "1h 1m 1s");
        assert_eq!(format_hms(7200), "2h");
        assert_eq!(format_hms(45), "45s");
        assert_eq!(format_hms(0), "0s");
        assert_eq!(format_hms(-3660), "1h 1m");
    }
}
