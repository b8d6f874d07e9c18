//! Output Formatting Module
//!
//! Provides formatting functions for terminal and JSON output.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;
use serde_json::{Value, json};
use solaryield::time::format_hms;
use solaryield::{
    DayBoundary, DaySummary, EphemerisPosition, Horizon, PowerPlant, PowerUnit, SolarPosition,
    TimeSeries,
};

// ===================== FORMATTING HELPERS =====================

/// Format power for display
pub fn format_power(value: f64, unit: PowerUnit) -> String {
    match unit {
        PowerUnit::Watt => format!("{:.1} W", value),
        PowerUnit::Kilowatt => format!("{:.3} kW", value),
    }
}

/// Format energy for display
pub fn format_energy(value: f64, unit: PowerUnit) -> String {
    match unit {
        PowerUnit::Watt => format!("{:.1} Wh", value),
        PowerUnit::Kilowatt => format!("{:.3} kWh", value),
    }
}

fn horizon_label(horizon: Horizon) -> &'static str {
    match horizon {
        Horizon::SunriseSunset => "Sunrise/Sunset",
        Horizon::CivilTwilight => "Civil twilight",
        Horizon::NauticalTwilight => "Nautical twilight",
        Horizon::AstronomicalTwilight => "Astronomical twilight",
        Horizon::Custom { .. } => "Custom altitude",
    }
}

/// Keep every `step`-th minute sample, counted from the first one.
fn decimate(series: &TimeSeries, step: u32) -> Vec<(DateTime<Tz>, f64)> {
    if step == 0 {
        return Vec::new();
    }
    series.iter().step_by(step as usize).collect()
}

// ===================== TERMINAL OUTPUT =====================

/// Print the plant header.
pub fn print_plant(plant: &PowerPlant, date: NaiveDate, tz: Tz) {
    println!("Plant       : {}", plant.name);
    println!(
        "Location    : {:.4}°, {:.4}° at {:.0} m",
        plant.location.latitude, plant.location.longitude, plant.location.altitude
    );
    println!("Date        : {} ({})", date, tz);
}

/// Print sunrise, transit, sunset and day length.
///
/// # Arguments
/// * `boundary` - Day boundary in the display zone
/// * `horizon` - Altitude the boundary was computed for
/// * `tomorrow_hours` - Tomorrow's day length in hours
pub fn print_day_boundary(
    boundary: &DayBoundary<DateTime<Tz>>,
    horizon: Horizon,
    tomorrow_hours: f64,
) {
    println!();
    println!("=== {} ===", horizon_label(horizon));

    match boundary {
        DayBoundary::RegularDay { sunrise, transit, sunset } => {
            println!("Sunrise     : {}", sunrise.format("%H:%M:%S %Z"));
            println!("Transit     : {}", transit.format("%H:%M:%S %Z"));
            println!("Sunset      : {}", sunset.format("%H:%M:%S %Z"));
        }
        DayBoundary::AllDay { transit } => {
            println!("Polar Day (Midnight Sun).");
            println!("Transit     : {}", transit.format("%H:%M:%S %Z"));
        }
        DayBoundary::AllNight { transit } => {
            println!("Polar Night.");
            println!("Transit     : {}", transit.format("%H:%M:%S %Z"));
        }
    }

    let today = boundary.day_length();
    println!("Daylight    : {}", format_hms(today.num_seconds()));

    let diff = (Duration::milliseconds((tomorrow_hours * 3_600_000.0).round() as i64) - today)
        .num_seconds();
    if diff == 0 {
        println!("Tomorrow day is same length");
    } else {
        println!(
            "Tomorrow day is {} {}",
            format_hms(diff),
            if diff > 0 { "longer" } else { "shorter" }
        );
    }
}

/// Print one line per roof.
pub fn print_roofs(summary: &DaySummary) {
    println!();
    println!("=== Roofs ===");
    for roof in &summary.roofs {
        let peak = match roof.peak {
            Some((t, p)) => format!("{} at {}", format_power(p, summary.unit), t.format("%H:%M")),
            None => "-".to_string(),
        };
        println!(
            "{:<12}: {:6.1}° | {:.3} m² | peak {} | {}",
            roof.name,
            roof.effective_azimuth,
            roof.generator_factor,
            peak,
            format_energy(roof.energy, summary.unit)
        );
    }
}

/// Print installation power and cumulative energy every `step` minutes.
pub fn print_power_table(power: &TimeSeries, energy: &TimeSeries, step: u32, unit: PowerUnit) {
    let rows = decimate(power, step);
    if rows.is_empty() {
        return;
    }

    println!();
    println!("=== Power ===");
    println!("Time      {:>14}  {:>14}", "Power", "Energy");
    for (t, p) in rows {
        let e = energy.get(&t).unwrap_or(0.0);
        println!(
            "{}  {:>14}  {:>14}",
            t.format("%H:%M %Z"),
            format_power(p, unit),
            format_energy(e, unit)
        );
    }
}

/// Print the day's totals.
pub fn print_totals(summary: &DaySummary) {
    println!();
    match summary.peak {
        Some((t, p)) => {
            println!("Peak power  : {} at {}", format_power(p, summary.unit), t.format("%H:%M %Z"))
        }
        None => println!("Peak power  : no daylight"),
    }
    println!("Energy      : {} (clear-sky)", format_energy(summary.energy, summary.unit));
}

/// Print the sun position at a specific time with both models.
pub fn print_sun_position(dt: DateTime<Tz>, coarse: &SolarPosition, precise: &EphemerisPosition) {
    println!();
    println!("Sun position at {}:", dt.format("%H:%M:%S %Z"));
    println!("  Coarse model");
    println!("    Azimuth     : {:8.3}°", coarse.azimuth);
    println!("    Altitude    : {:8.3}°", coarse.altitude);
    println!("  Ephemeris");
    println!("    Julian day  : {:.4}", precise.julian_day);
    println!("    RA / Dec    : {:8.4}° / {:8.4}°", precise.right_ascension, precise.declination);
    println!("    Hour angle  : {:8.4}°", precise.hour_angle);
    println!("    Azimuth     : {:8.4}°", precise.azimuth);
    println!(
        "    Altitude    : {:8.4}° (geometric {:.4}°)",
        precise.altitude, precise.geometric_altitude
    );
    println!("    Refraction  : {:8.4}°", precise.refraction);
    println!("    Distance    : {:8.4} AU", precise.distance);
}

// ===================== JSON OUTPUT =====================

fn boundary_json(boundary: &DayBoundary<DateTime<Tz>>) -> Value {
    let kind = match boundary {
        DayBoundary::RegularDay { .. } => "regular",
        DayBoundary::AllDay { .. } => "all_day",
        DayBoundary::AllNight { .. } => "all_night",
    };
    json!({
        "kind": kind,
        "sunrise": boundary.sunrise().map(|t| t.to_rfc3339()),
        "transit": boundary.transit().to_rfc3339(),
        "sunset": boundary.sunset().map(|t| t.to_rfc3339()),
        "day_length_seconds": boundary.day_length().num_seconds(),
    })
}

fn series_json(power: &TimeSeries, energy: &TimeSeries, step: u32) -> Value {
    let rows: Vec<Value> = decimate(power, step)
        .into_iter()
        .map(|(t, p)| {
            json!({
                "time": t.to_rfc3339(),
                "power": p,
                "energy": energy.get(&t).unwrap_or(0.0),
            })
        })
        .collect();
    Value::Array(rows)
}

/// Render a computed day as JSON.
pub fn day_json(plant: &PowerPlant, summary: &DaySummary, step: u32) -> Value {
    let empty = TimeSeries::new();
    let power = plant.power.as_ref().unwrap_or(&empty);
    let energy = plant.energy.as_ref().unwrap_or(&empty);

    let roofs: Vec<Value> = summary
        .roofs
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "azimuth": r.effective_azimuth,
                "generator_factor": r.generator_factor,
                "peak": r.peak.map(|(t, p)| json!({ "time": t.to_rfc3339(), "power": p })),
                "energy": r.energy,
            })
        })
        .collect();

    json!({
        "plant": plant.name,
        "date": summary.date.to_string(),
        "unit": summary.unit.symbol(),
        "boundary": boundary_json(&summary.boundary),
        "peak": summary.peak.map(|(t, p)| json!({ "time": t.to_rfc3339(), "power": p })),
        "energy": summary.energy,
        "roofs": roofs,
        "series": series_json(power, energy, step),
    })
}
