use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use log::debug;
use serde_json::json;

mod cli;
mod output;

use cli::Args;
use solaryield::daytime::day_length_hours;
use solaryield::solar::{coarse_position, ephemeris_position};
use solaryield::time::{
    parse_date, parse_time_of_day, parse_timezone, resolve_local, system_timezone,
};
use solaryield::{Calculator, PowerPlant};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut plant = PowerPlant::load(&args.plant)?;
    if let Some(lat) = args.latitude {
        plant.location.latitude = lat;
    }
    if let Some(lon) = args.longitude {
        plant.location.longitude = lon;
    }
    if let Some(alt) = args.altitude {
        plant.location.altitude = alt;
    }
    plant.validate()?;

    let tz = if args.utc {
        Tz::UTC
    } else {
        match args.timezone.as_str() {
            "plant" => plant.location.timezone,
            "system" => system_timezone(),
            other => parse_timezone(other)?,
        }
    };

    // Anchor 'today' to the target timezone
    let now = Utc::now().with_timezone(&tz);
    let date = match &args.date {
        Some(s) => parse_date(s, &now)?,
        None => now.date_naive(),
    };

    let horizon = args.horizon();
    let calculator =
        Calculator::new(tz).with_horizon(horizon).with_model(args.position_model());
    debug!("Calculator: {:?}", calculator);
    plant.bind(calculator);

    let summary = plant.compute_day(date, args.unit)?;

    let tomorrow_hours = date
        .succ_opt()
        .map(|d| day_length_hours(d, plant.location.latitude, plant.location.longitude, horizon))
        .unwrap_or(0.0);

    let target_dt: Option<DateTime<Tz>> = match args.at.as_deref() {
        Some("now") => Some(now),
        Some(at) => Some(resolve_local(&tz, date, parse_time_of_day(at)?)?),
        None => None,
    };

    if args.json {
        let mut value = output::day_json(&plant, &summary, args.step);
        if let Some(dt) = target_dt {
            let p = ephemeris_position(&dt, &plant.location, args.temperature);
            value["sun"] = json!({
                "time": dt.to_rfc3339(),
                "julian_day": p.julian_day,
                "right_ascension": p.right_ascension,
                "declination": p.declination,
                "hour_angle": p.hour_angle,
                "geometric_altitude": p.geometric_altitude,
                "refraction": p.refraction,
                "altitude": p.altitude,
                "azimuth": p.azimuth,
                "distance": p.distance,
            });
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    output::print_plant(&plant, date, tz);
    output::print_day_boundary(&summary.boundary, horizon, tomorrow_hours);
    output::print_roofs(&summary);
    if let (Some(power), Some(energy)) = (&plant.power, &plant.energy) {
        output::print_power_table(power, energy, args.step, args.unit);
    }
    output::print_totals(&summary);

    if let Some(dt) = target_dt {
        let coarse = coarse_position(plant.location.latitude, plant.location.longitude, &dt);
        let precise = ephemeris_position(&dt, &plant.location, args.temperature);
        output::print_sun_position(dt, &coarse, &precise);
    }

    Ok(())
}
