//! Command-Line Interface Module
//!
//! Handles argument parsing and validation for the solaryield application.

use std::path::PathBuf;

use clap::Parser;
use solaryield::geo::{check_altitude, check_latitude, check_longitude};
use solaryield::{Horizon, PositionModel, PowerUnit};

// ===================== CLI =====================

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Plant configuration file (JSON)
    #[arg(long, env = "SOLARYIELD_PLANT")]
    pub plant: PathBuf,

    /// Override the plant latitude in decimal degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_latitude, env = "SOLARYIELD_LATITUDE")]
    pub latitude: Option<f64>,
    /// Override the plant longitude in decimal degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_longitude, env = "SOLARYIELD_LONGITUDE")]
    pub longitude: Option<f64>,
    /// Override the plant altitude above mean sea level (meters, may be negative)
    #[arg(long, allow_hyphen_values = true, value_parser = parse_altitude, env = "SOLARYIELD_ALTITUDE")]
    pub altitude: Option<f64>,

    /// Time zone to use ("plant", "system", or IANA time zone name)
    #[arg(long, default_value = "plant", env = "SOLARYIELD_TIMEZONE")]
    pub timezone: String,
    /// Use UTC time zone
    #[arg(long)]
    pub utc: bool,

    /// Date for calculations ("2025-06-21", "21.06.2025", "tomorrow", "next friday")
    ///
    /// Defaults to today in the selected time zone.
    #[arg(long, env = "SOLARYIELD_DATE")]
    pub date: Option<String>,
    /// Show the sun position at a time of day (HH:MM[:SS] or "now")
    #[arg(long)]
    pub at: Option<String>,

    /// Sun position model for the roof sweeps
    #[arg(long, default_value = "coarse", value_parser = ["coarse", "ephemeris"], env = "SOLARYIELD_MODEL")]
    pub model: String,
    /// Ambient temperature in °C for refraction correction (ephemeris model only)
    #[arg(long, allow_hyphen_values = true, env = "SOLARYIELD_TEMPERATURE")]
    pub temperature: Option<f64>,

    /// Use civil, nautical, or astronomical twilight instead of sunrise/sunset
    #[arg(long, conflicts_with_all = ["nautical", "astro"])]
    pub civil: bool,
    #[arg(long, conflicts_with = "astro")]
    pub nautical: bool,
    #[arg(long)]
    pub astro: bool,

    /// Unit for power and energy ("w" or "kw")
    #[arg(long, default_value = "kw", value_parser = parse_unit, env = "SOLARYIELD_UNIT")]
    pub unit: PowerUnit,
    /// Minutes between rows of the power table (0 hides the table)
    #[arg(long, default_value_t = 60, value_parser = parse_step, env = "SOLARYIELD_STEP")]
    pub step: u32,
    /// Print JSON instead of text
    #[arg(long, env = "SOLARYIELD_JSON")]
    pub json: bool,
}

impl Args {
    /// Sun altitude delimiting the daylight window.
    pub fn horizon(&self) -> Horizon {
        if self.civil {
            Horizon::CivilTwilight
        } else if self.nautical {
            Horizon::NauticalTwilight
        } else if self.astro {
            Horizon::AstronomicalTwilight
        } else {
            Horizon::SunriseSunset
        }
    }

    pub fn position_model(&self) -> PositionModel {
        match self.model.as_str() {
            "ephemeris" => PositionModel::Ephemeris { temperature: self.temperature },
            _ => PositionModel::Coarse,
        }
    }
}

// ===================== CLI VALUE PARSERS =====================

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("Invalid number: {}", s))
}

fn parse_latitude(s: &str) -> Result<f64, String> {
    check_latitude(parse_number(s)?)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    check_longitude(parse_number(s)?)
}

fn parse_altitude(s: &str) -> Result<f64, String> {
    check_altitude(parse_number(s)?)
}

fn parse_unit(s: &str) -> Result<PowerUnit, String> {
    s.parse().map_err(|e: solaryield::Error| e.to_string())
}

fn parse_step(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("Invalid number: {}", s))?;
    if v > 1440 {
        return Err(format!("Step must be between 0 and 1440 minutes, got {}", v));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["solaryield", "--plant", "plant.json"]).unwrap();
        assert_eq!(args.horizon(), Horizon::SunriseSunset);
        assert_eq!(args.position_model(), PositionModel::Coarse);
        assert_eq!(args.unit, PowerUnit::Kilowatt);
        assert_eq!(args.step, 60);
    }

    #[test]
    fn test_model_and_horizon_flags() {
        let args = Args::try_parse_from([
            "solaryield",
            "--plant",
            "plant.json",
            "--model",
            "ephemeris",
            "--temperature",
            "-5",
            "--nautical",
            "--unit",
            "w",
        ])
        .unwrap();
        assert_eq!(args.horizon(), Horizon::NauticalTwilight);
        assert_eq!(args.position_model(), PositionModel::Ephemeris { temperature: Some(-5.0) });
        assert_eq!(args.unit, PowerUnit::Watt);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let parse = |flag: &str, value: &str| {
            Args::try_parse_from(["solaryield", "--plant", "p.json", flag, value]).is_err()
        };
        assert!(parse("--latitude", "91"));
        assert!(parse("--longitude", "-181"));
        assert!(parse("--altitude", "-600"));
        assert!(parse("--unit", "mw"));
        assert!(parse("--step", "2000"));
        assert!(parse("--model", "spa"));
    }

    #[test]
    fn test_twilight_flags_conflict() {
        let res = Args::try_parse_from(["solaryield", "--plant", "p.json", "--civil", "--astro"]);
        assert!(res.is_err());
    }
}
