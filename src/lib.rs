//! Clear-sky solar yield engine.
//!
//! Computes the sun's position, the daylight window and beam irradiance on
//! horizontal and tilted surfaces, then folds per-roof panel characteristics
//! into installation power and cumulative energy series.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use solaryield::{PowerPlant, PowerUnit};
//!
//! let mut plant = PowerPlant::load("plant.json")?;
//! plant.bind_default();
//! let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
//! let day = plant.compute_day(date, PowerUnit::Kilowatt)?;
//! println!("{:.2} kWh", day.energy);
//! # Ok::<(), solaryield::Error>(())
//! ```

pub mod constants;
pub mod daytime;
pub mod error;
pub mod geo;
pub mod irradiance;
pub mod plant;
pub mod series;
pub mod solar;
pub mod time;

pub use daytime::{DayBoundary, Horizon};
pub use error::{Error, Result};
pub use geo::GeoLocation;
pub use plant::{
    Calculator, CompassPoint, DaySummary, Orientation, Panel, PowerPlant, PowerUnit, Roof,
    RoofSummary,
};
pub use series::TimeSeries;
pub use solar::{EphemerisPosition, PositionModel, SolarPosition};
