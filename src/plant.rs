//! Power Plant Module
//!
//! Installation configuration (roofs carrying panels) and the aggregation of
//! per-roof plane irradiance into installation power and energy series.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::daytime::{DayBoundary, Horizon, sunrise_sunset};
use crate::error::{Error, Result};
use crate::geo::GeoLocation;
use crate::irradiance::{daily_series, plane_series, window_to_daylight};
use crate::series::TimeSeries;
use crate::solar::PositionModel;

/// One sample per minute
const STEP_HOURS: f64 = 1.0 / 60.0;

// ===================== PANELS =====================

/// A PV module from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub name: String,
    /// Module area in m²
    pub area: f64,
    /// Conversion efficiency, fraction in (0, 1]
    pub efficiency: f64,
}

impl Panel {
    pub fn new(name: impl Into<String>, area: f64, efficiency: f64) -> Result<Self> {
        let panel = Self { name: name.into(), area, efficiency };
        panel.validate()?;
        Ok(panel)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(Error::InvalidPanel(format!(
                "'{}': area must be positive, got {}",
                self.name, self.area
            )));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(Error::InvalidPanel(format!(
                "'{}': efficiency must be in (0, 1], got {}",
                self.name, self.efficiency
            )));
        }
        Ok(())
    }

    /// Area × efficiency in m².
    pub fn generator_factor(&self) -> f64 {
        self.area * self.efficiency
    }
}

// ===================== ORIENTATION =====================

/// The sixteen points of the compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum CompassPoint {
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
    South,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
}

impl CompassPoint {
    /// All points, clockwise from North.
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::North,
        CompassPoint::NorthNorthEast,
        CompassPoint::NorthEast,
        CompassPoint::EastNorthEast,
        CompassPoint::East,
        CompassPoint::EastSouthEast,
        CompassPoint::SouthEast,
        CompassPoint::SouthSouthEast,
        CompassPoint::South,
        CompassPoint::SouthSouthWest,
        CompassPoint::SouthWest,
        CompassPoint::WestSouthWest,
        CompassPoint::West,
        CompassPoint::WestNorthWest,
        CompassPoint::NorthWest,
        CompassPoint::NorthNorthWest,
    ];

    const ABBREVIATIONS: [&'static str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
        "NNW",
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Bearing in degrees (North = 0, clockwise in 22.5° steps).
    pub fn degrees(self) -> f64 {
        self.index() as f64 * 22.5
    }

    /// Short name such as "SSW".
    pub fn abbreviation(self) -> &'static str {
        Self::ABBREVIATIONS[self.index()]
    }

    /// Closest compass point to a bearing.
    pub fn nearest(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let idx = (normalized / 22.5).round() as usize % 16;
        Self::ALL[idx]
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for CompassPoint {
    type Err = Error;

    /// Accepts full names in any case ("SouthSouthWest", "south-south-west")
    /// and abbreviations ("SSW").
    fn from_str(s: &str) -> Result<Self> {
        let key: String =
            s.chars().filter(|c| c.is_ascii_alphabetic()).map(|c| c.to_ascii_lowercase()).collect();

        CompassPoint::ALL
            .into_iter()
            .find(|p| {
                format!("{:?}", p).to_ascii_lowercase() == key
                    || p.abbreviation().to_ascii_lowercase() == key
            })
            .ok_or_else(|| Error::InvalidRoof(format!("unknown compass point '{}'", s)))
    }
}

impl TryFrom<String> for CompassPoint {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Configured roof azimuth: a compass point or a bearing in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Orientation {
    Compass(CompassPoint),
    Degrees(f64),
}

impl Orientation {
    pub fn degrees(&self) -> f64 {
        match self {
            Orientation::Compass(p) => p.degrees(),
            Orientation::Degrees(d) => *d,
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Compass(CompassPoint::South)
    }
}

impl From<CompassPoint> for Orientation {
    fn from(p: CompassPoint) -> Self {
        Orientation::Compass(p)
    }
}

impl From<f64> for Orientation {
    fn from(d: f64) -> Self {
        Orientation::Degrees(d)
    }
}

// ===================== ROOFS =====================

/// A roof plane carrying panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roof {
    pub name: String,
    /// Tilt from horizontal in degrees
    pub tilt: f64,
    #[serde(default)]
    pub azimuth: Orientation,
    /// Fine correction added to `azimuth`, in degrees
    #[serde(default)]
    pub azimuth_deviation: f64,
    #[serde(default)]
    pub panels: Vec<Panel>,
    /// Plane irradiance in W/m², daylight only
    #[serde(skip)]
    pub irradiance: Option<TimeSeries>,
    /// Irradiance × generator factor in W
    #[serde(skip)]
    pub earning: Option<TimeSeries>,
}

impl Roof {
    pub fn new(
        name: impl Into<String>,
        tilt: f64,
        azimuth: impl Into<Orientation>,
        azimuth_deviation: f64,
    ) -> Result<Self> {
        let roof = Self {
            name: name.into(),
            tilt,
            azimuth: azimuth.into(),
            azimuth_deviation,
            panels: Vec::new(),
            irradiance: None,
            earning: None,
        };
        roof.validate()?;
        Ok(roof)
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn with_panels(mut self, panel: Panel, count: usize) -> Self {
        self.panels.extend(std::iter::repeat_n(panel, count));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=90.0).contains(&self.tilt) {
            return Err(Error::InvalidRoof(format!(
                "'{}': tilt must be between 0 and 90, got {}",
                self.name, self.tilt
            )));
        }
        if !self.azimuth.degrees().is_finite() || !self.azimuth_deviation.is_finite() {
            return Err(Error::InvalidRoof(format!("'{}': azimuth must be finite", self.name)));
        }
        self.panels.iter().try_for_each(Panel::validate)
    }

    /// Compass bearing plus deviation, in [0, 360).
    pub fn effective_azimuth(&self) -> f64 {
        (self.azimuth.degrees() + self.azimuth_deviation).rem_euclid(360.0)
    }

    /// Sum of the panels' area × efficiency in m².
    ///
    /// # Errors
    /// Returns [`Error::NoPanels`] for a roof without panels
    pub fn generator_factor(&self) -> Result<f64> {
        if self.panels.is_empty() {
            return Err(Error::NoPanels { roof: self.name.clone() });
        }
        Ok(self.panels.iter().map(Panel::generator_factor).sum())
    }

    /// Scale a plane-irradiance series by the generator factor.
    pub fn earning_from(&self, irradiance: &TimeSeries) -> Result<TimeSeries> {
        Ok(irradiance.scale(self.generator_factor()?))
    }
}

// ===================== CALCULATION CONTEXT =====================

/// Context an installation is bound to before computing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculator {
    /// Zone whose wall clock keys every series
    pub timezone: Tz,
    /// Sun altitude delimiting the daylight window
    pub horizon: Horizon,
    /// Sun-position strategy for the roof sweeps
    pub model: PositionModel,
}

impl Calculator {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone, horizon: Horizon::default(), model: PositionModel::default() }
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_model(mut self, model: PositionModel) -> Self {
        self.model = model;
        self
    }

    /// Sunrise, transit and sunset at `location` on `date`, in the context's zone.
    pub fn day_boundary(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> DayBoundary<DateTime<Tz>> {
        let boundary = sunrise_sunset(
            date,
            location.latitude,
            location.longitude,
            self.horizon,
            &self.timezone,
        );
        if boundary.is_circumpolar() {
            let side = match boundary {
                DayBoundary::AllDay { .. } => "always above",
                _ => "always below",
            };
            warn!("No sun crossing at {:.2}° on {} ({})", self.horizon.altitude(), date, side);
        }
        boundary
    }

    /// Horizontal irradiance over the daylight window.
    pub fn horizontal_irradiance(
        &self,
        location: &GeoLocation,
        date: NaiveDate,
    ) -> Result<TimeSeries> {
        let day = daily_series(location, date, &self.timezone)?;
        let boundary = self.day_boundary(location, date);
        Ok(window_to_daylight(&day, &boundary))
    }

    /// Plane irradiance of one roof, windowed to an already solved day boundary.
    ///
    /// # Arguments
    /// * `location` - Plant site
    /// * `roof` - Roof whose tilt and azimuth define the plane
    /// * `date` - Local calendar date to sweep
    /// * `boundary` - Day boundary for `date` from [`Calculator::day_boundary`]
    pub fn roof_irradiance(
        &self,
        location: &GeoLocation,
        roof: &Roof,
        date: NaiveDate,
        boundary: &DayBoundary<DateTime<Tz>>,
    ) -> Result<TimeSeries> {
        let day = plane_series(
            location,
            date,
            &self.timezone,
            roof.tilt,
            roof.effective_azimuth(),
            self.model,
        )?;
        let window = window_to_daylight(&day, boundary);

        debug!(
            "Roof '{}' on {}: {} of {} samples in daylight",
            roof.name,
            date,
            window.len(),
            day.len()
        );
        Ok(window)
    }
}

// ===================== POWER PLANT =====================

/// Unit for power and energy series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerUnit {
    #[default]
    Watt,
    Kilowatt,
}

impl PowerUnit {
    /// Multiplier applied to values in W.
    pub fn factor(self) -> f64 {
        match self {
            PowerUnit::Watt => 1.0,
            PowerUnit::Kilowatt => 0.001,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerUnit::Watt => "W",
            PowerUnit::Kilowatt => "kW",
        }
    }
}

impl FromStr for PowerUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "watt" => Ok(PowerUnit::Watt),
            "kw" | "kilowatt" => Ok(PowerUnit::Kilowatt),
            _ => Err(Error::Config(format!("unknown unit '{}', use w or kw", s))),
        }
    }
}

/// Per-roof figures of a computed day.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofSummary {
    pub name: String,
    pub effective_azimuth: f64,
    /// Area × efficiency in m²
    pub generator_factor: f64,
    /// Peak earning in the chosen unit
    pub peak: Option<(DateTime<Tz>, f64)>,
    /// Energy in the chosen unit × hours
    pub energy: f64,
}

/// Result of [`PowerPlant::compute_day`].
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub unit: PowerUnit,
    pub boundary: DayBoundary<DateTime<Tz>>,
    /// Highest installation power and its instant
    pub peak: Option<(DateTime<Tz>, f64)>,
    /// Energy over the day in the chosen unit × hours
    pub energy: f64,
    pub roofs: Vec<RoofSummary>,
}

/// A PV installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerPlant {
    pub name: String,
    #[serde(flatten)]
    pub location: GeoLocation,
    #[serde(default)]
    pub roofs: Vec<Roof>,
    #[serde(skip)]
    calculator: Option<Calculator>,
    /// Installation power of the last computed day
    #[serde(skip)]
    pub power: Option<TimeSeries>,
    /// Cumulative energy of the last computed day
    #[serde(skip)]
    pub energy: Option<TimeSeries>,
}

impl PowerPlant {
    pub fn new(name: impl Into<String>, location: GeoLocation) -> Self {
        Self {
            name: name.into(),
            location,
            roofs: Vec::new(),
            calculator: None,
            power: None,
            energy: None,
        }
    }

    pub fn with_roof(mut self, roof: Roof) -> Self {
        self.roofs.push(roof);
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let plant: PowerPlant = serde_json::from_str(json)?;
        plant.validate()?;
        Ok(plant)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let plant = Self::from_json(&json)?;
        debug!(
            "Loaded plant '{}' with {} roofs from {}",
            plant.name,
            plant.roofs.len(),
            path.display()
        );
        Ok(plant)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        self.roofs.iter().try_for_each(Roof::validate)
    }

    // ===================== BINDING =====================

    /// Attach the calculation context. Replaces any previous binding.
    pub fn bind(&mut self, calculator: Calculator) {
        self.calculator = Some(calculator);
    }

    /// Bind to the plant's own zone with default horizon and model.
    pub fn bind_default(&mut self) {
        self.bind(Calculator::new(self.location.timezone));
    }

    pub fn is_bound(&self) -> bool {
        self.calculator.is_some()
    }

    /// The bound context.
    ///
    /// # Errors
    /// Returns [`Error::Unbound`] before [`PowerPlant::bind`]
    pub fn calculator(&self) -> Result<&Calculator> {
        self.calculator.as_ref().ok_or(Error::Unbound)
    }

    // ===================== CALCULATIONS =====================

    pub fn day_boundary(&self, date: NaiveDate) -> Result<DayBoundary<DateTime<Tz>>> {
        Ok(self.calculator()?.day_boundary(&self.location, date))
    }

    /// Horizontal clear-sky irradiance at the site, daylight only.
    pub fn horizontal_irradiance(&self, date: NaiveDate) -> Result<TimeSeries> {
        self.calculator()?.horizontal_irradiance(&self.location, date)
    }

    /// Drop every series left over from an earlier calculation.
    fn clear_results(&mut self) {
        for roof in &mut self.roofs {
            roof.irradiance = None;
            roof.earning = None;
        }
        self.power = None;
        self.energy = None;
    }

    /// Sweep every roof and store its irradiance and earning series.
    ///
    /// Previous results are cleared first, so after an error no roof holds a
    /// series.
    ///
    /// # Errors
    /// [`Error::Unbound`], [`Error::NoRoofs`], or [`Error::NoPanels`] for the
    /// first roof without panels.
    pub fn compute_roofs(&mut self, date: NaiveDate) -> Result<&[Roof]> {
        self.clear_results();
        let boundary = self.day_boundary(date)?;
        self.sweep_roofs(date, &boundary)?;
        Ok(&self.roofs)
    }

    fn sweep_roofs(&mut self, date: NaiveDate, boundary: &DayBoundary<DateTime<Tz>>) -> Result<()> {
        let calculator = *self.calculator()?;
        if self.roofs.is_empty() {
            return Err(Error::NoRoofs);
        }

        let mut results = Vec::with_capacity(self.roofs.len());
        for roof in &self.roofs {
            let irradiance = calculator.roof_irradiance(&self.location, roof, date, boundary)?;
            let earning = roof.earning_from(&irradiance)?;
            results.push((irradiance, earning));
        }

        for (roof, (irradiance, earning)) in self.roofs.iter_mut().zip(results) {
            roof.irradiance = Some(irradiance);
            roof.earning = Some(earning);
        }
        Ok(())
    }

    /// Installation power: per-instant sum of roof earnings × `unit_factor`.
    ///
    /// Roofs not yet computed contribute nothing.
    pub fn power_over_day(&self, unit_factor: f64) -> TimeSeries {
        TimeSeries::merge_sum(self.roofs.iter().filter_map(|r| r.earning.as_ref()))
            .scale(unit_factor)
    }

    /// Cumulative energy: running sum of power × 1 minute × `unit_factor`.
    pub fn energy_over_day(&self, unit_factor: f64) -> TimeSeries {
        self.power_over_day(1.0).cumulative(STEP_HOURS, unit_factor)
    }

    /// Compute a full day and store power and energy series.
    ///
    /// The day boundary is solved once and shared by every roof sweep.
    pub fn compute_day(&mut self, date: NaiveDate, unit: PowerUnit) -> Result<DaySummary> {
        self.clear_results();
        let boundary = self.day_boundary(date)?;
        self.sweep_roofs(date, &boundary)?;

        let power = self.power_over_day(unit.factor());
        let energy = self.energy_over_day(unit.factor());

        let mut roofs = Vec::with_capacity(self.roofs.len());
        for roof in &self.roofs {
            let earning = roof.earning.clone().unwrap_or_default().scale(unit.factor());
            roofs.push(RoofSummary {
                name: roof.name.clone(),
                effective_azimuth: roof.effective_azimuth(),
                generator_factor: roof.generator_factor()?,
                peak: earning.peak(),
                energy: earning.total() * STEP_HOURS,
            });
        }

        let summary = DaySummary {
            date,
            unit,
            boundary,
            peak: power.peak(),
            energy: energy.last().map(|(_, e)| e).unwrap_or(0.0),
            roofs,
        };

        info!(
            "Plant '{}' on {}: {} samples, energy {:.3} {}h",
            self.name,
            date,
            power.len(),
            summary.energy,
            unit.symbol()
        );

        self.power = Some(power);
        self.energy = Some(energy);
        Ok(summary)
    }
}

// ===================== TESTS =====================
