//! Record and feature definitions for the hourly bike-sharing dataset.

use chrono::NaiveDate;
use driftscope_core::{types::DriftType, Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One hourly observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeRecord {
    /// Record index
    pub instant: u32,
    /// Calendar date (`YYYY-MM-DD`)
    pub dteday: String,
    #[serde(default)]
    pub season: u8,
    /// Year key (0 = 2011, 1 = 2012)
    pub yr: u8,
    #[serde(default)]
    pub mnth: u8,
    #[serde(default)]
    pub hr: u8,
    #[serde(default)]
    pub holiday: u8,
    #[serde(default)]
    pub weekday: u8,
    #[serde(default)]
    pub workingday: u8,
    #[serde(default)]
    pub weathersit: u8,
    /// Normalized temperature
    #[serde(default)]
    pub temp: Option<f64>,
    /// Normalized feels-like temperature
    #[serde(default)]
    pub atemp: Option<f64>,
    /// Normalized humidity
    #[serde(default)]
    pub hum: Option<f64>,
    /// Normalized wind speed
    #[serde(default)]
    pub windspeed: Option<f64>,
    /// Total rentals (target)
    #[serde(default)]
    pub cnt: u32,
}

/// Date format of `BikeRecord::dteday`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl BikeRecord {
    /// Parsed calendar date.
    ///
    /// # Errors
    /// `Dataset` if `dteday` is not `YYYY-MM-DD`.
    pub fn date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.dteday, DATE_FORMAT).map_err(|e| {
            Error::dataset(format!(
                "record {} has invalid date '{}': {}",
                self.instant, self.dteday, e
            ))
        })
    }
}

/// Features that can be extracted as numeric samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Temp,
    Atemp,
    Hum,
    Windspeed,
    Hr,
    Cnt,
}

impl Feature {
    /// Min-max scaled features monitored for drift
    pub fn numeric() -> [Feature; 4] {
        [Feature::Temp, Feature::Atemp, Feature::Hum, Feature::Windspeed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Temp => "temp",
            Feature::Atemp => "atemp",
            Feature::Hum => "hum",
            Feature::Windspeed => "windspeed",
            Feature::Hr => "hr",
            Feature::Cnt => "cnt",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Temp => "Temperature (normalized)",
            Feature::Atemp => "Feels-like Temp (normalized)",
            Feature::Hum => "Humidity (normalized)",
            Feature::Windspeed => "Wind Speed (normalized)",
            Feature::Hr => "Hour of Day",
            Feature::Cnt => "Bike Rentals (target)",
        }
    }

    /// Whether values live in the normalized [0, 1] domain
    pub fn is_normalized(&self) -> bool {
        Feature::numeric().contains(self)
    }

    /// Injectors clamp into [0, 1], so only normalized features can take
    /// synthetic drift.
    ///
    /// # Errors
    /// `InvalidInput` for a raw-scale feature with any drift other than `none`.
    pub fn ensure_driftable(&self, drift_type: DriftType) -> Result<()> {
        if drift_type == DriftType::None || self.is_normalized() {
            return Ok(());
        }
        Err(Error::invalid_input(format!(
            "{} drift needs a normalized feature (temp, atemp, hum, windspeed), got '{}'",
            drift_type, self
        )))
    }

    /// Read this feature from a record; `None` when the value is missing
    pub fn value(&self, record: &BikeRecord) -> Option<f64> {
        match self {
            Feature::Temp => record.temp,
            Feature::Atemp => record.atemp,
            Feature::Hum => record.hum,
            Feature::Windspeed => record.windspeed,
            Feature::Hr => Some(f64::from(record.hr)),
            Feature::Cnt => Some(f64::from(record.cnt)),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temp" => Ok(Feature::Temp),
            "atemp" => Ok(Feature::Atemp),
            "hum" => Ok(Feature::Hum),
            "windspeed" => Ok(Feature::Windspeed),
            "hr" => Ok(Feature::Hr),
            "cnt" => Ok(Feature::Cnt),
            other => Err(Error::invalid_input(format!("unknown feature '{}'", other))),
        }
    }
}
