//! Daily health score.
//!
//! Four checks worth 25 points each. The score is a pure function of the
//! reading; nothing here touches the log.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::models::form::{coerce_number, string_or_number};

const POINTS_PER_CHECK: u8 = 25;
const WATER_TARGET_ML: f64 = 2000.0;
const EXERCISE_TARGET_HRS: f64 = 1.0;
const PRESSURE_RANGE: RangeInclusive<f64> = 90.0..=120.0;
const SUGAR_RANGE: RangeInclusive<f64> = 70.0..=130.0;

/// One day's self-reported readings, kept as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReading {
    /// Water intake in millilitres.
    #[serde(default, deserialize_with = "string_or_number")]
    pub water: String,
    /// Systolic blood pressure.
    #[serde(default, deserialize_with = "string_or_number")]
    pub pressure: String,
    /// Exercise time in hours.
    #[serde(default, deserialize_with = "string_or_number")]
    pub time: String,
    /// Blood sugar in mg/dL.
    #[serde(default, deserialize_with = "string_or_number")]
    pub sugar: String,
}

impl HealthReading {
    #[cfg(test)]
    pub fn new(
        water: impl Into<String>,
        pressure: impl Into<String>,
        time: impl Into<String>,
        sugar: impl Into<String>,
    ) -> Self {
        Self {
            water: water.into(),
            pressure: pressure.into(),
            time: time.into(),
            sugar: sugar.into(),
        }
    }

    /// True when no field was filled in.
    pub fn is_blank(&self) -> bool {
        [&self.water, &self.pressure, &self.time, &self.sugar]
            .iter()
            .all(|f| f.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImprovementLabel {
    Good,
    #[serde(rename = "Improvement Needed")]
    ImprovementNeeded,
    Poor,
}

impl ImprovementLabel {
    pub fn from_points(points: u8) -> Self {
        match points {
            100.. => ImprovementLabel::Good,
            50..=99 => ImprovementLabel::ImprovementNeeded,
            _ => ImprovementLabel::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImprovementLabel::Good => "Good",
            ImprovementLabel::ImprovementNeeded => "Improvement Needed",
            ImprovementLabel::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub points: u8,
    pub label: ImprovementLabel,
}

pub fn calculate_score(reading: &HealthReading) -> HealthScore {
    let water = coerce_number(&reading.water);
    let pressure = coerce_number(&reading.pressure);
    let time = coerce_number(&reading.time);
    let sugar = coerce_number(&reading.sugar);

    // NaN fails every comparison, so unparseable fields score nothing.
    let checks = [
        water >= WATER_TARGET_ML,
        time >= EXERCISE_TARGET_HRS,
        PRESSURE_RANGE.contains(&pressure),
        SUGAR_RANGE.contains(&sugar),
    ];
    let points = checks.iter().filter(|passed| **passed).count() as u8 * POINTS_PER_CHECK;

    HealthScore {
        points,
        label: ImprovementLabel::from_points(points),
    }
}
