use serde::{Deserialize, Serialize};

use crate::{domain::Round, lenient};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub round: Round,
    pub name: String,
}

impl RaceSummary {
    /// Label used by race pickers, e.g. `Bahrain GP (Round 1)`.
    pub fn label(&self) -> String {
        format!("{} (Round {})", self.name, self.round)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub permanent_number: Option<u32>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapTime {
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageSpeed {
    pub speed: String,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastestLap {
    #[serde(rename = "Time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<LapTime>,
    #[serde(
        rename = "AverageSpeed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub average_speed: Option<AverageSpeed>,
}

/// One classified driver in a race. Every row of a results response repeats
/// the race's name, round and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub race_name: String,
    pub round: Round,
    pub date: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(deserialize_with = "lenient::number")]
    pub grid: u32,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<u32>,
    pub status: String,
    #[serde(deserialize_with = "lenient::number")]
    pub points: f64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub laps: Option<u32>,
    #[serde(
        rename = "FastestLap",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fastest_lap: Option<FastestLap>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<u32>,
}

impl ResultRow {
    pub fn race_info(&self) -> RaceInfo {
        RaceInfo {
            race_name: self.race_name.clone(),
            round: self.round,
            date: self.date.clone(),
        }
    }

    pub fn position_label(&self) -> String {
        self.position
            .map(|position| position.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn points_label(&self) -> String {
        let text = format!("{:.1}", self.points);
        text.strip_suffix(".0").unwrap_or(&text).to_string()
    }

    pub fn fastest_lap_time(&self) -> Option<&str> {
        self.fastest_lap
            .as_ref()
            .and_then(|lap| lap.time.as_ref())
            .map(|time| time.time.as_str())
    }

    pub fn fastest_lap_speed(&self) -> Option<String> {
        self.fastest_lap
            .as_ref()
            .and_then(|lap| lap.average_speed.as_ref())
            .map(|speed| format!("{} {}", speed.speed, speed.units))
    }
}

/// Race header shown above a results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceInfo {
    pub race_name: String,
    pub round: Round,
    pub date: String,
}

impl RaceInfo {
    /// Takes the header from the first row; rows are assumed to share it.
    pub fn from_results(results: &[ResultRow]) -> Option<Self> {
        results.first().map(ResultRow::race_info)
    }

    pub fn subtitle(&self) -> String {
        format!("Round: {} | Date: {}", self.round, self.date)
    }
}
