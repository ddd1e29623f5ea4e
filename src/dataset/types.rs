//! Record types for the trip log and the station table.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Station name substituted for empty origin or destination names.
pub const UNKNOWN_STATION: &str = "Unknown";

/// Days in display order, Monday first. Position matches [`day_index`].
pub const DAYS_OF_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A single row deserialized from the trip log CSV.
///
/// Only the columns the dashboard uses are read; the rest of the export
/// (start/stop times, station ids, user type) is ignored.
#[derive(Debug, Deserialize)]
pub struct TripRecord {
    pub trip_id: u64,
    pub from_station_name: Option<String>,
    pub to_station_name: Option<String>,
    pub trip_duration_seconds: f64,
    pub day: String,
}

/// A single row deserialized from the station locations CSV.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A prepared trip: station names cleaned, duration in minutes, day parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub trip_id: u64,
    pub from_station: String,
    pub to_station: String,
    pub duration_mins: f64,
    pub day: Weekday,
}

impl Trip {
    pub fn new(
        trip_id: u64,
        from_station: impl Into<String>,
        to_station: impl Into<String>,
        duration_secs: f64,
        day: Weekday,
    ) -> Self {
        Self {
            trip_id,
            from_station: from_station.into(),
            to_station: to_station.into(),
            duration_mins: duration_secs / 60.0,
            day,
        }
    }

    /// Day of week as 0 (Monday) through 6 (Sunday).
    pub fn day_num(&self) -> u32 {
        day_index(self.day)
    }
}

impl TryFrom<TripRecord> for Trip {
    type Error = anyhow::Error;

    fn try_from(record: TripRecord) -> anyhow::Result<Self> {
        let day = parse_day(&record.day)
            .ok_or_else(|| anyhow::anyhow!("trip {}: unknown day '{}'", record.trip_id, record.day))?;

        Ok(Trip::new(
            record.trip_id,
            clean_station_name(record.from_station_name),
            clean_station_name(record.to_station_name),
            record.trip_duration_seconds,
            day,
        ))
    }
}

fn clean_station_name(name: Option<String>) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n,
        _ => UNKNOWN_STATION.to_string(),
    }
}

/// Parses a day name such as `"Monday"` or `"mon"`, case-insensitively.
pub fn parse_day(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

/// Full English name of `day`, as it appears in the trip log.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn day_index(day: Weekday) -> u32 {
    day.num_days_from_monday()
}
