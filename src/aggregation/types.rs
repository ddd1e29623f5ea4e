//! Data types produced by the aggregation engine.

use crate::dataset::{DAYS_OF_WEEK, day_name};
use crate::output::CsvTable;
use chrono::Weekday;
use serde::Serialize;
use std::collections::HashSet;

/// Filter parameters for the destination map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFilter {
    pub origins: Vec<String>,
    pub days: HashSet<Weekday>,
    pub min_duration_mins: f64,
    pub max_duration_mins: f64,
}

impl MapFilter {
    pub fn new(
        origins: impl IntoIterator<Item = impl Into<String>>,
        days: impl IntoIterator<Item = Weekday>,
        min_duration_mins: f64,
        max_duration_mins: f64,
    ) -> Self {
        Self {
            origins: origins.into_iter().map(Into::into).collect(),
            days: days.into_iter().collect(),
            min_duration_mins,
            max_duration_mins,
        }
    }

    /// Selected day names in Monday-first order.
    pub fn day_names(&self) -> Vec<&'static str> {
        DAYS_OF_WEEK
            .iter()
            .filter(|d| self.days.contains(*d))
            .map(|d| day_name(*d))
            .collect()
    }
}

/// One destination marker: trips from `origin` ending at `destination`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapResultRow {
    pub origin: String,
    pub destination: String,
    pub lat: f64,
    pub lon: f64,
    pub trips: usize,
    pub avg_duration: f64,
    pub color_bucket: usize,
    pub color: &'static str,
    pub proportion: f64,
}

impl CsvTable for MapResultRow {
    const COLUMNS: &'static [&'static str] = &[
        "origin",
        "destination",
        "lat",
        "lon",
        "trips",
        "avg_duration",
        "color_bucket",
        "color",
        "proportion",
    ];
}

impl MapResultRow {
    /// Hover text for the marker, one `label: value` pair per line.
    pub fn tooltip(&self) -> String {
        format!(
            "Station: {}\nOrigin: {}\nNo. of Trips: {}\nAvg. Duration (mins): {:.1}\nShare of Trips from Origin: {:.0}%",
            self.destination,
            self.origin,
            self.trips,
            self.avg_duration,
            self.proportion * 100.0
        )
    }
}

/// Location of a selected origin, drawn distinctly from destinations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginMarkerRow {
    pub origin: String,
    pub lat: f64,
    pub lon: f64,
}

impl CsvTable for OriginMarkerRow {
    const COLUMNS: &'static [&'static str] = &["origin", "lat", "lon"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationRole {
    Origin,
    Destination,
}

/// A station name that had no coordinates and was left off the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinWarning {
    pub station: String,
    pub role: StationRole,
    /// Origin whose trips referenced the station.
    pub origin: String,
    /// Trips that were dropped along with the marker.
    pub trips: usize,
}

/// Everything the map needs for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapDataset {
    pub destinations: Vec<MapResultRow>,
    pub origins: Vec<OriginMarkerRow>,
    pub warnings: Vec<JoinWarning>,
}

impl MapDataset {
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty() && self.origins.is_empty()
    }

    /// Destination rows belonging to `origin`.
    pub fn destinations_from<'a>(&'a self, origin: &'a str) -> impl Iterator<Item = &'a MapResultRow> {
        self.destinations.iter().filter(move |r| r.origin == origin)
    }
}

/// Per-origin statistics over the whole trip log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub origin: String,
    pub trips: usize,
    pub avg_duration_mins: f64,
    pub top_one: String,
    pub top_two: String,
    pub top_three: String,
}

impl CsvTable for SummaryRow {
    const COLUMNS: &'static [&'static str] = &[
        "origin",
        "trips",
        "avg_duration_mins",
        "top_one",
        "top_two",
        "top_three",
    ];
}

/// Summary rows ordered busiest first, unique by origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn get(&self, origin: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.origin == origin)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_trips(&self) -> usize {
        self.rows.iter().map(|r| r.trips).sum()
    }
}
