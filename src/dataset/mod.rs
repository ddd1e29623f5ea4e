//! Dataset preparation.
//!
//! Reads the trip log and the station table once at startup and turns them
//! into immutable in-memory tables that every view is computed from.

pub mod loader;
pub mod types;

pub use loader::{DatasetPaths, load_dataset};
pub use types::{DAYS_OF_WEEK, Station, Trip, TripRecord, UNKNOWN_STATION, day_index, day_name, parse_day};

use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Station lookup keyed by name.
#[derive(Debug, Default, Clone)]
pub struct StationIndex {
    by_name: HashMap<String, Station>,
}

impl StationIndex {
    /// Builds the index, keeping the first record when a name repeats.
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let mut by_name = HashMap::new();
        for station in stations {
            if by_name.contains_key(&station.name) {
                warn!(station = %station.name, "Duplicate station record, keeping first");
                continue;
            }
            by_name.insert(station.name.clone(), station);
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Station> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// The prepared trip log plus station coordinates. Never mutated after load.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub trips: Vec<Trip>,
    pub stations: StationIndex,
}

impl Dataset {
    pub fn new(trips: Vec<Trip>, stations: impl IntoIterator<Item = Station>) -> Self {
        Self {
            trips,
            stations: StationIndex::new(stations),
        }
    }

    /// Sorted distinct origin station names: the options of the origin selector.
    pub fn origin_stations(&self) -> Vec<String> {
        self.trips
            .iter()
            .map(|t| t.from_station.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
