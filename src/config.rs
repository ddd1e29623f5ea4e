//! Dashboard configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "trips_path": "data/Q3-2016_BikeShare.csv",
//!   "stations_path": "data/stations_locations.csv",
//!   "default_origins": ["Union Station"],
//!   "default_duration": [5, 15]
//! }
//! ```
//! `BIKESHARE_TRIPS` and `BIKESHARE_STATIONS` override the data paths.

use crate::dataset::DatasetPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const TRIPS_ENV: &str = "BIKESHARE_TRIPS";
pub const STATIONS_ENV: &str = "BIKESHARE_STATIONS";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub trips_path: String,
    pub stations_path: String,
    pub default_origins: Vec<String>,
    pub default_duration: (u32, u32),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            trips_path: "data/Q3-2016_BikeShare.csv".to_string(),
            stations_path: "data/stations_locations.csv".to_string(),
            default_origins: vec!["Union Station".to_string()],
            default_duration: (5, 15),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
        let config: Self =
            serde_json::from_str(&content).with_context(|| format!("invalid config {path}"))?;
        Ok(config)
    }

    /// Applies `BIKESHARE_TRIPS` / `BIKESHARE_STATIONS` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(TRIPS_ENV).ok(),
            std::env::var(STATIONS_ENV).ok(),
        )
    }

    pub fn with_overrides(mut self, trips: Option<String>, stations: Option<String>) -> Self {
        if let Some(trips) = trips {
            self.trips_path = trips;
        }
        if let Some(stations) = stations {
            self.stations_path = stations;
        }
        self
    }

    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            trips: self.trips_path.clone(),
            stations: self.stations_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_partial_config_fills_defaults() {
        let path = format!("{}/bikeshare_dash_config_partial.json", env::temp_dir().display());
        fs::write(&path, r#"{ "trips_path": "trips.csv.gz", "default_duration": [10, 30] }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.trips_path, "trips.csv.gz");
        assert_eq!(config.stations_path, DashboardConfig::default().stations_path);
        assert_eq!(config.default_duration, (10, 30));
        assert_eq!(config.default_origins, vec!["Union Station"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let path = format!("{}/bikeshare_dash_config_invalid.json", env::temp_dir().display());
        fs::write(&path, "not json").unwrap();

        assert!(DashboardConfig::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::default().with_overrides(None, Some("s.csv".to_string()));
        let paths = config.dataset_paths();

        assert_eq!(paths.trips, "data/Q3-2016_BikeShare.csv");
        assert_eq!(paths.stations, "s.csv");
    }
}
