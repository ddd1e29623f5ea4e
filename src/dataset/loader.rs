//! CSV loading for the trip log and station table.

use super::types::{Station, Trip, TripRecord};
use super::Dataset;
use crate::fetch::{SourceClient, read_source};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::info;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where the two input tables live. Each entry is a local path or a URL.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub trips: String,
    pub stations: String,
}

/// Loads and prepares both tables. Called once at process startup.
#[tracing::instrument(skip(client), fields(trips = %paths.trips, stations = %paths.stations))]
pub async fn load_dataset<C: SourceClient>(client: &C, paths: &DatasetPaths) -> Result<Dataset> {
    let trip_bytes = read_source(client, &paths.trips).await?;
    let station_bytes = read_source(client, &paths.stations).await?;

    let trips = read_trips(open(&trip_bytes))
        .with_context(|| format!("failed to parse trip log {}", paths.trips))?;
    let stations = read_stations(open(&station_bytes))
        .with_context(|| format!("failed to parse station table {}", paths.stations))?;

    let dataset = Dataset::new(trips, stations);
    info!(
        trips = dataset.trips.len(),
        stations = dataset.stations.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Wraps `bytes` in a gzip decoder when they carry the gzip magic number.
fn open(bytes: &[u8]) -> Box<dyn Read + '_> {
    if bytes.starts_with(&GZIP_MAGIC) {
        Box::new(GzDecoder::new(bytes))
    } else {
        Box::new(bytes)
    }
}

pub fn read_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut trips = Vec::new();

    for result in rdr.deserialize() {
        let record: TripRecord = result?;
        trips.push(Trip::try_from(record)?);
    }

    Ok(trips)
}

pub fn read_stations<R: Read>(reader: R) -> Result<Vec<Station>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut stations = Vec::new();

    for result in rdr.deserialize() {
        let record: Station = result?;
        stations.push(record);
    }

    Ok(stations)
}
