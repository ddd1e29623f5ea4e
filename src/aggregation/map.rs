use crate::aggregation::palette::{color, color_bucket};
use crate::aggregation::types::{
    JoinWarning, MapDataset, MapFilter, MapResultRow, OriginMarkerRow, StationRole,
};
use crate::aggregation::utility::{by_count_desc, share};
use crate::dataset::{StationIndex, Trip};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Default)]
struct DestinationGroup {
    trips: usize,
    total_mins: f64,
}

/// Builds destination and origin markers for the selected origins.
///
/// Each origin's destinations are counted over trips that start at the
/// origin, fall on a selected day and last between the duration bounds
/// (inclusive). Destinations without coordinates are dropped and reported in
/// [`MapDataset::warnings`]. An origin with no remaining trips adds no rows.
#[tracing::instrument(skip_all, fields(origins = filter.origins.len(), days = filter.days.len()))]
pub fn build_map_dataset(trips: &[Trip], stations: &StationIndex, filter: &MapFilter) -> MapDataset {
    let mut result = MapDataset::default();
    let mut seen = HashSet::new();

    for origin in &filter.origins {
        if !seen.insert(origin.as_str()) {
            continue;
        }
        build_origin_rows(trips, stations, filter, origin, &mut result);
    }

    seen.clear();
    for origin in &filter.origins {
        if !seen.insert(origin.as_str()) {
            continue;
        }
        match stations.get(origin) {
            Some(station) => result.origins.push(OriginMarkerRow {
                origin: origin.clone(),
                lat: station.lat,
                lon: station.lon,
            }),
            None => {
                warn!(origin = %origin, "Origin station has no coordinates, skipping marker");
                result.warnings.push(JoinWarning {
                    station: origin.clone(),
                    role: StationRole::Origin,
                    origin: origin.clone(),
                    trips: 0,
                });
            }
        }
    }

    debug!(
        destinations = result.destinations.len(),
        origins = result.origins.len(),
        warnings = result.warnings.len(),
        "Map dataset built"
    );
    result
}

fn build_origin_rows(
    trips: &[Trip],
    stations: &StationIndex,
    filter: &MapFilter,
    origin: &str,
    result: &mut MapDataset,
) {
    let mut groups: HashMap<&str, DestinationGroup> = HashMap::new();

    for trip in trips {
        if trip.from_station != origin
            || !filter.days.contains(&trip.day)
            || trip.duration_mins < filter.min_duration_mins
            || trip.duration_mins > filter.max_duration_mins
        {
            continue;
        }
        let group = groups.entry(trip.to_station.as_str()).or_default();
        group.trips += 1;
        group.total_mins += trip.duration_mins;
    }

    let mut ranked: Vec<(&str, usize)> = groups.iter().map(|(name, g)| (*name, g.trips)).collect();
    ranked.sort_by(by_count_desc);

    // Join against the station table first; the shading and shares are
    // relative to the destinations that can actually be drawn.
    let mut joined = Vec::with_capacity(ranked.len());
    for (destination, count) in ranked {
        match stations.get(destination) {
            Some(station) => joined.push((destination, count, station)),
            None => {
                warn!(
                    origin,
                    destination,
                    trips = count,
                    "Destination station has no coordinates, dropping"
                );
                result.warnings.push(JoinWarning {
                    station: destination.to_string(),
                    role: StationRole::Destination,
                    origin: origin.to_string(),
                    trips: count,
                });
            }
        }
    }

    let max_trips = joined.iter().map(|(_, count, _)| *count).max().unwrap_or(0);
    let total_trips: usize = joined.iter().map(|(_, count, _)| *count).sum();

    for (destination, count, station) in joined {
        let (Some(bucket), Some(proportion)) = (color_bucket(count, max_trips), share(count, total_trips))
        else {
            continue;
        };
        let group = &groups[destination];

        result.destinations.push(MapResultRow {
            origin: origin.to_string(),
            destination: destination.to_string(),
            lat: station.lat,
            lon: station.lon,
            trips: count,
            avg_duration: group.total_mins / group.trips as f64,
            color_bucket: bucket,
            color: color(bucket),
            proportion,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::palette::BUCKET_COUNT;
    use crate::dataset::{DAYS_OF_WEEK, Station};
    use chrono::Weekday;

    fn station(name: &str, lat: f64, lon: f64) -> Station {
        Station {
            name: name.to_string(),
            lat,
            lon,
        }
    }

    fn scenario() -> (Vec<Trip>, StationIndex) {
        let trips = vec![
            Trip::new(1, "A", "B", 600.0, Weekday::Mon),
            Trip::new(2, "A", "C", 900.0, Weekday::Mon),
            Trip::new(3, "A", "B", 480.0, Weekday::Tue),
        ];
        let stations = StationIndex::new(vec![
            station("A", 0.0, 0.0),
            station("B", 1.0, 1.0),
            station("C", 2.0, 2.0),
        ]);
        (trips, stations)
    }

    #[test]
    fn test_two_destination_scenario() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["A"], [Weekday::Mon, Weekday::Tue], 5.0, 20.0);

        let map = build_map_dataset(&trips, &stations, &filter);

        assert_eq!(map.destinations.len(), 2);
        let b = &map.destinations[0];
        assert_eq!(b.destination, "B");
        assert_eq!(b.trips, 2);
        assert!((b.avg_duration - 9.0).abs() < 1e-9);
        assert!((b.proportion - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!((b.lat, b.lon), (1.0, 1.0));
        assert_eq!(b.color_bucket, BUCKET_COUNT - 1);

        let c = &map.destinations[1];
        assert_eq!(c.destination, "C");
        assert_eq!(c.trips, 1);
        assert!((c.avg_duration - 15.0).abs() < 1e-9);
        assert!((c.proportion - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(c.color_bucket, 4);

        assert_eq!(
            map.origins,
            vec![OriginMarkerRow {
                origin: "A".to_string(),
                lat: 0.0,
                lon: 0.0
            }]
        );
        assert!(map.warnings.is_empty());
    }

    #[test]
    fn test_tooltip() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["A"], DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert_eq!(
            map.destinations[1].tooltip(),
            "Station: C\nOrigin: A\nNo. of Trips: 1\nAvg. Duration (mins): 15.0\nShare of Trips from Origin: 33%"
        );
    }

    #[test]
    fn test_empty_selection_is_empty() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(Vec::<String>::new(), DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert!(map.is_empty());
        assert!(map.warnings.is_empty());
    }

    #[test]
    fn test_origin_without_matching_trips_adds_no_rows() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["A"], [Weekday::Sat], 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert!(map.destinations.is_empty());
        // The origin itself is still marked.
        assert_eq!(map.origins.len(), 1);
    }

    #[test]
    fn test_duration_bounds_are_inclusive() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["A"], DAYS_OF_WEEK, 8.0, 10.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert_eq!(map.destinations.len(), 1);
        assert_eq!(map.destinations[0].trips, 2);
        assert_eq!(map.destinations[0].proportion, 1.0);
    }

    #[test]
    fn test_unmatched_destination_dropped_with_warning() {
        let (mut trips, stations) = scenario();
        trips.push(Trip::new(4, "A", "Nowhere", 600.0, Weekday::Mon));
        let filter = MapFilter::new(["A"], DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);

        assert!(map.destinations.iter().all(|r| r.destination != "Nowhere"));
        assert_eq!(map.warnings.len(), 1);
        assert_eq!(map.warnings[0].station, "Nowhere");
        assert_eq!(map.warnings[0].role, StationRole::Destination);
        assert_eq!(map.warnings[0].trips, 1);

        let total: f64 = map.destinations.iter().map(|r| r.proportion).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_origin_gets_no_marker() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["Ghost"], DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert!(map.origins.is_empty());
        assert_eq!(map.warnings[0].role, StationRole::Origin);
    }

    #[test]
    fn test_duplicate_origins_processed_once() {
        let (trips, stations) = scenario();
        let filter = MapFilter::new(["A", "A"], DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert_eq!(map.destinations.len(), 2);
        assert_eq!(map.origins.len(), 1);
    }

    #[test]
    fn test_many_origins_proportions_and_buckets() {
        let names = ["S0", "S1", "S2", "S3", "S4", "S5", "S6"];
        let mut trips = Vec::new();
        let mut id = 0;
        for (i, from) in names.iter().enumerate() {
            for (j, to) in names.iter().enumerate() {
                for _ in 0..((i + 2 * j) % 5 + 1) {
                    id += 1;
                    trips.push(Trip::new(id, *from, *to, 600.0, DAYS_OF_WEEK[id as usize % 7]));
                }
            }
        }
        let stations = StationIndex::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| station(n, i as f64, -(i as f64))),
        );
        let filter = MapFilter::new(names, DAYS_OF_WEEK, 5.0, 60.0);

        let map = build_map_dataset(&trips, &stations, &filter);
        assert_eq!(map.origins.len(), names.len());

        for origin in names {
            let mut rows: Vec<_> = map.destinations_from(origin).collect();
            let total: f64 = rows.iter().map(|r| r.proportion).sum();
            assert!((total - 1.0).abs() < 1e-9, "{origin} sums to {total}");

            rows.sort_by_key(|r| r.trips);
            for pair in rows.windows(2) {
                assert!(pair[0].color_bucket <= pair[1].color_bucket);
            }
            assert!(rows.iter().all(|r| r.color_bucket < BUCKET_COUNT));
        }
    }
}
