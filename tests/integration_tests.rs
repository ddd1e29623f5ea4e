use bikeshare_dash::aggregation::summary::TOP_DESTINATION_PLACEHOLDER;
use bikeshare_dash::aggregation::{StationRole, build_summary_table};
use bikeshare_dash::dataset::{DatasetPaths, UNKNOWN_STATION, load_dataset};
use bikeshare_dash::fetch::BasicClient;
use bikeshare_dash::view::{
    ControlError, ControlEvent, Controls, CsvRenderer, Dashboard, DurationRange, recompute,
};
use chrono::Weekday;
use std::sync::Arc;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

async fn load_fixture_dataset() -> bikeshare_dash::dataset::Dataset {
    let paths = DatasetPaths {
        trips: fixture("trips.csv"),
        stations: fixture("stations.csv"),
    };
    load_dataset(&BasicClient::new().unwrap(), &paths)
        .await
        .expect("Failed to load fixtures")
}

#[tokio::test]
async fn test_default_controls_map() {
    let dataset = load_fixture_dataset().await;
    let view = recompute(&dataset, &Controls::default());
    let map = &view.map;

    let destinations: Vec<(&str, usize)> = map
        .destinations
        .iter()
        .map(|r| (r.destination.as_str(), r.trips))
        .collect();
    assert_eq!(
        destinations,
        vec![
            ("Bay St / College St (East Side)", 2),
            ("Queens Quay / Yonge St", 2),
            ("Wellesley St E / Yonge St", 1),
        ]
    );

    let proportions: f64 = map.destinations.iter().map(|r| r.proportion).sum();
    assert!((proportions - 1.0).abs() < 1e-9);
    assert_eq!(map.destinations[0].color, "#800026");
    assert_eq!(map.destinations[2].color_bucket, 4);
    assert!((map.destinations[1].avg_duration - 8.5).abs() < 1e-9);

    assert_eq!(map.origins.len(), 1);
    assert_eq!(map.origins[0].origin, "Union Station");

    assert_eq!(map.warnings.len(), 1);
    assert_eq!(map.warnings[0].station, "Closed Test Station");
    assert_eq!(map.warnings[0].role, StationRole::Destination);
}

#[tokio::test]
async fn test_summary_table_covers_every_trip() {
    let dataset = load_fixture_dataset().await;
    let table = build_summary_table(&dataset.trips);

    let origins: Vec<&str> = table.rows.iter().map(|r| r.origin.as_str()).collect();
    assert_eq!(
        origins,
        vec![
            "Union Station",
            "King St W / Spadina Ave",
            "Queens Quay / Yonge St",
            UNKNOWN_STATION,
        ]
    );
    assert_eq!(table.total_trips(), dataset.trips.len());

    let union = table.get("Union Station").unwrap();
    assert_eq!(union.trips, 7);
    assert!((union.avg_duration_mins - 5220.0 / 7.0 / 60.0).abs() < 1e-9);
    assert_eq!(union.top_one, "Bay St / College St (East Side), 0.29");
    assert_eq!(union.top_two, "Queens Quay / Yonge St, 0.29");
    assert_eq!(union.top_three, "Closed Test Station, 0.14");

    let king = table.get("King St W / Spadina Ave").unwrap();
    assert_eq!(king.top_one, "Union Station, 1.00");
    assert_eq!(king.top_two, TOP_DESTINATION_PLACEHOLDER);
    assert_eq!(king.top_three, TOP_DESTINATION_PLACEHOLDER);
}

#[tokio::test]
async fn test_dashboard_session() {
    let dataset = Arc::new(load_fixture_dataset().await);
    let dir = std::env::temp_dir().join("bikeshare_dash_integration_session");
    let _ = std::fs::remove_dir_all(&dir);

    let renderer = CsvRenderer::new(&dir).unwrap();
    let mut dashboard = Dashboard::new(dataset, Controls::default(), renderer).unwrap();
    assert!(dir.join("summary.csv").exists());

    let view = dashboard
        .handle(ControlEvent::SelectDays(vec![Weekday::Mon]))
        .unwrap();
    assert_eq!(view.map.destinations.len(), 1);
    assert_eq!(view.map.destinations[0].proportion, 1.0);

    let view = dashboard
        .handle(ControlEvent::SelectOrigins(vec![
            "Union Station".to_string(),
            "King St W / Spadina Ave".to_string(),
        ]))
        .unwrap();
    assert_eq!(view.map.origins.len(), 2);
    assert_eq!(view.map.destinations.len(), 2);

    let six: Vec<String> = (1..=6).map(|i| format!("Station {i}")).collect();
    let err = dashboard.handle(ControlEvent::SelectOrigins(six)).unwrap_err();
    assert!(matches!(err, ControlError::TooManyOrigins { selected: 6, .. }));
    assert_eq!(dashboard.view(), view);

    // Nothing passes a 45-60 minute window on Monday.
    let view = dashboard
        .handle(ControlEvent::SetDuration(DurationRange::new(45, 60)))
        .unwrap();
    assert!(view.map.destinations.is_empty());
    let map_csv = std::fs::read_to_string(dir.join("map.csv")).unwrap();
    let lines: Vec<&str> = map_csv.lines().collect();
    assert_eq!(
        lines,
        vec!["origin,destination,lat,lon,trips,avg_duration,color_bucket,color,proportion"]
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
