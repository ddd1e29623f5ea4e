use crate::aggregation::types::{SummaryRow, SummaryTable};
use crate::aggregation::utility::{by_count_desc, share, thousands};
use crate::dataset::Trip;
use std::collections::HashMap;
use tracing::debug;

/// Number of ranked destinations shown per origin.
pub const TOP_N: usize = 3;

/// Shown in a top-destination column when the origin has fewer than [`TOP_N`] destinations.
pub const TOP_DESTINATION_PLACEHOLDER: &str = "-";

/// Column titles of the summary table, in display order.
pub const COLUMN_TITLES: [&str; 6] = [
    "Origin",
    "No. of Trips",
    "Avg. Duration (mins)",
    "Top Destination (1)",
    "Top Destination (2)",
    "Top Destination (3)",
];

#[derive(Default)]
struct OriginAccumulator<'a> {
    trips: usize,
    total_mins: f64,
    destinations: HashMap<&'a str, usize>,
}

/// Summarizes every origin station in `trips`.
///
/// Rows come out busiest first. Destination ranks and row order break ties
/// on name so the table is stable across runs.
#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn build_summary_table(trips: &[Trip]) -> SummaryTable {
    let mut by_origin: HashMap<&str, OriginAccumulator> = HashMap::new();

    for trip in trips {
        let acc = by_origin.entry(trip.from_station.as_str()).or_default();
        acc.trips += 1;
        acc.total_mins += trip.duration_mins;
        *acc.destinations.entry(trip.to_station.as_str()).or_default() += 1;
    }

    let mut rows: Vec<SummaryRow> = by_origin
        .into_iter()
        .map(|(origin, acc)| summarize_origin(origin, acc))
        .collect();
    rows.sort_by(|a, b| b.trips.cmp(&a.trips).then_with(|| a.origin.cmp(&b.origin)));

    debug!(origins = rows.len(), "Summary table built");
    SummaryTable { rows }
}

fn summarize_origin(origin: &str, acc: OriginAccumulator) -> SummaryRow {
    let mut ranked: Vec<(&str, usize)> = acc.destinations.into_iter().collect();
    ranked.sort_by(by_count_desc);

    let total = acc.trips;
    let mut top = ranked
        .iter()
        .take(TOP_N)
        .filter_map(|(name, count)| share(*count, total).map(|p| format!("{name}, {p:.2}")));
    let mut next_top = || {
        top.next()
            .unwrap_or_else(|| TOP_DESTINATION_PLACEHOLDER.to_string())
    };

    SummaryRow {
        origin: origin.to_string(),
        trips: total,
        avg_duration_mins: acc.total_mins / total.max(1) as f64,
        top_one: next_top(),
        top_two: next_top(),
        top_three: next_top(),
    }
}

impl SummaryRow {
    /// Cells formatted for display: trips as `0,0`, duration as `0.0`.
    pub fn display_cells(&self) -> [String; 6] {
        [
            self.origin.clone(),
            thousands(self.trips),
            format!("{:.1}", self.avg_duration_mins),
            self.top_one.clone(),
            self.top_two.clone(),
            self.top_three.clone(),
        ]
    }
}
