//! Aggregation engine.
//!
//! Pure functions from the prepared dataset to the tables the dashboard
//! displays: destination markers for the map and per-origin summary rows.
//! Nothing here keeps state between calls.

pub mod map;
pub mod palette;
pub mod summary;
pub mod types;
pub mod utility;

pub use map::build_map_dataset;
pub use summary::build_summary_table;
pub use types::{
    JoinWarning, MapDataset, MapFilter, MapResultRow, OriginMarkerRow, StationRole, SummaryRow,
    SummaryTable,
};
