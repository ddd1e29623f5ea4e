pub mod aggregation;
pub mod config;
pub mod dataset;
pub mod fetch;
pub mod output;
pub mod view;
