//! Reactive view layer.
//!
//! Holds the current control values, recomputes the map whenever a control
//! changes and hands the new tables to a [`Renderer`]. The summary table is
//! built once when the dashboard starts.

pub mod command;
pub mod controls;
pub mod dashboard;
pub mod render;

pub use command::{Command, Flow, dispatch, parse_command};
pub use controls::{ControlError, ControlEvent, Controls, DurationRange};
pub use dashboard::{Dashboard, ViewModel, ViewState, recompute};
pub use render::{CsvRenderer, Renderer, TerminalRenderer};
