use crate::aggregation::{MapDataset, SummaryTable, build_map_dataset, build_summary_table};
use crate::dataset::Dataset;
use crate::view::controls::{ControlError, ControlEvent, Controls};
use crate::view::render::Renderer;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Whether the dashboard is showing a finished view or building the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Recomputing,
}

/// The map as displayed for one set of control values.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub controls: Controls,
    pub map: MapDataset,
}

/// Computes the map view for `controls`. Same inputs, same output.
pub fn recompute(dataset: &Dataset, controls: &Controls) -> ViewModel {
    ViewModel {
        controls: controls.clone(),
        map: build_map_dataset(&dataset.trips, &dataset.stations, &controls.to_filter()),
    }
}

/// Binds controls to the aggregation engine and a renderer.
///
/// Every accepted control change rebuilds the map view from scratch and swaps
/// it in whole; a rejected change leaves the current view on display.
pub struct Dashboard<R> {
    dataset: Arc<Dataset>,
    origin_options: Vec<String>,
    controls: Controls,
    state: ViewState,
    view: Arc<ViewModel>,
    summary: Arc<SummaryTable>,
    renderer: R,
}

impl<R: Renderer> Dashboard<R> {
    /// Builds the summary table and the initial map, then renders both.
    pub fn new(dataset: Arc<Dataset>, controls: Controls, renderer: R) -> Result<Self, ControlError> {
        let origin_options = dataset.origin_stations();
        controls.validate(&origin_options)?;

        let summary = Arc::new(build_summary_table(&dataset.trips));
        let view = Arc::new(recompute(&dataset, &controls));
        info!(
            origins = origin_options.len(),
            summary_rows = summary.len(),
            "Dashboard ready"
        );

        let mut dashboard = Self {
            dataset,
            origin_options,
            controls,
            state: ViewState::Idle,
            view,
            summary,
            renderer,
        };
        dashboard.redraw_summary();
        dashboard.redraw();
        Ok(dashboard)
    }

    /// Applies a control change.
    ///
    /// Returns the new view, or the validation error if the change was
    /// rejected. Rejection never disturbs the displayed view.
    #[tracing::instrument(skip(self))]
    pub fn handle(&mut self, event: ControlEvent) -> Result<Arc<ViewModel>, ControlError> {
        let next = self.controls.apply(event);
        if let Err(e) = next.validate(&self.origin_options) {
            warn!(error = %e, "Control change rejected");
            return Err(e);
        }

        self.state = ViewState::Recomputing;
        let view = Arc::new(recompute(&self.dataset, &next));
        self.controls = next;
        self.view = view;
        self.state = ViewState::Idle;

        info!(
            controls = %self.controls.describe(),
            destinations = self.view.map.destinations.len(),
            "Updated!"
        );
        self.redraw();
        Ok(Arc::clone(&self.view))
    }

    /// Renders the current map view again.
    pub fn redraw(&mut self) {
        if let Err(e) = self.renderer.render_map(&self.view) {
            error!(error = %e, "Failed to render map");
        }
    }

    pub fn redraw_summary(&mut self) {
        if let Err(e) = self.renderer.render_summary(&self.summary) {
            error!(error = %e, "Failed to render summary table");
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn view(&self) -> Arc<ViewModel> {
        Arc::clone(&self.view)
    }

    pub fn summary(&self) -> Arc<SummaryTable> {
        Arc::clone(&self.summary)
    }

    /// Sorted origin station names that may be selected.
    pub fn origin_options(&self) -> &[String] {
        &self.origin_options
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
