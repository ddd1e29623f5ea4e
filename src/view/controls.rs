//! Control values and their validation.

use crate::aggregation::MapFilter;
use crate::dataset::DAYS_OF_WEEK;
use chrono::Weekday;
use std::collections::HashSet;
use thiserror::Error;

/// Most origin stations that can be selected at once.
pub const MAX_SELECTED_ORIGINS: usize = 5;

pub const DEFAULT_ORIGIN: &str = "Union Station";

/// Duration slider: bounds and step, in minutes.
pub const DURATION_BOUNDS: DurationRange = DurationRange { min: 5, max: 60 };
pub const DURATION_STEP: u32 = 5;
pub const DEFAULT_DURATION: DurationRange = DurationRange { min: 5, max: 15 };

/// A rejected control change. The previous controls stay in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("{selected} origin stations selected, select at most {max}")]
    TooManyOrigins { selected: usize, max: usize },
    #[error("unknown origin station '{0}'")]
    UnknownOrigin(String),
    #[error("duration range {min}-{max} is inverted")]
    InvertedDuration { min: u32, max: u32 },
    #[error("duration range {min}-{max} must lie within {lo}-{hi} minutes", lo = DURATION_BOUNDS.min, hi = DURATION_BOUNDS.max)]
    DurationOutOfBounds { min: u32, max: u32 },
    #[error("duration {0} is not a multiple of {step} minutes", step = DURATION_STEP)]
    DurationOffStep(u32),
}

/// Inclusive trip duration range in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), ControlError> {
        let Self { min, max } = *self;
        if min > max {
            return Err(ControlError::InvertedDuration { min, max });
        }
        if min < DURATION_BOUNDS.min || max > DURATION_BOUNDS.max {
            return Err(ControlError::DurationOutOfBounds { min, max });
        }
        if let Some(off) = [min, max].into_iter().find(|v| v % DURATION_STEP != 0) {
            return Err(ControlError::DurationOffStep(off));
        }
        Ok(())
    }
}

/// A single control change.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SelectOrigins(Vec<String>),
    SelectDays(Vec<Weekday>),
    SetDuration(DurationRange),
}

/// Current values of the three dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub origins: Vec<String>,
    pub days: HashSet<Weekday>,
    pub duration: DurationRange,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            origins: vec![DEFAULT_ORIGIN.to_string()],
            days: DAYS_OF_WEEK.into_iter().collect(),
            duration: DEFAULT_DURATION,
        }
    }
}

impl Controls {
    pub fn new(origins: Vec<String>, days: impl IntoIterator<Item = Weekday>, duration: DurationRange) -> Self {
        Self {
            origins: dedup(origins),
            days: days.into_iter().collect(),
            duration,
        }
    }

    /// Returns the controls with `event` applied. Does not validate.
    pub fn apply(&self, event: ControlEvent) -> Self {
        let mut next = self.clone();
        match event {
            ControlEvent::SelectOrigins(origins) => next.origins = dedup(origins),
            ControlEvent::SelectDays(days) => next.days = days.into_iter().collect(),
            ControlEvent::SetDuration(duration) => next.duration = duration,
        }
        next
    }

    /// Checks the selection against the origin options (sorted) and the slider rules.
    pub fn validate(&self, options: &[String]) -> Result<(), ControlError> {
        if self.origins.len() > MAX_SELECTED_ORIGINS {
            return Err(ControlError::TooManyOrigins {
                selected: self.origins.len(),
                max: MAX_SELECTED_ORIGINS,
            });
        }
        if let Some(unknown) = self
            .origins
            .iter()
            .find(|o| options.binary_search(*o).is_err())
        {
            return Err(ControlError::UnknownOrigin(unknown.clone()));
        }
        self.duration.validate()
    }

    /// Drops selected origins missing from the sorted `options` and returns them.
    pub fn retain_known_origins(&mut self, options: &[String]) -> Vec<String> {
        let (known, missing): (Vec<String>, Vec<String>) = self
            .origins
            .drain(..)
            .partition(|o| options.binary_search(o).is_ok());
        self.origins = known;
        missing
    }

    pub fn to_filter(&self) -> MapFilter {
        MapFilter {
            origins: self.origins.clone(),
            days: self.days.clone(),
            min_duration_mins: self.duration.min as f64,
            max_duration_mins: self.duration.max as f64,
        }
    }

    /// One-line description, e.g. `origins=[Union Station] days=[Monday] duration=5-15`.
    pub fn describe(&self) -> String {
        let days = self.to_filter().day_names();
        format!(
            "origins=[{}] days=[{}] duration={}-{}",
            self.origins.join("; "),
            days.join(", "),
            self.duration.min,
            self.duration.max
        )
    }
}

fn dedup(origins: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    origins
        .into_iter()
        .filter(|o| seen.insert(o.clone()))
        .collect()
}
