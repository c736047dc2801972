//! Playhead, start and end controls over a [`TimeRange`]

use serde::Serialize;

use crate::domain::model::{TimeRange, TimeSpec};

/// Control granularity in seconds
pub const STEP_SECONDS: f64 = 0.001;

/// Which of the three controls an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Playhead,
    Start,
    End,
}

/// One single-value control with its current bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeControl {
    pub kind: ControlKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl RangeControl {
    /// Snap a raw value to the step grid anchored at `min`, then clamp into bounds
    pub fn select(&self, raw: f64) -> f64 {
        if !raw.is_finite() || self.max <= self.min {
            return self.min;
        }
        let steps = ((raw - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Value and bounds as shown beside the control
    pub fn label(&self) -> String {
        format!(
            "{} [{} .. {}]",
            TimeSpec::from_seconds(self.value),
            TimeSpec::from_seconds(self.min),
            TimeSpec::from_seconds(self.max)
        )
    }
}

/// The three controls, bounds taken from the state at the moment of asking
pub struct RangeSelector;

impl RangeSelector {
    /// playhead `[0, duration]`, start `[0, end]`, end `[start, duration]`
    pub fn controls(range: &TimeRange) -> [RangeControl; 3] {
        [
            Self::control(range, ControlKind::Playhead),
            Self::control(range, ControlKind::Start),
            Self::control(range, ControlKind::End),
        ]
    }

    pub fn control(range: &TimeRange, kind: ControlKind) -> RangeControl {
        let (min, max, value) = match kind {
            ControlKind::Playhead => (0.0, range.duration(), range.current_time()),
            ControlKind::Start => (0.0, range.end_time(), range.start_time()),
            ControlKind::End => (range.start_time(), range.duration(), range.end_time()),
        };
        RangeControl {
            kind,
            min,
            max,
            step: STEP_SECONDS,
            value,
        }
    }

    /// Apply one change event and write the selected value; returns it
    pub fn change(range: &mut TimeRange, kind: ControlKind, raw: f64) -> f64 {
        let value = Self::control(range, kind).select(raw);
        match kind {
            ControlKind::Playhead => range.set_current_time(value),
            ControlKind::Start => range.set_start_time(value),
            ControlKind::End => range.set_end_time(value),
        }
        value
    }
}
