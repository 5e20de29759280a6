use serde::{Deserialize, Serialize};

pub const DEFAULT_PX_PER_SEC: f64 = 100.0;
pub const MIN_PX_PER_SEC: f64 = 20.0;
pub const MAX_PX_PER_SEC: f64 = 400.0;

const ZOOM_IN_FACTOR: f64 = 1.25;
const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Horizontal zoom of the timeline view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimelineScale {
    pub px_per_sec: f64,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            px_per_sec: DEFAULT_PX_PER_SEC,
        }
    }
}

impl TimelineScale {
    pub fn zoom_in(&mut self) {
        self.px_per_sec = (self.px_per_sec * ZOOM_IN_FACTOR).min(MAX_PX_PER_SEC);
    }

    pub fn zoom_out(&mut self) {
        self.px_per_sec = (self.px_per_sec * ZOOM_OUT_FACTOR).max(MIN_PX_PER_SEC);
    }

    /// X position of `seconds`, with the timeline origin at `offset_px`.
    pub fn time_to_px(&self, seconds: f64, offset_px: f64) -> f64 {
        offset_px + seconds * self.px_per_sec
    }

    /// Inverse of [`TimelineScale::time_to_px`], clamped to `>= 0`.
    pub fn px_to_time(&self, px: f64, offset_px: f64) -> f64 {
        ((px - offset_px) / self.px_per_sec).max(0.0)
    }
}
