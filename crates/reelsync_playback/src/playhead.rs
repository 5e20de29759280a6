use crate::frame::{FrameHandle, FrameScheduler};
use reelsync_core::scale::TimelineScale;
use std::time::Instant;

/// Smooth visual playhead.
///
/// Authoritative time only moves when the player reports progress, which is
/// too coarse to draw from. While playing, this clock interpolates from the
/// last authoritative value using wall time and only snaps back when the two
/// drift further apart than the threshold. It never feeds back into state.
#[derive(Debug)]
pub struct PlayheadClock {
    base_time: f64,
    base_instant: Option<Instant>,
    visual_time: f64,
    is_playing: bool,
    threshold: f64,
    frames: FrameScheduler<()>,
    frame: Option<FrameHandle>,
}

impl PlayheadClock {
    pub fn new(threshold: f64) -> Self {
        Self {
            base_time: 0.0,
            base_instant: None,
            visual_time: 0.0,
            is_playing: false,
            threshold,
            frames: FrameScheduler::new(),
            frame: None,
        }
    }

    pub fn visual_time(&self) -> f64 {
        self.visual_time
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some_and(|h| self.frames.is_pending(h))
    }

    /// Follow a new authoritative snapshot.
    pub fn sync(&mut self, current_time: f64, is_playing: bool, now: Instant) {
        let drift = (current_time - self.visual_time).abs();
        if !is_playing || drift > self.threshold {
            self.base_time = current_time;
            self.base_instant = is_playing.then_some(now);
            self.visual_time = current_time;
        }

        if is_playing == self.is_playing {
            return;
        }
        self.is_playing = is_playing;
        if is_playing {
            self.base_time = current_time;
            self.base_instant = Some(now);
            self.visual_time = current_time;
            self.request_frame();
        } else {
            self.stop();
        }
    }

    /// Advance on a display frame. `None` when the clock is not running.
    pub fn on_frame(&mut self, now: Instant) -> Option<f64> {
        if self.frames.drain().is_empty() {
            return None;
        }
        self.frame = None;
        let base_instant = self.base_instant?;

        let elapsed = now.saturating_duration_since(base_instant).as_secs_f64();
        self.visual_time = self.base_time + elapsed;
        self.request_frame();
        Some(self.visual_time)
    }

    /// Pixel position of the playhead on a timeline drawn with `scale`.
    pub fn position_px(&self, scale: &TimelineScale, offset_px: f64) -> f64 {
        scale.time_to_px(self.visual_time, offset_px)
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.frames.cancel(handle);
        }
        self.base_instant = None;
    }

    fn request_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.frames.cancel(handle);
        }
        self.frame = Some(self.frames.request(()));
    }
}
