use crate::error::PreviewError;
use crate::mpv::MpvController;
use reelsync_playback::backend::{MediaBackend, PlayerEvent};
use reelsync_playback::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen rectangle of the preview window, in X11 `WxH+X+Y` form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for WindowGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for WindowGeometry {
    type Err = PreviewError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || PreviewError::InvalidGeometry(s.to_string());
        let (width, rest) = s.split_once('x').ok_or_else(invalid)?;
        let mut parts = rest.splitn(3, '+');
        let (Some(height), Some(x), Some(y)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let geometry = Self {
            x: x.parse().map_err(|_| invalid())?,
            y: y.parse().map_err(|_| invalid())?,
            width: width.parse().map_err(|_| invalid())?,
            height: height.parse().map_err(|_| invalid())?,
        };
        if geometry.width == 0 || geometry.height == 0 {
            return Err(invalid());
        }
        Ok(geometry)
    }
}

/// [`MediaBackend`] over an external mpv window.
///
/// mpv is polled rather than subscribed to, so progress arrives in discrete
/// steps of the poll interval.
pub struct MpvBackend {
    mpv: MpvController,
    metadata_ready: bool,
    last_position: Option<f64>,
    eof_reported: bool,
}

impl Default for MpvBackend {
    fn default() -> Self {
        Self::new(MpvController::new())
    }
}

impl MpvBackend {
    pub fn new(mpv: MpvController) -> Self {
        Self {
            mpv,
            metadata_ready: false,
            last_position: None,
            eof_reported: false,
        }
    }

    fn collect_events(&mut self, events: &mut Vec<PlayerEvent>) -> crate::error::Result<()> {
        if !self.metadata_ready && self.mpv.get_property("duration")?.is_some() {
            self.metadata_ready = true;
            events.push(PlayerEvent::MetadataReady);
        }

        if let Some(position) = self.mpv.get_position()? {
            if self.last_position != Some(position) {
                self.last_position = Some(position);
                events.push(PlayerEvent::TimeUpdate(position));
            }
        }

        let eof = self
            .mpv
            .get_property("eof-reached")?
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if eof && !self.eof_reported {
            events.push(PlayerEvent::Ended);
        }
        self.eof_reported = eof;
        Ok(())
    }
}

impl MediaBackend for MpvBackend {
    type Surface = WindowGeometry;

    fn open(&mut self, surface: &WindowGeometry) -> Result<()> {
        self.mpv.start_at(surface)?;
        Ok(())
    }

    fn set_source(&mut self, locator: &str) -> Result<()> {
        tracing::debug!(locator, "mpv loadfile");
        self.mpv.load_file(locator)?;
        self.metadata_ready = false;
        self.last_position = None;
        self.eof_reported = false;
        Ok(())
    }

    fn has_metadata(&self) -> bool {
        self.metadata_ready
    }

    fn set_position(&mut self, seconds: f64) -> Result<()> {
        self.mpv.seek(seconds)?;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.mpv.resume()?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.mpv.pause()?;
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if !self.mpv.is_running() {
            return events;
        }
        if let Err(e) = self.collect_events(&mut events) {
            tracing::warn!(error = %e, "mpv poll failed");
        }
        events
    }

    fn close(&mut self) {
        self.mpv.stop();
        self.metadata_ready = false;
        self.last_position = None;
        self.eof_reported = false;
    }
}
