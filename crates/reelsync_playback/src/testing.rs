use crate::backend::{MediaBackend, PlayerEvent};
use crate::error::{PlaybackError, Result};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Open(String),
    SetSource(String),
    SetPosition(f64),
    Play,
    Pause,
    Close,
}

/// In-memory backend that records every call and replays queued events.
#[derive(Debug, Default)]
pub struct FakeBackend {
    calls: Vec<BackendCall>,
    metadata: bool,
    instant_metadata: bool,
    reject_play: bool,
    events: VecDeque<PlayerEvent>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources report metadata as soon as they are set, so seeks land at once.
    pub fn with_instant_metadata() -> Self {
        Self {
            instant_metadata: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(*c)).count()
    }

    pub fn last_position(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            BackendCall::SetPosition(p) => Some(*p),
            _ => None,
        })
    }

    pub fn set_metadata(&mut self, ready: bool) {
        self.metadata = ready;
    }

    pub fn reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }

    pub fn push_event(&mut self, event: PlayerEvent) {
        self.events.push_back(event);
    }
}

impl MediaBackend for FakeBackend {
    type Surface = String;

    fn open(&mut self, surface: &String) -> Result<()> {
        self.calls.push(BackendCall::Open(surface.clone()));
        Ok(())
    }

    fn set_source(&mut self, locator: &str) -> Result<()> {
        self.calls.push(BackendCall::SetSource(locator.to_string()));
        self.metadata = self.instant_metadata;
        Ok(())
    }

    fn has_metadata(&self) -> bool {
        self.metadata
    }

    fn set_position(&mut self, seconds: f64) -> Result<()> {
        self.calls.push(BackendCall::SetPosition(seconds));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.push(BackendCall::Play);
        if self.reject_play {
            return Err(PlaybackError::Backend("autoplay blocked".into()));
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.calls.push(BackendCall::Pause);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }

    fn close(&mut self) {
        self.calls.push(BackendCall::Close);
    }
}
