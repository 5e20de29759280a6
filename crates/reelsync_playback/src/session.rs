use crate::backend::{MediaBackend, PlayerEvent};
use crate::config::PlaybackConfig;
use crate::coordinator::PlaybackCoordinator;
use crate::error::Result;
use crate::playhead::PlayheadClock;
use reelsync_core::action::EditorAction;
use reelsync_core::export::{export_timeline, TimelineExport};
use reelsync_core::reducer::EditorStore;
use reelsync_core::types::EditorState;
use std::time::Instant;

/// One editor: the store, the coordinator driving the player and the visual
/// playhead, kept consistent after every input.
///
/// All inputs (user actions, player events, display frames) come in through
/// methods taking `now`, so the whole loop can be driven by a test clock.
pub struct EditorSession<B: MediaBackend> {
    store: EditorStore,
    coordinator: PlaybackCoordinator<B>,
    playhead: PlayheadClock,
    max_settle_rounds: usize,
}

impl<B: MediaBackend> EditorSession<B> {
    pub fn new(backend: B, config: PlaybackConfig) -> Self {
        Self::with_state(backend, config, EditorState::default())
    }

    pub fn with_state(backend: B, config: PlaybackConfig, state: EditorState) -> Self {
        Self {
            store: EditorStore::with_state(state),
            playhead: PlayheadClock::new(config.seek_threshold),
            max_settle_rounds: config.max_settle_rounds,
            coordinator: PlaybackCoordinator::new(backend, config),
        }
    }

    pub fn attach(&mut self, surface: &B::Surface) -> Result<()> {
        self.coordinator.attach(surface)?;
        self.settle(Instant::now());
        Ok(())
    }

    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn visual_time(&self) -> f64 {
        self.playhead.visual_time()
    }

    pub fn playhead(&self) -> &PlayheadClock {
        &self.playhead
    }

    pub fn coordinator(&self) -> &PlaybackCoordinator<B> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut PlaybackCoordinator<B> {
        &mut self.coordinator
    }

    pub fn dispatch(&mut self, action: EditorAction) -> bool {
        self.dispatch_at(action, Instant::now())
    }

    /// Apply `action` and let the coordinator react. Returns whether the
    /// state changed.
    pub fn dispatch_at(&mut self, action: EditorAction, now: Instant) -> bool {
        if action.is_structural() {
            tracing::debug!(?action, "dispatch");
        }
        let changed = self.store.dispatch(&action);
        if changed {
            self.settle(now);
        }
        changed
    }

    pub fn handle_player_event(&mut self, event: PlayerEvent, now: Instant) -> bool {
        let actions = self.coordinator.on_player_event(event);
        self.apply(actions, now)
    }

    pub fn poll_player(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for event in self.coordinator.take_player_events() {
            changed |= self.handle_player_event(event, now);
        }
        changed
    }

    /// Run one display frame. Returns the playhead position if it is animating.
    pub fn on_frame(&mut self, now: Instant) -> Option<f64> {
        let actions = self.coordinator.on_frame();
        self.apply(actions, now);
        self.playhead.on_frame(now)
    }

    pub fn export(&self) -> TimelineExport {
        export_timeline(self.store.state())
    }

    pub fn dispose(&mut self) {
        self.coordinator.dispose();
        self.playhead.stop();
    }

    fn apply(&mut self, actions: Vec<EditorAction>, now: Instant) -> bool {
        if actions.is_empty() {
            return false;
        }
        let mut changed = false;
        for action in &actions {
            changed |= self.store.dispatch(action);
        }
        self.settle(now);
        changed
    }

    /// Feed the state back to the coordinator until it has nothing more to
    /// say, then move the playhead.
    fn settle(&mut self, now: Instant) {
        let mut rounds = 0;
        loop {
            let actions = self.coordinator.sync(self.store.state());
            if actions.is_empty() {
                break;
            }
            rounds += 1;
            if rounds > self.max_settle_rounds {
                tracing::warn!(rounds, "playback loop did not settle, dropping corrections");
                break;
            }
            for action in &actions {
                self.store.dispatch(action);
            }
        }

        let state = self.store.state();
        self.playhead.sync(state.current_time, state.is_playing, now);
    }
}
