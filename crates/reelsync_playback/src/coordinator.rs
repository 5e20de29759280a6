use crate::backend::{MediaBackend, PlayerEvent};
use crate::config::PlaybackConfig;
use crate::controller::PlayerController;
use crate::error::Result;
use crate::frame::{FrameHandle, FrameScheduler};
use reelsync_core::action::EditorAction;
use reelsync_core::arrange::total_duration;
use reelsync_core::resolve::resolve_active_segment;
use reelsync_core::types::{EditorState, SegmentId, VideoSegment};

/// Where the coordinator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
    /// No player bound.
    Idle,
    /// Player bound, no segment loaded yet.
    Bound,
    /// Source of this segment assigned (a seek may still be queued).
    Loaded(SegmentId),
    /// Timeline exhausted; player ticks are ignored until playback restarts.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTask {
    Rewind,
}

/// The last authoritative snapshot the coordinator reacted to. Overlays are
/// left out; they never affect the player.
#[derive(Debug, Clone)]
struct Observed {
    current_time: f64,
    is_playing: bool,
    segments: Vec<VideoSegment>,
}

/// Binds the authoritative [`EditorState`] to a single media player.
///
/// The coordinator never mutates state itself. Every correction it wants
/// (ticks, pause, rewind) is returned as [`EditorAction`]s for the owner to
/// dispatch, after which the owner calls [`PlaybackCoordinator::sync`] again
/// with the new state.
pub struct PlaybackCoordinator<B: MediaBackend> {
    controller: PlayerController<B>,
    config: PlaybackConfig,
    frames: FrameScheduler<FrameTask>,
    rewind_frame: Option<FrameHandle>,

    last_player_time: Option<f64>,
    last_segment_id: Option<SegmentId>,
    /// Where the player should be inside the loaded source: the last seek
    /// issued or the last accepted time update, whichever came later.
    player_position: Option<f64>,
    /// Mirror of the authoritative flag for event handling between syncs.
    is_playing: bool,
    ended: bool,
    /// Set when the coordinator itself schedules the rewind to 0 at the end.
    auto_rewind: bool,
    observed: Option<Observed>,
}

impl<B: MediaBackend> PlaybackCoordinator<B> {
    pub fn new(backend: B, config: PlaybackConfig) -> Self {
        Self {
            controller: PlayerController::new(backend),
            config,
            frames: FrameScheduler::new(),
            rewind_frame: None,
            last_player_time: None,
            last_segment_id: None,
            player_position: None,
            is_playing: false,
            ended: false,
            auto_rewind: false,
            observed: None,
        }
    }

    /// Bind the player to `surface`. Re-attaching the bound surface is a no-op.
    pub fn attach(&mut self, surface: &B::Surface) -> Result<()> {
        if self.controller.init(surface)? {
            self.clear_tracking();
            self.observed = None;
        }
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.controller.is_initialized()
    }

    pub fn phase(&self) -> CoordinatorPhase {
        if !self.is_attached() {
            CoordinatorPhase::Idle
        } else if self.ended {
            CoordinatorPhase::Ended
        } else if let Some(id) = self.last_segment_id {
            CoordinatorPhase::Loaded(id)
        } else {
            CoordinatorPhase::Bound
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn controller(&self) -> &PlayerController<B> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlayerController<B> {
        &mut self.controller
    }

    /// React to a new authoritative snapshot.
    ///
    /// Steps run in a fixed order: mirror the playing flag, detect the end of
    /// the timeline, resolve and switch segments, propagate play/pause, and
    /// finally clear tracking on a rewind to 0. Each step only runs when the
    /// inputs it depends on changed since the previous call.
    pub fn sync(&mut self, state: &EditorState) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        if !self.is_attached() {
            return actions;
        }

        let prev = self.observed.take();
        let first_sync = prev.is_none();
        let playing_changed = prev.as_ref().map_or(true, |p| p.is_playing != state.is_playing);
        let time_changed = prev
            .as_ref()
            .map_or(true, |p| p.current_time != state.current_time);
        let segments_changed = prev
            .as_ref()
            .map_or(true, |p| p.segments != state.timeline.segments);

        if playing_changed {
            self.is_playing = state.is_playing;
            if state.is_playing {
                self.ended = false;
                self.auto_rewind = false;
            }
        }

        let mut stopped = false;
        if playing_changed || time_changed || segments_changed {
            stopped = self.follow_timeline(state, &mut actions);
        }

        if playing_changed {
            if !state.is_playing {
                // An ended player was already paused by the end sequence.
                if !self.ended {
                    self.controller.pause();
                }
            } else if !stopped {
                self.ended = false;
                self.controller.play();
            }
        }

        if !first_sync && time_changed && state.current_time == 0.0 {
            if self.auto_rewind {
                self.auto_rewind = false;
            } else {
                self.last_segment_id = None;
                self.last_player_time = None;
                self.player_position = None;
                self.ended = false;
            }
        }

        let segments = match prev {
            Some(p) if !segments_changed => p.segments,
            _ => state.timeline.segments.clone(),
        };
        self.observed = Some(Observed {
            current_time: state.current_time,
            is_playing: state.is_playing,
            segments,
        });
        actions
    }

    /// End detection and segment resolution. Returns `true` if playback was
    /// stopped during this call.
    fn follow_timeline(&mut self, state: &EditorState, actions: &mut Vec<EditorAction>) -> bool {
        let total = total_duration(&state.timeline.segments);

        // End first, so a time at the very end never reaches the resolver.
        if total > 0.0 && state.current_time >= total - self.config.end_epsilon {
            if state.is_playing {
                tracing::info!(
                    current_time = state.current_time,
                    total,
                    "reached end of timeline"
                );
                self.auto_rewind = true;
                self.stop_and_rewind(actions);
                return true;
            }
            return false;
        }

        if self.ended {
            return false;
        }

        let Some(active) = resolve_active_segment(state.current_time, &state.timeline.segments)
        else {
            if state.is_playing {
                tracing::info!(
                    current_time = state.current_time,
                    "no segment under playhead, stopping"
                );
                self.stop_and_rewind(actions);
                return true;
            }
            return false;
        };

        if self.last_segment_id != Some(active.segment.id) {
            tracing::info!(
                segment = %active.segment.id,
                local_time = active.local_time,
                "switching segment"
            );
            self.last_segment_id = Some(active.segment.id);
            self.last_player_time = None;

            if let Err(e) = self.controller.load_source(&active.segment.source) {
                tracing::error!(error = %e, source = %active.segment.source, "failed to load segment");
                return false;
            }
            self.seek_player(active.local_time);
            if state.is_playing {
                self.controller.play();
            }
        } else if self.player_drifted(active.local_time, state.is_playing) {
            tracing::debug!(
                local_time = active.local_time,
                player_position = ?self.player_position,
                "player drifted inside loaded segment, seeking"
            );
            self.last_player_time = None;
            self.seek_player(active.local_time);
        }
        false
    }

    /// A playing player drives the playhead, so only a real jump counts. A
    /// paused one is kept close enough for scrubbing to show the right frame.
    fn player_drifted(&self, local_time: f64, playing: bool) -> bool {
        let tolerance = if playing {
            self.config.seek_threshold
        } else {
            self.config.seek_tolerance
        };
        self.player_position
            .map_or(true, |p| (local_time - p).abs() > tolerance)
    }

    fn seek_player(&mut self, local_time: f64) {
        match self.controller.seek(local_time) {
            Ok(()) => self.player_position = Some(local_time.max(0.0)),
            Err(e) => tracing::error!(error = %e, local_time, "failed to seek player"),
        }
    }

    /// Ended flag first, then the player call that might emit a stray update.
    fn stop_and_rewind(&mut self, actions: &mut Vec<EditorAction>) {
        self.ended = true;
        self.controller.pause();
        actions.push(EditorAction::Pause);

        if let Some(handle) = self.rewind_frame.take() {
            self.frames.cancel(handle);
        }
        self.rewind_frame = Some(self.frames.request(FrameTask::Rewind));
    }

    /// Feed one player event. Returns the actions it produced.
    pub fn on_player_event(&mut self, event: PlayerEvent) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        if !self.is_attached() {
            return actions;
        }
        self.controller.handle_event(&event);

        match event {
            PlayerEvent::TimeUpdate(player_time) => {
                if !self.is_playing || self.ended {
                    tracing::trace!(player_time, "ignoring time update");
                    return actions;
                }
                if let Some(last) = self.last_player_time {
                    let delta = player_time - last;
                    if delta > 0.0 {
                        actions.push(EditorAction::Tick(delta));
                    }
                }
                self.last_player_time = Some(player_time);
                self.player_position = Some(player_time);
            }
            PlayerEvent::Ended => {
                tracing::debug!("player reached end of source");
                self.last_player_time = None;
            }
            PlayerEvent::MetadataReady => {}
        }
        actions
    }

    /// Everything the player reported since the last call. Feed each event to
    /// [`Self::on_player_event`] and dispatch its actions before the next one,
    /// so an end detected on one update gates the updates after it.
    pub fn take_player_events(&mut self) -> Vec<PlayerEvent> {
        self.controller.poll_events()
    }

    /// Run frame callbacks that are due.
    pub fn on_frame(&mut self) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        for task in self.frames.drain() {
            match task {
                FrameTask::Rewind => {
                    self.rewind_frame = None;
                    actions.push(EditorAction::SetTime(0.0));
                    self.last_player_time = None;
                    self.last_segment_id = None;
                    self.player_position = None;
                }
            }
        }
        actions
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Release the player. No event or frame callback is processed afterwards.
    pub fn dispose(&mut self) {
        self.frames.cancel_all();
        self.rewind_frame = None;
        self.controller.dispose();
        self.clear_tracking();
        self.observed = None;
    }

    fn clear_tracking(&mut self) {
        self.last_player_time = None;
        self.last_segment_id = None;
        self.player_position = None;
        self.is_playing = false;
        self.ended = false;
        self.auto_rewind = false;
    }
}

impl<B: MediaBackend> Drop for PlaybackCoordinator<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
