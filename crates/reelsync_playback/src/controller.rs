use crate::backend::{MediaBackend, PlayerEvent};
use crate::error::{PlaybackError, Result};

/// Wraps a [`MediaBackend`] with the bookkeeping every caller needs: the
/// bound surface, the loaded source and a seek waiting for metadata.
pub struct PlayerController<B: MediaBackend> {
    backend: B,
    surface: Option<B::Surface>,
    current_source: Option<String>,
    pending_seek: Option<f64>,
}

impl<B: MediaBackend> PlayerController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            surface: None,
            current_source: None,
            pending_seek: None,
        }
    }

    /// Bind to `surface`. Binding the surface already in use does nothing and
    /// returns `false`; binding a different one releases the old binding first.
    pub fn init(&mut self, surface: &B::Surface) -> Result<bool> {
        if self.surface.as_ref() == Some(surface) {
            return Ok(false);
        }
        if self.surface.is_some() {
            self.dispose();
        }
        self.backend.open(surface)?;
        self.surface = Some(surface.clone());
        tracing::debug!(?surface, "player bound");
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn current_source(&self) -> Option<&str> {
        self.current_source.as_deref()
    }

    pub fn pending_seek(&self) -> Option<f64> {
        self.pending_seek
    }

    /// Load `locator` unless it is already the current source.
    pub fn load_source(&mut self, locator: &str) -> Result<()> {
        if !self.is_initialized() {
            return Err(PlaybackError::NotInitialized);
        }
        if self.current_source.as_deref() == Some(locator) {
            return Ok(());
        }
        self.backend.set_source(locator)?;
        self.current_source = Some(locator.to_string());
        Ok(())
    }

    /// Seek now if metadata is ready, otherwise remember the target until
    /// [`PlayerEvent::MetadataReady`]. A later seek replaces an earlier queued one.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if !self.is_initialized() {
            return Err(PlaybackError::NotInitialized);
        }
        let target = seconds.max(0.0);
        if self.backend.has_metadata() {
            self.backend.set_position(target)
        } else {
            self.pending_seek = Some(target);
            Ok(())
        }
    }

    /// A rejected play is logged and otherwise ignored.
    pub fn play(&mut self) {
        if !self.is_initialized() {
            return;
        }
        if let Err(e) = self.backend.play() {
            tracing::error!(error = %e, "play request rejected by player");
        }
    }

    pub fn pause(&mut self) {
        if !self.is_initialized() {
            return;
        }
        if let Err(e) = self.backend.pause() {
            tracing::warn!(error = %e, "pause request failed");
        }
    }

    /// Raw events from the backend. Nothing once disposed.
    pub fn poll_events(&mut self) -> Vec<PlayerEvent> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.backend.poll_events()
    }

    /// Apply the queued seek, if any, once metadata arrives.
    pub fn handle_event(&mut self, event: &PlayerEvent) {
        if *event != PlayerEvent::MetadataReady {
            return;
        }
        if let Some(target) = self.pending_seek.take() {
            tracing::debug!(target, "applying queued seek");
            if let Err(e) = self.backend.set_position(target) {
                tracing::warn!(error = %e, target, "queued seek failed");
            }
        }
    }

    pub fn dispose(&mut self) {
        if self.surface.take().is_some() {
            self.backend.close();
            tracing::debug!("player disposed");
        }
        self.current_source = None;
        self.pending_seek = None;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
