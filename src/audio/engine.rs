// Playback engine: transport state machine plus clock-derived position
// The mixer has no position query and no seek, so both are computed here

use super::clock::Clock;
use super::mixer::Mixer;
use super::tags::TagReader;
use crate::error::{PlayerError, PlayerResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub state: PlaybackState,
    pub current: Option<PathBuf>,
    pub start_epoch: f64,
    pub paused_offset: f64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            state: PlaybackState::Stopped,
            current: None,
            start_epoch: 0.0,
            paused_offset: 0.0,
        }
    }
}

pub struct PlaybackEngine {
    mixer: Box<dyn Mixer>,
    clock: Box<dyn Clock>,
    tags: Arc<dyn TagReader>,
    session: PlaybackSession,
    duration: Option<f64>,
    duration_probed: bool,
    volume: f32,
}

impl PlaybackEngine {
    pub fn new(mixer: Box<dyn Mixer>, clock: Box<dyn Clock>, tags: Arc<dyn TagReader>) -> Self {
        Self {
            mixer,
            clock,
            tags,
            session: PlaybackSession::default(),
            duration: None,
            duration_probed: false,
            volume: 1.0,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.session.current.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn load(&mut self, path: &Path) -> PlayerResult<()> {
        if !path.exists() {
            return Err(PlayerError::not_found(path));
        }

        if let Err(e) = self.mixer.load(path) {
            // the old file is gone from the mixer either way
            self.session = PlaybackSession::default();
            self.duration = None;
            self.duration_probed = false;
            return Err(e);
        }

        debug!("Loaded {}", path.display());
        self.session = PlaybackSession {
            current: Some(path.to_path_buf()),
            ..PlaybackSession::default()
        };
        self.duration = None;
        self.duration_probed = false;
        Ok(())
    }

    pub fn play(&mut self) -> PlayerResult<()> {
        if self.session.current.is_none() {
            return Ok(());
        }

        let offset = self.session.paused_offset;
        if let Err(e) = self.mixer.play(Duration::from_secs_f64(offset.max(0.0))) {
            self.session.state = PlaybackState::Stopped;
            return Err(e);
        }

        self.session.state = PlaybackState::Playing;
        self.session.start_epoch = self.clock.now() - offset;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.session.state != PlaybackState::Playing {
            return;
        }

        self.mixer.pause();
        self.session.paused_offset = self.clock.now() - self.session.start_epoch;
        self.session.state = PlaybackState::Paused;
    }

    pub fn resume(&mut self) -> PlayerResult<()> {
        if self.session.state != PlaybackState::Paused {
            return Ok(());
        }

        self.mixer.resume();
        if self.mixer.is_busy() {
            self.session.start_epoch = self.clock.now() - self.session.paused_offset;
            self.session.state = PlaybackState::Playing;
            return Ok(());
        }

        // output died while paused, start over
        info!("Mixer idle after resume, restarting track");
        self.session.paused_offset = 0.0;
        self.play()
    }

    pub fn stop(&mut self) {
        self.mixer.stop();
        self.session.state = PlaybackState::Stopped;
        self.session.paused_offset = 0.0;
    }

    pub fn fade_out(&mut self, duration: Duration) {
        self.mixer.fade_out(duration);
        self.session.state = PlaybackState::Stopped;
        self.session.paused_offset = 0.0;
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = volume.clamp(0.0, 1.0);
        self.mixer.set_volume(self.volume);
        self.volume
    }

    pub fn position(&self) -> f64 {
        match self.session.state {
            PlaybackState::Playing => (self.clock.now() - self.session.start_epoch).max(0.0),
            PlaybackState::Paused => self.session.paused_offset,
            PlaybackState::Stopped => 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.session.current.is_some()
            && self.session.state == PlaybackState::Playing
            && !self.mixer.is_busy()
    }

    /// Track length in seconds, read from the tags once per loaded file.
    pub fn duration(&mut self) -> Option<f64> {
        if !self.duration_probed {
            let path = self.session.current.as_ref()?;
            self.duration_probed = true;
            self.duration = match self.tags.read_tags(path) {
                Ok(tags) => Some(tags.duration_seconds as f64),
                Err(e) => {
                    debug!("No duration for {}: {}", path.display(), e);
                    None
                }
            };
        }
        self.duration
    }

    /// Move by `delta` seconds within the current track. The mixer can't
    /// seek, so the file is reloaded and started at the new offset.
    pub fn seek(&mut self, delta: f64) {
        let Some(path) = self.session.current.clone() else {
            return;
        };
        let Some(duration) = self.duration() else {
            return;
        };

        let new_pos = (self.position() + delta).clamp(0.0, duration);
        let was_playing = self.session.state == PlaybackState::Playing;

        let reloaded = self
            .mixer
            .load(&path)
            .and_then(|_| self.mixer.play(Duration::from_secs_f64(new_pos)));
        if let Err(e) = reloaded {
            warn!("Seek reload failed for {}: {}", path.display(), e);
            return;
        }

        if was_playing {
            self.session.start_epoch = self.clock.now() - new_pos;
            self.session.paused_offset = 0.0;
            self.session.state = PlaybackState::Playing;
        } else {
            self.mixer.pause();
            self.session.paused_offset = new_pos;
            self.session.state = PlaybackState::Paused;
        }
    }
}
