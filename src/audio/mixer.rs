// Output seam between the playback engine and whatever actually makes sound
// AudioPlayer (rodio) is the real one, MemoryMixer keeps the engine testable

use crate::error::{file_label, PlayerError, PlayerResult};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

pub trait Mixer {
    /// Prepare `path` for playback. Does not start output.
    fn load(&mut self, path: &Path) -> PlayerResult<()>;

    /// Start the loaded file from `start` into the stream.
    fn play(&mut self, start: Duration) -> PlayerResult<()>;

    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);

    /// Volume in 0.0..=1.0
    fn set_volume(&mut self, volume: f32);

    /// Ramp to silence over `duration`, then stop.
    fn fade_out(&mut self, duration: Duration);

    /// True while there is still audio queued (paused output counts).
    fn is_busy(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMixerState {
    pub loaded: Option<PathBuf>,
    pub started_at: Option<Duration>,
    pub paused: bool,
    pub busy: bool,
    pub volume: f32,
    pub faded: Option<Duration>,
    pub failing: Vec<PathBuf>,
}

impl Default for MemoryMixerState {
    fn default() -> Self {
        Self {
            loaded: None,
            started_at: None,
            paused: false,
            busy: false,
            volume: 1.0,
            faded: None,
            failing: Vec::new(),
        }
    }
}

/// Silent mixer that only records what it was asked to do.
/// Clones share state, so the caller can keep a handle after boxing one.
#[derive(Debug, Clone, Default)]
pub struct MemoryMixer {
    state: Rc<RefCell<MemoryMixerState>>,
}

impl MemoryMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MemoryMixerState {
        self.state.borrow().clone()
    }

    /// Pretend the current file played to its end.
    pub fn finish(&self) {
        self.state.borrow_mut().busy = false;
    }

    /// Make every later `load` of `path` fail like an undecodable file.
    pub fn fail_on(&self, path: &Path) {
        self.state.borrow_mut().failing.push(path.to_path_buf());
    }
}

impl Mixer for MemoryMixer {
    fn load(&mut self, path: &Path) -> PlayerResult<()> {
        let mut state = self.state.borrow_mut();
        if state.failing.iter().any(|p| p == path) {
            return Err(PlayerError::Playback(format!("Failed to play: {}", file_label(path))));
        }
        state.loaded = Some(path.to_path_buf());
        state.busy = false;
        state.paused = false;
        state.started_at = None;
        Ok(())
    }

    fn play(&mut self, start: Duration) -> PlayerResult<()> {
        let mut state = self.state.borrow_mut();
        if state.loaded.is_none() {
            return Err(PlayerError::Playback("Nothing loaded".to_string()));
        }
        state.started_at = Some(start);
        state.busy = true;
        state.paused = false;
        state.faded = None;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn resume(&mut self) {
        self.state.borrow_mut().paused = false;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.busy = false;
        state.paused = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn fade_out(&mut self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.faded = Some(duration);
        state.busy = false;
    }

    fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }
}
