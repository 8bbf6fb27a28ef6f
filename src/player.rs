// Player session: library, metadata cache and playback engine behind the
// operations the keyboard triggers. Every outcome is reported on the status line

use crate::audio::clock::Clock;
use crate::audio::engine::{PlaybackEngine, PlaybackState};
use crate::audio::mixer::Mixer;
use crate::audio::FADE_OUT_DURATION;
use crate::config::{expand_home, Config};
use crate::context::AppContext;
use crate::library::{Direction, LibraryModel, MetadataCache};
use crate::ui::status::StatusLine;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Player {
    pub ctx: AppContext,
    pub config: Config,
    pub engine: PlaybackEngine,
    pub library: LibraryModel,
    pub cache: MetadataCache,
    pub status: StatusLine,
}

impl Player {
    pub fn new(ctx: AppContext, config: Config, mixer: Box<dyn Mixer>, clock: Box<dyn Clock>) -> Self {
        let mut engine = PlaybackEngine::new(mixer, clock, ctx.tags.clone());
        engine.set_volume(config.volume);

        Self {
            library: LibraryModel::new(config.shuffle, config.repeat),
            cache: MetadataCache::new(&ctx.cache_dir),
            status: StatusLine::new(),
            engine,
            config,
            ctx,
        }
    }

    /// Replace the library model, e.g. to seed shuffle.
    pub fn with_library(mut self, library: LibraryModel) -> Self {
        self.library = library;
        self
    }

    /// Load the configured music folder. Failures end up on the status line.
    pub fn load_library(&mut self) -> usize {
        let root = self.config.music_root();
        match self.library.load(&root, &mut self.cache, self.ctx.tags.as_ref()) {
            Ok(count) => count,
            Err(e) => {
                info!("Library not loaded: {}", e);
                self.status.report(&e);
                0
            }
        }
    }

    pub fn refresh_library(&mut self) {
        let root = self.config.music_root();
        match self.library.refresh(&root, &mut self.cache, self.ctx.tags.as_ref()) {
            Ok(count) => self.status.info(format!("Refreshed library: {} tracks", count)),
            Err(e) => self.status.report(&e),
        }
    }

    /// `:add <folder>`. Returns whether the library was replaced.
    pub fn add_folder(&mut self, folder: &str) -> bool {
        let folder = expand_home(folder.trim());
        if folder.is_empty() || !Path::new(&folder).is_dir() {
            self.status.error("Folder not found");
            return false;
        }

        self.config.music_folder = folder;
        if let Err(e) = self.config.save_to(&self.ctx.config_path) {
            warn!("{}", e);
        }

        match self.library.load(&self.config.music_root(), &mut self.cache, self.ctx.tags.as_ref()) {
            Ok(count) => self.status.info(format!("Loaded {} tracks from folder", count)),
            Err(e) => self.status.report(&e),
        }
        true
    }

    pub fn display_name(&self, path: &Path) -> String {
        self.cache.display_name(path)
    }

    pub fn timestamp(&self, path: &Path) -> String {
        self.cache
            .get(path)
            .map(|track| track.timestamp.clone())
            .unwrap_or_else(|| "--:--".to_string())
    }

    /// Playlist index of the loaded track, if it is part of the playlist.
    pub fn current_index(&self) -> Option<usize> {
        self.engine
            .current_path()
            .and_then(|path| self.library.position_of(path))
    }

    /// Stop whatever is playing and start `path` from the top.
    pub fn play_path(&mut self, path: &Path) -> bool {
        self.engine.stop();
        match self.engine.load(path).and_then(|_| self.engine.play()) {
            Ok(()) => {
                info!("Playing {}", path.display());
                self.status.clear();
                true
            }
            Err(e) => {
                warn!("Could not play {}: {}", path.display(), e);
                self.status.report(&e);
                false
            }
        }
    }

    /// Pause, resume, restart the stopped track, or start `selected` when
    /// nothing is loaded. Returns true when a new track was started.
    pub fn toggle_play_pause(&mut self, selected: Option<PathBuf>) -> bool {
        match self.engine.state() {
            PlaybackState::Playing => {
                self.engine.pause();
                false
            }
            PlaybackState::Paused => {
                if let Err(e) = self.engine.resume() {
                    self.status.report(&e);
                }
                false
            }
            PlaybackState::Stopped if self.engine.current_path().is_some() => {
                if let Err(e) = self.engine.play() {
                    self.status.report(&e);
                }
                false
            }
            PlaybackState::Stopped => match selected {
                Some(path) => self.play_path(&path),
                None => false,
            },
        }
    }

    pub fn skip(&mut self, direction: Direction) -> bool {
        let current = self.engine.current_path().map(Path::to_path_buf);
        match self.library.step(current.as_deref(), direction) {
            Some(next) => self.play_path(&next),
            None => false,
        }
    }

    /// Once per tick: if the track ran out, start whatever comes next.
    /// Returns true when a new track was started.
    pub fn resolve_finished(&mut self) -> bool {
        if !self.engine.is_finished() {
            return false;
        }

        let current = self.engine.current_path().map(Path::to_path_buf);
        match self.library.next_on_finish(current.as_deref()) {
            Some(next) => {
                debug!("Track finished, next is {}", next.display());
                self.play_path(&next)
            }
            None => {
                self.engine.stop();
                false
            }
        }
    }

    pub fn change_volume(&mut self, delta: f32) {
        let volume = self.engine.set_volume(self.engine.volume() + delta);
        self.status.info(format!("Volume: {}%", (volume * 100.0).round() as u32));
    }

    pub fn toggle_shuffle(&mut self) {
        self.library.shuffle = !self.library.shuffle;
        self.status.info(format!("Shuffle: {}", on_off(self.library.shuffle)));
    }

    pub fn toggle_repeat(&mut self) {
        self.library.repeat = !self.library.repeat;
        self.status.info(format!("Repeat: {}", on_off(self.library.repeat)));
    }

    pub fn fade_out(&mut self) {
        self.engine.fade_out(FADE_OUT_DURATION);
        self.status.info("Fading out...");
    }

    pub fn seek(&mut self, forward: bool) {
        let seconds = self.config.seek_seconds;
        if forward {
            self.engine.seek(seconds as f64);
            self.status.info(format!("Seeked forward {}s", seconds));
        } else {
            self.engine.seek(-(seconds as f64));
            self.status.info(format!("Seeked backward {}s", seconds));
        }
    }

    pub fn enqueue(&mut self, path: &Path) {
        if self.library.queue_mut().enqueue(path) {
            let name = self.display_name(path);
            self.status.info(format!("Added to queue: {}", name));
        } else {
            self.status.info("Song already in queue");
        }
    }

    pub fn enqueue_album(&mut self, album: &str) {
        let tracks = self.library.album_tracks(album).to_vec();
        let queue = self.library.queue_mut();
        let added = tracks.iter().filter(|path| queue.enqueue(path)).count();

        if added > 0 {
            self.status.info(format!("Added {} songs from '{}' to queue", added, album));
        } else {
            self.status.info("All songs from album already in queue");
        }
    }

    /// Play queue entry `index` and continue the queue after it.
    pub fn play_from_queue(&mut self, index: usize) -> bool {
        let Some(path) = self.library.queue().get(index).map(Path::to_path_buf) else {
            return false;
        };
        let started = self.play_path(&path);
        self.library.queue_mut().set_cursor(index + 1);
        started
    }

    pub fn remove_from_queue(&mut self, index: usize) -> bool {
        match self.library.queue_mut().remove_at(index) {
            Ok(removed) => {
                let name = self.display_name(&removed);
                self.status.info(format!("Removed: {}", name));
                true
            }
            Err(e) => {
                self.status.report(&e);
                false
            }
        }
    }

    pub fn clear_queue(&mut self) {
        let count = self.library.queue_mut().clear();
        self.status.info(format!("Cleared {} songs from queue", count));
    }

    /// Write volume, shuffle and repeat back to the config file.
    pub fn persist_settings(&mut self) {
        self.config.volume = self.engine.volume();
        self.config.shuffle = self.library.shuffle;
        self.config.repeat = self.library.repeat;
        if let Err(e) = self.config.save_to(&self.ctx.config_path) {
            warn!("{}", e);
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}
