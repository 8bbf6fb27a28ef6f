use super::mixer::Mixer;
use super::AudioConfig;
use crate::error::{file_label, PlayerError, PlayerResult};
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// rodio-backed mixer. Owns the output stream for the life of the process.
pub struct AudioPlayer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Arc<Sink>>,
    loaded: Option<PathBuf>,
    config: AudioConfig,
}

impl AudioPlayer {
    pub fn new(config: AudioConfig) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            loaded: None,
            config,
        })
    }

    fn open_source(path: &Path) -> PlayerResult<Decoder<BufReader<File>>> {
        let file = File::open(path).map_err(|e| {
            warn!("Failed to open {}: {}", path.display(), e);
            PlayerError::Playback(format!("Failed to play: {}", file_label(path)))
        })?;

        Decoder::new(BufReader::new(file)).map_err(|e| {
            warn!("Failed to decode {}: {}", path.display(), e);
            PlayerError::Playback(format!("Failed to play: {}", file_label(path)))
        })
    }
}

impl Mixer for AudioPlayer {
    fn load(&mut self, path: &Path) -> PlayerResult<()> {
        self.stop();
        // decode the header now so a broken file fails here and not on play
        Self::open_source(path)?;
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self, start: Duration) -> PlayerResult<()> {
        let path = self
            .loaded
            .clone()
            .ok_or_else(|| PlayerError::Playback("Nothing loaded".to_string()))?;

        self.stop();

        let source = Self::open_source(&path)?;
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| PlayerError::Playback(format!("Audio output unavailable: {}", e)))?;
        sink.set_volume(self.config.volume);

        if start.is_zero() {
            sink.append(source);
        } else {
            sink.append(source.skip_duration(start));
        }

        debug!("Playing {} from {:?}", path.display(), start);
        self.sink = Some(Arc::new(sink));
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        let clamped_volume = volume.clamp(0.0, 1.0);
        self.config.volume = clamped_volume;

        if let Some(sink) = &self.sink {
            sink.set_volume(clamped_volume);
        }
    }

    fn fade_out(&mut self, duration: Duration) {
        let Some(sink) = self.sink.take() else {
            return;
        };

        let start_volume = self.config.volume;
        let fade_steps = self.config.fade_steps.max(1);
        let step_duration = duration / fade_steps;

        // ramp on a helper thread so the render loop keeps drawing
        std::thread::spawn(move || {
            for step in 1..=fade_steps {
                let remaining = 1.0 - step as f32 / fade_steps as f32;
                sink.set_volume((start_volume * remaining).max(0.0));
                std::thread::sleep(step_duration);
            }
            sink.stop();
        });
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
    }
}
