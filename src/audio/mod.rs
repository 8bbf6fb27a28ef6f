// Audio side of wmus: tag reading, folder scanning and the playback engine
// The engine only ever talks to a Mixer, so the core runs without a sound card

pub mod clock;
pub mod engine;
pub mod mixer;
#[cfg(feature = "audio")]
pub mod player;
pub mod scanner;
pub mod tags;
pub mod track;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{PlaybackEngine, PlaybackSession, PlaybackState};
pub use mixer::{MemoryMixer, Mixer};
#[cfg(feature = "audio")]
pub use player::AudioPlayer;
pub use scanner::MusicScanner;
pub use tags::{FileTagReader, TagReader};
pub use track::{format_time, Track, TrackTags};

use std::path::Path;
use std::time::Duration;

/// How long the `fadeout` key takes to reach silence.
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
    pub fade_steps: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fade_steps: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Aac, // raw ADTS stream, no MP4 container
    Wav,
    Other, // wma, ape, wavpack, tta - playable if the decoder knows them
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "flac" => AudioFormat::Flac,
            "ogg" | "oga" | "opus" => AudioFormat::Ogg,
            "mp4" | "m4a" => AudioFormat::Mp4,
            "aac" => AudioFormat::Aac,
            "wav" => AudioFormat::Wav,
            "wma" | "ape" | "wv" | "tta" => AudioFormat::Other,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown)
    }
}
