use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a tag reader hands back for one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: u64,
}

/// A scanned song. Created on a cache miss (tag read) or from the
/// metadata cache file, never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub path: PathBuf,
    pub display_name: String,
    pub duration_seconds: u64,
    pub timestamp: String,
    pub album: Option<String>,
    pub artist: String,
}

impl Track {
    pub fn from_tags(path: &Path, tags: TrackTags) -> Self {
        let title = non_empty(tags.title);
        let artist = non_empty(tags.artist);

        let display_name = match (&title, &artist) {
            (Some(title), Some(artist)) => format!("{} - {}", artist, title),
            (Some(title), None) => title.clone(),
            (None, Some(artist)) => artist.clone(),
            (None, None) => file_stem(path),
        };

        Self {
            path: path.to_path_buf(),
            display_name,
            duration_seconds: tags.duration_seconds,
            timestamp: track_timestamp(tags.duration_seconds),
            album: non_empty(tags.album),
            artist: artist.unwrap_or_default(),
        }
    }

    /// Fallback when the tags could not be parsed at all.
    pub fn unreadable(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            display_name: file_stem(path),
            duration_seconds: 0,
            timestamp: "--:--".to_string(),
            album: None,
            artist: String::new(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// "MM:SS" with minutes allowed past 59, as shown next to every list row
fn track_timestamp(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed-time formatting for the now-playing line.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    let hours = minutes / 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes % 60, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
