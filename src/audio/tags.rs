// Tag reading - id3 for mp3, mp4ameta for m4a/mp4, lofty for everything else
// lofty is also the duration source whenever the tag frames don't carry one

use super::{AudioFormat, TrackTags};
use crate::error::{PlayerError, PlayerResult};
use id3::TagLike;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use std::path::Path;
use tracing::debug;

pub trait TagReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> PlayerResult<TrackTags>;
}

#[derive(Debug, Clone, Default)]
pub struct FileTagReader;

impl FileTagReader {
    pub fn new() -> Self {
        Self
    }

    fn read_id3(&self, path: &Path) -> PlayerResult<TrackTags> {
        let (mut tags, has_tag) = match id3::Tag::read_from_path(path) {
            Ok(tag) => (
                TrackTags {
                    title: tag.title().map(|s| s.to_string()),
                    artist: tag.artist().map(|s| s.to_string()),
                    album: tag.album().map(|s| s.to_string()),
                    duration_seconds: tag.duration().map(|ms| ms as u64 / 1000).unwrap_or(0),
                },
                true,
            ),
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => (TrackTags::default(), false),
            Err(e) => return Err(PlayerError::metadata(path, e)),
        };

        // TLEN is rarely set, ask the stream itself
        if tags.duration_seconds == 0 {
            match self.probe_duration(path) {
                Ok(seconds) => tags.duration_seconds = seconds,
                Err(e) if !has_tag => return Err(e),
                Err(e) => debug!("No duration for {}: {}", path.display(), e),
            }
        }

        Ok(tags)
    }

    fn read_mp4(&self, path: &Path) -> PlayerResult<TrackTags> {
        let tag = mp4ameta::Tag::read_from_path(path).map_err(|e| PlayerError::metadata(path, e))?;

        let duration_seconds = self.probe_duration(path).unwrap_or_else(|e| {
            debug!("No duration for {}: {}", path.display(), e);
            0
        });

        Ok(TrackTags {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            duration_seconds,
        })
    }

    fn read_lofty(&self, path: &Path) -> PlayerResult<TrackTags> {
        let tagged_file = lofty::read_from_path(path).map_err(|e| PlayerError::metadata(path, e))?;
        let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

        Ok(TrackTags {
            title: tag.and_then(|t| t.title()).map(|s| s.to_string()),
            artist: tag.and_then(|t| t.artist()).map(|s| s.to_string()),
            album: tag.and_then(|t| t.album()).map(|s| s.to_string()),
            duration_seconds: tagged_file.properties().duration().as_secs(),
        })
    }

    fn probe_duration(&self, path: &Path) -> PlayerResult<u64> {
        let tagged_file = lofty::read_from_path(path).map_err(|e| PlayerError::metadata(path, e))?;
        Ok(tagged_file.properties().duration().as_secs())
    }
}

impl TagReader for FileTagReader {
    fn read_tags(&self, path: &Path) -> PlayerResult<TrackTags> {
        match AudioFormat::from_path(path) {
            AudioFormat::Mp3 => self.read_id3(path),
            AudioFormat::Mp4 => self.read_mp4(path),
            _ => self.read_lofty(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_garbage_file_is_a_metadata_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.flac");
        fs::write(&path, b"definitely not a flac stream").unwrap();

        let err = FileTagReader::new().read_tags(&path).unwrap_err();
        assert!(matches!(err, PlayerError::MetadataRead { .. }));
    }

    #[test]
    fn test_missing_file_is_a_metadata_failure() {
        let dir = TempDir::new().unwrap();
        let err = FileTagReader::new()
            .read_tags(&dir.path().join("gone.ogg"))
            .unwrap_err();
        assert!(matches!(err, PlayerError::MetadataRead { .. }));
    }

    /// One silent AAC-LC frame, 44.1 kHz stereo, 16 bytes including the header.
    fn adts_frame() -> Vec<u8> {
        let mut frame = vec![0xFF, 0xF1, 0x50, 0x80, 0x02, 0x1F, 0xFC];
        frame.resize(16, 0);
        frame
    }

    #[test]
    fn test_aac_stream_with_id3_header_reads_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("road.aac");

        let mut tag = id3::Tag::new();
        tag.set_title("Road Song");
        tag.set_album("Highway");
        let mut bytes = Vec::new();
        tag.write_to(&mut bytes, id3::Version::Id3v24).unwrap();
        for _ in 0..200 {
            bytes.extend(adts_frame());
        }
        fs::write(&path, bytes).unwrap();

        let tags = FileTagReader::new().read_tags(&path).unwrap();
        assert_eq!(tags.title.as_deref(), Some("Road Song"));
        assert_eq!(tags.album.as_deref(), Some("Highway"));
    }
}
