// Per-folder metadata cache, persisted as JSON next to other app caches
// A missing, stale or unreadable file is just a cache miss

use crate::audio::tags::TagReader;
use crate::audio::track::Track;
use crate::error::{file_label, PlayerError, PlayerResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xxhash_rust::xxh64::xxh64;

pub const CACHE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheDocument {
    version: String,
    playlist: Vec<PathBuf>,
    song_cache: BTreeMap<PathBuf, CachedSong>,
    albums: BTreeMap<String, Vec<PathBuf>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSong {
    name: String,
    duration: u64,
    timestamp: String,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    artist: String,
}

impl CachedSong {
    fn from_track(track: &Track) -> Self {
        Self {
            name: track.display_name.clone(),
            duration: track.duration_seconds,
            timestamp: track.timestamp.clone(),
            album: track.album.clone(),
            artist: track.artist.clone(),
        }
    }

    fn into_track(self, path: PathBuf) -> Track {
        Track {
            path,
            display_name: self.name,
            duration_seconds: self.duration,
            timestamp: self.timestamp,
            album: self.album.filter(|a| !a.is_empty()),
            artist: self.artist,
        }
    }
}

/// Playlist and album grouping restored from a cache file.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLibrary {
    pub playlist: Vec<PathBuf>,
    pub albums: BTreeMap<String, Vec<PathBuf>>,
}

pub struct MetadataCache {
    cache_dir: PathBuf,
    tracks: HashMap<PathBuf, Track>,
}

impl MetadataCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            tracks: HashMap::new(),
        }
    }

    /// One file per music root, named after a hash of the root path.
    pub fn cache_file(&self, root: &Path) -> PathBuf {
        let hash = xxh64(root.to_string_lossy().as_bytes(), 0);
        self.cache_dir.join(format!("playlist_cache_{:016x}.json", hash))
    }

    pub fn load(&mut self, root: &Path) -> Option<CachedLibrary> {
        let cache_path = self.cache_file(root);
        let content = match fs::read_to_string(&cache_path) {
            Ok(content) => content,
            Err(_) => {
                debug!("No metadata cache for {}", root.display());
                return None;
            }
        };

        let document: CacheDocument = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                warn!("Ignoring unreadable cache {}: {}", cache_path.display(), e);
                return None;
            }
        };

        if document.version != CACHE_VERSION {
            info!(
                "Cache version {} does not match {}, rescanning",
                document.version, CACHE_VERSION
            );
            return None;
        }

        self.tracks = document
            .song_cache
            .into_iter()
            .map(|(path, song)| (path.clone(), song.into_track(path)))
            .collect();

        info!(
            "Loaded metadata cache for {}: {} tracks",
            root.display(),
            document.playlist.len()
        );
        Some(CachedLibrary {
            playlist: document.playlist,
            albums: document.albums,
        })
    }

    /// Cached track for `path`, reading the tags on a miss. Tag failures
    /// fall back to a filename-derived entry and never propagate.
    pub fn resolve(&mut self, path: &Path, reader: &dyn TagReader) -> &Track {
        self.tracks.entry(path.to_path_buf()).or_insert_with(|| {
            match reader.read_tags(path) {
                Ok(tags) => Track::from_tags(path, tags),
                Err(e) => {
                    debug!("{}", e);
                    Track::unreadable(path)
                }
            }
        })
    }

    pub fn get(&self, path: &Path) -> Option<&Track> {
        self.tracks.get(path)
    }

    pub fn display_name(&self, path: &Path) -> String {
        self.get(path)
            .map(|track| track.display_name.clone())
            .unwrap_or_else(|| file_label(path))
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn persist(
        &self,
        root: &Path,
        playlist: &[PathBuf],
        albums: &BTreeMap<String, Vec<PathBuf>>,
    ) -> PlayerResult<()> {
        let document = CacheDocument {
            version: CACHE_VERSION.to_string(),
            playlist: playlist.to_vec(),
            song_cache: playlist
                .iter()
                .filter_map(|path| {
                    self.tracks
                        .get(path)
                        .map(|track| (path.clone(), CachedSong::from_track(track)))
                })
                .collect(),
            albums: albums.clone(),
        };

        let json = serde_json::to_string(&document)
            .map_err(|e| PlayerError::Persistence(format!("Failed to serialize cache: {}", e)))?;

        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| PlayerError::Persistence(format!("Failed to create cache dir: {}", e)))?;

        let cache_path = self.cache_file(root);
        fs::write(&cache_path, json)
            .map_err(|e| PlayerError::Persistence(format!("Failed to write {}: {}", cache_path.display(), e)))?;

        debug!("Persisted metadata cache to {}", cache_path.display());
        Ok(())
    }

    /// Forget the on-disk cache for `root` so the next load rescans.
    pub fn invalidate(&mut self, root: &Path) {
        self.tracks.clear();
        let cache_path = self.cache_file(root);
        if cache_path.exists() {
            if let Err(e) = fs::remove_file(&cache_path) {
                warn!("Failed to remove cache {}: {}", cache_path.display(), e);
            }
        }
    }
}
