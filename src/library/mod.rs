// Library model: the scanned playlist, album grouping, queue and the
// shuffle/repeat flags that decide what plays after the current track

pub mod cache;
pub mod queue;

pub use cache::{CachedLibrary, MetadataCache, CACHE_VERSION};
pub use queue::Queue;

use crate::audio::scanner::MusicScanner;
use crate::audio::tags::TagReader;
use crate::error::{PlayerError, PlayerResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

pub struct LibraryModel {
    playlist: Vec<PathBuf>,
    albums: BTreeMap<String, Vec<PathBuf>>,
    queue: Queue,
    pub shuffle: bool,
    pub repeat: bool,
    rng: StdRng,
    scanner: MusicScanner,
}

impl LibraryModel {
    pub fn new(shuffle: bool, repeat: bool) -> Self {
        Self {
            playlist: Vec::new(),
            albums: BTreeMap::new(),
            queue: Queue::new(),
            shuffle,
            repeat,
            rng: StdRng::from_entropy(),
            scanner: MusicScanner::new(),
        }
    }

    /// Swap in a deterministic generator for shuffle.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn playlist(&self) -> &[PathBuf] {
        &self.playlist
    }

    pub fn albums(&self) -> &BTreeMap<String, Vec<PathBuf>> {
        &self.albums
    }

    pub fn album_names(&self) -> Vec<&str> {
        self.albums.keys().map(String::as_str).collect()
    }

    pub fn album_tracks(&self, album: &str) -> &[PathBuf] {
        self.albums.get(album).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.playlist.iter().position(|p| p == path)
    }

    fn reset(&mut self) {
        self.playlist.clear();
        self.albums.clear();
    }

    /// Fill the playlist for `root`, from the metadata cache when it is
    /// current, otherwise by scanning the folder and reading tags.
    /// Returns the number of tracks.
    pub fn load(
        &mut self,
        root: &Path,
        cache: &mut MetadataCache,
        reader: &dyn TagReader,
    ) -> PlayerResult<usize> {
        if root.as_os_str().is_empty() {
            self.reset();
            cache.clear();
            return Err(PlayerError::NotFound(
                "No music folder set. Use :add <folder> to add one".to_string(),
            ));
        }

        if let Some(cached) = cache.load(root) {
            self.playlist = cached.playlist;
            self.albums = cached.albums;
            return Ok(self.playlist.len());
        }

        if !root.exists() {
            self.reset();
            cache.clear();
            return Err(PlayerError::NotFound("Music folder not found".to_string()));
        }

        info!("Scanning {}", root.display());
        let files = self.scanner.scan_directory(root);
        if files.is_empty() {
            self.reset();
            cache.clear();
            return Err(PlayerError::NotFound("No music files found in folder".to_string()));
        }

        cache.clear();
        let mut albums: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for path in &files {
            let track = cache.resolve(path, reader);
            if let Some(album) = &track.album {
                albums.entry(album.clone()).or_default().push(path.clone());
            }
        }

        self.playlist = files;
        self.albums = albums;
        info!(
            "Scanned {} tracks in {} albums",
            self.playlist.len(),
            self.albums.len()
        );

        if let Err(e) = cache.persist(root, &self.playlist, &self.albums) {
            warn!("{}", e);
        }

        Ok(self.playlist.len())
    }

    /// Drop the cache for `root` and scan again.
    pub fn refresh(
        &mut self,
        root: &Path,
        cache: &mut MetadataCache,
        reader: &dyn TagReader,
    ) -> PlayerResult<usize> {
        cache.invalidate(root);
        self.load(root, cache, reader)
    }

    /// Manual skip. Only ever moves within the playlist.
    pub fn step(&mut self, current: Option<&Path>, direction: Direction) -> Option<PathBuf> {
        if self.playlist.is_empty() {
            return None;
        }

        if self.shuffle {
            return self.playlist.choose(&mut self.rng).cloned();
        }

        let len = self.playlist.len();
        let index = match current.and_then(|path| self.position_of(path)) {
            Some(index) => match direction {
                Direction::Forward => (index + 1) % len,
                Direction::Backward => (index + len - 1) % len,
            },
            None => 0,
        };
        Some(self.playlist[index].clone())
    }

    /// What to play once `current` has ended: queue, then repeat, then
    /// shuffle or the next playlist entry.
    pub fn next_on_finish(&mut self, current: Option<&Path>) -> Option<PathBuf> {
        if let Some(next) = self.queue.advance() {
            return Some(next);
        }

        if self.repeat {
            if let Some(current) = current {
                return Some(current.to_path_buf());
            }
        }

        self.step(current, Direction::Forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::track::TrackTags;
    use std::fs;
    use tempfile::TempDir;

    // album comes from the parent folder name, "loose" files get none
    struct FolderAlbums;

    impl TagReader for FolderAlbums {
        fn read_tags(&self, path: &Path) -> PlayerResult<TrackTags> {
            let album = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .filter(|n| n != "loose");
            Ok(TrackTags {
                title: path.file_stem().map(|s| s.to_string_lossy().into_owned()),
                artist: None,
                album,
                duration_seconds: 100,
            })
        }
    }

    fn music_folder() -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in ["x/b.mp3", "x/a.mp3", "loose/c.ogg", "y/d.flac"] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"x").unwrap();
        }
        dir
    }

    fn paths(root: &Path, files: &[&str]) -> Vec<PathBuf> {
        files.iter().map(|f| root.join(f)).collect()
    }

    #[test]
    fn test_scan_builds_playlist_and_albums() {
        let music = music_folder();
        let cache_dir = TempDir::new().unwrap();
        let mut cache = MetadataCache::new(cache_dir.path());
        let mut library = LibraryModel::new(false, false);

        let count = library.load(music.path(), &mut cache, &FolderAlbums).unwrap();
        assert_eq!(count, 4);
        assert_eq!(
            library.playlist(),
            paths(music.path(), &["loose/c.ogg", "x/a.mp3", "x/b.mp3", "y/d.flac"]).as_slice()
        );
        assert_eq!(library.album_names(), vec!["x", "y"]);
        assert_eq!(
            library.album_tracks("x"),
            paths(music.path(), &["x/a.mp3", "x/b.mp3"]).as_slice()
        );
    }

    #[test]
    fn test_cache_round_trip_matches_scan() {
        let music = music_folder();
        let cache_dir = TempDir::new().unwrap();

        let mut scanned = LibraryModel::new(false, false);
        scanned
            .load(music.path(), &mut MetadataCache::new(cache_dir.path()), &FolderAlbums)
            .unwrap();

        // remove a file: a cache hit must not notice
        fs::remove_file(music.path().join("y/d.flac")).unwrap();

        let mut restored = LibraryModel::new(false, false);
        let mut cache = MetadataCache::new(cache_dir.path());
        restored.load(music.path(), &mut cache, &FolderAlbums).unwrap();
        assert_eq!(restored.playlist(), scanned.playlist());
        assert_eq!(restored.albums(), scanned.albums());
        assert_eq!(cache.display_name(&music.path().join("x/a.mp3")), "a");

        let count = restored.refresh(music.path(), &mut cache, &FolderAlbums).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_load_failures_empty_the_library() {
        let cache_dir = TempDir::new().unwrap();
        let mut cache = MetadataCache::new(cache_dir.path());
        let mut library = LibraryModel::new(false, false);

        let err = library.load(Path::new(""), &mut cache, &FolderAlbums).unwrap_err();
        assert!(err.to_string().starts_with("No music folder set"));

        let err = library
            .load(&cache_dir.path().join("missing"), &mut cache, &FolderAlbums)
            .unwrap_err();
        assert_eq!(err.to_string(), "Music folder not found");

        let empty = TempDir::new().unwrap();
        let err = library.load(empty.path(), &mut cache, &FolderAlbums).unwrap_err();
        assert_eq!(err.to_string(), "No music files found in folder");
        assert!(library.playlist().is_empty());
    }

    fn loaded(shuffle: bool, repeat: bool) -> (TempDir, TempDir, LibraryModel) {
        let music = music_folder();
        let cache_dir = TempDir::new().unwrap();
        let mut library = LibraryModel::new(shuffle, repeat).with_rng(StdRng::seed_from_u64(7));
        library
            .load(music.path(), &mut MetadataCache::new(cache_dir.path()), &FolderAlbums)
            .unwrap();
        (music, cache_dir, library)
    }

    #[test]
    fn test_sequential_step_wraps() {
        let (_music, _cache, mut library) = loaded(false, false);
        let list = library.playlist().to_vec();

        assert_eq!(library.step(Some(&list[3]), Direction::Forward), Some(list[0].clone()));
        assert_eq!(library.step(Some(&list[0]), Direction::Backward), Some(list[3].clone()));
        assert_eq!(library.step(None, Direction::Backward), Some(list[0].clone()));
        assert_eq!(
            library.step(Some(Path::new("/elsewhere.mp3")), Direction::Forward),
            Some(list[0].clone())
        );
    }

    #[test]
    fn test_shuffle_picks_from_playlist() {
        let (_music, _cache, mut library) = loaded(true, false);
        let list = library.playlist().to_vec();
        for _ in 0..20 {
            let pick = library.step(Some(&list[0]), Direction::Forward).unwrap();
            assert!(list.contains(&pick));
        }
    }

    #[test]
    fn test_queue_outranks_repeat() {
        let (_music, _cache, mut library) = loaded(false, true);
        let list = library.playlist().to_vec();
        library.queue_mut().enqueue(&list[2]);

        assert_eq!(library.next_on_finish(Some(&list[0])), Some(list[2].clone()));
        // queue consumed, repeat takes over
        assert_eq!(library.next_on_finish(Some(&list[2])), Some(list[2].clone()));

        library.repeat = false;
        assert_eq!(library.next_on_finish(Some(&list[2])), Some(list[3].clone()));
    }

    #[test]
    fn test_finish_with_empty_library() {
        let mut library = LibraryModel::new(false, false);
        assert_eq!(library.next_on_finish(Some(Path::new("/a.mp3"))), None);
    }
}
