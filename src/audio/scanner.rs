use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "ogg", "aac", "m4a", "wma", "opus", "ape", "wv", "tta",
];

#[derive(Clone)]
pub struct MusicScanner {
    supported_extensions: Vec<String>,
}

impl MusicScanner {
    pub fn new() -> Self {
        Self {
            supported_extensions: SUPPORTED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Every supported file under `root`, recursively, in sorted path order.
    /// Hidden files and hidden directories are skipped.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root.as_ref())
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.is_supported_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        debug!("Scanned {}: {} audio files", root.as_ref().display(), files.len());
        files
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let normalized = ext.to_ascii_lowercase();
                self.supported_extensions.contains(&normalized)
            })
            .unwrap_or(false)
    }
}

impl Default for MusicScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_is_recursive_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b_album")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("b_album/02.FLAC"), b"x").unwrap();
        fs::write(root.join("a.mp3"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();
        fs::write(root.join(".secret.mp3"), b"x").unwrap();
        fs::write(root.join(".hidden/c.ogg"), b"x").unwrap();

        let files = MusicScanner::new().scan_directory(root);
        assert_eq!(files, vec![root.join("a.mp3"), root.join("b_album/02.FLAC")]);
    }

    #[test]
    fn test_missing_root_scans_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(MusicScanner::new().scan_directory(dir.path().join("nope")).is_empty());
    }
}
