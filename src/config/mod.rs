// Configuration management for wmus
// Handles loading/saving settings, with sensible defaults when config is missing

pub mod keys;

pub use keys::{Action, KeyBindings, KeySpec};

use crate::error::{PlayerError, PlayerResult};
use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub music_folder: String,
    pub seek_seconds: u64,
    pub shuffle: bool,
    pub repeat: bool,
    pub volume: f32,
    pub default_view: u8, // 1 library, 2 albums, 3 queue
    // tables go last in TOML
    pub keybindings: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_folder: String::new(),
            seek_seconds: 5,
            shuffle: false,
            repeat: false,
            volume: 1.0,
            default_view: 1,
            keybindings: KeyBindings::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wmus")
            .join("config.toml")
    }

    /// Read the config at `path`. Never fails: a missing file is created
    /// with defaults, an unreadable one is ignored.
    pub fn load_from(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = Config::default();
                if let Err(e) = config.save_to(path) {
                    warn!("{}", e);
                }
                config
            }
            Err(e) => {
                warn!("Could not read config {}: {}", path.display(), e);
                Config::default()
            }
        };

        config.music_folder = expand_home(&config.music_folder);
        config.volume = config.volume.clamp(0.0, 1.0);
        config
    }

    pub fn save_to(&self, path: &Path) -> PlayerResult<()> {
        let mut document = self.clone();
        document.music_folder = contract_home(&self.music_folder);

        let content = toml::to_string_pretty(&document)
            .map_err(|e| PlayerError::Persistence(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PlayerError::Persistence(format!("Failed to create config dir: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| PlayerError::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn music_root(&self) -> PathBuf {
        PathBuf::from(&self.music_folder)
    }
}

/// `~/Music` -> `/home/me/Music`. Anything else is returned as is.
pub fn expand_home(folder: &str) -> String {
    let rest = match folder.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return folder.to_string(),
    };

    match home_dir() {
        Some(home) => home
            .join(rest.trim_start_matches(['/', '\\']))
            .to_string_lossy()
            .into_owned(),
        None => folder.to_string(),
    }
}

/// Store folders under the home directory as `~/...`.
pub fn contract_home(folder: &str) -> String {
    if folder.is_empty() {
        return String::new();
    }

    let path = Path::new(folder);
    match home_dir().and_then(|home| path.strip_prefix(&home).ok().map(Path::to_path_buf)) {
        Some(relative) if relative.as_os_str().is_empty() => "~".to_string(),
        Some(relative) => format!("~/{}", relative.to_string_lossy().replace('\\', "/")),
        None => folder.replace('\\', "/"),
    }
}
