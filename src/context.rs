// Startup context: where things live on disk and which tag reader to use
// Built once in main and handed down, nothing reads these paths globally

use crate::audio::tags::{FileTagReader, TagReader};
use crate::config::Config;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub config_path: PathBuf,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub tags: Arc<dyn TagReader>,
}

impl AppContext {
    /// Standard per-user locations, with `config_override` replacing the
    /// config file path when given.
    pub fn from_user_dirs(config_override: Option<PathBuf>) -> Self {
        let cache_root = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_root = dirs::data_local_dir().unwrap_or_else(|| cache_root.clone());

        Self {
            config_path: config_override.unwrap_or_else(Config::default_path),
            cache_dir: cache_root.join("wmus"),
            log_dir: data_root.join("wmus").join("logs"),
            tags: Arc::new(FileTagReader::new()),
        }
    }

    /// Everything under one directory, for tests and portable setups.
    pub fn in_dir(root: impl Into<PathBuf>, tags: Arc<dyn TagReader>) -> Self {
        let root = root.into();
        Self {
            config_path: root.join("config.toml"),
            cache_dir: root.join("cache"),
            log_dir: root.join("logs"),
            tags,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config_path", &self.config_path)
            .field("cache_dir", &self.cache_dir)
            .field("log_dir", &self.log_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_config_path() {
        let ctx = AppContext::from_user_dirs(Some(PathBuf::from("/tmp/custom.toml")));
        assert_eq!(ctx.config_path, PathBuf::from("/tmp/custom.toml"));
        assert!(ctx.cache_dir.ends_with("wmus"));
        assert!(ctx.log_dir.ends_with("wmus/logs"));
    }

    #[test]
    fn test_in_dir_layout() {
        let ctx = AppContext::in_dir("/tmp/wmus-test", Arc::new(FileTagReader::new()));
        assert_eq!(ctx.config_path, PathBuf::from("/tmp/wmus-test/config.toml"));
        assert_eq!(ctx.cache_dir, PathBuf::from("/tmp/wmus-test/cache"));
    }
}
