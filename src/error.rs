// Error taxonomy for the player core
// Nothing here is fatal - every variant ends up as text on the status line

use std::path::Path;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayerError {
    /// Missing file or folder.
    #[error("{0}")]
    NotFound(String),

    /// Malformed command argument or out-of-range index.
    #[error("{0}")]
    InvalidInput(String),

    /// Cache or config could not be read/written.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Tag data could not be parsed.
    #[error("Could not read tags from {path}: {reason}")]
    MetadataRead { path: String, reason: String },

    /// The mixer refused to decode or output a file.
    #[error("{0}")]
    Playback(String),
}

/// How a status message should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl PlayerError {
    pub fn not_found(path: &Path) -> Self {
        PlayerError::NotFound(format!("File not found: {}", file_label(path)))
    }

    pub fn metadata(path: &Path, reason: impl ToString) -> Self {
        PlayerError::MetadataRead {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Base file name for status messages ("song.mp3" rather than the full path).
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub type PlayerResult<T> = std::result::Result<T, PlayerError>;
