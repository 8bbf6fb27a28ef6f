use crate::error::{PlayerError, PlayerResult};
use std::path::{Path, PathBuf};

/// User-built play-next list. `cursor` is the next entry to auto-play and
/// always stays within `0..=items.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    items: Vec<PathBuf>,
    cursor: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.items.get(index).map(PathBuf::as_path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.items.iter().any(|p| p == path)
    }

    /// Append `path` unless it is already queued. Returns whether it was added.
    pub fn enqueue(&mut self, path: &Path) -> bool {
        if self.contains(path) {
            return false;
        }
        self.items.push(path.to_path_buf());
        true
    }

    pub fn remove_at(&mut self, index: usize) -> PlayerResult<PathBuf> {
        if index >= self.items.len() {
            return Err(PlayerError::InvalidInput("Invalid queue index".to_string()));
        }

        let removed = self.items.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.items.is_empty() {
            self.cursor = 0;
        }
        Ok(removed)
    }

    /// Empty the queue, returning how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        self.cursor = 0;
        count
    }

    /// Next unplayed entry, moving the cursor past it.
    pub fn advance(&mut self) -> Option<PathBuf> {
        let next = self.items.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(next)
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.items.len());
    }
}
