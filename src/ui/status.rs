use crate::error::{PlayerError, StatusKind};
use std::time::{Duration, Instant};

pub const STATUS_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub posted_at: Instant,
}

/// One transient line under the list, used for confirmations and errors alike.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.post(text.into(), StatusKind::Info);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post(text.into(), StatusKind::Error);
    }

    pub fn report(&mut self, err: &PlayerError) {
        self.error(err.to_string());
    }

    fn post(&mut self, text: String, kind: StatusKind) {
        self.message = Some(StatusMessage {
            text,
            kind,
            posted_at: Instant::now(),
        });
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// The message if it is younger than `STATUS_LIFETIME` at `now`.
    pub fn current_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.message
            .as_ref()
            .filter(|message| now.saturating_duration_since(message.posted_at) < STATUS_LIFETIME)
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current_at(Instant::now())
    }

    /// Text of the last message, expired or not.
    pub fn last_text(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }
}
