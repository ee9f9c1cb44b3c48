//! Debounced text input

use std::time::Duration;
use std::time::Instant;

/// Holds back text input until typing pauses.
///
/// Every keystroke replaces the pending text and restarts the window. The
/// caller polls with the current time; once the window has elapsed since the
/// last keystroke the pending text is released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// How long input must be quiet before it is released.
    window: Duration,

    /// Text waiting to be committed.
    pending: Option<String>,

    /// When the most recent keystroke arrived.
    last_input: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_input: None,
        }
    }

    /// Returns the debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a keystroke.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(text.into());
        self.last_input = Some(now);
    }

    /// Returns the text waiting to be committed.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Returns when the pending text becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_input) {
            (Some(_), Some(last)) => Some(last + self.window),
            _ => None,
        }
    }

    /// Returns `true` if pending text is ready at `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Releases the pending text if it is ready at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.is_ready(now) { self.take() } else { None }
    }

    /// Releases the pending text regardless of the window.
    pub fn take(&mut self) -> Option<String> {
        self.last_input = None;
        self.pending.take()
    }

    /// Discards the pending text.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_input = None;
    }
}
