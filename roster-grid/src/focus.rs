//! Focus preservation for filter inputs
//!
//! The grid may rebuild its inputs while the user is typing. The tracker
//! remembers which control had focus and where its cursor was, so the
//! rebuilt control can take focus back at the same offset.

use std::time::Duration;
use std::time::Instant;

use log::trace;

/// Delay between losing focus and settling as blurred.
pub const BLUR_GRACE: Duration = Duration::from_millis(150);

/// Identity of a focused filter control plus its cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusToken {
    pub column_key: String,
    pub filter_key: String,
    /// Cursor offset in characters.
    pub cursor: usize,
    pub anchor: Option<usize>,
}

impl FocusToken {
    pub fn new(column_key: impl Into<String>, filter_key: impl Into<String>) -> Self {
        Self {
            column_key: column_key.into(),
            filter_key: filter_key.into(),
            cursor: 0,
            anchor: None,
        }
    }

    pub fn at(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    /// Whether `self` and `other` name the same control.
    pub fn same_control(&self, other: &FocusToken) -> bool {
        self.column_key == other.column_key && self.filter_key == other.filter_key
    }

    pub fn names(&self, column_key: &str, filter_key: &str) -> bool {
        self.column_key == column_key && self.filter_key == filter_key
    }

    /// Cursor and anchor clamped to a value of `len` characters.
    pub fn clamped(&self, len: usize) -> (usize, Option<usize>) {
        (self.cursor.min(len), self.anchor.map(|a| a.min(len)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPhase {
    #[default]
    Blurred,
    Focused,
    /// Focused with edits not yet reflected by a re-render.
    Dirty,
}

#[derive(Debug, Clone)]
pub struct FocusTracker {
    phase: FocusPhase,
    token: Option<FocusToken>,
    blur_at: Option<Instant>,
    grace: Duration,
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self {
            phase: FocusPhase::Blurred,
            token: None,
            blur_at: None,
            grace: BLUR_GRACE,
        }
    }
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn token(&self) -> Option<&FocusToken> {
        self.token.as_ref()
    }

    /// Gives focus to a control. Cancels a pending blur.
    pub fn focus(&mut self, token: FocusToken) {
        trace!("focus {}/{}", token.column_key, token.filter_key);
        self.blur_at = None;
        let keep = self
            .token
            .as_ref()
            .is_some_and(|t| t.same_control(&token))
            && self.phase == FocusPhase::Dirty;
        if !keep {
            self.phase = FocusPhase::Focused;
        }
        self.token = Some(token);
    }

    /// Records an edit and the resulting cursor.
    pub fn edited(&mut self, cursor: usize, anchor: Option<usize>) {
        if let Some(token) = self.token.as_mut() {
            token.cursor = cursor;
            token.anchor = anchor;
            self.phase = FocusPhase::Dirty;
        }
    }

    /// Records cursor movement without an edit.
    pub fn moved(&mut self, cursor: usize, anchor: Option<usize>) {
        if let Some(token) = self.token.as_mut() {
            token.cursor = cursor;
            token.anchor = anchor;
        }
    }

    /// Starts the grace period that ends in [`FocusPhase::Blurred`].
    pub fn request_blur(&mut self, now: Instant) {
        if self.token.is_some() && self.blur_at.is_none() {
            self.blur_at = Some(now + self.grace);
        }
    }

    /// Completes a pending blur whose grace period has elapsed. Returns
    /// `true` when focus was released.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.blur_at {
            Some(at) if now >= at => {
                self.blur_at = None;
                self.token = None;
                self.phase = FocusPhase::Blurred;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.blur_at
    }

    /// Post-render step: a dirty control re-enters `Focused`, and the
    /// cursor to restore is returned clamped to the control's new length.
    pub fn restore(&mut self, new_len: usize) -> Option<(usize, Option<usize>)> {
        let token = self.token.as_mut()?;
        if self.phase == FocusPhase::Dirty {
            self.phase = FocusPhase::Focused;
        }
        let (cursor, anchor) = token.clamped(new_len);
        token.cursor = cursor;
        token.anchor = anchor;
        Some((cursor, anchor))
    }
}
