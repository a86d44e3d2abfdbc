//! Dispatch scheduler
//!
//! Decides when a filter change reaches the data source. In local mode
//! every change goes out at once; in remote mode changes are debounced and
//! only the state present when the quiet period elapses is emitted.

use std::time::Duration;
use std::time::Instant;

use log::debug;

use roster_lib::filter::FilterState;

/// Quiet period before a remote dispatch.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Rows are filtered in-process.
    #[default]
    Local,
    /// Rows are filtered by the listing endpoint.
    Remote,
}

#[derive(Debug, Clone)]
struct Pending {
    state: FilterState,
    due: Instant,
}

/// Time-driven debounce state machine.
///
/// The caller owns the clock: it passes `now` in and sleeps until
/// [`deadline`](Self::deadline) between polls.
#[derive(Debug, Clone)]
pub struct DispatchScheduler {
    mode: DispatchMode,
    quiet: Duration,
    pending: Option<Pending>,
}

impl Default for DispatchScheduler {
    fn default() -> Self {
        Self::new(DispatchMode::default())
    }
}

impl DispatchScheduler {
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            quiet: QUIET_PERIOD,
            pending: None,
        }
    }

    pub fn with_quiet_period(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Records a change. Returns the state to dispatch right away in local
    /// mode; in remote mode (re)starts the timer and returns `None`.
    pub fn schedule(&mut self, state: FilterState, now: Instant) -> Option<FilterState> {
        match self.mode {
            DispatchMode::Local => Some(state),
            DispatchMode::Remote => {
                self.pending = Some(Pending {
                    state,
                    due: now + self.quiet,
                });
                None
            }
        }
    }

    /// Emits the pending state once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<FilterState> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            let pending = self.pending.take()?;
            debug!("debounce elapsed, dispatching {}", pending.state.to_query_string());
            return Some(pending.state);
        }
        None
    }

    /// When the pending state falls due, if anything is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Switches mode. A pending remote state is dropped, not replayed.
    pub fn set_mode(&mut self, mode: DispatchMode) {
        if mode != self.mode {
            debug!("dispatch mode {:?} -> {:?}", self.mode, mode);
            self.cancel();
            self.mode = mode;
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
