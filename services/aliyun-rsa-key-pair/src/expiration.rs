use credsign_core::time::DateTime;
use credsign_core::{Error, Result};

/// Fraction of the validity window after which a credential counts as stale.
pub const DEFAULT_IN_ADVANCE_SCALE: f64 = 0.95;

/// Bookkeeping recorded by every successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshState {
    /// When the refresh committed.
    pub last_refreshed_at: DateTime,
    /// Seconds from `last_refreshed_at` until the server side expiration.
    ///
    /// Not clamped: a server clock that runs behind ours yields a negative
    /// value, which makes the credential stale immediately.
    pub validity_seconds: i64,
}

/// Decides when a cached credential needs refreshing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpirationTracker {
    in_advance_scale: f64,
}

impl Default for ExpirationTracker {
    fn default() -> Self {
        Self {
            in_advance_scale: DEFAULT_IN_ADVANCE_SCALE,
        }
    }
}

impl ExpirationTracker {
    /// Create a tracker with [`DEFAULT_IN_ADVANCE_SCALE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom scale, which must be within `(0, 1]`.
    pub fn with_in_advance_scale(mut self, scale: f64) -> Result<Self> {
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(Error::config_invalid(format!(
                "in advance scale must be within (0, 1], got {scale}"
            )));
        }
        self.in_advance_scale = scale;
        Ok(self)
    }

    /// Get the configured scale.
    pub fn in_advance_scale(&self) -> f64 {
        self.in_advance_scale
    }

    /// Whole seconds between `now` and `expiration`, negative if already past.
    pub fn compute_validity(&self, now: DateTime, expiration: DateTime) -> i64 {
        (expiration - now).num_seconds()
    }

    /// Build the state to commit for a refresh finishing at `now`.
    pub fn refresh_state(&self, now: DateTime, expiration: DateTime) -> RefreshState {
        RefreshState {
            last_refreshed_at: now,
            validity_seconds: self.compute_validity(now, expiration),
        }
    }

    /// Check whether `state` needs a refresh at `now`.
    ///
    /// No state at all means nothing was ever fetched, which is stale.
    pub fn is_stale(&self, state: Option<&RefreshState>, now: DateTime) -> bool {
        let Some(state) = state else {
            return true;
        };

        let elapsed = (now - state.last_refreshed_at).num_milliseconds() as f64 / 1000.0;
        elapsed >= state.validity_seconds as f64 * self.in_advance_scale
    }
}
