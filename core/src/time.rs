//! Time related utils.

use crate::{Error, Result};
use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;

/// DateTime is the alias for chrono's UTC datetime.
pub type DateTime = chrono::DateTime<Utc>;

/// Time format for ISO 8601 without fractional seconds: "2022-03-13T07:20:04Z"
pub const ISO8601: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601: `2022-03-13T07:20:04Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse `2022-03-13T07:20:04Z` into datetime.
///
/// Only the exact second precision UTC form is accepted.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, ISO8601).map_err(|e| {
        Error::unexpected(format!("parse '{s}' into iso8601 failed")).with_source(e)
    })?;
    Ok(t.and_utc())
}

/// Clock is the source of the current time.
///
/// Everything that decides freshness reads time through a `Clock` so tests can
/// move time forward without sleeping.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Get the current time.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// ManualClock only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the
/// context owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Set the current time.
    pub fn set(&self, t: DateTime) {
        *self.now.lock() = t;
    }

    /// Move the current time forward by `d`.
    pub fn advance(&self, d: chrono::TimeDelta) {
        *self.now.lock() += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime {
        *self.now.lock()
    }
}
