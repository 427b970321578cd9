//! Domain types providing compile-time safety and self-documentation
//!
//! Newtype wrappers keep a thread tag from being confused with a timestamp
//! and make the record-writing code self-describing.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread tag for the trace `tid` field
///
/// A stable per-thread integer assigned from a process-wide monotonic
/// counter the first time a thread records anything. Distinct across live
/// threads; purely display data for the timeline viewer, not a kernel TID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadTag(pub u64);

static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TAG: u64 = NEXT_THREAD_TAG.fetch_add(1, Ordering::Relaxed);
}

impl ThreadTag {
    /// Tag of the calling thread, assigned on first use.
    pub fn current() -> Self {
        THREAD_TAG.with(|tag| ThreadTag(*tag))
    }
}

impl fmt::Display for ThreadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread#{}", self.0)
    }
}

/// Timestamp in microseconds
///
/// A monotonic clock reading rebased to the first use of the clock in this
/// process (see [`crate::clock::now`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Raw microsecond value (the trace `ts` field).
    pub fn as_micros(self) -> u64 {
        self.0
    }

    /// Convert to milliseconds (f64)
    pub fn as_millis(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    /// Convert to seconds (f64)
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}

/// One timed region, ready for serialization
///
/// Produced by a [`crate::timer::ScopeTimer`] when its region ends and owned
/// exclusively by that scope until handed to the session. `end >= start`
/// holds by construction (both are read from the same monotonic clock, in
/// order) and is not enforced defensively.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Display name for the region; may contain characters the record
    /// escaping rule has to handle.
    pub label: Cow<'static, str>,
    /// Monotonic reading taken when the region started.
    pub start: Timestamp,
    /// Monotonic reading taken when the region ended.
    pub end: Timestamp,
    /// Tag of the thread the region ran on.
    pub thread: ThreadTag,
}

impl Measurement {
    /// Region duration in microseconds (the trace `dur` field).
    pub fn duration_micros(&self) -> u64 {
        self.end.0 - self.start.0
    }
}
