//! Scope timer: measures one region and submits it exactly once
//!
//! A [`ScopeTimer`] reads the monotonic clock at construction and again when
//! stopped, then hands the completed [`Measurement`] to its session. `Drop`
//! stops the timer, so every opened scope reports on normal return, early
//! return, or unwinding — and at most once, guarded by the stopped flag.

use std::borrow::Cow;

use log::warn;

use crate::clock;
use crate::domain::{Measurement, ThreadTag, Timestamp};
use crate::session::TraceSession;

/// RAII guard timing one code region.
///
/// Exposes no errors: a failed submission is logged and swallowed, since the
/// common call site is a destructor.
pub struct ScopeTimer<'a> {
    session: &'a TraceSession,
    label: Cow<'static, str>,
    start: Timestamp,
    stopped: bool,
}

impl<'a> ScopeTimer<'a> {
    /// Start timing a region, reporting into `session`.
    pub fn start(session: &'a TraceSession, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            session,
            label: label.into(),
            start: clock::now(),
            stopped: false,
        }
    }

    /// End the region and submit the measurement.
    ///
    /// Idempotent: only the first call (explicit or via `Drop`) submits.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let measurement = Measurement {
            label: self.label.clone(),
            start: self.start,
            end: clock::now(),
            thread: ThreadTag::current(),
        };
        if let Err(err) = self.session.record(&measurement) {
            warn!("failed to record region \"{}\": {err}", measurement.label);
        }
    }
}

impl ScopeTimer<'static> {
    /// Start timing a region, reporting into [`TraceSession::global`].
    pub fn attach(label: impl Into<Cow<'static, str>>) -> Self {
        Self::start(TraceSession::global(), label)
    }
}

impl Drop for ScopeTimer<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}
