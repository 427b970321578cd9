//! Monotonic microsecond clock
//!
//! Readings are rebased to a process-local epoch captured on the first call,
//! so `ts` values in the trace start near zero. Timeline viewers only use
//! timestamps relatively, never as absolute wall-clock time.

use std::sync::OnceLock;
use std::time::Instant;

use crate::domain::Timestamp;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Current monotonic reading in microseconds since first use.
///
/// Never fails and never goes backwards; successive calls on one thread
/// yield non-decreasing values.
pub fn now() -> Timestamp {
    let epoch = EPOCH.get_or_init(Instant::now);
    let micros = u64::try_from(epoch.elapsed().as_micros()).unwrap_or(u64::MAX);
    Timestamp(micros)
}
