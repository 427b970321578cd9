//! # scope-trace - In-Process Execution Tracer
//!
//! scope-trace measures wall-clock durations of code regions (typically
//! function bodies) and streams them into a Chrome Trace Event Format file
//! viewable in `chrome://tracing`, Perfetto, or Speedscope. Instrumentation
//! is scope-based: opening a timer marks the start of a region, and the
//! region ends when the timer is stopped or dropped.
//!
//! ## Architecture Overview
//!
//! ```text
//! application thread(s)                  controller thread
//! ┌──────────────────┐
//! │ profile_scope!() │
//! │       │          │
//! │       ▼          │
//! │  ScopeTimer      │                 begin() / end()
//! │  (start..drop)   │                        │
//! └───────┬──────────┘                        │
//!         │ Measurement                       ▼
//!         └───────────────▶ TraceSession ──▶ trace file
//!                           (mutex-serialized writer)
//! ```
//!
//! ## Module Structure
//!
//! - [`session`]: the trace session — owns the output file, serializes
//!   concurrent submissions, manages document begin/end boundaries
//! - [`timer`]: RAII scope timer producing one [`Measurement`] per region
//! - [`domain`]: core types ([`Measurement`], [`ThreadTag`], [`Timestamp`])
//!   and the [`TraceError`] taxonomy
//! - [`clock`]: monotonic microsecond clock rebased to first use
//! - `macros`: `profile_scope!` / `profile_function!` instrumentation
//!   markers, compiled out when the `instrument` feature is disabled
//!
//! ## Typical Usage
//!
//! ```no_run
//! use scope_trace::TraceSession;
//!
//! fn work() {
//!     scope_trace::profile_function!();
//!     // ... region being measured ...
//! }
//!
//! # fn main() -> Result<(), scope_trace::TraceError> {
//! TraceSession::global().begin_at("startup", "trace.json")?;
//! work();
//! TraceSession::global().end()?;
//! # Ok(())
//! # }
//! ```
//!
//! Concurrent threads may record freely into an active session; records land
//! in the file in submission order. The output document is kept well-formed
//! across session restarts, early process exit with an open session, and any
//! interleaving of writers.

pub mod clock;
pub mod domain;
pub mod session;
pub mod timer;

mod macros;

pub use domain::{Measurement, ThreadTag, Timestamp, TraceError};
pub use session::TraceSession;
pub use timer::ScopeTimer;
