//! Trace session: the concurrent event writer
//!
//! A [`TraceSession`] owns the output document for one open-to-close
//! lifetime. All shared mutable state — the sink, the event count, and the
//! active/inactive phase itself — sits behind a single mutex, so event
//! writes and session transitions cannot interleave: a record racing a
//! transition lands either fully inside the old document (before its footer)
//! or is dropped against the new/absent session.
//!
//! Record order in the output is lock-acquisition order, not region start
//! order. The sink is flushed after every record, so a crash mid-session
//! loses at most the in-flight record.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use log::{debug, trace, warn};

use crate::domain::{Measurement, TraceError};

/// Destination used by [`TraceSession::begin`].
pub const DEFAULT_TRACE_PATH: &str = "results.json";

/// Document prefix written when a session opens.
const HEADER: &str = "{\"otherData\": {},\"traceEvents\":[";
/// Document suffix written when a session closes.
const FOOTER: &str = "]}";

/// The open half of a session: sink, delimiter state, diagnostic name.
struct ActiveSession {
    name: String,
    sink: BufWriter<File>,
    /// Records written so far; only consulted for the delimiter decision,
    /// never emitted as a record ID.
    event_count: u64,
}

impl ActiveSession {
    /// Append one serialized record, comma-separated from its predecessor,
    /// and flush. Field order and the quote→apostrophe escaping rule are
    /// part of the wire format; backslashes and control characters in the
    /// label pass through unmodified and can leave the document malformed
    /// (documented limitation, not silently fixed).
    fn write_record(&mut self, measurement: &Measurement) -> Result<(), TraceError> {
        if self.event_count > 0 {
            self.sink.write_all(b",")?;
        }
        let name = measurement.label.replace('"', "'");
        write!(
            self.sink,
            "{{\"cat\":\"function\",\"dur\":{},\"name\":\"{}\",\"ph\":\"X\",\"pid\":0,\"tid\":{},\"ts\":{}}}",
            measurement.duration_micros(),
            name,
            measurement.thread.0,
            measurement.start.as_micros(),
        )?;
        self.sink.flush()?;
        self.event_count += 1;
        Ok(())
    }

    /// Complete the document: footer, final flush. The file handle closes
    /// when `self` drops.
    fn finish(mut self) -> Result<(), TraceError> {
        self.sink.write_all(FOOTER.as_bytes())?;
        self.sink.flush()?;
        debug!(
            "trace session \"{}\" ended with {} event(s)",
            self.name, self.event_count
        );
        Ok(())
    }
}

/// Thread-safe trace session with an explicit open/close lifecycle.
///
/// Construct one per application (and pass it to instrumentation sites), or
/// use [`TraceSession::global`] for the process-wide instance the
/// instrumentation macros bind to. Dropping an owned session — or process
/// exit, for the global one — completes any still-open document.
pub struct TraceSession {
    inner: Mutex<Option<ActiveSession>>,
}

impl TraceSession {
    /// New session in the inactive state.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// The lazily-initialized process-wide session.
    ///
    /// First access registers an `atexit` hook that ends the session, since
    /// statics are not dropped at process exit and an unterminated document
    /// must never leak.
    pub fn global() -> &'static TraceSession {
        static GLOBAL: OnceLock<TraceSession> = OnceLock::new();

        extern "C" fn end_global_session() {
            if let Some(session) = GLOBAL.get() {
                if let Err(err) = session.end() {
                    warn!("failed to end trace session at exit: {err}");
                }
            }
        }

        GLOBAL.get_or_init(|| {
            #[allow(unsafe_code)]
            let rc = unsafe { libc::atexit(end_global_session) };
            if rc != 0 {
                warn!("could not register atexit hook; end the global session explicitly");
            }
            TraceSession::new()
        })
    }

    /// A panicking instrumented thread must not disable tracing for the
    /// rest of the process, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a session writing to [`DEFAULT_TRACE_PATH`].
    pub fn begin(&self, name: &str) -> Result<(), TraceError> {
        self.begin_at(name, DEFAULT_TRACE_PATH)
    }

    /// Open a session writing to `path`, truncating any existing content.
    ///
    /// An already-active session is first ended in full (footer written,
    /// sink closed) — a safe implicit transition, not an error; a failure
    /// while closing it is logged and does not abort the new session. If
    /// the destination cannot be opened the session is left inactive, no
    /// partial header is written, and
    /// [`TraceError::DestinationOpen`] is returned. `name` is
    /// kept for diagnostics only and never appears in the output format.
    pub fn begin_at(&self, name: &str, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let path = path.as_ref();
        let mut guard = self.lock();
        if let Some(previous) = guard.take() {
            if let Err(err) = previous.finish() {
                warn!("failed to close previous trace session: {err}");
            }
        }
        let file = File::create(path).map_err(|source| TraceError::DestinationOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut sink = BufWriter::new(file);
        sink.write_all(HEADER.as_bytes())?;
        sink.flush()?;
        debug!("trace session \"{name}\" started at {}", path.display());
        *guard = Some(ActiveSession {
            name: name.to_string(),
            sink,
            event_count: 0,
        });
        Ok(())
    }

    /// Close the open document: footer, flush, release the sink.
    ///
    /// No-op when inactive; safe to call any number of times.
    pub fn end(&self) -> Result<(), TraceError> {
        match self.lock().take() {
            Some(active) => active.finish(),
            None => Ok(()),
        }
    }

    /// Whether a document is currently open for writing.
    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Records written in the current session (0 when inactive).
    pub fn event_count(&self) -> u64 {
        self.lock().as_ref().map_or(0, |active| active.event_count)
    }

    /// Serialize one measurement into the open document.
    ///
    /// Returns `Ok(true)` when the record was written and flushed,
    /// `Ok(false)` when no session is active (the measurement is discarded),
    /// or the underlying I/O error; after a failed write the document may be
    /// malformed and no recovery is attempted.
    pub fn record(&self, measurement: &Measurement) -> Result<bool, TraceError> {
        let mut guard = self.lock();
        let Some(active) = guard.as_mut() else {
            trace!(
                "dropped measurement \"{}\": no active trace session",
                measurement.label
            );
            return Ok(false);
        };
        active.write_record(measurement)?;
        Ok(true)
    }
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TraceSession {
    fn drop(&mut self) {
        if let Err(err) = self.end() {
            warn!("failed to end trace session on drop: {err}");
        }
    }
}
