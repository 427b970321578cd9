//! Domain model for scope-trace
//!
//! Core value types handed between the timer and the session, plus the
//! structured error taxonomy.

pub mod errors;
pub mod types;

pub use errors::TraceError;
pub use types::{Measurement, ThreadTag, Timestamp};
