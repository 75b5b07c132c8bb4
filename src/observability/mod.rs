//! Observability for collview
//!
//! Structured, synchronous JSON logging. Observability is read-only: it
//! never changes the outcome of a view or store operation.
//!
//! ```ignore
//! use collview::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::warn("VIEW_PROJECTION_IGNORED", &[("operation", "update")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
