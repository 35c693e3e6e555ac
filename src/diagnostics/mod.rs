//! Diagnostics subsystem.
//!
//! Optional per-transaction request/response log, separate from the
//! structured tracing output. Enabled by a single config flag; failures
//! writing it never surface to the caller.

pub mod sink;

pub use sink::DiagnosticSink;
