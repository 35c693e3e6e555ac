//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! translated URL + classified body
//!     → executor.rs (encode, send, await)
//!     → UpstreamResponse (status, content type, buffered bytes)
//!     → http/response.rs (emit to the original caller)
//! ```

pub mod executor;

pub use executor::{TransportError, TransportExecutor, UpstreamResponse};
