//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, relay handler)
//!     → request.rs (upstream URL translation, body classification)
//!     → [transport executes the upstream call]
//!     → response.rs (mirror status, content type, body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{upstream_url, FormPart, OutboundBody, DEFAULT_CONTENT_TYPE};
pub use server::HttpServer;
