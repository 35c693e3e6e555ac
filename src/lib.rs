//! Transparent HTTP relay for the Telegram Bot API.
//!
//! Accepts any inbound HTTP request, rebuilds the equivalent request
//! against `https://api.telegram.org` (method, body, file uploads),
//! and mirrors the upstream response back verbatim.

pub mod config;
pub mod diagnostics;
pub mod http;
pub mod lifecycle;
pub mod transport;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
