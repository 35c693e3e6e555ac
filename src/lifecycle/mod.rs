//! Lifecycle management subsystem.
//!
//! Startup is plain (config → bind → serve, see `main.rs`); this module
//! covers the other end: a broadcast shutdown coordinator so the server
//! drains gracefully on Ctrl+C, and so tests can stop relay instances
//! deliberately instead of leaking tasks.

pub mod shutdown;

pub use shutdown::Shutdown;
