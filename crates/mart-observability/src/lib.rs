//! Logging setup for the Mart storefront client.
//!
//! Library crates only emit `tracing` events; the binary calls
//! [`init_logging`] once at startup to decide where they go.

mod logging;

pub use logging::*;
