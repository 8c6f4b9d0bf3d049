//! Transports for the remote sync contract defined in `meterbook_core::sync`.

mod http;

pub use http::HttpSyncTransport;
