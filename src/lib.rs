#![doc(test(attr(deny(warnings))))]

//! meterbook tracks water and electricity meter readings per customer and
//! bills consumption over calendar periods with a two-part tariff.
//!
//! The engine lives in the workspace crates; this crate wires them into an
//! interactive shell with JSON persistence and an optional HTTP sync endpoint.

pub mod cli;
pub mod errors;
pub mod sync;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("meterbook tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
