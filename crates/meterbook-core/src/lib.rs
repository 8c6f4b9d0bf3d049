//! meterbook-core
//!
//! Usage and billing engine plus validated store mutations for meterbook.
//! Depends on meterbook-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod command;
pub mod customer_service;
pub mod error;
pub mod period;
pub mod reading_service;
pub mod settings_service;
pub mod storage;
pub mod summary_service;
pub mod sync;
pub mod tariff;
pub mod time;
pub mod usage;

pub use command::*;
pub use customer_service::*;
pub use error::CoreError;
pub use period::*;
pub use reading_service::*;
pub use settings_service::*;
pub use summary_service::*;
pub use sync::*;
pub use tariff::*;
pub use time::Clock;
pub use usage::*;
