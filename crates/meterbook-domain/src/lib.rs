//! meterbook-domain
//!
//! Pure domain models (Customer, Reading, TariffSettings, DateRange, MeterStore).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod customer;
pub mod period;
pub mod reading;
pub mod settings;
pub mod store;

pub use common::*;
pub use customer::*;
pub use period::*;
pub use reading::*;
pub use settings::*;
pub use store::*;
