//! Shared types and rules for the inventory system
//!
//! This crate holds the I/O-free part of the system: row models, request
//! inputs, stock arithmetic, basket planning and receipt rendering. It is
//! used by the backend and compiled to WASM for the browser.

pub mod basket;
pub mod ledger;
pub mod models;
pub mod receipt;
pub mod types;
pub mod validation;

pub use basket::*;
pub use ledger::StockError;
pub use models::*;
pub use receipt::*;
pub use types::*;
pub use validation::*;
