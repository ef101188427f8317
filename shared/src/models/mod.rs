//! Domain models for the inventory system

mod category;
mod client;
mod product;
mod purchase;
mod supplier;

pub use category::*;
pub use client::*;
pub use product::*;
pub use purchase::*;
pub use supplier::*;
