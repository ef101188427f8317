//! HTTP request handlers

pub mod category;
pub mod check;
pub mod client;
pub mod health;
pub mod pages;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;

pub use category::*;
pub use check::*;
pub use client::*;
pub use health::*;
pub use pages::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use supplier::*;
