//! Business logic services for the inventory backend

pub mod category;
pub mod client;
pub mod ledger;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod supplier;

pub use category::CategoryService;
pub use client::ClientService;
pub use ledger::StockLedger;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use sale::{SaleConfirmation, SaleService};
pub use supplier::SupplierService;
