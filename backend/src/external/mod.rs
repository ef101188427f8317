//! External collaborators outside the database

pub mod receipt_store;

pub use receipt_store::{ReceiptStore, ReceiptStoreError};
