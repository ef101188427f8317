//! Supplier models
//!
//! A supplier lives either in the active table or in the backup table,
//! never both. The two row types carry the same fields so that archiving
//! and restoring copy a supplier verbatim.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_nit;

/// An active supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    /// Tax identification number, the supplier's business key
    pub nit: String,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub city: String,
}

/// An archived (soft-deleted) supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SupplierBackup {
    pub nit: String,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub city: String,
}

/// Condensed supplier listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SupplierSummary {
    pub nit: String,
    pub name: String,
    pub contact: String,
}

/// Which of the two supplier sets a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierState {
    Active,
    Archived,
}

impl std::fmt::Display for SupplierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupplierState::Active => write!(f, "Active"),
            SupplierState::Archived => write!(f, "Archived"),
        }
    }
}

impl From<Supplier> for SupplierBackup {
    fn from(s: Supplier) -> Self {
        Self {
            nit: s.nit,
            name: s.name,
            contact: s.contact,
            address: s.address,
            city: s.city,
        }
    }
}

impl From<SupplierBackup> for Supplier {
    fn from(b: SupplierBackup) -> Self {
        Self {
            nit: b.nit,
            name: b.name,
            contact: b.contact,
            address: b.address,
            city: b.city,
        }
    }
}

/// Input for creating a supplier
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSupplier {
    #[validate(custom = "validate_nit")]
    pub nit: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub contact: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
}

impl From<NewSupplier> for Supplier {
    fn from(input: NewSupplier) -> Self {
        Self {
            nit: input.nit,
            name: input.name,
            contact: input.contact,
            address: input.address,
            city: input.city,
        }
    }
}

/// Partial update for a supplier; the nit itself cannot change
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SupplierPatch {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub contact: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
}

impl Supplier {
    pub fn apply(&mut self, patch: SupplierPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
    }
}
