//! Client models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A client who buys from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Inactive clients are kept for history but cannot buy
    pub active: bool,
}

/// Input for creating a client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewClient {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
}

/// Partial update for a client; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClientPatch {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl Client {
    pub fn apply(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}
