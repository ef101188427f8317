//! Product category models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i32,
    pub name: String,
    /// Short unique code (e.g., "VEL" for candles)
    pub code: String,
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
}

/// Partial update for a category; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
}

impl Category {
    pub fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
    }
}
