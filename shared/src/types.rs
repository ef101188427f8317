//! Common types used across the inventory system

use serde::{Deserialize, Serialize};

use crate::validation::clamp_pagination;

/// Offset/limit query parameters accepted by listing endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Clamped `(offset, limit)` pair
    pub fn bounds(&self) -> (i64, i64) {
        clamp_pagination(self.skip, self.limit)
    }
}

/// Listing response: the page of items and how many it holds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(data: Vec<T>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}
