use serde::{Deserialize, Serialize};

/// A catalog item sold through `buyproduk`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Three uppercase letters, unique within the catalog
    pub code: String,
    pub name: String,
    pub price: u64,
}
