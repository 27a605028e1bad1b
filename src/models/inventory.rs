use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stock on hand per ingredient name. Orders never touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    stock: BTreeMap<String, i64>,
}

impl Inventory {
    pub fn new(stock: BTreeMap<String, i64>) -> Self {
        Self { stock }
    }

    /// Adds `quantity` to the ingredient, creating it at zero if unknown.
    /// Returns the new level.
    pub fn restock(&mut self, ingredient: &str, quantity: i64) -> i64 {
        let level = self.stock.entry(ingredient.to_string()).or_insert(0);
        *level = level.saturating_add(quantity);
        *level
    }

    pub fn quantity(&self, ingredient: &str) -> Option<i64> {
        self.stock.get(ingredient).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.stock.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }
}
