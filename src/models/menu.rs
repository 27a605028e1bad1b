use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::order::OrderId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub price: f64,
}

/// Catalog of purchasable items. Ids run 1..=len with no gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, AppError> {
        for (index, item) in items.iter().enumerate() {
            let expected = index as u32 + 1;
            if item.id != expected {
                return Err(AppError::InvalidSeed(format!(
                    "menu item `{}` has id {}, expected {expected}",
                    item.name, item.id
                )));
            }

            if !item.price.is_finite() || item.price < 0.0 {
                return Err(AppError::InvalidSeed(format!(
                    "menu item `{}` has invalid price {}",
                    item.name, item.price
                )));
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn lookup(&self, order_id: OrderId, item_id: u32) -> Result<&MenuItem, AppError> {
        (item_id as usize)
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
            .ok_or(AppError::InvalidItemReference {
                order_id,
                item_id,
                menu_len: self.items.len(),
            })
    }
}
