use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::inventory::Inventory;
use crate::models::menu::{Menu, MenuItem};

/// Starting catalog and stock, either built in or read from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Seed {
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub inventory: BTreeMap<String, i64>,
}

impl Seed {
    pub fn builtin() -> Self {
        let menu = [
            ("Burger", 5.99),
            ("Pizza", 8.99),
            ("Pasta", 7.49),
            ("Salad", 4.99),
        ]
        .into_iter()
        .zip(1..)
        .map(|((name, price), id)| MenuItem {
            id,
            name: name.to_string(),
            price,
        })
        .collect();

        let inventory = [
            ("Burger Patty", 20),
            ("Pizza Dough", 15),
            ("Pasta", 25),
            ("Salad Greens", 30),
        ]
        .into_iter()
        .map(|(name, qty)| (name.to_string(), qty))
        .collect();

        Self { menu, inventory }
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw).map_err(|err| AppError::InvalidSeed(err.to_string()))
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
            AppError::InvalidSeed(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn into_parts(self) -> Result<(Menu, Inventory), AppError> {
        Ok((Menu::new(self.menu)?, Inventory::new(self.inventory)))
    }
}
