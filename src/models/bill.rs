use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order::OrderId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillLine {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub order_id: OrderId,
    pub lines: Vec<BillLine>,
    pub subtotal: f64,
    /// Figure printed on the tax line; see `TaxLine`.
    pub tax: f64,
    /// Amount charged and written to the sales log.
    pub total: f64,
    pub billed_at: DateTime<Utc>,
}
