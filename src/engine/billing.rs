use chrono::Utc;

use crate::config::TaxLine;
use crate::error::AppError;
use crate::models::bill::{Bill, BillLine};
use crate::models::menu::Menu;
use crate::models::order::Order;
use crate::state::Billing;

/// Prices every item of the order against the menu and applies tax once.
///
/// Fails on the first item id that is not on the menu; nothing is billed in
/// that case.
pub fn compute_bill(menu: &Menu, billing: &Billing, order: &Order) -> Result<Bill, AppError> {
    let lines = order
        .items
        .iter()
        .map(|&item_id| {
            menu.lookup(order.id, item_id).map(|item| BillLine {
                name: item.name.clone(),
                price: item.price,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal: f64 = lines.iter().map(|line| line.price).sum();
    let total = subtotal + subtotal * billing.tax_rate;
    let tax = match billing.tax_line {
        TaxLine::Single => subtotal * billing.tax_rate,
        TaxLine::Compounded => total * billing.tax_rate,
    };

    Ok(Bill {
        order_id: order.id,
        lines,
        subtotal,
        tax,
        total,
        billed_at: Utc::now(),
    })
}
