use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::info;

use super::{Console, Flow};
use crate::engine::kitchen::{drain_and_process_all, KitchenEvent, OrderOutcome};
use crate::error::AppError;
use crate::models::bill::Bill;
use crate::state::AppState;

const ITEM_SENTINEL: &str = "-1";

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(super) async fn display_menu(&mut self, state: &AppState) -> Result<Flow, AppError> {
        let mut text = String::from("\n--- Menu ---\n");
        for item in state.menu.items() {
            text.push_str(&format!("{}. {} - ${:.2}\n", item.id, item.name, item.price));
        }

        self.write(&text).await?;
        Ok(Flow::Continue)
    }

    /// Reads item ids up to the `-1` sentinel, then the customization: the
    /// rest of the sentinel's line, or the next line when that is blank.
    pub(super) async fn place_order(&mut self, state: &mut AppState) -> Result<Flow, AppError> {
        self.write("Enter item IDs to order (enter -1 to stop): ").await?;

        let mut items = Vec::new();
        let trailing = 'intake: loop {
            let Some(line) = self.read_line().await? else {
                return Ok(Flow::Exit);
            };

            let mut rest = line.as_str();
            while let Some((token, tail)) = next_token(rest) {
                rest = tail;

                if token == ITEM_SENTINEL {
                    break 'intake tail.trim().to_string();
                }

                match token.parse::<u32>() {
                    Ok(item_id) => items.push(item_id),
                    Err(_) => {
                        self.write(&format!("Ignoring invalid item ID '{token}'.\n"))
                            .await?;
                    }
                }
            }
        };

        let customization = if trailing.is_empty() {
            self.write("Any customizations? ").await?;
            self.read_line().await?.unwrap_or_default()
        } else {
            trailing
        };

        let order_id = state.place_order(items, customization.trim());
        self.write(&format!("Order placed successfully! Order ID: {order_id}\n"))
            .await?;
        Ok(Flow::Continue)
    }

    pub(super) async fn view_queue(&mut self, state: &AppState) -> Result<Flow, AppError> {
        self.write(&format!(
            "Order queue contains {} orders.\n",
            state.pending_orders()
        ))
        .await?;
        Ok(Flow::Continue)
    }

    /// Drains the queue, printing each order as it goes through the kitchen.
    pub(super) async fn process_orders(&mut self, state: &mut AppState) -> Result<Flow, AppError> {
        if state.orders.is_empty() {
            self.write("No orders to process.\n").await?;
            return Ok(Flow::Continue);
        }

        let tax_rate = state.billing.tax_rate;
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        let drain = async move { drain_and_process_all(state, Some(&events_tx)).await };
        let print = async {
            while let Some(event) = events_rx.recv().await {
                self.write(&render_event(&event, tax_rate)).await?;
            }
            Ok::<(), AppError>(())
        };

        let (_outcomes, printed) = tokio::join!(drain, print);
        printed?;
        Ok(Flow::Continue)
    }

    pub(super) async fn manage_inventory(&mut self, state: &mut AppState) -> Result<Flow, AppError> {
        let mut text = String::from("\n--- Inventory ---\n");
        for (name, quantity) in state.inventory.iter() {
            text.push_str(&format!("{name}: {quantity}\n"));
        }
        self.write(&text).await?;

        loop {
            self.write("Enter ingredient to restock (or -1 to stop): ")
                .await?;
            let Some(line) = self.read_line().await? else {
                return Ok(Flow::Exit);
            };

            let ingredient = line.trim();
            if ingredient == ITEM_SENTINEL {
                break;
            }
            if ingredient.is_empty() {
                self.write("Ingredient name cannot be empty.\n").await?;
                continue;
            }
            let ingredient = ingredient.to_string();

            self.write("Enter quantity: ").await?;
            let Some(raw) = self.read_line().await? else {
                return Ok(Flow::Exit);
            };

            match raw.trim().parse::<i64>() {
                Ok(quantity) => {
                    let level = state.inventory.restock(&ingredient, quantity);
                    info!(ingredient = %ingredient, quantity, level, "inventory restocked");
                    self.write(&format!("{ingredient} now at {level}.\n"))
                        .await?;
                }
                Err(_) => {
                    self.write(&format!(
                        "Invalid quantity '{}', entry skipped.\n",
                        raw.trim()
                    ))
                    .await?;
                }
            }
        }

        Ok(Flow::Continue)
    }

    pub(super) async fn sales_report(&mut self, state: &AppState) -> Result<Flow, AppError> {
        let Some(report) = state.sales_log.report().await? else {
            self.write("No sales data found.\n").await?;
            return Ok(Flow::Continue);
        };

        let mut text = format!(
            "\n--- Sales Report ---\nTotal Sales: ${:.2}\n",
            report.total
        );
        if report.skipped > 0 {
            text.push_str(&format!(
                "Skipped {} malformed entries.\n",
                report.skipped
            ));
        }

        self.write(&text).await?;
        Ok(Flow::Continue)
    }
}

fn next_token(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }

    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    Some(line.split_at(end))
}

fn render_event(event: &KitchenEvent, tax_rate: f64) -> String {
    match event {
        KitchenEvent::Preparing(order_id) => format!("Processing Order ID: {order_id}\n"),
        KitchenEvent::Finished(OrderOutcome::Billed(bill)) => format!(
            "Order ID: {} is ready!\n{}",
            bill.order_id,
            render_bill(bill, tax_rate)
        ),
        KitchenEvent::Finished(OrderOutcome::Unsaved { bill, error }) => format!(
            "Order ID: {} is ready!\n{}Warning: sale not recorded: {error}\n",
            bill.order_id,
            render_bill(bill, tax_rate)
        ),
        KitchenEvent::Finished(OrderOutcome::Rejected { order_id, error }) => {
            format!("Order ID: {order_id} rejected: {error}\n")
        }
    }
}

fn render_bill(bill: &Bill, tax_rate: f64) -> String {
    let mut text = format!("\n--- Bill for Order ID: {} ---\n", bill.order_id);
    for line in &bill.lines {
        text.push_str(&format!("{} - ${:.2}\n", line.name, line.price));
    }
    text.push_str(&format!(
        "Tax ({}%): ${:.2}\n",
        percent(tax_rate),
        bill.tax
    ));
    text.push_str(&format!("Total: ${:.2}\n", bill.total));
    text
}

fn percent(rate: f64) -> String {
    let formatted = format!("{:.2}", rate * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
