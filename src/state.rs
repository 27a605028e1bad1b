use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{Config, TaxLine};
use crate::engine::queue::enqueue_order;
use crate::models::inventory::Inventory;
use crate::models::menu::Menu;
use crate::models::order::{Order, OrderId};
use crate::observability::metrics::Metrics;
use crate::sales::SalesLog;

/// Tax settings applied by `compute_bill`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billing {
    pub tax_rate: f64,
    pub tax_line: TaxLine,
}

impl Default for Billing {
    fn default() -> Self {
        Self {
            tax_rate: 0.08,
            tax_line: TaxLine::Single,
        }
    }
}

pub struct AppState {
    pub menu: Menu,
    pub inventory: Inventory,
    pub orders: VecDeque<Order>,
    pub sales_log: SalesLog,
    pub billing: Billing,
    pub prep_delay: Duration,
    pub metrics: Metrics,
    next_order_id: u64,
}

impl AppState {
    pub fn new(menu: Menu, inventory: Inventory, sales_log: SalesLog) -> Self {
        Self {
            menu,
            inventory,
            orders: VecDeque::new(),
            sales_log,
            billing: Billing::default(),
            prep_delay: Duration::ZERO,
            metrics: Metrics::new(),
            next_order_id: 1,
        }
    }

    pub fn from_config(menu: Menu, inventory: Inventory, config: &Config) -> Self {
        let mut state = Self::new(menu, inventory, SalesLog::new(&config.sales_log_path));
        state.billing = Billing {
            tax_rate: config.tax_rate,
            tax_line: config.tax_line,
        };
        state.prep_delay = config.prep_delay;
        state
    }

    /// Builds a pending order with the next id and queues it.
    pub fn place_order(&mut self, items: Vec<u32>, customization: impl Into<String>) -> OrderId {
        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;

        enqueue_order(self, Order::new(id, items, customization));
        id
    }

    pub fn pending_orders(&self) -> usize {
        self.orders.len()
    }
}
