use tracing::info;

use crate::models::order::Order;
use crate::state::AppState;

pub fn enqueue_order(state: &mut AppState, order: Order) {
    info!(
        order_id = %order.id,
        items = order.items.len(),
        "order queued"
    );

    state.orders.push_back(order);
    state.metrics.orders_in_queue.inc();
}
