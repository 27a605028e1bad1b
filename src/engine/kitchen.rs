use std::time::Instant;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::engine::billing::compute_bill;
use crate::error::AppError;
use crate::models::bill::Bill;
use crate::models::order::{Order, OrderId, OrderStatus};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum OrderOutcome {
    /// Billed and recorded in the sales log.
    Billed(Bill),
    /// Billed, but the sales log could not be written.
    Unsaved { bill: Bill, error: AppError },
    /// Not billed.
    Rejected { order_id: OrderId, error: AppError },
}

impl OrderOutcome {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderOutcome::Billed(bill) | OrderOutcome::Unsaved { bill, .. } => bill.order_id,
            OrderOutcome::Rejected { order_id, .. } => *order_id,
        }
    }

    pub fn bill(&self) -> Option<&Bill> {
        match self {
            OrderOutcome::Billed(bill) | OrderOutcome::Unsaved { bill, .. } => Some(bill),
            OrderOutcome::Rejected { .. } => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OrderOutcome::Billed(_) => "billed",
            OrderOutcome::Unsaved { .. } => "unsaved",
            OrderOutcome::Rejected { .. } => "rejected",
        }
    }
}

/// Progress reported while the queue drains.
#[derive(Debug, Clone)]
pub enum KitchenEvent {
    Preparing(OrderId),
    Finished(OrderOutcome),
}

/// Processes queued orders head first until the queue is empty.
///
/// Orders are prepared one after another; each waits the full preparation
/// delay before it is billed. The drain holds the state exclusively, so
/// nothing can be queued until it returns. When `events` is given, every
/// order is announced before preparation and again once it has an outcome.
pub async fn drain_and_process_all(
    state: &mut AppState,
    events: Option<&mpsc::UnboundedSender<KitchenEvent>>,
) -> Vec<OrderOutcome> {
    let mut outcomes = Vec::with_capacity(state.orders.len());

    while let Some(order) = state.orders.pop_front() {
        state.metrics.orders_in_queue.dec();

        if let Some(events) = events {
            let _ = events.send(KitchenEvent::Preparing(order.id));
        }

        let outcome = process_order(state, order).await;

        if let Some(events) = events {
            let _ = events.send(KitchenEvent::Finished(outcome.clone()));
        }
        outcomes.push(outcome);
    }

    if !outcomes.is_empty() {
        info!(processed = outcomes.len(), "order queue drained");
    }

    outcomes
}

async fn process_order(state: &mut AppState, order: Order) -> OrderOutcome {
    let start = Instant::now();
    let order_id = order.id;

    let outcome = match prepare_and_bill(state, order).await {
        Ok(bill) => match state.sales_log.append(bill.total).await {
            Ok(()) => OrderOutcome::Billed(bill),
            Err(err) => {
                warn!(order_id = %order_id, error = %err, "bill not recorded in sales log");
                OrderOutcome::Unsaved { bill, error: err }
            }
        },
        Err(err) => {
            error!(order_id = %order_id, error = %err, "order rejected");
            OrderOutcome::Rejected {
                order_id,
                error: err,
            }
        }
    };

    if let Some(bill) = outcome.bill() {
        state.metrics.sales_amount_total.add(bill.total);
    }
    state
        .metrics
        .orders_processed_total
        .with_label_values(&[outcome.label()])
        .inc();
    state
        .metrics
        .order_preparation_seconds
        .observe(start.elapsed().as_secs_f64());

    outcome
}

async fn prepare_and_bill(state: &AppState, mut order: Order) -> Result<Bill, AppError> {
    order.transition(OrderStatus::Preparing)?;
    info!(order_id = %order.id, customization = %order.customization, "preparing order");

    sleep(state.prep_delay).await;

    order.transition(OrderStatus::Completed)?;
    let bill = compute_bill(&state.menu, &state.billing, &order)?;

    info!(order_id = %order.id, total = bill.total, "order completed");
    Ok(bill)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use tokio::sync::mpsc;

    use super::{drain_and_process_all, KitchenEvent, OrderOutcome};
    use crate::engine::queue::enqueue_order;
    use crate::error::AppError;
    use crate::models::order::{Order, OrderId, OrderStatus};
    use crate::sales::SalesLog;
    use crate::seed::Seed;
    use crate::state::AppState;

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        let (menu, inventory) = Seed::builtin().into_parts().unwrap();
        AppState::new(menu, inventory, SalesLog::new(dir.path().join("sales.log")))
    }

    #[tokio::test]
    async fn drains_in_fifo_order_and_empties_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        let first = state.place_order(vec![1], "");
        let second = state.place_order(vec![2, 3], "well done");
        let third = state.place_order(vec![4], "");

        let outcomes = drain_and_process_all(&mut state, None).await;

        let ids: Vec<OrderId> = outcomes.iter().map(OrderOutcome::order_id).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert!(outcomes.iter().all(|o| matches!(o, OrderOutcome::Billed(_))));
        assert_eq!(state.pending_orders(), 0);
        assert_eq!(state.metrics.orders_in_queue.get(), 0);
    }

    #[tokio::test]
    async fn empty_queue_returns_immediately_without_touching_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);

        let outcomes = drain_and_process_all(&mut state, None).await;

        assert!(outcomes.is_empty());
        assert!(!state.sales_log.path().exists());
        assert_eq!(state.sales_log.report().await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_item_rejects_only_that_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.place_order(vec![99], "");
        state.place_order(vec![1, 2], "");

        let outcomes = drain_and_process_all(&mut state, None).await;

        assert!(matches!(
            &outcomes[0],
            OrderOutcome::Rejected {
                error: AppError::InvalidItemReference { item_id: 99, menu_len: 4, .. },
                ..
            }
        ));
        assert!(matches!(&outcomes[1], OrderOutcome::Billed(_)));

        let report = state.sales_log.report().await.unwrap().unwrap();
        assert_eq!(report.entries, 1);
    }

    #[tokio::test]
    async fn sales_total_matches_sum_of_bills() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        for items in [vec![1], vec![2, 2], vec![1, 2, 3, 4], vec![3]] {
            state.place_order(items, "");
        }

        let outcomes = drain_and_process_all(&mut state, None).await;
        let billed: f64 = outcomes
            .iter()
            .filter_map(OrderOutcome::bill)
            .map(|bill| bill.total)
            .sum();

        let report = state.sales_log.report().await.unwrap().unwrap();
        assert_eq!(report.entries, 4);
        assert!((report.total - billed).abs() < 1e-9);
        assert!((state.metrics.sales_amount_total.get() - billed).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unwritable_log_still_produces_the_bill() {
        let dir = tempfile::tempdir().unwrap();
        let (menu, inventory) = Seed::builtin().into_parts().unwrap();
        let mut state = AppState::new(
            menu,
            inventory,
            SalesLog::new(dir.path().join("missing-dir").join("sales.log")),
        );
        state.place_order(vec![1, 2], "");

        let outcomes = drain_and_process_all(&mut state, None).await;

        match &outcomes[0] {
            OrderOutcome::Unsaved { bill, error } => {
                assert!((bill.total - 14.98 * 1.08).abs() < 1e-9);
                assert!(matches!(error, AppError::PersistenceUnavailable(_)));
            }
            other => panic!("expected unsaved bill, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn order_that_is_not_pending_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        let mut order = Order::new(OrderId(42), vec![1], "");
        order.status = OrderStatus::Completed;
        enqueue_order(&mut state, order);

        let outcomes = drain_and_process_all(&mut state, None).await;

        assert!(matches!(
            &outcomes[0],
            OrderOutcome::Rejected {
                error: AppError::InvalidTransition { .. },
                ..
            }
        ));
        assert_eq!(state.metrics.orders_in_queue.get(), 0);
    }

    #[tokio::test]
    async fn queue_gauge_returns_to_zero_after_mixed_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.place_order(vec![1], "");
        state.place_order(vec![99], "");
        state.place_order(vec![2, 3], "");
        assert_eq!(state.metrics.orders_in_queue.get(), 3);

        drain_and_process_all(&mut state, None).await;

        assert_eq!(state.metrics.orders_in_queue.get(), 0);
        let processed = &state.metrics.orders_processed_total;
        assert_eq!(processed.with_label_values(&["billed"]).get(), 2);
        assert_eq!(processed.with_label_values(&["rejected"]).get(), 1);
    }

    #[tokio::test]
    async fn orders_placed_after_a_drain_wait_for_the_next_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        let early = state.place_order(vec![1], "");

        let first = drain_and_process_all(&mut state, None).await;
        let late = state.place_order(vec![2], "");

        let ids: Vec<OrderId> = first.iter().map(OrderOutcome::order_id).collect();
        assert_eq!(ids, vec![early]);
        assert_eq!(state.pending_orders(), 1);
        assert_eq!(state.metrics.orders_in_queue.get(), 1);

        let second = drain_and_process_all(&mut state, None).await;
        let ids: Vec<OrderId> = second.iter().map(OrderOutcome::order_id).collect();
        assert_eq!(ids, vec![late]);
    }

    #[tokio::test]
    async fn events_announce_each_order_before_its_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        let first = state.place_order(vec![1], "");
        let second = state.place_order(vec![99], "");
        let (tx, mut rx) = mpsc::unbounded_channel();

        drain_and_process_all(&mut state, Some(&tx)).await;
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], KitchenEvent::Preparing(id) if id == first));
        assert!(matches!(
            &events[1],
            KitchenEvent::Finished(OrderOutcome::Billed(bill)) if bill.order_id == first
        ));
        assert!(matches!(events[2], KitchenEvent::Preparing(id) if id == second));
        assert!(matches!(
            &events[3],
            KitchenEvent::Finished(OrderOutcome::Rejected { order_id, .. }) if *order_id == second
        ));
    }

    #[tokio::test]
    async fn preparation_delay_is_paid_per_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.prep_delay = Duration::from_millis(20);
        state.place_order(vec![1], "");
        state.place_order(vec![2], "");

        let start = Instant::now();
        drain_and_process_all(&mut state, None).await;

        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
