use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Preparing,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Menu item ids in the order they were entered; repeats are allowed.
    pub items: Vec<u32>,
    pub customization: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, items: Vec<u32>, customization: impl Into<String>) -> Self {
        Self {
            id,
            items,
            customization: customization.into(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Moves the order one step along `Pending -> Preparing -> Completed`.
    pub fn transition(&mut self, to: OrderStatus) -> Result<(), AppError> {
        let allowed = matches!(
            (self.status, to),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Completed)
        );

        if !allowed {
            return Err(AppError::InvalidTransition {
                order_id: self.id,
                from: self.status,
                to,
            });
        }

        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Order, OrderId, OrderStatus};
    use crate::error::AppError;

    #[test]
    fn new_order_starts_pending() {
        let order = Order::new(OrderId(1), vec![1, 1, 2], "no onions");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items, vec![1, 1, 2]);
        assert_eq!(order.customization, "no onions");
    }

    #[test]
    fn lifecycle_moves_forward_one_step_at_a_time() {
        let mut order = Order::new(OrderId(7), vec![1], "");

        order.transition(OrderStatus::Preparing).unwrap();
        order.transition(OrderStatus::Completed).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn skipping_preparation_is_rejected() {
        let mut order = Order::new(OrderId(3), vec![1], "");

        let err = order.transition(OrderStatus::Completed).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                order_id: OrderId(3),
                from: OrderStatus::Pending,
                to: OrderStatus::Completed,
            }
        ));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn completed_order_cannot_go_back() {
        let mut order = Order::new(OrderId(4), vec![2], "");
        order.transition(OrderStatus::Preparing).unwrap();
        order.transition(OrderStatus::Completed).unwrap();

        assert!(order.transition(OrderStatus::Preparing).is_err());
    }
}
