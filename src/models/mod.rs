pub mod bill;
pub mod inventory;
pub mod menu;
pub mod order;
