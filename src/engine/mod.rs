pub mod billing;
pub mod kitchen;
pub mod queue;
