pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod sales;
pub mod seed;
pub mod state;
