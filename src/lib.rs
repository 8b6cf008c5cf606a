pub mod data_sources;
pub mod handlers;
pub mod models;
pub mod run_configs;
pub mod trade_log;
pub mod utils;
