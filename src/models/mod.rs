pub mod backtest_job;
pub mod backtest_job_builder;
pub mod database;
pub mod message_payloads;
pub mod strategy;
pub mod submission;
pub mod timeframe;
pub mod trade;
pub mod trade_summary;
