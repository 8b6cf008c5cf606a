pub mod artifact_store;
pub mod db;
pub mod strategy_store;
