pub mod create_strategy_payload;
pub mod delete_strategy_payload;
pub mod get_strategy_payload;
pub mod list_strategies_payload;
pub mod update_strategy_payload;
