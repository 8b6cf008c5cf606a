use crate::models::{strategy::DateRange, timeframe::Timeframe};

/// Everything the engine needs to run one backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestJob {
    pub strategy_id: String,
    pub user_id: String,
    pub date_range: DateRange,
    pub language: String,
    pub source_code: String,
    pub timeframe: Timeframe,
}
