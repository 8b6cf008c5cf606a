use crate::models::trade::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSummary {
    pub symbol: String,
    pub total_trades: usize,
    pub total_pnl: f64,
    pub avg_pnl: f64,
    /// Sum of absolute quantities, so shorts and longs both count as size.
    pub total_quantity: f64,
}

impl TradeSummary {
    pub fn from_trades(symbol: &str, trades: &[Trade]) -> Self {
        let total_pnl: f64 = trades.iter().map(|t| t.pnl_amount).sum();
        let total_quantity: f64 = trades.iter().map(|t| t.quantity.abs()).sum();

        Self {
            symbol: symbol.to_string(),
            total_trades: trades.len(),
            total_pnl,
            avg_pnl: total_pnl / trades.len() as f64,
            total_quantity,
        }
    }
}
