use serde::{Deserialize, Serialize};

/// One closed trade from an engine ledger. Numeric fields that fail to parse
/// are carried as NaN (or `None` for the sequence id) instead of rejecting
/// the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(rename = "id")]
    pub sequence_id: Option<i64>,
    pub symbol: String,
    pub entry_time: String,
    pub entry_price: f64,
    #[serde(rename = "stoplossPrice")]
    pub stop_loss_price: f64,
    pub exit_price: f64,
    pub exit_time: String,
    pub pnl_amount: f64,
    #[serde(rename = "pnlPercentage")]
    pub pnl_percent: f64,
    pub quantity: f64,
}
