use crate::models::{trade::Trade, trade_summary::TradeSummary};
use indexmap::IndexMap;

/// Groups trades by symbol. Groups appear in first-seen order and keep the
/// input order of their trades.
pub fn group_by_symbol(trades: Vec<Trade>) -> IndexMap<String, Vec<Trade>> {
    let mut grouped: IndexMap<String, Vec<Trade>> = IndexMap::new();

    for trade in trades {
        grouped.entry(trade.symbol.clone()).or_default().push(trade);
    }

    grouped
}

/// One summary per group, sorted by total pnl, highest first. Equal totals
/// keep group order and NaN totals sink to the end.
pub fn summarize(grouped: &IndexMap<String, Vec<Trade>>) -> Vec<TradeSummary> {
    let mut summary: Vec<TradeSummary> = grouped
        .iter()
        .map(|(symbol, trades)| TradeSummary::from_trades(symbol, trades))
        .collect();

    summary.sort_by(|a, b| rank(b.total_pnl).total_cmp(&rank(a.total_pnl)));

    summary
}

fn rank(total_pnl: f64) -> f64 {
    if total_pnl.is_nan() {
        f64::NEG_INFINITY
    } else {
        // Folds -0.0 into 0.0 so they compare equal.
        total_pnl + 0.0
    }
}
