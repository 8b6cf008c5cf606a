//! Post-processing of the trade ledger the engine returns for a finished run.

pub mod parser;
pub mod summary;

use crate::models::{trade::Trade, trade_summary::TradeSummary};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTrades {
    pub grouped_trades: IndexMap<String, Vec<Trade>>,
    pub summary: Vec<TradeSummary>,
}

/// Parses, groups and summarises a raw ledger. Pure and deterministic.
pub fn process_trade_log(raw: &str) -> ProcessedTrades {
    let trades = parser::parse_trades(raw);
    let grouped_trades = summary::group_by_symbol(trades);
    let summary = summary::summarize(&grouped_trades);

    ProcessedTrades {
        grouped_trades,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarises_two_symbols() {
        let raw = "1,AAA,t1,10,9,11,t2,100,1.0,50\n2,AAA,t3,11,10,12,t4,-20,-0.2,30\n3,BBB,t5,5,4,6,t6,10,0.2,10";
        let processed = process_trade_log(raw);

        assert_eq!(processed.grouped_trades.len(), 2);
        assert_eq!(processed.grouped_trades["AAA"].len(), 2);

        let aaa = &processed.summary[0];
        assert_eq!(aaa.symbol, "AAA");
        assert_eq!(aaa.total_trades, 2);
        assert_eq!(aaa.total_pnl, 80.0);
        assert_eq!(aaa.avg_pnl, 40.0);
        assert_eq!(aaa.total_quantity, 80.0);

        let bbb = &processed.summary[1];
        assert_eq!(bbb.symbol, "BBB");
        assert_eq!(bbb.total_trades, 1);
        assert_eq!(bbb.total_pnl, 10.0);
        assert_eq!(bbb.avg_pnl, 10.0);
        assert_eq!(bbb.total_quantity, 10.0);
    }

    #[test]
    fn empty_ledger_is_empty() {
        let processed = process_trade_log("");
        assert!(processed.summary.is_empty());
        assert!(processed.grouped_trades.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let processed = process_trade_log("1,AAA,t1,10,9,11,t2,100,1.0,50");
        let v = serde_json::to_value(&processed).unwrap();

        assert_eq!(v["summary"][0]["totalQuantity"], 50.0);
        assert_eq!(v["groupedTrades"]["AAA"][0]["pnlAmount"], 100.0);
        assert_eq!(v["groupedTrades"]["AAA"][0]["id"], 1);
    }
}
