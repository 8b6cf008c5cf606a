use crate::models::trade::Trade;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Leading columns that identify a header row.
const HEADER_SIGNATURE: [&str; 2] = ["id", "symbol"];

/// Splits a comma delimited ledger into trades, one per non-empty line.
///
/// Fields are positional. Missing or malformed numeric columns become NaN
/// (`None` for the sequence id) and the line is kept.
pub fn parse_trades(raw: &str) -> Vec<Trade> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let mut trades = Vec::new();

    // Input is &str, so every record is valid UTF-8 and cannot error.
    for (idx, record) in reader.records().flatten().enumerate() {
        if idx == 0 && is_header(&record) {
            continue;
        }

        if record.iter().all(str::is_empty) {
            continue;
        }

        trades.push(to_trade(&record));
    }

    trades
}

fn is_header(record: &StringRecord) -> bool {
    HEADER_SIGNATURE
        .iter()
        .enumerate()
        .all(|(i, expected)| {
            record
                .get(i)
                .map(|field| field.eq_ignore_ascii_case(expected))
                .unwrap_or(false)
        })
}

fn to_trade(record: &StringRecord) -> Trade {
    let text = |i: usize| record.get(i).unwrap_or_default().to_string();
    let float = |i: usize| {
        record
            .get(i)
            .and_then(|field| field.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    };

    Trade {
        sequence_id: record.get(0).and_then(|field| field.parse::<i64>().ok()),
        symbol: text(1),
        entry_time: text(2),
        entry_price: float(3),
        stop_loss_price: float(4),
        exit_price: float(5),
        exit_time: text(6),
        pnl_amount: float(7),
        pnl_percent: float(8),
        quantity: float(9),
    }
}
