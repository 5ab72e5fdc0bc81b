#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use tradeaudit::domain::trade::{Direction, Trade};

pub const CSV_HEADER: &str = "symbol,direction,entryTime,exitTime,entryPrice,exitPrice,quantity,pnl";

pub fn session_open() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 4, 14, 30, 0).unwrap()
}

/// Trade entered `entry_min` minutes after [`session_open`] and held `hold_min`.
pub fn make_trade(id: u64, entry_min: i64, hold_min: i64, pnl: f64) -> Trade {
    let entry = session_open() + Duration::minutes(entry_min);
    Trade {
        id,
        symbol: format!("SYM{id}"),
        direction: Direction::Long,
        entry_time: entry,
        exit_time: entry + Duration::minutes(hold_min),
        entry_price: 100.0,
        exit_price: 100.0 + pnl / 10.0,
        quantity: 10.0,
        pnl,
    }
}

pub fn make_trade_secs(id: u64, entry_secs: i64, exit_secs: i64, pnl: f64) -> Trade {
    let mut trade = make_trade(id, 0, 0, pnl);
    trade.entry_time = session_open() + Duration::seconds(entry_secs);
    trade.exit_time = session_open() + Duration::seconds(exit_secs);
    trade
}

/// Renders trades as a CSV log with the canonical header.
pub fn to_csv(trades: &[Trade]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for t in trades {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            t.symbol,
            t.direction,
            t.entry_time.to_rfc3339(),
            t.exit_time.to_rfc3339(),
            t.entry_price,
            t.exit_price,
            t.quantity,
            t.pnl
        ));
    }
    out
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
