//! Overtrading detection: busy calendar days that ended in the red.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::day_boundary::DayBoundary;
use super::trade::Trade;

/// A day is flagged when its trade count is strictly greater than this.
pub const OVERTRADING_MIN_TRADES: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertradingDay {
    pub date: NaiveDate,
    pub trade_count: usize,
    pub daily_pnl: f64,
}

/// Group trades by the day of their entry under `boundary` and return the
/// days with more than `min_trades` trades and a negative sum, ascending.
pub fn detect_overtrading<B>(trades: &[Trade], boundary: &B, min_trades: usize) -> Vec<OvertradingDay>
where
    B: DayBoundary + ?Sized,
{
    let mut by_day: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
    for trade in trades {
        let entry = by_day.entry(boundary.day_key(trade.entry_time)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += trade.pnl;
    }

    by_day
        .into_iter()
        .filter(|&(_, (count, pnl))| count > min_trades && pnl < 0.0)
        .map(|(date, (trade_count, daily_pnl))| OvertradingDay {
            date,
            trade_count,
            daily_pnl,
        })
        .collect()
}
