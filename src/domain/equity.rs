//! Cumulative P&L timeline.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::revenge::RevengeTradeInstance;
use super::trade::{round_to_cents, Trade};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub time: DateTime<Utc>,
    pub equity: f64,
    /// 0 for the seed point.
    pub trade_id: u64,
    /// Absent on the seed point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revenge_trade: Option<bool>,
}

/// Seed point at the first entry (or `fallback_time` with no trades), then one
/// point per trade at its exit carrying the running total to the cent.
pub fn build_equity_curve(
    trades: &[Trade],
    revenge_trades: &[RevengeTradeInstance],
    fallback_time: DateTime<Utc>,
) -> Vec<EquityPoint> {
    let revenge_ids: HashSet<u64> = revenge_trades.iter().map(|r| r.revenge_trade.id).collect();

    let mut points = Vec::with_capacity(trades.len() + 1);
    points.push(EquityPoint {
        time: trades.first().map(|t| t.entry_time).unwrap_or(fallback_time),
        equity: 0.0,
        trade_id: 0,
        is_revenge_trade: None,
    });

    let mut equity = 0.0_f64;
    for trade in trades {
        equity += trade.pnl;
        points.push(EquityPoint {
            time: trade.exit_time,
            equity: round_to_cents(equity),
            trade_id: trade.id,
            is_revenge_trade: Some(revenge_ids.contains(&trade.id)),
        });
    }

    points
}
