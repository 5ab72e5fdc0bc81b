//! Revenge-trade detection: re-entry shortly after closing a loss.

use serde::Serialize;

use super::trade::{minutes_between, round_half_up, Trade};

/// Default reaction window after a losing exit.
pub const REVENGE_WINDOW_MINUTES: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevengeTradeInstance {
    pub losing_trade: Trade,
    pub revenge_trade: Trade,
    /// Whole minutes from the loss's exit to the reacting entry.
    pub minutes_between: i64,
}

/// Pair each strictly losing trade with the first later trade entered within
/// `window_minutes` of its exit. `trades` must be sorted by entry time.
///
/// Trades that opened before the loss closed are stepped over; the scan for a
/// given loss stops at the first match or the first trade past the window.
pub fn detect_revenge_trades(trades: &[Trade], window_minutes: f64) -> Vec<RevengeTradeInstance> {
    let mut instances = Vec::new();

    for (i, losing) in trades.iter().enumerate() {
        let is_loss = losing.pnl < 0.0;
        if !is_loss {
            continue;
        }

        for next in &trades[i + 1..] {
            let gap = minutes_between(losing.exit_time, next.entry_time);
            if gap > window_minutes {
                break;
            }
            if gap >= 0.0 {
                instances.push(RevengeTradeInstance {
                    losing_trade: losing.clone(),
                    revenge_trade: next.clone(),
                    minutes_between: round_half_up(gap) as i64,
                });
                break;
            }
        }
    }

    instances
}
