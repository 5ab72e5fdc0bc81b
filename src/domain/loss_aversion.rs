//! Loss-aversion detection: losers held disproportionately longer than winners.

use serde::Serialize;

use super::trade::{round_half_up, round_to_cents, Trade};

/// Loser/winner hold ratio above which the detector triggers.
pub const LOSS_AVERSION_TRIGGER: f64 = 1.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LossAversionResult {
    pub avg_win_hold_minutes: f64,
    pub avg_loss_hold_minutes: f64,
    /// Loser average over winner average, two decimals; 0 without winning hold time.
    pub ratio: f64,
    pub triggered: bool,
}

pub fn detect_loss_aversion(trades: &[Trade]) -> LossAversionResult {
    let (winners, losers): (Vec<&Trade>, Vec<&Trade>) = trades.iter().partition(|t| t.is_winner());

    let avg_win = mean_hold_minutes(&winners);
    let avg_loss = mean_hold_minutes(&losers);

    let ratio = if avg_win > 0.0 { avg_loss / avg_win } else { 0.0 };

    LossAversionResult {
        avg_win_hold_minutes: round_half_up(avg_win),
        avg_loss_hold_minutes: round_half_up(avg_loss),
        ratio: round_to_cents(ratio),
        triggered: ratio > LOSS_AVERSION_TRIGGER,
    }
}

fn mean_hold_minutes(trades: &[&Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.hold_minutes()).sum::<f64>() / trades.len() as f64
}
