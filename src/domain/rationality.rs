//! Composite 0-100 rationality score.
//!
//! Penalties are computed independently, summed, subtracted from 100 and
//! the result clamped to `[0, 100]`.

use super::loss_aversion::{LossAversionResult, LOSS_AVERSION_TRIGGER};
use super::overtrading::OvertradingDay;
use super::revenge::RevengeTradeInstance;
use super::trade::round_half_up;

pub const MAX_SCORE: i64 = 100;

const REVENGE_PENALTY_EACH: i64 = 8;
const REVENGE_PENALTY_CAP: i64 = 40;
/// Ratio excess above the trigger at which the loss-aversion penalty saturates.
const LOSS_AVERSION_EXCESS_CAP: f64 = 3.0;
const LOSS_AVERSION_PENALTY_CAP: f64 = 30.0;
const OVERTRADING_PENALTY_EACH: i64 = 15;
const OVERTRADING_PENALTY_CAP: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub revenge_penalty: i64,
    pub loss_aversion_penalty: i64,
    pub overtrading_penalty: i64,
    pub score: u8,
}

impl ScoreBreakdown {
    /// Score for an empty log; nothing is evaluated.
    pub fn perfect() -> Self {
        Self {
            score: MAX_SCORE as u8,
            ..Self::default()
        }
    }

    pub fn total_penalty(&self) -> i64 {
        self.revenge_penalty + self.loss_aversion_penalty + self.overtrading_penalty
    }
}

pub fn score_breakdown(
    revenge_trades: &[RevengeTradeInstance],
    loss_aversion: &LossAversionResult,
    overtrading_days: &[OvertradingDay],
    total_trades: usize,
) -> ScoreBreakdown {
    if total_trades == 0 {
        return ScoreBreakdown::perfect();
    }

    let revenge_penalty = (revenge_trades.len() as i64)
        .saturating_mul(REVENGE_PENALTY_EACH)
        .min(REVENGE_PENALTY_CAP);

    let loss_aversion_penalty = if loss_aversion.triggered {
        let excess = (loss_aversion.ratio - LOSS_AVERSION_TRIGGER).min(LOSS_AVERSION_EXCESS_CAP);
        round_half_up(excess / LOSS_AVERSION_EXCESS_CAP * LOSS_AVERSION_PENALTY_CAP) as i64
    } else {
        0
    };

    let overtrading_penalty = (overtrading_days.len() as i64)
        .saturating_mul(OVERTRADING_PENALTY_EACH)
        .min(OVERTRADING_PENALTY_CAP);

    let mut breakdown = ScoreBreakdown {
        revenge_penalty,
        loss_aversion_penalty,
        overtrading_penalty,
        score: 0,
    };
    breakdown.score = (MAX_SCORE - breakdown.total_penalty()).clamp(0, MAX_SCORE) as u8;
    breakdown
}

pub fn rationality_index(
    revenge_trades: &[RevengeTradeInstance],
    loss_aversion: &LossAversionResult,
    overtrading_days: &[OvertradingDay],
    total_trades: usize,
) -> u8 {
    score_breakdown(revenge_trades, loss_aversion, overtrading_days, total_trades).score
}
