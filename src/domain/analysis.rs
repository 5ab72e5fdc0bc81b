//! Analysis pipeline: sort, detect, score, assemble.
//!
//! [`Analyzer::analyze_at`] is a pure function of its inputs. The only
//! environmental value is the timestamp used for the equity seed point when
//! the log is empty, which [`Analyzer::analyze`] takes from the clock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::day_boundary::{DayBoundary, UtcDay};
use super::equity::{build_equity_curve, EquityPoint};
use super::loss_aversion::{detect_loss_aversion, LossAversionResult};
use super::overtrading::{detect_overtrading, OvertradingDay, OVERTRADING_MIN_TRADES};
use super::rationality::{score_breakdown, ScoreBreakdown};
use super::revenge::{detect_revenge_trades, RevengeTradeInstance, REVENGE_WINDOW_MINUTES};
use super::trade::Trade;

/// Detector thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub revenge_window_minutes: f64,
    pub overtrading_min_trades: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            revenge_window_minutes: REVENGE_WINDOW_MINUTES,
            overtrading_min_trades: OVERTRADING_MIN_TRADES,
        }
    }
}

/// The finished report. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAnalysis {
    pub trades: Vec<Trade>,
    pub net_pnl: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub rationality_index: u8,
    pub revenge_trades: Vec<RevengeTradeInstance>,
    pub loss_aversion: LossAversionResult,
    pub overtrading_days: Vec<OvertradingDay>,
    pub equity_curve: Vec<EquityPoint>,
    #[serde(skip)]
    pub score: ScoreBreakdown,
}

pub struct Analyzer<B = UtcDay> {
    config: AnalysisConfig,
    day_boundary: B,
}

impl Analyzer<UtcDay> {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            day_boundary: UtcDay,
        }
    }
}

impl Default for Analyzer<UtcDay> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl<B: DayBoundary> Analyzer<B> {
    pub fn with_day_boundary(config: AnalysisConfig, day_boundary: B) -> Self {
        Self {
            config,
            day_boundary,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, trades: &[Trade]) -> TradeAnalysis {
        self.analyze_at(trades, Utc::now())
    }

    /// `now` is only read when `trades` is empty.
    pub fn analyze_at(&self, trades: &[Trade], now: DateTime<Utc>) -> TradeAnalysis {
        let mut sorted = trades.to_vec();
        sorted.sort_by_key(|t| t.entry_time);

        let total_trades = sorted.len();
        let net_pnl: f64 = sorted.iter().map(|t| t.pnl).sum();
        let winning_trades = sorted.iter().filter(|t| t.is_winner()).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let revenge_trades = detect_revenge_trades(&sorted, self.config.revenge_window_minutes);
        let loss_aversion = detect_loss_aversion(&sorted);
        let overtrading_days = detect_overtrading(
            &sorted,
            &self.day_boundary,
            self.config.overtrading_min_trades,
        );
        let equity_curve = build_equity_curve(&sorted, &revenge_trades, now);

        let score = score_breakdown(&revenge_trades, &loss_aversion, &overtrading_days, total_trades);

        info!(
            trades = total_trades,
            revenge = revenge_trades.len(),
            loss_aversion = loss_aversion.triggered,
            overtrading_days = overtrading_days.len(),
            rationality = score.score,
            "analysis complete"
        );

        TradeAnalysis {
            trades: sorted,
            net_pnl,
            win_rate,
            total_trades,
            winning_trades,
            losing_trades,
            rationality_index: score.score,
            revenge_trades,
            loss_aversion,
            overtrading_days,
            equity_curve,
            score,
        }
    }
}

/// Analyze with default thresholds and UTC day boundaries.
pub fn analyze_trades(trades: &[Trade]) -> TradeAnalysis {
    Analyzer::default().analyze(trades)
}
