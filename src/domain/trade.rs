//! Closed trade record.

use chrono::{DateTime, Utc};
use serde::Serialize;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Upper-cases the token; anything other than `SHORT` is long.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_uppercase().as_str() {
            "SHORT" => Direction::Short,
            _ => Direction::Long,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// A completed round trip. `exit_time >= entry_time` is assumed by the
/// timing computations but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    pub symbol: String,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Elapsed minutes between entry and exit (negative if exit precedes entry).
    pub fn hold_minutes(&self) -> f64 {
        minutes_between(self.entry_time, self.exit_time)
    }
}

/// Fractional minutes from `from` to `to`, millisecond resolution.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_MINUTE
}

/// Round half toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Two decimals, ties away from zero: the magnitude is rounded half-up and
/// the sign restored.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    value.signum() * round_half_up(value.abs() * 100.0) / 100.0
}
