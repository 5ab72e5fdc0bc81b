//! Presentation-level reading of a finished report: severities, an overall
//! classification and advisory memos. Derived purely from report fields.

use serde::Serialize;

use super::analysis::TradeAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Exemplary,
    Satisfactory,
    Concerning,
    Critical,
}

impl Classification {
    pub fn from_index(rationality_index: u8) -> Self {
        match rationality_index {
            80.. => Classification::Exemplary,
            60..=79 => Classification::Satisfactory,
            40..=59 => Classification::Concerning,
            _ => Classification::Critical,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Classification::Exemplary => "EXEMPLARY",
            Classification::Satisfactory => "SATISFACTORY",
            Classification::Concerning => "CONCERNING",
            Classification::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Memo {
    pub prefix: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Findings {
    pub revenge: Severity,
    pub loss_aversion: Severity,
    pub overtrading: Severity,
    pub classification: Classification,
    pub memos: Vec<Memo>,
}

impl Findings {
    pub fn from_analysis(analysis: &TradeAnalysis) -> Self {
        Self {
            revenge: revenge_severity(analysis.revenge_trades.len()),
            loss_aversion: loss_aversion_severity(analysis),
            overtrading: overtrading_severity(analysis.overtrading_days.len()),
            classification: Classification::from_index(analysis.rationality_index),
            memos: memos(analysis),
        }
    }

    pub fn worst(&self) -> Severity {
        self.revenge.max(self.loss_aversion).max(self.overtrading)
    }
}

fn revenge_severity(count: usize) -> Severity {
    match count {
        0 => Severity::Low,
        1..=3 => Severity::Medium,
        _ => Severity::High,
    }
}

fn loss_aversion_severity(analysis: &TradeAnalysis) -> Severity {
    if analysis.loss_aversion.ratio > 2.5 {
        Severity::High
    } else if analysis.loss_aversion.triggered {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn overtrading_severity(days: usize) -> Severity {
    match days {
        0 => Severity::Low,
        1..=2 => Severity::Medium,
        _ => Severity::High,
    }
}

fn memos(analysis: &TradeAnalysis) -> Vec<Memo> {
    let mut memos = Vec::new();

    let revenge = analysis.revenge_trades.len();
    if revenge > 3 {
        memos.push(Memo {
            prefix: "URGENT.",
            body: format!(
                "{revenge} instances of impulsive retaliation found in the ledger. \
                 Stop trading for 24 hours after any significant drawdown."
            ),
        });
    } else if revenge > 0 {
        memos.push(Memo {
            prefix: "ADVISORY.",
            body: format!(
                "{revenge} instance(s) of post-loss impulsive entry detected. \
                 Wait at least 10 minutes after a realized loss before opening a new position."
            ),
        });
    }

    let la = &analysis.loss_aversion;
    if la.triggered {
        memos.push(Memo {
            prefix: "OBSERVATION.",
            body: format!(
                "Losing positions are held {} min on average against {} min for winners, \
                 a factor of {}x. Use hard stop-loss orders instead of waiting for a recovery.",
                la.avg_loss_hold_minutes, la.avg_win_hold_minutes, la.ratio
            ),
        });
    }

    let days = analysis.overtrading_days.len();
    if days > 0 {
        memos.push(Memo {
            prefix: "WARNING.",
            body: format!(
                "Excessive volume on {days} losing session(s). \
                 Cap each session at 10 trades and review the plan before the next open."
            ),
        });
    }

    if memos.is_empty() {
        memos.push(Memo {
            prefix: "COMMENDATION.",
            body: "No behavioral red flags. Trading conduct shows discipline and composure; \
                   keep the current process."
                .to_string(),
        });
    }

    memos
}
