//! Plain-text memo report implementing ReportPort.

use std::fmt::Write as _;

use crate::domain::analysis::TradeAnalysis;
use crate::domain::error::AuditError;
use crate::domain::findings::Findings;
use crate::ports::report_port::ReportPort;

const RULE: &str = "======================================================================";

const MAX_LISTED: usize = 10;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TextReportAdapter {
    fn render(&self, analysis: &TradeAnalysis) -> Result<String, AuditError> {
        render_memo(analysis).map_err(|e| AuditError::ReportWrite {
            reason: e.to_string(),
        })
    }
}

fn render_memo(a: &TradeAnalysis) -> Result<String, std::fmt::Error> {
    let findings = Findings::from_analysis(a);
    let mut out = String::new();

    writeln!(out, "{RULE}")?;
    writeln!(out, "BEHAVIORAL AUDIT")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "Net P&L:          {:.2}", a.net_pnl)?;
    writeln!(
        out,
        "Trades:           {} ({}W / {}L)",
        a.total_trades, a.winning_trades, a.losing_trades
    )?;
    writeln!(out, "Win Rate:         {:.1}%", a.win_rate)?;
    writeln!(
        out,
        "Rationality:      {}/100 ({})",
        a.rationality_index, findings.classification
    )?;
    writeln!(out)?;

    writeln!(out, "-- Revenge Trading [{}] --", findings.revenge)?;
    if a.revenge_trades.is_empty() {
        writeln!(out, "  None detected.")?;
    } else {
        writeln!(out, "  {} instance(s)", a.revenge_trades.len())?;
        for rt in a.revenge_trades.iter().take(MAX_LISTED) {
            writeln!(
                out,
                "  {} #{}: {} min after a {:.0} loss on {} #{}",
                rt.revenge_trade.symbol,
                rt.revenge_trade.id,
                rt.minutes_between,
                rt.losing_trade.pnl.abs(),
                rt.losing_trade.symbol,
                rt.losing_trade.id,
            )?;
        }
        if a.revenge_trades.len() > MAX_LISTED {
            writeln!(out, "  ... and {} more", a.revenge_trades.len() - MAX_LISTED)?;
        }
    }
    writeln!(out)?;

    let la = &a.loss_aversion;
    writeln!(out, "-- Loss Aversion [{}] --", findings.loss_aversion)?;
    writeln!(out, "  Avg win hold:   {} min", la.avg_win_hold_minutes)?;
    writeln!(out, "  Avg loss hold:  {} min", la.avg_loss_hold_minutes)?;
    writeln!(
        out,
        "  Ratio:          {}x{}",
        la.ratio,
        if la.triggered { " (above 1.5x)" } else { "" }
    )?;
    writeln!(out)?;

    writeln!(out, "-- Overtrading [{}] --", findings.overtrading)?;
    if a.overtrading_days.is_empty() {
        writeln!(out, "  None detected.")?;
    } else {
        for day in &a.overtrading_days {
            writeln!(
                out,
                "  {}: {} trades, net {:.2}",
                day.date, day.trade_count, day.daily_pnl
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "-- Score --")?;
    writeln!(out, "  Revenge penalty:        -{}", a.score.revenge_penalty)?;
    writeln!(out, "  Loss-aversion penalty:  -{}", a.score.loss_aversion_penalty)?;
    writeln!(out, "  Overtrading penalty:    -{}", a.score.overtrading_penalty)?;
    writeln!(out, "  Rationality index:      {}", a.rationality_index)?;
    writeln!(out)?;

    writeln!(out, "-- Advisory --")?;
    for memo in &findings.memos {
        writeln!(out, "  {} {} STOP.", memo.prefix, memo.body)?;
    }

    Ok(out)
}
