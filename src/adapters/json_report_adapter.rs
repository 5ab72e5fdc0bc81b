//! JSON report adapter implementing ReportPort.
//!
//! Emits the report exactly as modelled: camelCase keys, RFC 3339 UTC
//! timestamps, `YYYY-MM-DD` dates. Non-finite numbers come out as `null`.

use crate::domain::analysis::TradeAnalysis;
use crate::domain::error::AuditError;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(&self, analysis: &TradeAnalysis) -> Result<String, AuditError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(analysis)
        } else {
            serde_json::to_string(analysis)
        };
        rendered
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| AuditError::ReportWrite {
                reason: e.to_string(),
            })
    }
}
