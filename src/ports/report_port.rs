//! Report output port.

use std::io::Write;

use crate::domain::analysis::TradeAnalysis;
use crate::domain::error::AuditError;

/// Renders a finished report. Implementations get read-only access.
pub trait ReportPort {
    fn render(&self, analysis: &TradeAnalysis) -> Result<String, AuditError>;

    /// Default implementation: render then write the bytes to `out`.
    fn write_to(&self, analysis: &TradeAnalysis, out: &mut dyn Write) -> Result<(), AuditError> {
        let rendered = self.render(analysis)?;
        out.write_all(rendered.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| AuditError::ReportWrite {
                reason: e.to_string(),
            })
    }
}
