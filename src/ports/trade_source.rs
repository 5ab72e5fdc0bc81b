//! Trade-log input port.

use crate::domain::error::AuditError;

/// Supplies the raw delimited text of a trade log. How it was obtained is
/// of no concern to the analysis.
pub trait TradeSource {
    /// Human-readable origin for messages, e.g. a path or `stdin`.
    fn name(&self) -> String;

    fn read_text(&self) -> Result<String, AuditError>;
}
