//! Domain error types.
//!
//! The analysis core itself is infallible; these errors come from the I/O
//! seams (sources, reports, configuration) and the CLI.

/// Top-level error type for tradeaudit.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to read trade log from {source_name}: {reason}")]
    SourceRead { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to write report: {reason}")]
    ReportWrite { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            AuditError::Io(_) => 1,
            AuditError::ConfigParse { .. }
            | AuditError::ConfigInvalid { .. } => 2,
            AuditError::SourceRead { .. } => 3,
            AuditError::ReportWrite { .. } => 4,
        }
    }
}

impl From<&AuditError> for std::process::ExitCode {
    fn from(err: &AuditError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
