//! File and stdin trade sources.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::domain::error::AuditError;
use crate::ports::trade_source::TradeSource;

pub enum FileSource {
    Path(PathBuf),
    Stdin,
}

impl FileSource {
    /// `-` selects stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            FileSource::Stdin
        } else {
            FileSource::Path(PathBuf::from(arg))
        }
    }
}

impl TradeSource for FileSource {
    fn name(&self) -> String {
        match self {
            FileSource::Path(path) => path.display().to_string(),
            FileSource::Stdin => "stdin".to_string(),
        }
    }

    fn read_text(&self) -> Result<String, AuditError> {
        let result = match self {
            FileSource::Path(path) => fs::read_to_string(path),
            FileSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).map(|_| buf)
            }
        };
        result.map_err(|e| AuditError::SourceRead {
            source_name: self.name(),
            reason: e.to_string(),
        })
    }
}

/// In-memory source, for callers that already hold the text.
pub struct TextSource {
    pub label: String,
    pub text: String,
}

impl TradeSource for TextSource {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn read_text(&self) -> Result<String, AuditError> {
        Ok(self.text.clone())
    }
}
