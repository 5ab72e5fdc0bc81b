//! Configuration validation.
//!
//! Checks every `[analysis]` and `[report]` key before a run.

use crate::domain::error::AuditError;
use crate::ports::config_port::ConfigPort;

pub const REPORT_FORMATS: &[&str] = &["json", "text"];

const KNOWN_KEYS: &[(&str, &[&str])] = &[
    (
        "analysis",
        &["revenge_window_minutes", "overtrading_min_trades", "utc_offset_minutes"],
    ),
    ("report", &["format", "pretty"]),
];

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AuditError> {
    validate_revenge_window(config)?;
    validate_overtrading_min_trades(config)?;
    validate_utc_offset(config)?;
    Ok(())
}

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), AuditError> {
    if let Some(format) = config.get_string("report", "format") {
        validate_report_format(&format)?;
    }
    Ok(())
}

pub fn validate_report_format(format: &str) -> Result<(), AuditError> {
    if !REPORT_FORMATS.contains(&format.trim().to_lowercase().as_str()) {
        return Err(AuditError::ConfigInvalid {
            section: "report".to_string(),
            key: "format".to_string(),
            reason: format!("unknown format '{format}' (expected json or text)"),
        });
    }
    Ok(())
}

/// `[section] key` entries nothing reads, usually misspellings. They are
/// reported but never rejected.
pub fn unrecognized_keys(config: &dyn ConfigPort) -> Vec<String> {
    let mut unknown = Vec::new();
    for section in config.sections() {
        let known = KNOWN_KEYS
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, keys)| *keys);
        for key in config.keys(&section) {
            if !known.is_some_and(|keys| keys.contains(&key.as_str())) {
                unknown.push(format!("[{section}] {key}"));
            }
        }
    }
    unknown
}

fn validate_revenge_window(config: &dyn ConfigPort) -> Result<(), AuditError> {
    let Some(raw) = config.get_string("analysis", "revenge_window_minutes") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(()),
        _ => Err(AuditError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "revenge_window_minutes".to_string(),
            reason: "revenge_window_minutes must be a positive number".to_string(),
        }),
    }
}

fn validate_overtrading_min_trades(config: &dyn ConfigPort) -> Result<(), AuditError> {
    let Some(raw) = config.get_string("analysis", "overtrading_min_trades") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => Ok(()),
        _ => Err(AuditError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "overtrading_min_trades".to_string(),
            reason: "overtrading_min_trades must be an integer of at least 1".to_string(),
        }),
    }
}

fn validate_utc_offset(config: &dyn ConfigPort) -> Result<(), AuditError> {
    let Some(raw) = config.get_string("analysis", "utc_offset_minutes") else {
        return Ok(());
    };
    validate_utc_offset_minutes(raw.trim().parse::<i64>().ok())
}

pub fn validate_utc_offset_minutes(value: Option<i64>) -> Result<(), AuditError> {
    match value {
        Some(minutes) if minutes.abs() < 24 * 60 => Ok(()),
        _ => Err(AuditError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "utc_offset_minutes".to_string(),
            reason: "utc_offset_minutes must be an integer strictly between -1440 and 1440"
                .to_string(),
        }),
    }
}
