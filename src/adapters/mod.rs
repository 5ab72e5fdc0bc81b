//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod file_source;
pub mod json_report_adapter;
pub mod text_report_adapter;
