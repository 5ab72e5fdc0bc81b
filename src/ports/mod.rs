//! Port traits at the analysis engine's I/O seams.

pub mod config_port;
pub mod report_port;
pub mod trade_source;
