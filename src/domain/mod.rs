//! Core domain types and logic.
//!
//! Everything here is synchronous and free of I/O; each function takes its
//! whole input as parameters and returns fresh values.

pub mod trade;
pub mod trade_parser;
pub mod revenge;
pub mod loss_aversion;
pub mod day_boundary;
pub mod overtrading;
pub mod equity;
pub mod rationality;
pub mod analysis;
pub mod findings;
pub mod config_validation;
pub mod error;
