//! Delimited trade-log parser.
//!
//! Header-driven and permissive: rows that are too short are skipped,
//! trades with unparsable timestamps are dropped afterwards, and bad
//! numerics become `NaN` instead of failing the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info};

use super::trade::{Direction, Trade};

/// Rows with fewer comma-separated fields than this are skipped.
pub const MIN_FIELDS: usize = 7;

const SYMBOL: &[&str] = &["symbol", "ticker"];
const DIRECTION: &[&str] = &["direction", "side"];
const ENTRY_TIME: &[&str] = &["entrytime", "entry_time", "open_time", "entry"];
const EXIT_TIME: &[&str] = &["exittime", "exit_time", "close_time", "exit"];
const ENTRY_PRICE: &[&str] = &["entryprice", "entry_price", "open"];
const EXIT_PRICE: &[&str] = &["exitprice", "exit_price", "close"];
const QUANTITY: &[&str] = &["quantity", "qty", "size"];
const PNL: &[&str] = &["pnl", "profit", "pl"];

const DATETIME_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parser output together with what was discarded along the way.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTrades {
    pub trades: Vec<Trade>,
    /// Data rows skipped for having fewer than [`MIN_FIELDS`] fields.
    pub short_rows: usize,
    /// Parsed rows dropped because a timestamp was not a valid instant.
    pub invalid_timestamps: usize,
}

/// Column index lookup over the lower-cased header.
struct Header {
    names: Vec<String>,
}

impl Header {
    fn new(record: &StringRecord) -> Self {
        Self {
            names: record.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|h| h == name)
    }

    /// First alias whose column exists and whose cell is non-empty.
    fn lookup<'r>(&self, row: &'r StringRecord, aliases: &[&str]) -> Option<&'r str> {
        aliases
            .iter()
            .filter_map(|alias| self.index_of(alias))
            .filter_map(|idx| row.get(idx))
            .find(|value| !value.is_empty())
    }
}

struct RawTimes<'a> {
    entry: &'a str,
    exit: &'a str,
}

/// Parse a trade log, returning only the trades with valid timestamps.
pub fn parse_trades(text: &str) -> Vec<Trade> {
    parse_trades_with_stats(text).trades
}

pub fn parse_trades_with_stats(text: &str) -> ParsedTrades {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut records = rdr.records();
    let (header, header_line) = match records.next() {
        Some(Ok(record)) => (
            Header::new(&record),
            record.position().map_or(1, |p| p.line()),
        ),
        _ => return ParsedTrades::default(),
    };

    let mut out = ParsedTrades::default();
    let mut row_number: u64 = 0;

    // Ids follow physical lines so blank lines, which the reader drops,
    // still advance them.
    for result in records {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                row_number += 1;
                debug!(row = row_number, error = %e, "skipping unreadable row");
                continue;
            }
        };
        row_number = row
            .position()
            .map_or(row_number + 1, |p| p.line().saturating_sub(header_line));

        if row.len() < MIN_FIELDS {
            debug!(row = row_number, fields = row.len(), "skipping short row");
            out.short_rows += 1;
            continue;
        }

        let times = RawTimes {
            entry: header.lookup(&row, ENTRY_TIME).unwrap_or_default(),
            exit: header.lookup(&row, EXIT_TIME).unwrap_or_default(),
        };
        let (entry_time, exit_time) = match (parse_timestamp(times.entry), parse_timestamp(times.exit)) {
            (Some(entry), Some(exit)) => (entry, exit),
            _ => {
                debug!(
                    row = row_number,
                    entry = times.entry,
                    exit = times.exit,
                    "dropping trade with invalid timestamp"
                );
                out.invalid_timestamps += 1;
                continue;
            }
        };

        out.trades.push(Trade {
            id: row_number,
            symbol: header
                .lookup(&row, SYMBOL)
                .map(str::to_string)
                .unwrap_or_else(|| format!("TRADE{row_number}")),
            direction: header
                .lookup(&row, DIRECTION)
                .map(Direction::from_token)
                .unwrap_or(Direction::Long),
            entry_time,
            exit_time,
            entry_price: parse_number(header.lookup(&row, ENTRY_PRICE).unwrap_or_default()),
            exit_price: parse_number(header.lookup(&row, EXIT_PRICE).unwrap_or_default()),
            quantity: parse_number(header.lookup(&row, QUANTITY).unwrap_or("1")),
            pnl: parse_number(header.lookup(&row, PNL).unwrap_or("0")),
        });
    }

    info!(
        trades = out.trades.len(),
        short_rows = out.short_rows,
        invalid_timestamps = out.invalid_timestamps,
        "parsed trade log"
    );
    out
}

/// Parses the longest leading number, so `177.2USD` reads as 177.2. A cell
/// with no numeric prefix yields `NaN`, which propagates into sums and
/// averages.
pub fn parse_number(value: &str) -> f64 {
    let value = value.trim_start();
    let prefix = numeric_prefix(value);
    if prefix.is_empty() {
        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        if unsigned.starts_with("Infinity") {
            return if value.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }
        return f64::NAN;
    }
    prefix.parse::<f64>().unwrap_or(f64::NAN)
}

/// `[sign] digits [. digits] [e [sign] digits]`, with at least one digit in
/// the mantissa. An exponent marker without digits is not consumed.
fn numeric_prefix(value: &str) -> &str {
    let bytes = value.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &value[..end]
}

/// Parse a timestamp in any of the accepted layouts. Values without an
/// explicit offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ndt.and_utc());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
