//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_source::FileSource;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::{AnalysisConfig, Analyzer, TradeAnalysis};
use crate::domain::config_validation::{
    unrecognized_keys, validate_analysis_config, validate_report_config,
    validate_report_format, validate_utc_offset_minutes,
};
use crate::domain::day_boundary::{DayBoundary, OffsetDay};
use crate::domain::error::AuditError;
use crate::domain::findings::Findings;
use crate::domain::overtrading::OVERTRADING_MIN_TRADES;
use crate::domain::revenge::REVENGE_WINDOW_MINUTES;
use crate::domain::trade_parser::parse_trades_with_stats;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_source::TradeSource;

#[derive(Parser, Debug)]
#[command(name = "tradeaudit", about = "Behavioral-risk audit of a trade log")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a trade log and write the behavioral report
    Analyze {
        /// CSV trade log, or `-` for stdin
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Report destination (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// json or text
        #[arg(short, long)]
        format: Option<String>,
        /// Day boundary for overtrading, in minutes east of UTC
        #[arg(long, allow_negative_numbers = true)]
        utc_offset_minutes: Option<i64>,
    },
    /// Parse a trade log and print the normalized trades
    Parse {
        #[arg(short, long)]
        input: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn parse(value: &str) -> Result<Self, AuditError> {
        validate_report_format(value)?;
        Ok(match value.trim().to_lowercase().as_str() {
            "text" => ReportFormat::Text,
            _ => ReportFormat::Json,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    pub format: ReportFormat,
    pub pretty: bool,
}

impl ReportSettings {
    pub fn adapter(&self) -> Box<dyn ReportPort> {
        match self.format {
            ReportFormat::Json => Box::new(JsonReportAdapter::new(self.pretty)),
            ReportFormat::Text => Box::new(TextReportAdapter::new()),
        }
    }
}

/// Install the stderr log subscriber.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli) -> Result<(), AuditError> {
    match cli.command {
        Command::Analyze {
            input,
            config,
            output,
            format,
            utc_offset_minutes,
        } => run_analyze(
            &input,
            config.as_deref(),
            output.as_deref(),
            format.as_deref(),
            utc_offset_minutes,
        ),
        Command::Parse { input } => run_parse(&input),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, AuditError> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    eprintln!("Loading config from {}", path.display());
    let config = FileConfigAdapter::from_file(path).map_err(|e| AuditError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    for entry in unrecognized_keys(&config) {
        warn!(file = %path.display(), "ignoring unrecognized config key {entry}");
    }
    Ok(config)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, AuditError> {
    validate_analysis_config(config)?;
    let min_trades = config.get_int(
        "analysis",
        "overtrading_min_trades",
        OVERTRADING_MIN_TRADES as i64,
    );
    Ok(AnalysisConfig {
        revenge_window_minutes: config.get_double(
            "analysis",
            "revenge_window_minutes",
            REVENGE_WINDOW_MINUTES,
        ),
        overtrading_min_trades: usize::try_from(min_trades).unwrap_or(OVERTRADING_MIN_TRADES),
    })
}

/// Flag value wins over `[analysis] utc_offset_minutes`; 0 means UTC days.
pub fn resolve_day_boundary(
    config: &dyn ConfigPort,
    override_minutes: Option<i64>,
) -> Result<OffsetDay, AuditError> {
    let minutes =
        override_minutes.unwrap_or_else(|| config.get_int("analysis", "utc_offset_minutes", 0));
    validate_utc_offset_minutes(Some(minutes))?;
    i32::try_from(minutes)
        .ok()
        .and_then(OffsetDay::from_minutes)
        .ok_or_else(|| AuditError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "utc_offset_minutes".to_string(),
            reason: format!("{minutes} is not a valid offset"),
        })
}

pub fn build_report_settings(
    config: &dyn ConfigPort,
    format_override: Option<&str>,
) -> Result<ReportSettings, AuditError> {
    validate_report_config(config)?;
    let format = match format_override {
        Some(f) => ReportFormat::parse(f)?,
        None => match config.get_string("report", "format") {
            Some(f) => ReportFormat::parse(&f)?,
            None => ReportFormat::Json,
        },
    };
    Ok(ReportSettings {
        format,
        pretty: config.get_bool("report", "pretty", true),
    })
}

/// Read, parse and analyze one source, then render the report into `out`.
pub fn run_analysis_pipeline<B: DayBoundary>(
    source: &dyn TradeSource,
    analyzer: &Analyzer<B>,
    report: &dyn ReportPort,
    out: &mut dyn Write,
) -> Result<TradeAnalysis, AuditError> {
    // Stage 1: Read
    let text = source.read_text()?;
    info!(source = %source.name(), bytes = text.len(), "read trade log");

    // Stage 2: Parse
    let parsed = parse_trades_with_stats(&text);
    if parsed.short_rows > 0 || parsed.invalid_timestamps > 0 {
        warn!(
            short_rows = parsed.short_rows,
            invalid_timestamps = parsed.invalid_timestamps,
            "some rows were not usable"
        );
    }
    if parsed.trades.is_empty() {
        warn!(source = %source.name(), "no valid trades; report will be neutral");
    }

    // Stage 3: Analyze
    let analysis = analyzer.analyze(&parsed.trades);

    // Stage 4: Report
    report.write_to(&analysis, out)?;
    Ok(analysis)
}

fn run_analyze(
    input: &str,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
    format: Option<&str>,
    utc_offset_minutes: Option<i64>,
) -> Result<(), AuditError> {
    let config = load_config(config_path)?;
    let analysis_config = build_analysis_config(&config)?;
    let day_boundary = resolve_day_boundary(&config, utc_offset_minutes)?;
    let settings = build_report_settings(&config, format)?;

    let source = FileSource::from_arg(input);
    eprintln!("Analyzing {}", source.name());

    let analyzer = Analyzer::with_day_boundary(analysis_config, day_boundary);
    let report = settings.adapter();

    let analysis = match output_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(path).map_err(|e| AuditError::ReportWrite {
                reason: format!("{}: {}", path.display(), e),
            })?;
            let analysis = run_analysis_pipeline(&source, &analyzer, report.as_ref(), &mut file)?;
            eprintln!("\nReport written to: {}", path.display());
            analysis
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            run_analysis_pipeline(&source, &analyzer, report.as_ref(), &mut lock)?
        }
    };

    print_summary(&analysis);
    Ok(())
}

pub fn print_summary(analysis: &TradeAnalysis) {
    let findings = Findings::from_analysis(analysis);

    eprintln!("\n=== Audit Summary ===");
    eprintln!("Total Trades:     {}", analysis.total_trades);
    eprintln!("Net P&L:          {:.2}", analysis.net_pnl);
    eprintln!("Win Rate:         {:.1}%", analysis.win_rate);
    eprintln!(
        "Revenge Trades:   {} [{}]",
        analysis.revenge_trades.len(),
        findings.revenge
    );
    eprintln!(
        "Loss Aversion:    {}x [{}]",
        analysis.loss_aversion.ratio, findings.loss_aversion
    );
    eprintln!(
        "Overtrading Days: {} [{}]",
        analysis.overtrading_days.len(),
        findings.overtrading
    );
    eprintln!(
        "Rationality:      {}/100 ({})",
        analysis.rationality_index, findings.classification
    );
    eprintln!("Worst Finding:    {}", findings.worst());
}

fn run_parse(input: &str) -> Result<(), AuditError> {
    let source = FileSource::from_arg(input);
    let text = source.read_text()?;
    let parsed = parse_trades_with_stats(&text);

    let json = serde_json::to_string_pretty(&parsed).map_err(|e| AuditError::ReportWrite {
        reason: e.to_string(),
    })?;
    println!("{json}");

    eprintln!(
        "{} trades parsed, {} short rows skipped, {} dropped for invalid timestamps",
        parsed.trades.len(),
        parsed.short_rows,
        parsed.invalid_timestamps
    );
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), AuditError> {
    let config = load_config(Some(config_path))?;
    let analysis_config = build_analysis_config(&config)?;
    let day_boundary = resolve_day_boundary(&config, None)?;
    let settings = build_report_settings(&config, None)?;

    eprintln!("\nAnalysis:");
    eprintln!(
        "  revenge_window_minutes: {}",
        analysis_config.revenge_window_minutes
    );
    eprintln!(
        "  overtrading_min_trades: {}",
        analysis_config.overtrading_min_trades
    );
    eprintln!("  day boundary:           UTC{}", day_boundary.0);
    eprintln!("\nReport:");
    eprintln!("  format: {:?}", settings.format);
    eprintln!("  pretty: {}", settings.pretty);

    let unknown = unrecognized_keys(&config);
    if !unknown.is_empty() {
        eprintln!("\nUnrecognized keys (ignored):");
        for entry in &unknown {
            eprintln!("  {entry}");
        }
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
