//! CLI integration tests for config resolution and the analyze pipeline.
//!
//! Tests cover:
//! - Config parsing (build_analysis_config, resolve_day_boundary, build_report_settings)
//! - Config files on disk (load_config)
//! - Full pipeline through TradeSource and ReportPort into a buffer or file
//! - Top-level dispatch through cli::execute

mod common;

use clap::Parser;
use common::*;
use std::fs;
use tradeaudit::adapters::file_config_adapter::FileConfigAdapter;
use tradeaudit::adapters::file_source::{FileSource, TextSource};
use tradeaudit::cli::{self, Cli, Command, ReportFormat};
use tradeaudit::domain::analysis::{AnalysisConfig, Analyzer};
use tradeaudit::domain::day_boundary::OffsetDay;
use tradeaudit::domain::error::AuditError;

const VALID_INI: &str = r#"
[analysis]
revenge_window_minutes = 10
overtrading_min_trades = 5
utc_offset_minutes = -300

[report]
format = text
pretty = false
"#;

fn adapter(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

fn sample_log() -> String {
    to_csv(&[
        make_trade(1, 0, 20, -120.0),
        make_trade(2, 22, 15, 45.0),
        make_trade(3, 90, 10, 30.0),
    ])
}

mod config_loading {
    use super::*;

    #[test]
    fn build_analysis_config_reads_values() {
        let config = cli::build_analysis_config(&adapter(VALID_INI)).unwrap();
        assert_eq!(config.revenge_window_minutes, 10.0);
        assert_eq!(config.overtrading_min_trades, 5);
    }

    #[test]
    fn build_analysis_config_uses_defaults() {
        let config = cli::build_analysis_config(&FileConfigAdapter::empty()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn build_analysis_config_rejects_zero_window() {
        let err = cli::build_analysis_config(&adapter("[analysis]\nrevenge_window_minutes = 0\n"))
            .unwrap_err();
        assert!(
            matches!(err, AuditError::ConfigInvalid { key, .. } if key == "revenge_window_minutes")
        );
    }

    #[test]
    fn build_analysis_config_rejects_zero_min_trades() {
        let err = cli::build_analysis_config(&adapter("[analysis]\novertrading_min_trades = 0\n"))
            .unwrap_err();
        assert!(
            matches!(err, AuditError::ConfigInvalid { key, .. } if key == "overtrading_min_trades")
        );
    }

    #[test]
    fn day_boundary_from_config() {
        let boundary = cli::resolve_day_boundary(&adapter(VALID_INI), None).unwrap();
        assert_eq!(boundary, OffsetDay::from_minutes(-300).unwrap());
    }

    #[test]
    fn day_boundary_flag_overrides_config() {
        let boundary = cli::resolve_day_boundary(&adapter(VALID_INI), Some(60)).unwrap();
        assert_eq!(boundary, OffsetDay::from_minutes(60).unwrap());
    }

    #[test]
    fn day_boundary_defaults_to_utc() {
        let boundary = cli::resolve_day_boundary(&FileConfigAdapter::empty(), None).unwrap();
        assert_eq!(boundary, OffsetDay::from_minutes(0).unwrap());
    }

    #[test]
    fn day_boundary_rejects_full_day_offset() {
        let err = cli::resolve_day_boundary(&FileConfigAdapter::empty(), Some(1440)).unwrap_err();
        assert!(matches!(err, AuditError::ConfigInvalid { key, .. } if key == "utc_offset_minutes"));
    }

    #[test]
    fn report_settings_from_config() {
        let settings = cli::build_report_settings(&adapter(VALID_INI), None).unwrap();
        assert_eq!(settings.format, ReportFormat::Text);
        assert!(!settings.pretty);
    }

    #[test]
    fn report_format_flag_overrides_config() {
        let settings = cli::build_report_settings(&adapter(VALID_INI), Some("JSON")).unwrap();
        assert_eq!(settings.format, ReportFormat::Json);
    }

    #[test]
    fn report_settings_default_to_pretty_json() {
        let settings = cli::build_report_settings(&FileConfigAdapter::empty(), None).unwrap();
        assert_eq!(settings.format, ReportFormat::Json);
        assert!(settings.pretty);
    }

    #[test]
    fn unknown_report_format_is_invalid() {
        let err = cli::build_report_settings(&FileConfigAdapter::empty(), Some("pdf")).unwrap_err();
        assert!(matches!(err, AuditError::ConfigInvalid { ref key, .. } if key == "format"));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn load_config_from_disk() {
        let file = write_temp_file(VALID_INI);
        let config = cli::load_config(Some(file.path())).unwrap();
        let analysis = cli::build_analysis_config(&config).unwrap();
        assert_eq!(analysis.overtrading_min_trades, 5);
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let err = cli::load_config(Some(std::path::Path::new("/nonexistent/audit.ini")))
            .err()
            .unwrap();
        assert!(matches!(err, AuditError::ConfigParse { .. }));
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn json_report_into_buffer() {
        let source = TextSource {
            label: "inline".into(),
            text: sample_log(),
        };
        let settings = cli::build_report_settings(&FileConfigAdapter::empty(), None).unwrap();
        let mut buf: Vec<u8> = Vec::new();

        let analysis = cli::run_analysis_pipeline(
            &source,
            &Analyzer::default(),
            settings.adapter().as_ref(),
            &mut buf,
        )
        .unwrap();

        assert_eq!(analysis.total_trades, 3);
        assert_eq!(analysis.revenge_trades.len(), 1);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["totalTrades"], 3);
        assert_eq!(value["rationalityIndex"], analysis.rationality_index);
        assert_eq!(value["revengeTrades"][0]["minutesBetween"], 2);
        assert_eq!(value["equityCurve"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn text_report_from_file_source() {
        let log = write_temp_file(&sample_log());
        let source = FileSource::from_arg(log.path().to_str().unwrap());
        let settings = cli::build_report_settings(&FileConfigAdapter::empty(), Some("text")).unwrap();
        let mut buf: Vec<u8> = Vec::new();

        cli::run_analysis_pipeline(&source, &Analyzer::default(), settings.adapter().as_ref(), &mut buf)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("BEHAVIORAL AUDIT"));
        assert!(text.contains("-- Revenge Trading [medium] --"));
        assert!(text.contains("ADVISORY"));
    }

    #[test]
    fn empty_log_still_produces_neutral_report() {
        let source = TextSource {
            label: "empty".into(),
            text: CSV_HEADER.to_string(),
        };
        let mut buf: Vec<u8> = Vec::new();
        let settings = cli::build_report_settings(&FileConfigAdapter::empty(), None).unwrap();

        let analysis =
            cli::run_analysis_pipeline(&source, &Analyzer::default(), settings.adapter().as_ref(), &mut buf)
                .unwrap();

        assert_eq!(analysis.total_trades, 0);
        assert_eq!(analysis.rationality_index, 100);
        assert_eq!(analysis.equity_curve.len(), 1);
        assert_eq!(analysis.equity_curve[0].trade_id, 0);
        assert_eq!(analysis.equity_curve[0].equity, 0.0);
        assert_eq!(analysis.equity_curve[0].is_revenge_trade, None);
    }

    #[test]
    fn missing_source_is_source_error() {
        let source = FileSource::from_arg("/nonexistent/trades.csv");
        let settings = cli::build_report_settings(&FileConfigAdapter::empty(), None).unwrap();
        let mut buf: Vec<u8> = Vec::new();

        let err =
            cli::run_analysis_pipeline(&source, &Analyzer::default(), settings.adapter().as_ref(), &mut buf)
                .unwrap_err();
        assert!(matches!(err, AuditError::SourceRead { .. }));
        assert_eq!(err.exit_status(), 3);
        assert!(buf.is_empty());
    }

    #[test]
    fn configured_thresholds_flow_through() {
        let config = adapter(VALID_INI);
        let analyzer = Analyzer::with_day_boundary(
            cli::build_analysis_config(&config).unwrap(),
            cli::resolve_day_boundary(&config, None).unwrap(),
        );
        // 8-minute gap: outside the default window, inside the configured one.
        let source = TextSource {
            label: "wide".into(),
            text: to_csv(&[make_trade(1, 0, 10, -40.0), make_trade(2, 18, 10, 15.0)]),
        };
        let mut buf: Vec<u8> = Vec::new();
        let settings = cli::build_report_settings(&config, None).unwrap();

        let analysis =
            cli::run_analysis_pipeline(&source, &analyzer, settings.adapter().as_ref(), &mut buf).unwrap();
        assert_eq!(analysis.revenge_trades.len(), 1);
        assert_eq!(analysis.revenge_trades[0].minutes_between, 8);
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn analyze_writes_report_file() {
        let log = write_temp_file(&sample_log());
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports").join("audit.json");

        let cli = Cli::parse_from([
            "tradeaudit",
            "analyze",
            "--input",
            log.path().to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--utc-offset-minutes",
            "-300",
        ]);
        cli::execute(cli).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["totalTrades"], 3);
    }

    #[test]
    fn analyze_with_bad_format_fails() {
        let log = write_temp_file(&sample_log());
        let cli = Cli::parse_from([
            "tradeaudit",
            "analyze",
            "--input",
            log.path().to_str().unwrap(),
            "--format",
            "xml",
        ]);
        assert!(cli::execute(cli).is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        let file = write_temp_file(VALID_INI);
        let cli = Cli::parse_from(["tradeaudit", "validate", "--config", file.path().to_str().unwrap()]);
        cli::execute(cli).unwrap();
    }

    #[test]
    fn validate_rejects_invalid_config() {
        let file = write_temp_file("[analysis]\nutc_offset_minutes = 2000\n");
        let cli = Cli::parse_from(["tradeaudit", "validate", "--config", file.path().to_str().unwrap()]);
        assert!(cli::execute(cli).is_err());
    }

    #[test]
    fn verbosity_flag_is_global() {
        let cli = Cli::parse_from(["tradeaudit", "parse", "-vv", "--input", "trades.csv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Parse { input } if input == "trades.csv"));
    }
}
