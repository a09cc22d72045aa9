//! Utility-bill portfolio CLI.

use bills_cli::logging::{LogConfig, LogFormat, init_logging};
use bills_core::{ReconcileResult, Rejection};
use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_portfolio_schema, run_ingest, run_metrics, run_schema, run_search, run_validate,
};
use crate::summary::{print_ingest, print_metrics, print_search, print_validation};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Runs the selected command and returns the process exit code.
fn run(cli: &Cli) -> anyhow::Result<i32> {
    let schema = load_portfolio_schema(cli.schema_dir.as_deref())?;
    let code = match &cli.command {
        Command::Validate(args) => {
            let result = run_validate(args, &schema)?;
            print_validation(&result);
            if result.report.passed() { 0 } else { 1 }
        }
        Command::Ingest(args) => {
            let result = run_ingest(args, &schema)?;
            print_ingest(&result);
            let already_ingested = matches!(
                result.outcome.reconcile.as_ref().and_then(ReconcileResult::rejection),
                Some(Rejection::AlreadyIngested { .. })
            );
            if result.outcome.succeeded() || already_ingested { 0 } else { 1 }
        }
        Command::Metrics(args) => {
            let result = run_metrics(args, &schema)?;
            print_metrics(&result);
            0
        }
        Command::Search(args) => {
            let result = run_search(args, &schema)?;
            print_search(&result);
            0
        }
        Command::Schema => {
            run_schema(&schema)?;
            0
        }
    };
    Ok(code)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
