//! CLI argument definitions for the utility-bill pipeline.

use std::path::PathBuf;

use bills_model::{PortfolioType, ProcessedMonth};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "utility-bills",
    version,
    about = "Validate, reconcile and analyse monthly utility-bill portfolios",
    long_about = "Validate monthly utility-bill exports against the portfolio schema,\n\
                  append them to the per-portfolio historical store and compare them\n\
                  with the master registry of supply points."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow supply ids, invoice numbers and tenant data in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Directory holding portfolio.toml (default: BILLS_SCHEMA_DIR or the bundled schema).
    #[arg(long = "schema-dir", value_name = "DIR", global = true)]
    pub schema_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a monthly portfolio export.
    Validate(ValidateArgs),

    /// Validate an export and append it to the historical store.
    Ingest(IngestArgs),

    /// Show KPIs, debt by account type and the monthly series.
    Metrics(MetricsArgs),

    /// Find buildings and supply ids in a portfolio.
    Search(SearchArgs),

    /// Print the configured portfolio columns.
    Schema,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Portfolio CSV export.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Portfolio type of the export.
    #[arg(long = "type", value_enum)]
    pub portfolio_type: PortfolioTypeArg,

    /// Write a JSON validation report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Portfolio CSV export.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Portfolio type of the export.
    #[arg(long = "type", value_enum)]
    pub portfolio_type: PortfolioTypeArg,

    /// Month tag for new rows as YYYYMM (default: current month).
    #[arg(long = "month", value_name = "YYYYMM")]
    pub month: Option<ProcessedMonth>,

    /// Store directory (default: BILLS_DATA_DIR or ./data).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for the merged table (default: <DATA_DIR>/exports).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Validate and reconcile without writing the merged table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct MetricsArgs {
    /// Portfolio type whose store is analysed.
    #[arg(long = "type", value_enum)]
    pub portfolio_type: PortfolioTypeArg,

    /// Current portfolio CSV (default: latest month of the historical store).
    #[arg(long = "portfolio", value_name = "FILE")]
    pub portfolio: Option<PathBuf>,

    /// Restrict to one building address.
    #[arg(long = "building", value_name = "ADDRESS", conflicts_with = "supply_id")]
    pub building: Option<String>,

    /// Restrict to one supply id.
    #[arg(long = "supply-id", value_name = "ID")]
    pub supply_id: Option<String>,

    /// Store directory (default: BILLS_DATA_DIR or ./data).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for.
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Portfolio CSV to search.
    #[arg(long = "portfolio", value_name = "FILE")]
    pub portfolio: PathBuf,
}

/// CLI portfolio type choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PortfolioTypeArg {
    Eurobank,
    Management,
}

impl From<PortfolioTypeArg> for PortfolioType {
    fn from(value: PortfolioTypeArg) -> Self {
        match value {
            PortfolioTypeArg::Eurobank => PortfolioType::Eurobank,
            PortfolioTypeArg::Management => PortfolioType::Management,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_with_month() {
        let cli = Cli::try_parse_from([
            "utility-bills",
            "ingest",
            "march.csv",
            "--type",
            "management",
            "--month",
            "202403",
            "--dry-run",
        ])
        .expect("parse ingest");
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest command");
        };
        assert_eq!(args.portfolio_type, PortfolioTypeArg::Management);
        assert_eq!(args.month.map(|month| month.code()), Some(202403));
        assert!(args.dry_run);
        assert!(args.data_dir.is_none());
    }

    #[test]
    fn rejects_malformed_month() {
        let result = Cli::try_parse_from([
            "utility-bills",
            "ingest",
            "march.csv",
            "--type",
            "eurobank",
            "--month",
            "2024-03",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn building_conflicts_with_supply_id() {
        let result = Cli::try_parse_from([
            "utility-bills",
            "metrics",
            "--type",
            "eurobank",
            "--building",
            "ΑΘΗΝΑΣ 12",
            "--supply-id",
            "1002003",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "utility-bills",
            "schema",
            "--log-data",
            "--schema-dir",
            "conf",
        ])
        .expect("parse schema");
        assert!(cli.log_data);
        assert_eq!(cli.schema_dir, Some(PathBuf::from("conf")));
        assert!(matches!(cli.command, Command::Schema));
    }
}
