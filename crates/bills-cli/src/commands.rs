use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, Table};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use bills_core::{
    IngestContext, MasterRegistry, PortfolioMetrics, ReconcileResult, latest_month_rows,
    resolve_selection, run_ingestion, search_selections,
};
use bills_ingest::{StoreLayout, read_table, write_table};
use bills_model::{FilterLevel, PortfolioSchema, PortfolioType, ProcessedMonth};
use bills_standards::{PORTFOLIO_SCHEMA_FILE, load_default_schema, load_schema};
use bills_validate::{ValidationReport, run_pipeline, write_validation_report_json};

use crate::cli::{IngestArgs, MetricsArgs, SearchArgs, ValidateArgs};
use crate::summary::{apply_table_style, dim_cell};
use crate::types::{IngestResult, MetricsResult, SearchMatch, SearchResult, ValidateResult};
use bills_cli::logging::redact_value;
use bills_cli::progress::StageProgress;

/// Loads `portfolio.toml` from `schema_dir`, or the default schema location.
pub fn load_portfolio_schema(schema_dir: Option<&Path>) -> Result<PortfolioSchema> {
    match schema_dir {
        Some(dir) => {
            let path = dir.join(PORTFOLIO_SCHEMA_FILE);
            load_schema(&path).with_context(|| format!("load schema {}", path.display()))
        }
        None => load_default_schema().context("load portfolio schema"),
    }
}

pub fn run_schema(schema: &PortfolioSchema) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["#", "Column", "Mandatory", "Role"]);
    apply_table_style(&mut table);
    for (idx, column) in schema.expected_columns.iter().enumerate() {
        let mandatory = if schema.is_mandatory(column) { "yes" } else { "" };
        let role = schema
            .role_of(column)
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(column),
            Cell::new(mandatory),
            role,
        ]);
    }
    println!("Schema: {}", schema.name);
    println!(
        "{} expected columns, {} mandatory",
        schema.expected_columns.len(),
        schema.mandatory_columns.len()
    );
    println!("{table}");
    println!("Processed month column: {}", schema.roles.processed_month);
    println!("Registry supply column: {}", schema.roles.registry_supply_id);
    Ok(())
}

pub fn run_validate(args: &ValidateArgs, schema: &PortfolioSchema) -> Result<ValidateResult> {
    let portfolio_type = PortfolioType::from(args.portfolio_type);
    let span = info_span!("validate_file", portfolio_type = %portfolio_type);
    let _guard = span.enter();

    let upload = read_upload(&args.file)?;
    let report = run_pipeline(schema, &upload).context("run validation pipeline")?;
    log_duplicate_keys(&report);

    if let Some(path) = &args.report {
        let source = args.file.display().to_string();
        write_validation_report_json(path, &report, &source, portfolio_type)
            .with_context(|| format!("write validation report {}", path.display()))?;
        info!(path = %path.display(), "validation report written");
    }

    Ok(ValidateResult {
        source: args.file.clone(),
        portfolio_type,
        report,
        report_path: args.report.clone(),
    })
}

pub fn run_ingest(args: &IngestArgs, schema: &PortfolioSchema) -> Result<IngestResult> {
    let portfolio_type = PortfolioType::from(args.portfolio_type);
    let today = Local::now().date_naive();
    let processed_month = args
        .month
        .unwrap_or_else(|| ProcessedMonth::from_date(today));
    let span = info_span!(
        "ingest",
        portfolio_type = %portfolio_type,
        processed_month = %processed_month
    );
    let _guard = span.enter();

    let layout = StoreLayout::resolve(args.data_dir.as_deref());
    let progress = StageProgress::new(4);

    progress.start("reading upload");
    let upload = read_upload(&args.file)?;
    progress.advance();

    progress.start("loading store");
    let history = layout.load_history(portfolio_type).with_context(|| {
        format!(
            "load historical store {}",
            layout.historical_path(portfolio_type).display()
        )
    })?;
    let registry_frame = layout.load_registry(portfolio_type).with_context(|| {
        format!(
            "load master registry {}",
            layout.registry_path(portfolio_type).display()
        )
    })?;
    let registry = MasterRegistry::from_frame(&registry_frame, &schema.roles.registry_supply_id)
        .context("read master registry supply ids")?;
    progress.advance();

    progress.start("validating and reconciling");
    let ctx = IngestContext::new(schema, portfolio_type, processed_month, today);
    let outcome = run_ingestion(&ctx, &upload, &history, &registry)
        .context("run ingestion pipeline")?;
    log_duplicate_keys(&outcome.validation);
    if let Some(check) = &outcome.registry {
        for supply_id in &check.unregistered_ids {
            debug!(supply_id = redact_value(supply_id), "unregistered supply id");
        }
    }
    progress.advance();

    progress.start("exporting");
    let mut export_path = None;
    if let Some(merged) = outcome.reconcile.as_ref().and_then(ReconcileResult::merged) {
        if args.dry_run {
            info!(file_name = %merged.file_name, "dry run; merged table not written");
        } else {
            let dir = args
                .output_dir
                .clone()
                .unwrap_or_else(|| layout.export_dir());
            let path = dir.join(&merged.file_name);
            write_table(&merged.series, &path)
                .with_context(|| format!("write merged table {}", path.display()))?;
            info!(
                path = %path.display(),
                rows = merged.series.height(),
                appended = merged.appended,
                "merged table written"
            );
            export_path = Some(path);
        }
    }
    progress.advance();
    progress.finish();

    Ok(IngestResult {
        source: args.file.clone(),
        portfolio_type,
        processed_month,
        history_rows: history.height(),
        registry_size: registry.len(),
        outcome,
        export_path,
        dry_run: args.dry_run,
    })
}

pub fn run_metrics(args: &MetricsArgs, schema: &PortfolioSchema) -> Result<MetricsResult> {
    let portfolio_type = PortfolioType::from(args.portfolio_type);
    let layout = StoreLayout::resolve(args.data_dir.as_deref());
    let history = layout.load_history(portfolio_type).with_context(|| {
        format!(
            "load historical store {}",
            layout.historical_path(portfolio_type).display()
        )
    })?;

    let (portfolio, portfolio_source) = match &args.portfolio {
        Some(path) => (read_upload(path)?, path.display().to_string()),
        None => {
            let rows = latest_month_rows(schema, &history)
                .context("select latest processed month")?;
            (rows, "latest month of the historical store".to_string())
        }
    };

    let level = match (&args.building, &args.supply_id) {
        (Some(address), _) => FilterLevel::Building(address.clone()),
        (None, Some(supply_id)) => FilterLevel::SupplyId(supply_id.clone()),
        (None, None) => FilterLevel::All,
    };
    if let Some(selection) = level.selection() {
        debug!(level = level.as_str(), selection = redact_value(selection), "drill-down");
    }

    let metrics = PortfolioMetrics::new(schema, &portfolio, &history, level)
        .context("aggregate portfolio metrics")?;
    if !metrics.is_valid() {
        warn!("no rows for the selected level");
    }

    Ok(MetricsResult {
        portfolio_type,
        portfolio_source,
        metrics,
    })
}

pub fn run_search(args: &SearchArgs, schema: &PortfolioSchema) -> Result<SearchResult> {
    let portfolio = read_upload(&args.portfolio)?;
    let matches = search_selections(schema, &portfolio, &args.term)
        .into_iter()
        .map(|value| {
            let level = resolve_selection(schema, &portfolio, &value);
            SearchMatch { value, level }
        })
        .collect::<Vec<_>>();
    info!(matches = matches.len(), "search finished");
    Ok(SearchResult {
        term: args.term.clone(),
        matches,
    })
}

fn read_upload(path: &Path) -> Result<DataFrame> {
    let df = read_table(path).with_context(|| format!("read portfolio {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "portfolio loaded"
    );
    Ok(df)
}

fn log_duplicate_keys(report: &ValidationReport) {
    let Some(duplicates) = report.duplicates() else {
        return;
    };
    for key in &duplicates.keys {
        match key {
            Some(invoice) => debug!(invoice = redact_value(invoice), "duplicated invoice"),
            None => debug!("duplicated missing invoice id"),
        }
    }
}
