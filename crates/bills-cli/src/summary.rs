use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use bills_core::{ReconcileResult, Rejection};
use bills_model::{Issue, IssueSeverity};
use bills_validate::{StageStatus, ValidationReport};

use crate::types::{IngestResult, MetricsResult, SearchResult, ValidateResult};

pub fn print_validation(result: &ValidateResult) {
    println!("Portfolio: {}", result.source.display());
    println!("Type: {}", result.portfolio_type.title());
    if let Some(path) = &result.report_path {
        println!("Validation report: {}", path.display());
    }
    print_stage_table(&result.report);
    print_verdict(result.report.passed(), "PASSED", "FAILED");
    print_issue_table(result.report.issues());
}

pub fn print_ingest(result: &IngestResult) {
    println!("Portfolio: {}", result.source.display());
    println!("Type: {}", result.portfolio_type.title());
    println!(
        "Processed month: {} ({})",
        result.processed_month,
        result.processed_month.label()
    );
    println!(
        "Store: {} historical rows, {} registered supply ids",
        result.history_rows, result.registry_size
    );
    let outcome = &result.outcome;
    print_stage_table(&outcome.validation);

    match &outcome.reconcile {
        Some(ReconcileResult::Merged(merged)) => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Merge"), header_cell("Value")]);
            apply_table_style(&mut table);
            align_column(&mut table, 1, CellAlignment::Right);
            table.add_row(vec![
                Cell::new("Rows appended"),
                count_cell(Some(merged.appended), Color::Green),
            ]);
            table.add_row(vec![
                Cell::new("Rows in merged table"),
                Cell::new(merged.series.height()),
            ]);
            table.add_row(vec![Cell::new("File name"), Cell::new(&merged.file_name)]);
            let written = match (&result.export_path, result.dry_run) {
                (Some(path), _) => Cell::new(path.display()),
                (None, true) => dim_cell("dry run"),
                (None, false) => dim_cell("-"),
            };
            table.add_row(vec![Cell::new("Written to"), written]);
            println!("{table}");
        }
        Some(ReconcileResult::Rejected(rejection)) => {
            println!("Reconciliation: {}", rejection_label(rejection));
        }
        None => {}
    }

    if let Some(check) = &outcome.registry {
        println!(
            "Registry: {} unregistered supply ids ({} rows), {} inactive registered ids",
            check.unregistered_ids.len(),
            check.unregistered.height(),
            check.inactive.len()
        );
    }
    print_verdict(outcome.succeeded(), "INGESTED", "NOT INGESTED");
    print_issue_table(&outcome.issues());
}

pub fn print_metrics(result: &MetricsResult) {
    let metrics = &result.metrics;
    println!("Type: {}", result.portfolio_type.title());
    println!("Portfolio: {}", result.portfolio_source);
    println!("Level: {}", metrics.level());
    if let Some(rows) = metrics.portfolio() {
        println!("Rows: {}", rows.height());
    }

    let Some(kpis) = metrics.kpis() else {
        println!("No data for the selected level.");
        return;
    };

    let mut table = Table::new();
    table.set_header(vec![header_cell("KPI"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Total debt"), Cell::new(amount(kpis.total_debt))]);
    table.add_row(vec![
        Cell::new("Total consumption"),
        Cell::new(amount(kpis.total_consumption)),
    ]);
    if let Some(count) = kpis.building_count {
        table.add_row(vec![Cell::new("Buildings"), Cell::new(count)]);
    }
    if let Some(count) = kpis.supply_count {
        table.add_row(vec![Cell::new("Supply ids"), Cell::new(count)]);
    }
    println!("{table}");

    if let Some(by_type) = metrics.debt_by_account_type()
        && !by_type.is_empty()
    {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Account type"), header_cell("Debt")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for row in by_type {
            table.add_row(vec![Cell::new(&row.account_type), Cell::new(amount(row.debt))]);
        }
        println!();
        println!("Debt by account type:");
        println!("{table}");
    }

    if let Some(series) = metrics.monthly_series()
        && !series.is_empty()
    {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Month"),
            header_cell("Consumption"),
            header_cell("Debt"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        for point in series {
            table.add_row(vec![
                Cell::new(&point.label),
                Cell::new(amount(point.consumption)),
                Cell::new(amount(point.debt)),
            ]);
        }
        println!();
        println!("Monthly series:");
        println!("{table}");
    }

    if let Some(skipped) = metrics.skipped_history_rows()
        && skipped > 0
    {
        println!("{skipped} historical rows without a valid processed month were skipped.");
    }

    if let Some(unparsed) = metrics.unparsed_amount_cells()
        && unparsed > 0
    {
        println!("{unparsed} debt or consumption cells were not numeric and counted as 0.");
    }
}

pub fn print_search(result: &SearchResult) {
    if result.matches.is_empty() {
        println!("No buildings or supply ids match '{}'.", result.term);
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Match"), header_cell("Level")]);
    apply_table_style(&mut table);
    for entry in &result.matches {
        let level = entry
            .level
            .as_ref()
            .map_or_else(|| dim_cell("-"), |level| Cell::new(level.as_str()));
        table.add_row(vec![Cell::new(&entry.value), level]);
    }
    println!("{table}");
}

fn print_stage_table(report: &ValidationReport) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Status")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for outcome in report.stages() {
        table.add_row(vec![
            Cell::new(outcome.stage.label()),
            status_cell(outcome.status),
        ]);
    }
    println!("{table}");
}

fn print_verdict(ok: bool, pass: &str, fail: &str) {
    let cell = if ok {
        Cell::new(pass).fg(Color::Green)
    } else {
        Cell::new(fail).fg(Color::Red)
    };
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![cell.add_attribute(Attribute::Bold)]);
    println!("{table}");
}

fn print_issue_table(issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    let mut ordered: Vec<&Issue> = issues.iter().collect();
    ordered.sort_by_key(|issue| issue.severity);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Count"),
        header_cell("Message"),
        header_cell("Columns"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in ordered {
        let columns = if issue.columns.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(issue.columns.join(", "))
        };
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.kind.code()),
            issue_count_cell(issue.count, issue.severity),
            Cell::new(&issue.message),
            columns,
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn rejection_label(rejection: &Rejection) -> String {
    match rejection {
        Rejection::SchemaInvalid { .. } => "rejected, historical store is invalid".to_string(),
        Rejection::AlreadyIngested { invoices } => {
            format!("already ingested ({invoices} invoices), nothing appended")
        }
        Rejection::PartiallyDuplicate {
            overlapping,
            distinct_new,
            ..
        } => format!("rejected, {overlapping}/{distinct_new} invoices already stored"),
    }
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: StageStatus) -> Cell {
    match status {
        StageStatus::Passed => Cell::new("PASS").fg(Color::Green),
        StageStatus::Warned => Cell::new("WARN").fg(Color::Yellow),
        StageStatus::Failed => Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
        IssueSeverity::Info => Cell::new("INFO").fg(Color::Blue),
    }
}

fn issue_count_cell(count: Option<u64>, severity: IssueSeverity) -> Cell {
    match count {
        Some(value) => Cell::new(value).fg(severity_color(severity)),
        None => dim_cell("-"),
    }
}

fn severity_color(severity: IssueSeverity) -> Color {
    match severity {
        IssueSeverity::Error => Color::Red,
        IssueSeverity::Warning => Color::Yellow,
        IssueSeverity::Info => Color::Blue,
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
