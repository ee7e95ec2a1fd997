use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use apac_cli::logging::redact_value;
use apac_cli::pipeline::{GenerateResult, PoolStatus};
use apac_layout::BatchReport;
use apac_model::AuthorizationNumber;

pub fn print_generate_summary(result: &GenerateResult) {
    let stats = &result.batch.stats;
    println!("Period: {}", result.config.period);
    match &result.commit {
        Some(commit) => {
            println!("Output: {}", commit.output_path.display());
            println!("Interval report: {}", commit.interval_path.display());
        }
        None => println!("Output: {} (dry run, not written)", result.output_path.display()),
    }
    if let Some(path) = &result.backup_path {
        println!("Pool backup: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows read"), Cell::new(result.rows_read)]);
    table.add_row(vec![Cell::new("Rows attempted"), Cell::new(stats.attempted)]);
    table.add_row(vec![
        Cell::new("Patients generated"),
        Cell::new(stats.generated)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Rows skipped"),
        count_cell(stats.failed, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Records"),
        Cell::new(result.batch.record_count()),
    ]);
    table.add_row(vec![
        Cell::new("First number"),
        number_cell(stats.first_number.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("Last number"),
        number_cell(stats.last_number.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("Numbers left"),
        Cell::new(stats.remaining_numbers),
    ]);
    if let Some(commit) = &result.commit {
        table.add_row(vec![Cell::new("Bytes written"), Cell::new(commit.bytes_written)]);
    }
    println!("{table}");
    print_failure_table(result);
}

fn print_failure_table(result: &GenerateResult) {
    if result.batch.failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Patient"),
        header_cell("Number returned"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &result.batch.failures {
        table.add_row(vec![
            Cell::new(failure.row),
            Cell::new(redact_value(&failure.patient)),
            Cell::new(failure.number.as_str()),
            Cell::new(failure.reason.to_string()).fg(Color::Yellow),
        ]);
    }
    println!();
    println!("Skipped rows:");
    println!("{table}");
}

pub fn print_pool_status(status: &PoolStatus) {
    println!("Pool: {}", status.path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new("Available"),
        count_cell(status.available, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Next number"),
        number_cell(status.next.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("Last number"),
        number_cell(status.last.as_ref()),
    ]);
    println!("{table}");
}

pub fn print_verify_report(path: &Path, report: &BatchReport) {
    println!("File: {}", path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    if let Some(header) = &report.header {
        table.add_row(vec![Cell::new("Period"), Cell::new(&header.period)]);
        table.add_row(vec![Cell::new("Origin"), Cell::new(&header.origin_name)]);
        table.add_row(vec![
            Cell::new("Generated on"),
            Cell::new(&header.generation_date),
        ]);
        table.add_row(vec![
            Cell::new("Layout version"),
            Cell::new(&header.layout_version),
        ]);
        table.add_row(vec![
            Cell::new("Declared patients"),
            Cell::new(header.record_count),
        ]);
        table.add_row(vec![
            Cell::new("Declared control"),
            Cell::new(&header.control_field),
        ]);
    }
    table.add_row(vec![
        Cell::new("Computed control"),
        Cell::new(report.computed_control.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![
        Cell::new("Patient records"),
        Cell::new(report.patient_records),
    ]);
    table.add_row(vec![
        Cell::new("Summary records"),
        Cell::new(report.summary_records),
    ]);
    table.add_row(vec![
        Cell::new("Procedure records"),
        Cell::new(report.procedure_records),
    ]);
    table.add_row(vec![
        Cell::new("First number"),
        Cell::new(report.first_number.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![
        Cell::new("Last number"),
        Cell::new(report.last_number.as_deref().unwrap_or("-")),
    ]);
    println!("{table}");

    if report.is_valid() {
        println!("No issues found.");
        return;
    }
    let mut issues = Table::new();
    issues.set_header(vec![header_cell("Line"), header_cell("Issue")]);
    apply_table_style(&mut issues);
    align_column(&mut issues, 0, CellAlignment::Right);
    for issue in &report.issues {
        issues.add_row(vec![
            Cell::new(issue.line),
            Cell::new(&issue.message).fg(Color::Red),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).add_attribute(Attribute::Dim)
    }
}

fn number_cell(number: Option<&AuthorizationNumber>) -> Cell {
    match number {
        Some(number) => Cell::new(number.as_str()),
        None => Cell::new("-").add_attribute(Attribute::Dim),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
