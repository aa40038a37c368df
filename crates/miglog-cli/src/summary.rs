use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use miglog_cli::pipeline::{RunSummary, ScanSummary, StepSummary};

pub fn print_run_summary(summary: &RunSummary) {
    println!("Log: {}", summary.log_path.display());
    println!("Mapping documents: {}", summary.map_dir.display());
    if summary.dry_run {
        println!("Dry run: no documents were written");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Source docs"),
        header_cell("Source fields"),
        header_cell("Dest docs"),
        header_cell("Dest fields"),
        header_cell("Appended"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut totals = [0usize; 5];
    for step in &summary.steps {
        totals[0] += step.source_documents;
        totals[1] += step.source_fields;
        totals[2] += step.destination_documents;
        totals[3] += step.destination_fields;
        totals[4] += step.total();
        table.add_row(vec![
            step_cell(step),
            count_cell(step.source_documents),
            count_cell(step.source_fields),
            count_cell(step.destination_documents),
            count_cell(step.destination_fields),
            count_cell(step.total()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        total_cell(totals[0]),
        total_cell(totals[1]),
        total_cell(totals[2]),
        total_cell(totals[3]),
        total_cell(totals[4]),
    ]);
    println!("{table}");

    if !summary.documents.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Document"),
            header_cell("Path"),
            header_cell("Appended"),
            header_cell("Written"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Center);
        for document in &summary.documents {
            table.add_row(vec![
                Cell::new(&document.file_name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(document.path.display()),
                count_cell(document.appended),
                written_cell(document.written),
            ]);
        }
        println!("{table}");
    }
    println!("Tickets queued: {}", summary.tickets_queued);
}

pub fn print_scan_summary(summary: &ScanSummary) {
    println!("Log: {}", summary.log_path.display());
    println!("Steps: {}", summary.steps);
    if summary.records.is_empty() {
        println!("No unmapped entities found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Kind"),
        header_cell("Document"),
        header_cell("Entities"),
        header_cell("Target file"),
    ]);
    apply_table_style(&mut table);
    for record in &summary.records {
        table.add_row(vec![
            Cell::new(&record.step)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(record.kind),
            match &record.document {
                Some(document) => Cell::new(document),
                None => dim_cell("-"),
            },
            Cell::new(record.entities.join(", ")),
            Cell::new(record.map_file),
        ]);
    }
    println!("{table}");
}

fn step_cell(step: &StepSummary) -> Cell {
    if step.has_errors {
        Cell::new(&step.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(&step.name).fg(Color::DarkGrey)
    }
}

fn count_cell(value: usize) -> Cell {
    if value == 0 {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn total_cell(value: usize) -> Cell {
    count_cell(value).add_attribute(Attribute::Bold)
}

fn written_cell(written: bool) -> Cell {
    if written {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
