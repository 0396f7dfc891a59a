use csv::WriterBuilder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::matrix::{Cell, MatrixView};
use crate::model::ShiftCode;

/// Text shown in a cell; empty when there is no shift
///
/// The `K_WHITE` position only changes the cell color, the code is unchanged.
pub fn cell_text(cell: Option<&Cell>) -> String {
    cell.map(|c| c.code.to_string()).unwrap_or_default()
}

/// Codes that get a count column: every known code, then unknown ones seen this month
pub fn count_columns(view: &MatrixView) -> Vec<ShiftCode> {
    let mut columns: Vec<ShiftCode> = ShiftCode::KNOWN.to_vec();
    columns.sort_by_key(|code| code.priority());
    let extra: BTreeSet<ShiftCode> = view
        .rows
        .iter()
        .flat_map(|row| row.summary.counts.keys())
        .filter(|code| matches!(code, ShiftCode::Other(_)))
        .cloned()
        .collect();
    columns.extend(extra);
    columns
}

/// Writes the matrix as CSV: one row per staff member in display order
pub fn write_matrix_csv<W: Write>(view: &MatrixView, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    let columns = count_columns(view);

    let mut header: Vec<String> = vec!["Mã NV".to_string(), "Họ tên".to_string()];
    header.extend(view.days.iter().map(|d| d.day.to_string()));
    header.extend(columns.iter().map(|c| c.to_string()));
    header.extend(["Công", "Ngày", "Đêm"].iter().map(|s| s.to_string()));
    wtr.write_record(&header)?;

    for row in &view.rows {
        let mut record: Vec<String> = vec![row.code.clone(), row.staff.name.clone()];
        record.extend(row.cells.iter().map(|cell| cell_text(cell.as_ref())));
        record.extend(columns.iter().map(|code| row.summary.count(code).to_string()));
        record.push(format!("{:.2}", row.summary.credit));
        record.push(row.summary.day_count.to_string());
        record.push(row.summary.night_count.to_string());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_matrix_to_file(view: &MatrixView, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_matrix_csv(view, file)
}

/// Prints the matrix and its validation results
pub fn print_matrix(view: &MatrixView) {
    println!("\n=== Lịch trực {:02}/{} ===", view.month, view.year);
    println!("Working days: {}", view.working_days);

    let mut header = format!("{:<8} {:<20}", "Code", "Name");
    for day in &view.days {
        header.push_str(&format!(" {:>3}", day.day));
    }
    header.push_str("  Credit  Day Night");
    println!("{}", header);

    for row in &view.rows {
        let mut line = format!("{:<8} {:<20}", row.code, row.staff.name);
        for cell in &row.cells {
            let text = cell_text(cell.as_ref());
            line.push_str(&format!(" {:>3}", if text.is_empty() { "-".to_string() } else { text }));
        }
        line.push_str(&format!(
            "  {:>6.2} {:>4} {:>5}",
            row.summary.credit, row.summary.day_count, row.summary.night_count
        ));
        println!("{}", line);
    }

    let mut td_line = format!("{:<29}", "TD total");
    let mut pgd_line = format!("{:<29}", "PGD total");
    for totals in view.day_totals.values() {
        td_line.push_str(&format!(" {:>3}", totals.td.total));
        pgd_line.push_str(&format!(" {:>3}", totals.pgd.total));
    }
    println!("{}", td_line);
    println!("{}", pgd_line);

    let report = &view.leader_report;
    if !report.leader_errors.is_empty() {
        let days: Vec<String> = report
            .leader_errors
            .iter()
            .map(|e| format!("{} ({})", e.day, e.count))
            .collect();
        println!("⚠️  Days without exactly one day leader: {}", days.join(", "));
    }
    if report.has_leader_dup {
        println!("⚠️  Duplicate leaders detected");
    }
    if !view.duplicate_assignments.is_empty() {
        println!("⚠️  Duplicate assignment rows ({}):", view.duplicate_assignments.len());
        for key in &view.duplicate_assignments {
            println!("  - {}", key);
        }
    }
}
