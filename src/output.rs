//! Terminal and file output.

use chrono::{DateTime, SecondsFormat, Utc};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};

use crate::escape::escape_csv_field;
use crate::model::{ListRow, PolicyChange, ReportKey, ReportRow, UpcomingRow};

/// Header row of an export file.
pub const CSV_HEADER: &str = "id,effective_date,category,impact_level,title,owner,notes,created_at";

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// A column-aligned text table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: String,
    pub separator: String,
    pub rows: Vec<String>,
}

impl Table {
    /// Lay out `rows` under `headers`, padding each column to its widest cell.
    pub fn new(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = layout_line(headers.iter().copied(), &widths);
        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        let rows = rows
            .iter()
            .map(|row| layout_line(row.iter().map(String::as_str), &widths))
            .collect();

        Self {
            header,
            separator,
            rows,
        }
    }

    /// Print to stdout.
    pub fn print(&self) {
        println!("{}", self.header.white().bold());
        println!("{}", self.separator.dimmed());
        for row in &self.rows {
            println!("{}", row);
        }
        println!();
        println!("{} row(s) returned", self.rows.len().to_string().cyan());
    }
}

fn layout_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

/// Table for `list`.
pub fn list_table(rows: &[ListRow]) -> Table {
    Table::new(
        &["ID", "Effective", "Category", "Impact", "Title", "Owner"],
        rows.iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.effective_date.to_string(),
                    r.category.clone(),
                    r.impact_level.clone(),
                    r.title.clone(),
                    r.owner.clone(),
                ]
            })
            .collect(),
    )
}

/// Table for `upcoming`.
pub fn upcoming_table(rows: &[UpcomingRow]) -> Table {
    Table::new(
        &["ID", "Effective", "Days Until", "Category", "Impact", "Title", "Owner"],
        rows.iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.effective_date.to_string(),
                    r.days_until.to_string(),
                    r.category.clone(),
                    r.impact_level.clone(),
                    r.title.clone(),
                    r.owner.clone(),
                ]
            })
            .collect(),
    )
}

/// Table for `report`.
pub fn report_table(key: ReportKey, rows: &[ReportRow]) -> Table {
    Table::new(
        &[key.label(), "Count"],
        rows.iter()
            .map(|r| vec![r.key.clone(), r.count.to_string()])
            .collect(),
    )
}

/// Detail lines for `show`.
pub fn detail_lines(change: &PolicyChange) -> Vec<String> {
    vec![
        format!("ID: {}", change.id),
        format!("Title: {}", change.title),
        format!("Category: {}", change.category),
        format!("Impact: {}", change.impact_level),
        format!("Effective: {}", change.effective_date),
        format!("Owner: {}", change.owner),
        format!("Notes: {}", change.notes),
        format!("Created: {}", format_timestamp(&change.created_at)),
    ]
}

/// Pretty-printed JSON for any result set.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Timestamps as RFC 3339 in UTC, second precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Write a header line followed by one escaped CSV line per policy change.
pub fn write_csv<W: Write>(mut out: W, rows: &[PolicyChange]) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for row in rows {
        let fields = [
            row.effective_date.to_string(),
            row.category.clone(),
            row.impact_level.clone(),
            row.title.clone(),
            row.owner.clone(),
            row.notes.clone(),
            format_timestamp(&row.created_at),
        ];
        write!(out, "{}", row.id)?;
        for field in &fields {
            write!(out, ",{}", escape_csv_field(field))?;
        }
        writeln!(out)?;
    }
    out.flush()
}
