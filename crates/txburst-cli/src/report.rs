//! Rendering of a run's results as a table or JSON.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use txburst_core::{RunSummary, TaskRecord};

use crate::networks::Network;

const HEADERS: [&str; 6] = ["#", "Started", "Ended", "Duration (ms)", "Hash", "Error"];

/// One table row, already formatted. Row numbers are 1-based.
fn row(record: &TaskRecord) -> [String; 6] {
    [
        (record.index + 1).to_string(),
        time(record.started_at),
        record.ended_at().map(time).unwrap_or_else(dash),
        record
            .duration()
            .map(|d| d.num_milliseconds().to_string())
            .unwrap_or_else(dash),
        record
            .result_handle()
            .map(|h| h.to_string())
            .unwrap_or_else(dash),
        record
            .failure_message()
            .map(str::to_string)
            .unwrap_or_else(dash),
    ]
}

fn time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S%.3f").to_string()
}

fn dash() -> String {
    "-".to_string()
}

pub fn render_table(records: &[TaskRecord]) -> String {
    if records.is_empty() {
        return "No results yet.\n".to_string();
    }

    let rows: Vec<[String; 6]> = records.iter().map(row).collect();
    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for r in &rows {
        push_line(&mut out, r, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(flatten)]
    record: &'a TaskRecord,
    duration_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explorer_url: Option<String>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    results: Vec<JsonRecord<'a>>,
}

pub fn render_json(
    summary: &RunSummary,
    records: &[TaskRecord],
    network: &Network,
) -> serde_json::Result<String> {
    let results = records
        .iter()
        .map(|record| JsonRecord {
            record,
            duration_ms: record.duration().map(|d| d.num_milliseconds()),
            explorer_url: network.explorer_link(record.result_handle().map(|h| h.as_str())),
        })
        .collect();
    serde_json::to_string_pretty(&JsonReport { summary, results })
}

/// Explorer links for the successful rows, one per line.
pub fn render_links(records: &[TaskRecord], network: &Network) -> String {
    let mut out = String::new();
    for record in records {
        if let Some(link) = network.explorer_link(record.result_handle().map(|h| h.as_str())) {
            out.push_str(&format!("{:>4}  {link}\n", record.index + 1));
        }
    }
    out
}
