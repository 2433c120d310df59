use crate::OutputFormat;
use anyhow::Result;
use relog_core::aggregate::{self, SummaryRow};
use relog_core::ingest::LogIngestor;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

/// Ingest a log file (or stdin when `file` is `None`) and aggregate it into
/// summary rows.
///
/// The core leaves row order unspecified, so rows are sorted by URL label
/// here to keep the output deterministic run to run.
pub fn summarize(file: Option<&Path>) -> Result<Vec<SummaryRow>> {
    let records = match file {
        Some(path) => LogIngestor::from_file(path)?,
        None => LogIngestor::from_reader(io::stdin().lock())?,
    };

    let mut rows = aggregate::aggregate(&records);
    rows.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(rows)
}

pub fn execute(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    match file {
        Some(path) => tracing::info!("Summarizing log file: {}", path.display()),
        None => tracing::info!("Summarizing log stream from stdin"),
    }

    let rows = summarize(file)?;
    tracing::debug!("Rendering {} rows as {}", rows.len(), format.as_str());

    match format {
        OutputFormat::Json => output_json(&rows)?,
        OutputFormat::Pretty => output_pretty(&rows),
        OutputFormat::Csv => output_csv(&rows)?,
    }

    Ok(())
}

fn output_csv(rows: &[SummaryRow]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "URL,Count,Sum,Avg")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{:.2}",
            csv_field(&row.url),
            row.count,
            row.sum,
            row.average
        )?;
    }
    out.flush()?;

    Ok(())
}

/// Quote a CSV field when it contains a comma, quote, or newline.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn output_json(rows: &[SummaryRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    println!("{}", json);
    Ok(())
}

fn output_pretty(rows: &[SummaryRow]) {
    use console::style;

    println!("\n{}", style("Response Log Summary").bold().cyan());
    println!("{}", style("====================").cyan());

    if rows.is_empty() {
        println!("  No instrumented log records found.");
    }
    for row in rows {
        println!(
            "  {}  count={} sum={}ms avg={:.2}ms",
            style(&row.url).bold(),
            row.count,
            row.sum,
            row.average
        );
    }

    println!(); // trailing newline
}
