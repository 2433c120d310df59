use crate::record::LogRecord;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads newline-delimited JSON log events and keeps the ones emitted by the
/// response-logging middleware.
///
/// Ingestion is fail-fast: the first malformed line aborts the whole run with
/// [`Error::Decode`] carrying the 1-based line index, and no partial results
/// survive. Lines whose `src` tag belongs to another producer are dropped
/// silently after decoding.
pub struct LogIngestor;

impl LogIngestor {
    /// Read and decode a log file from the given path.
    pub fn from_file(path: &Path) -> Result<Vec<LogRecord>> {
        tracing::debug!("Reading log file from: {}", path.display());

        let file = File::open(path).map_err(|source| Error::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode log lines from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<LogRecord>> {
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(Error::Read)?;
            let record: LogRecord =
                serde_json::from_str(&line).map_err(|source| Error::Decode {
                    line: index + 1,
                    source,
                })?;
            if !record.is_instrumented() {
                continue;
            }
            records.push(record);
        }

        tracing::info!("Ingested {} instrumented log records", records.len());

        Ok(records)
    }

    /// Decode log lines held in a string.
    pub fn from_str(content: &str) -> Result<Vec<LogRecord>> {
        Self::from_reader(content.as_bytes())
    }
}
