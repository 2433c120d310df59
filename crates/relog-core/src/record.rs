use crate::stats::Score;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Value of the `src` field on log lines emitted by the response-logging
/// middleware. Lines carrying any other tag belong to someone else and are
/// dropped during ingestion.
pub const SOURCE_TAG: &str = "rl";

/// One decoded log line.
///
/// Every field defaults to its zero value when absent, and unknown fields
/// (the `http_Nxx` category marker, extra header fields) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default, rename = "len")]
    pub length: i64,
    #[serde(default, rename = "ms")]
    pub milliseconds: i64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
}

impl LogRecord {
    /// Whether this record was emitted by the response-logging middleware.
    pub fn is_instrumented(&self) -> bool {
        self.src == SOURCE_TAG
    }
}

impl Score for LogRecord {
    fn score(&self) -> i64 {
        self.milliseconds
    }
}
