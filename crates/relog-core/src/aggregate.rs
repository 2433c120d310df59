use crate::pattern;
use crate::record::LogRecord;
use crate::stats;
use serde::Serialize;
use std::collections::HashMap;

/// Method label used when a record carries no HTTP method.
pub const DEFAULT_METHOD: &str = "HTTP";

/// Composite grouping key: HTTP method plus normalized path template.
///
/// Two records with different raw paths collapse into the same key when their
/// extracted templates match. Keeping the parts separate (rather than a
/// pre-joined string) rules out collisions from ad-hoc formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternKey {
    pub method: String,
    pub pattern: String,
}

impl PatternKey {
    /// Derive the key for a record: the record's method verbatim when
    /// non-empty, the literal `"HTTP"` otherwise, plus the extracted template.
    pub fn for_record(record: &LogRecord) -> Self {
        let method = if record.method.is_empty() {
            DEFAULT_METHOD
        } else {
            &record.method
        };
        PatternKey {
            method: method.to_string(),
            pattern: pattern::extract(&record.path),
        }
    }

    /// Render the key as `"<METHOD> <template>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.pattern)
    }
}

/// Aggregated statistics for one (method, pattern) group.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub url: String,
    pub count: usize,
    pub sum: i64,
    pub average: f64,
}

/// Group records by (method, pattern) and compute per-group latency stats.
///
/// One row per distinct key observed. Row order follows hash map iteration
/// and is unspecified; callers that need deterministic output must sort the
/// returned rows themselves.
pub fn aggregate(records: &[LogRecord]) -> Vec<SummaryRow> {
    let mut buckets: HashMap<PatternKey, Vec<LogRecord>> = HashMap::new();
    for record in records {
        buckets
            .entry(PatternKey::for_record(record))
            .or_default()
            .push(record.clone());
    }

    tracing::debug!(
        "Aggregated {} records into {} pattern groups",
        records.len(),
        buckets.len()
    );

    buckets
        .into_iter()
        .map(|(key, group)| SummaryRow {
            url: key.label(),
            count: group.len(),
            sum: stats::sum(&group),
            average: stats::average(&group),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(method: &str, path: &str, ms: i64) -> LogRecord {
        serde_json::from_str(&format!(
            r#"{{"src":"rl","method":"{method}","path":"{path}","ms":{ms}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_records_with_same_template_collapse() {
        let records = [record("GET", "/a/1", 10), record("GET", "/a/2", 30)];
        let rows = aggregate(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "GET /a/{integer}");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].sum, 40);
        assert_eq!(rows[0].average, 20.0);
    }

    #[test]
    fn test_methods_are_grouped_separately() {
        let records = [record("GET", "/a/1", 10), record("POST", "/a/1", 30)];
        let mut rows = aggregate(&records);
        rows.sort_by(|a, b| a.url.cmp(&b.url));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "GET /a/{integer}");
        assert_eq!(rows[1].url, "POST /a/{integer}");
    }

    #[test]
    fn test_missing_method_uses_default_label() {
        let records = [record("", "/a", 10), record("", "/a", 20)];
        let rows = aggregate(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "HTTP /a");
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_uuid_paths_collapse() {
        let records = [
            record("GET", "/user/ded4c637-8fed-4ac2-9215-4b41294febef/orders", 5),
            record("GET", "/user/11111111-2222-3333-4444-555555555555/orders", 7),
        ];
        let rows = aggregate(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "GET /user/{uuid}/orders");
        assert_eq!(rows[0].sum, 12);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_pattern_key_label() {
        let key = PatternKey {
            method: "GET".to_string(),
            pattern: "/a/{integer}".to_string(),
        };
        assert_eq!(key.label(), "GET /a/{integer}");
    }
}
