use chrono::{DateTime, SecondsFormat, Utc};
use relog_core::record::SOURCE_TAG;
use std::fmt::Write;
use std::time::Duration;

/// Strip characters that have no place in a URL or JSON string.
///
/// Control characters (U+0000..=U+001F) are dropped outright; `"` and `\` are
/// backslash-escaped; everything else passes through untouched.
pub fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if (c as u32) <= 0x001F {
            continue;
        }
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Format one response log line.
///
/// The line carries the `src:"rl"` tag the offline processor filters on, an
/// `http_Nxx` category marker derived from the status code, and the byte
/// count and duration of the response. Extra fields are appended in the order
/// given. The result is newline-terminated.
pub fn json_log_message(
    time: DateTime<Utc>,
    method: &str,
    path: &str,
    status: u16,
    length: u64,
    duration: Duration,
    fields: &[(String, String)],
) -> String {
    let mut message = format!(
        "{{\"time\":\"{}\",\"src\":\"{}\",\"status\":{},\"http_{}xx\":1,\"len\":{},\"ms\":{},\"method\":\"{}\",\"path\":\"{}\"",
        time.to_rfc3339_opts(SecondsFormat::Secs, true),
        SOURCE_TAG,
        status,
        status / 100,
        length,
        duration.as_millis(),
        json_escape(method),
        json_escape(path),
    );
    for (name, value) in fields {
        let _ = write!(message, ",\"{name}\":\"{value}\"");
    }
    message.push_str("}\n");
    message
}
