//! Small utility helpers used across modules.

use chrono::{DateTime, SecondsFormat, Utc};

/// Percent-encode a value for a query string or a single path segment.
/// Everything except ASCII alphanumerics and `-_.~` is escaped.
pub fn encode_component(value: &str) -> String {
  urlencoding::encode(value).into_owned()
}

/// ISO-8601 timestamp with microseconds and an explicit `+00:00` offset.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Append `key=value` pairs to a path, `?` before the first and `&` between the rest.
/// Values are percent-encoded; keys are expected to be plain ASCII.
pub fn append_query(base: &str, pairs: &[(&str, String)]) -> String {
  let mut out = base.to_string();
  for (i, (k, v)) in pairs.iter().enumerate() {
    out.push(if i == 0 { '?' } else { '&' });
    out.push_str(k);
    out.push('=');
    out.push_str(&encode_component(v));
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole chart payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
