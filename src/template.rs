use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Substitution table for the filename pattern.
///
/// The order is a fixed, explicit sequence so overlapping or prefix-sharing
/// tokens always render the same way; each token is replaced with the
/// formatted value itself, never with a chrono format string, so `%` in user
/// text passes through untouched.
const TOKEN_FORMATS: &[(&str, &str)] = &[
  ("{{YYYY}}", "%Y"),
  ("{{MM}}", "%m"),
  ("{{DD}}", "%d"),
  ("{{hh}}", "%H"),
  ("{{mm}}", "%M"),
  ("{{ss}}", "%S"),
];

// Time tokens and `*` runs both collapse into single glob wildcards for the
// retention scan.
static WILDCARD_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
  vec![
    Regex::new(r"\{\{[^}]+\}\}").unwrap(),
    Regex::new(r"\*+").unwrap(),
  ]
});

/// Renders the time-bucket base filename for `now`.
pub(crate) fn bucket_base(pattern: &str, interval: Duration, now: DateTime<FixedOffset>) -> String {
  let bucket = truncate_wall_clock(now, interval);

  let mut rendered = pattern.to_string();
  for (token, format) in TOKEN_FORMATS {
    if rendered.contains(token) {
      let value = bucket.format(format).to_string();
      rendered = rendered.replace(token, &value);
    }
  }

  rendered
}

/// Truncates the clock reading to the rotation interval.
///
/// The wall-clock components are re-interpreted as UTC before truncating, so a
/// local-zone clock crossing a daylight-saving transition cannot shift the
/// bucket boundary. A zero interval leaves the instant untouched.
fn truncate_wall_clock(now: DateTime<FixedOffset>, interval: Duration) -> NaiveDateTime {
  let wall = now.naive_local();
  let secs = interval.as_secs() as i64;
  if secs <= 0 {
    return wall;
  }

  let ts = wall.and_utc().timestamp();
  let truncated = ts - ts.rem_euclid(secs);
  match DateTime::from_timestamp(truncated, 0) {
    Some(dt) => dt.naive_utc(),
    None => wall,
  }
}

/// Collapses the filename pattern into the glob pattern used by the retention
/// scan.
pub(crate) fn retention_pattern(pattern: &str) -> String {
  let mut collapsed = pattern.to_string();
  for re in WILDCARD_REGEXES.iter() {
    collapsed = re.replace_all(&collapsed, "*").into_owned();
  }
  collapsed
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use chrono::Utc;
  use pretty_assertions::assert_eq;

  fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    Utc
      .with_ymd_and_hms(y, mo, d, h, mi, s)
      .unwrap()
      .fixed_offset()
  }

  #[test]
  fn renders_all_tokens() {
    let now = at(2024, 3, 7, 16, 45, 12);
    let base = bucket_base(
      "logs/{{YYYY}}-{{MM}}-{{DD}}_{{hh}}-{{mm}}-{{ss}}",
      Duration::from_secs(1),
      now,
    );
    assert_eq!(base, "logs/2024-03-07_16-45-12");
  }

  #[test]
  fn truncates_to_the_interval() {
    let now = at(2024, 3, 7, 16, 45, 12);
    let base = bucket_base("app-{{hh}}{{mm}}", Duration::from_secs(3600), now);
    assert_eq!(base, "app-1600");
  }

  #[test]
  fn rendering_is_deterministic() {
    let now = at(2024, 3, 7, 16, 45, 12);
    let pattern = "x/{{YYYY}}{{MM}}{{DD}}{{hh}}";
    let interval = Duration::from_secs(86400);
    assert_eq!(
      bucket_base(pattern, interval, now),
      bucket_base(pattern, interval, now)
    );
  }

  #[test]
  fn zero_interval_skips_truncation() {
    let now = at(2024, 3, 7, 16, 45, 12);
    let base = bucket_base("{{hh}}{{mm}}{{ss}}", Duration::ZERO, now);
    assert_eq!(base, "164512");
  }

  #[test]
  fn offset_clock_buckets_on_wall_clock_day() {
    // 00:30 on the 8th in +01:00 is still 23:30 UTC on the 7th; the bucket
    // must follow what the clock reports, not the UTC instant behind it.
    let now = FixedOffset::east_opt(3600)
      .unwrap()
      .with_ymd_and_hms(2024, 3, 8, 0, 30, 0)
      .unwrap();
    let base = bucket_base("day-{{DD}}", Duration::from_secs(86400), now);
    assert_eq!(base, "day-08");
  }

  #[test]
  fn tokens_and_star_runs_collapse_for_retention() {
    // Adjacent tokens leave adjacent `*`s, which the second pass collapses.
    assert_eq!(retention_pattern("logs/{{YYYY}}{{MM}}-app"), "logs/*-app");
    assert_eq!(retention_pattern("logs/{{YYYY}}-{{custom}}"), "logs/*-*");
    assert_eq!(retention_pattern("logs/***rest"), "logs/*rest");
  }

  #[test]
  fn percent_in_pattern_passes_through() {
    let now = at(2024, 3, 7, 16, 0, 0);
    let base = bucket_base("cpu-%d-{{DD}}", Duration::from_secs(86400), now);
    assert_eq!(base, "cpu-%d-07");
  }
}
