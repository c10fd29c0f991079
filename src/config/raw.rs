use serde::Deserialize;

// Raw configuration as it appears on disk. Durations and sizes stay strings
// here; validation happens in `processed`.

fn default_mode() -> String {
  "both".to_string()
}

fn default_interval() -> String {
  "1h".to_string()
}

fn default_size_threshold() -> String {
  "10MB".to_string()
}

fn default_max_age() -> String {
  "7d".to_string()
}

fn default_max_backups() -> u32 {
  30
}

fn default_clock() -> String {
  "local".to_string()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigRaw {
  /// Filename pattern with `{{YYYY}}`-style time tokens.
  pub pattern: String,
  /// What triggers rotation: "time", "size", or "both".
  #[serde(default = "default_mode")]
  pub mode: String,
  /// Rotation interval, e.g. "1h" or "24h".
  #[serde(default = "default_interval")]
  pub interval: String,
  /// Size a file may reach before the generation bumps, e.g. "10MB".
  #[serde(default = "default_size_threshold")]
  pub size_threshold: String,
  /// Matched files modified earlier than now minus this are deleted.
  /// "0" or "off" disables age-based retention.
  #[serde(default = "default_max_age")]
  pub max_age: String,
  /// Number of non-expired matched files kept. 0 disables the count limit.
  #[serde(default = "default_max_backups")]
  pub max_backups: u32,
  /// Appended verbatim to every rendered filename, e.g. ".log".
  #[serde(default)]
  pub suffix: String,
  /// Stable alias path kept pointing at the active file.
  #[serde(default)]
  pub alias: Option<String>,
  /// Which wall clock drives bucketing: "local" or "utc".
  #[serde(default = "default_clock")]
  pub clock: String,
}
