use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, LocalClock, UtcClock};
use crate::config::raw::ConfigRaw;
use crate::error::{Error, Result};

/// Which signals trigger rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateMode {
  Time,
  Size,
  Both,
}

impl RotateMode {
  pub(crate) fn on_time(self) -> bool {
    matches!(self, RotateMode::Time | RotateMode::Both)
  }

  pub(crate) fn on_size(self) -> bool {
    matches!(self, RotateMode::Size | RotateMode::Both)
  }
}

/// Immutable construction-time configuration for a [`FileRotator`].
///
/// Built either with the `with_*` methods below or from a YAML file via
/// [`FileRotator::from_config_file`]. Once handed to the constructor it never
/// changes.
///
/// [`FileRotator`]: crate::FileRotator
/// [`FileRotator::from_config_file`]: crate::FileRotator::from_config_file
#[derive(Clone)]
pub struct RotatorConfig {
  pub(crate) clock: Arc<dyn Clock>,
  pub(crate) mode: RotateMode,
  pub(crate) interval: Duration,
  pub(crate) size_threshold: u64,
  pub(crate) max_age: Duration,
  pub(crate) max_backups: u32,
  pub(crate) suffix: String,
  pub(crate) alias: Option<PathBuf>,
}

impl std::fmt::Debug for RotatorConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RotatorConfig")
      .field("clock", &"<dyn Clock>")
      .field("mode", &self.mode)
      .field("interval", &self.interval)
      .field("size_threshold", &self.size_threshold)
      .field("max_age", &self.max_age)
      .field("max_backups", &self.max_backups)
      .field("suffix", &self.suffix)
      .field("alias", &self.alias)
      .finish()
  }
}

impl Default for RotatorConfig {
  fn default() -> Self {
    Self {
      clock: Arc::new(LocalClock),
      mode: RotateMode::Both,
      interval: Duration::from_secs(60 * 60),
      size_threshold: 10 * 1024 * 1024,
      max_age: Duration::from_secs(7 * 24 * 60 * 60),
      max_backups: 30,
      suffix: String::new(),
      alias: None,
    }
  }
}

impl RotatorConfig {
  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn with_mode(mut self, mode: RotateMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn with_interval(mut self, interval: Duration) -> Self {
    self.interval = interval;
    self
  }

  pub fn with_size_threshold(mut self, bytes: u64) -> Self {
    self.size_threshold = bytes;
    self
  }

  /// Zero disables age-based retention.
  pub fn with_max_age(mut self, max_age: Duration) -> Self {
    self.max_age = max_age;
    self
  }

  /// Zero disables the count limit.
  pub fn with_max_backups(mut self, count: u32) -> Self {
    self.max_backups = count;
    self
  }

  /// Appended verbatim to every rendered filename; include the leading dot
  /// (e.g. `".log"`) if one is wanted.
  pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
    self.suffix = suffix.into();
    self
  }

  pub fn with_alias<P: Into<PathBuf>>(mut self, alias: P) -> Self {
    self.alias = Some(alias.into());
    self
  }
}

/// Validates the raw configuration into the pattern and a [`RotatorConfig`].
pub(crate) fn process_raw_config(raw: ConfigRaw) -> Result<(String, RotatorConfig)> {
  if raw.pattern.is_empty() {
    return Err(Error::InvalidConfigValue {
      field: "pattern".to_string(),
      message: "Filename pattern cannot be empty.".to_string(),
    });
  }

  let mode = match raw.mode.to_ascii_lowercase().as_str() {
    "time" => RotateMode::Time,
    "size" => RotateMode::Size,
    "both" => RotateMode::Both,
    other => {
      return Err(Error::InvalidConfigValue {
        field: "mode".to_string(),
        message: format!("Unknown mode '{}'. Expected 'time', 'size', or 'both'.", other),
      })
    }
  };

  let clock: Arc<dyn Clock> = match raw.clock.to_ascii_lowercase().as_str() {
    "local" => Arc::new(LocalClock),
    "utc" => Arc::new(UtcClock),
    other => {
      return Err(Error::InvalidConfigValue {
        field: "clock".to_string(),
        message: format!("Unknown clock '{}'. Expected 'local' or 'utc'.", other),
      })
    }
  };

  let interval = parse_duration(&raw.interval, "interval")?;
  let max_age = parse_duration(&raw.max_age, "max_age")?;
  let size_threshold = parse_size(&raw.size_threshold, "size_threshold")?;

  let config = RotatorConfig {
    clock,
    mode,
    interval,
    size_threshold,
    max_age,
    max_backups: raw.max_backups,
    suffix: raw.suffix,
    alias: raw.alias.map(PathBuf::from),
  };

  Ok((raw.pattern, config))
}

fn parse_duration(value: &str, field: &str) -> Result<Duration> {
  let trimmed = value.trim();
  if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("off") {
    return Ok(Duration::ZERO);
  }

  humantime::parse_duration(trimmed).map_err(|e| Error::InvalidConfigValue {
    field: field.to_string(),
    message: format!("'{}' is not a valid duration: {}", trimmed, e),
  })
}

fn parse_size(value: &str, field: &str) -> Result<u64> {
  let trimmed = value.trim();
  let split = trimmed
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(trimmed.len());
  let (digits, unit) = trimmed.split_at(split);

  let number: u64 = digits.parse().map_err(|_| Error::InvalidConfigValue {
    field: field.to_string(),
    message: format!("'{}' must start with a byte count.", trimmed),
  })?;

  let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
    "" | "B" => 1,
    "KB" => 1024,
    "MB" => 1024 * 1024,
    "GB" => 1024 * 1024 * 1024,
    other => {
      return Err(Error::InvalidConfigValue {
        field: field.to_string(),
        message: format!("Unknown size unit '{}'. Expected B, KB, MB, or GB.", other),
      })
    }
  };

  number
    .checked_mul(multiplier)
    .ok_or_else(|| Error::InvalidConfigValue {
      field: field.to_string(),
      message: format!("'{}' overflows a byte count.", trimmed),
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw_with(pattern: &str) -> ConfigRaw {
    serde_yaml::from_str(&format!("pattern: \"{}\"", pattern)).unwrap()
  }

  #[test]
  fn defaults_mirror_the_builder() {
    let (pattern, config) = process_raw_config(raw_with("logs/app-{{YYYY}}{{MM}}{{DD}}")).unwrap();
    let defaults = RotatorConfig::default();

    assert_eq!(pattern, "logs/app-{{YYYY}}{{MM}}{{DD}}");
    assert_eq!(config.mode, defaults.mode);
    assert_eq!(config.interval, defaults.interval);
    assert_eq!(config.size_threshold, defaults.size_threshold);
    assert_eq!(config.max_age, defaults.max_age);
    assert_eq!(config.max_backups, defaults.max_backups);
    assert_eq!(config.suffix, defaults.suffix);
    assert_eq!(config.alias, defaults.alias);
  }

  #[test]
  fn parse_size_accepts_units() {
    assert_eq!(parse_size("512", "t").unwrap(), 512);
    assert_eq!(parse_size("512B", "t").unwrap(), 512);
    assert_eq!(parse_size("4KB", "t").unwrap(), 4 * 1024);
    assert_eq!(parse_size("10MB", "t").unwrap(), 10 * 1024 * 1024);
    assert_eq!(parse_size("1GB", "t").unwrap(), 1024 * 1024 * 1024);
    assert_eq!(parse_size(" 2 MB ", "t").unwrap(), 2 * 1024 * 1024);
  }

  #[test]
  fn parse_size_rejects_garbage() {
    assert!(parse_size("MB", "t").is_err());
    assert!(parse_size("10XB", "t").is_err());
    assert!(parse_size("", "t").is_err());
  }

  #[test]
  fn parse_duration_supports_off() {
    assert_eq!(parse_duration("off", "t").unwrap(), Duration::ZERO);
    assert_eq!(parse_duration("0", "t").unwrap(), Duration::ZERO);
    assert_eq!(parse_duration("90m", "t").unwrap(), Duration::from_secs(5400));
    assert!(parse_duration("soon", "t").is_err());
  }

  #[test]
  fn unknown_mode_is_rejected_with_field() {
    let mut raw = raw_with("app");
    raw.mode = "weekly".to_string();
    let err = process_raw_config(raw).unwrap_err();
    if let Error::InvalidConfigValue { field, message } = err {
      assert_eq!(field, "mode");
      assert!(message.contains("weekly"));
    } else {
      panic!("Expected InvalidConfigValue error");
    }
  }

  #[test]
  fn empty_pattern_is_rejected() {
    let raw = raw_with("");
    assert!(process_raw_config(raw).is_err());
  }

  #[test]
  fn full_yaml_document_round_trips() {
    let raw: ConfigRaw = serde_yaml::from_str(
      r#"
pattern: "logs/app-{{YYYY}}{{MM}}{{DD}}"
mode: time
interval: 24h
size_threshold: 100B
max_age: off
max_backups: 2
suffix: ".log"
alias: "logs/app.log"
clock: utc
"#,
    )
    .unwrap();

    let (pattern, config) = process_raw_config(raw).unwrap();
    assert_eq!(pattern, "logs/app-{{YYYY}}{{MM}}{{DD}}");
    assert_eq!(config.mode, RotateMode::Time);
    assert_eq!(config.interval, Duration::from_secs(86400));
    assert_eq!(config.size_threshold, 100);
    assert_eq!(config.max_age, Duration::ZERO);
    assert_eq!(config.max_backups, 2);
    assert_eq!(config.suffix, ".log");
    assert_eq!(config.alias, Some(PathBuf::from("logs/app.log")));
  }
}
