// Configuration parsing and validation.

pub mod raw; // Structs directly mapping to the YAML structure
mod processed; // Validated configuration handed to the rotator

pub use processed::{RotateMode, RotatorConfig};
pub(crate) use processed::process_raw_config;

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Loads and validates a YAML configuration file, yielding the filename
/// pattern and the processed config.
pub(crate) fn load(path: &Path) -> Result<(String, RotatorConfig)> {
  let file = File::open(path).map_err(|e| Error::ConfigRead {
    path: path.to_path_buf(),
    source: e,
  })?;
  let reader = io::BufReader::new(file);
  let raw: raw::ConfigRaw =
    serde_yaml::from_reader(reader).map_err(|e| Error::ConfigParse(e.to_string()))?;

  process_raw_config(raw)
}
