use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Opens `path` for appending, creating it and its parent directories when
/// missing.
pub(crate) fn open_append(path: &Path) -> Result<File> {
  if let Some(dir) = path.parent() {
    if !dir.as_os_str().is_empty() && !dir.exists() {
      std::fs::create_dir_all(dir).map_err(|e| Error::CreateDir {
        path: dir.to_path_buf(),
        source: e,
      })?;
    }
  }

  OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .map_err(|e| Error::Open {
      path: path.to_path_buf(),
      source: e,
    })
}

/// Builds a control-artifact path beside `path` by appending `suffix` to the
/// whole file name: `logs/app.log` + `.lock` -> `logs/app.log.lock`.
pub(crate) fn sibling_artifact(path: &Path, suffix: &str) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(suffix);
  PathBuf::from(name)
}
