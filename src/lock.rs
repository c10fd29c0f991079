use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs_util;

/// Best-effort cross-process exclusivity marker for the alias/cleanup phase.
///
/// Acquisition is an exclusive create of `<target>.lock`. This is a
/// cooperative convention on a side file, not an OS advisory lock: two
/// instances can both observe "no marker" and proceed concurrently. The marker
/// is removed when the guard drops, success or failure, so it can never leak
/// past the phase.
pub(crate) struct RotateLock {
  path: PathBuf,
}

impl RotateLock {
  /// Tries to take the marker for `target`. Returns `None` when another
  /// instance already holds it; the caller skips the phase for this cycle.
  pub(crate) fn acquire(target: &Path) -> Result<Option<Self>> {
    let path = fs_util::sibling_artifact(target, ".lock");
    match OpenOptions::new().write(true).create_new(true).open(&path) {
      Ok(_) => Ok(Some(Self { path })),
      Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
      Err(e) => Err(Error::Lock { path, source: e }),
    }
  }
}

impl Drop for RotateLock {
  fn drop(&mut self) {
    let _ = std::fs::remove_file(&self.path);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn acquire_creates_and_drop_removes_marker() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("app.log");
    let marker = dir.path().join("app.log.lock");

    let guard = RotateLock::acquire(&target).unwrap();
    assert!(guard.is_some());
    assert!(marker.exists());

    drop(guard);
    assert!(!marker.exists());
  }

  #[test]
  fn second_acquire_yields_none_while_held() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("app.log");

    let first = RotateLock::acquire(&target).unwrap();
    assert!(first.is_some());
    assert!(RotateLock::acquire(&target).unwrap().is_none());

    drop(first);
    assert!(RotateLock::acquire(&target).unwrap().is_some());
  }

  #[test]
  fn stale_marker_blocks_until_removed() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("app.log");
    std::fs::write(dir.path().join("app.log.lock"), b"").unwrap();

    assert!(RotateLock::acquire(&target).unwrap().is_none());

    std::fs::remove_file(dir.path().join("app.log.lock")).unwrap();
    assert!(RotateLock::acquire(&target).unwrap().is_some());
  }
}
