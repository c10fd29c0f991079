use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::RotatorConfig;
use crate::error::{Error, Result};

/// One file considered by a cleanup pass. Built fresh per pass, discarded
/// afterwards.
struct CandidateFile {
  path: PathBuf,
  modified: DateTime<Utc>,
  marked: bool,
}

/// Runs one retention pass over the expanded pattern.
///
/// Enumeration and the deletion decision happen synchronously; the actual
/// unlinks run on a detached thread so the writer never waits on deletion
/// latency.
pub(crate) fn sweep(pattern: &str, config: &RotatorConfig) -> Result<()> {
  let doomed = plan(pattern, config)?;
  if doomed.is_empty() {
    return Ok(());
  }

  // TODO: surface deletion failures through an observability hook instead of
  // dropping them here.
  thread::spawn(move || {
    for path in doomed {
      let _ = fs::remove_file(&path);
    }
  });

  Ok(())
}

/// Decides which matched files violate the age or count limits.
fn plan(pattern: &str, config: &RotatorConfig) -> Result<Vec<PathBuf>> {
  let entries = glob::glob(pattern).map_err(|e| Error::Scan {
    pattern: pattern.to_string(),
    source: e,
  })?;

  let mut candidates: Vec<CandidateFile> = Vec::new();
  for entry in entries {
    let Ok(path) = entry else { continue };
    if is_control_artifact(&path) {
      continue;
    }

    // Lstat, not stat: the alias must never be treated as a data file.
    let Ok(meta) = fs::symlink_metadata(&path) else {
      continue;
    };
    if meta.file_type().is_symlink() {
      continue;
    }
    let Ok(modified) = meta.modified() else {
      continue;
    };

    candidates.push(CandidateFile {
      path,
      modified: modified.into(),
      marked: false,
    });
  }

  let now = config.clock.now().with_timezone(&Utc);
  if !config.max_age.is_zero() {
    let cutoff = now - TimeDelta::from_std(config.max_age).unwrap_or(TimeDelta::MAX);
    for candidate in candidates.iter_mut() {
      if candidate.modified < cutoff {
        candidate.marked = true;
      }
    }
  }

  let mut survivors = candidates.iter().filter(|c| !c.marked).count();
  let max_backups = config.max_backups as usize;
  if max_backups > 0 && survivors > max_backups {
    // Oldest first, so the count limit always evicts the least recent files.
    candidates.sort_by_key(|c| c.modified);
    for candidate in candidates.iter_mut() {
      if survivors <= max_backups {
        break;
      }
      if candidate.marked {
        continue;
      }
      candidate.marked = true;
      survivors -= 1;
    }
  }

  Ok(
    candidates
      .into_iter()
      .filter(|c| c.marked)
      .map(|c| c.path)
      .collect(),
  )
}

fn is_control_artifact(path: &Path) -> bool {
  matches!(
    path.extension().and_then(|e| e.to_str()),
    Some("lock") | Some("symlink")
  )
}
