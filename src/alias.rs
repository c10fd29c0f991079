use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::symlink;
#[cfg(windows)]
use std::os::windows::fs::symlink_file as symlink;

use crate::error::{Error, Result};
use crate::fs_util;

/// Points the stable alias at `target`.
///
/// The link is created under a temporary name beside the target and renamed
/// over the alias path, so readers never observe a missing or half-written
/// alias.
pub(crate) fn install(alias: &Path, target: &Path) -> Result<()> {
  let dest = link_destination(alias, target)?;

  let temp = fs_util::sibling_artifact(target, ".symlink");
  symlink(&dest, &temp).map_err(|e| Error::Symlink {
    path: temp.clone(),
    source: e,
  })?;

  if let Some(dir) = alias.parent() {
    if !dir.as_os_str().is_empty() && !dir.exists() {
      fs::create_dir_all(dir).map_err(|e| Error::CreateDir {
        path: dir.to_path_buf(),
        source: e,
      })?;
    }
  }

  fs::rename(&temp, alias).map_err(|e| Error::Rename {
    from: temp,
    to: alias.to_path_buf(),
    source: e,
  })
}

/// Chooses what the alias should point at.
///
/// A relative destination survives moving the whole tree, so it is preferred
/// whenever the alias directory is an ancestor or descendant of the target's
/// directory; anything else gets the absolute target path.
fn link_destination(alias: &Path, target: &Path) -> Result<PathBuf> {
  let alias_dir = alias.parent().unwrap_or(Path::new(""));
  let target_dir = target.parent().unwrap_or(Path::new(""));

  // Alias directory is an ancestor of (or equal to) the target's directory.
  if let Ok(below) = target.strip_prefix(alias_dir) {
    return Ok(below.to_path_buf());
  }

  // Alias sits below the target's directory; climb back up.
  if let Ok(extra) = alias_dir.strip_prefix(target_dir) {
    let mut dest = PathBuf::new();
    for _ in extra.components() {
      dest.push("..");
    }
    if let Some(name) = target.file_name() {
      dest.push(name);
    }
    return Ok(dest);
  }

  std::path::absolute(target).map_err(|e| Error::Resolve {
    path: target.to_path_buf(),
    source: e,
  })
}
