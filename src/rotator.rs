use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::alias;
use crate::config::{self, RotatorConfig};
use crate::error::{Error, Result};
use crate::fs_util;
use crate::lock::RotateLock;
use crate::retention;
use crate::template;

/// Rotating append-only file writer.
///
/// Every write picks the physical file it should land in from the current
/// time bucket and the size of the candidate on disk, swapping the open
/// handle when the decision changes. The decision, the handle swap, the alias
/// update, and the retention scan all run under one exclusive critical
/// section per write; the only detached activity is the deletion thread spun
/// off by retention.
///
/// The rotator is also a [`std::io::Write`] (on both `FileRotator` and
/// `&FileRotator`), so it slots in wherever a logging framework expects a
/// writer.
pub struct FileRotator {
  pattern: String,
  retention_pattern: String,
  config: RotatorConfig,
  state: Mutex<RotatorState>,
}

/// Mutable rotation state. One instance, owned by the rotator, only ever
/// touched under the lock.
#[derive(Default)]
struct RotatorState {
  out: Option<File>,
  base: String,
  filename: Option<PathBuf>,
  generation: u32,
}

impl FileRotator {
  /// Creates a rotator writing to files rendered from `pattern`.
  pub fn new<S: Into<String>>(pattern: S, config: RotatorConfig) -> Result<Self> {
    let pattern = pattern.into();
    if pattern.is_empty() {
      return Err(Error::InvalidConfigValue {
        field: "pattern".to_string(),
        message: "Filename pattern cannot be empty.".to_string(),
      });
    }

    let retention_pattern = template::retention_pattern(&pattern);
    Ok(Self {
      pattern,
      retention_pattern,
      config,
      state: Mutex::new(RotatorState::default()),
    })
  }

  /// Creates a rotator from a YAML configuration file.
  pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let (pattern, config) = config::load(path.as_ref())?;
    Self::new(pattern, config)
  }

  /// Appends `bytes` to the currently selected rotated file, rotating first
  /// when the time bucket or the size threshold says so. Returns the number
  /// of bytes written.
  ///
  /// A write is never partially routed: it lands entirely in the previously
  /// active file (when the decision or the rotate phase fails) or entirely in
  /// the newly opened one.
  pub fn write(&self, bytes: &[u8]) -> Result<usize> {
    let mut state = self.state.lock();
    self.ensure_target(&mut state)?;

    let path = state.filename.clone().unwrap_or_default();
    let out = state.out.as_mut().expect("ensure_target installs a handle");
    out
      .write(bytes)
      .map_err(|e| Error::Append { path, source: e })
  }

  /// Flushes the open handle, if any.
  pub fn flush(&self) -> Result<()> {
    let mut state = self.state.lock();
    let path = state.filename.clone().unwrap_or_default();
    if let Some(out) = state.out.as_mut() {
      out
        .flush()
        .map_err(|e| Error::Append { path, source: e })?;
    }
    Ok(())
  }

  /// Syncs and releases the open handle. Closing an already-closed rotator is
  /// a no-op; a later write reopens through the normal decision path.
  pub fn close(&self) -> Result<()> {
    let mut state = self.state.lock();
    let Some(out) = state.out.take() else {
      return Ok(());
    };

    out.sync_all().map_err(|e| Error::Close {
      path: state.filename.clone().unwrap_or_default(),
      source: e,
    })
  }

  /// The per-write decision engine. Leaves `state` holding an open handle for
  /// the accepted candidate.
  fn ensure_target(&self, state: &mut RotatorState) -> Result<()> {
    let new_base = if self.config.mode.on_time() {
      template::bucket_base(&self.pattern, self.config.interval, self.config.clock.now())
    } else {
      self.pattern.clone()
    };
    if new_base != state.base {
      state.generation = 0;
    }

    let candidate = loop {
      let name = compose_filename(&new_base, state.generation, &self.config.suffix);
      match fs::metadata(&name) {
        Err(e) if e.kind() == ErrorKind::NotFound => break name,
        Err(e) => {
          return Err(Error::Probe {
            path: PathBuf::from(name),
            source: e,
          })
        }
        Ok(meta) => {
          // A full file only pushes the generation while we are still inside
          // the bucket it belongs to; a stale bucket is simply appended to.
          if self.config.mode.on_size()
            && meta.len() >= self.config.size_threshold
            && new_base == state.base
          {
            state.generation += 1;
          } else {
            break name;
          }
        }
      }
    };
    let candidate = PathBuf::from(candidate);

    if state.out.is_some() && state.filename.as_deref() == Some(candidate.as_path()) {
      return Ok(());
    }

    let file = fs_util::open_append(&candidate)?;
    // Lock, alias, retention. When this fails the fresh handle is dropped and
    // the previous one stays installed and active.
    self.rotate(&candidate)?;

    state.out = Some(file);
    state.base = new_base;
    state.filename = Some(candidate);
    Ok(())
  }

  /// The shared-artifact phase of a rotation: alias update and retention,
  /// guarded by the cross-process marker.
  fn rotate(&self, candidate: &Path) -> Result<()> {
    let _guard = match RotateLock::acquire(candidate)? {
      Some(guard) => guard,
      // Another instance is mid-rotation for this path. Skip the shared
      // artifacts for this cycle only; the write itself proceeds.
      None => return Ok(()),
    };

    if let Some(alias_path) = &self.config.alias {
      alias::install(alias_path, candidate)?;
    }

    retention::sweep(&self.retention_pattern, &self.config)
  }
}

fn compose_filename(base: &str, generation: u32, suffix: &str) -> String {
  if generation == 0 {
    format!("{}{}", base, suffix)
  } else {
    format!("{}.{}{}", base, generation, suffix)
  }
}

fn into_io_error(e: Error) -> io::Error {
  io::Error::new(io::ErrorKind::Other, e.to_string())
}

impl Write for FileRotator {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    FileRotator::write(self, buf).map_err(into_io_error)
  }

  fn flush(&mut self) -> io::Result<()> {
    FileRotator::flush(self).map_err(into_io_error)
  }
}

impl Write for &FileRotator {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    FileRotator::write(self, buf).map_err(into_io_error)
  }

  fn flush(&mut self) -> io::Result<()> {
    FileRotator::flush(self).map_err(into_io_error)
  }
}
