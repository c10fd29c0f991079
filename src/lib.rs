//! `rotolog` - a rotating append-only file writer for log output.
//!
//! A [`FileRotator`] decides on every write which physical file the bytes
//! should land in, from the current time bucket and the size the candidate
//! has accumulated on disk. It keeps a bounded set of historical files (age
//! and count limits) and maintains a stable alias symlink pointing at the
//! currently active file.
//!
//! ```no_run
//! use rotolog::{FileRotator, RotatorConfig};
//!
//! let rotator = FileRotator::new(
//!   "logs/app-{{YYYY}}{{MM}}{{DD}}",
//!   RotatorConfig::default()
//!     .with_suffix(".log")
//!     .with_alias("logs/app.log"),
//! )?;
//!
//! rotator.write(b"started\n")?;
//! rotator.close()?;
//! # Ok::<(), rotolog::Error>(())
//! ```

// Declare modules following the file structure
mod alias;
pub mod clock;
pub mod config;
mod error;
mod fs_util;
mod lock;
mod retention;
mod rotator;
mod template;

// Re-export key public types for easier use by library consumers.
pub use clock::{Clock, LocalClock, ManualClock, UtcClock};
pub use config::{RotateMode, RotatorConfig};
pub use error::{Error, Result};
pub use rotator::FileRotator;
