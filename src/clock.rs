use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of "now" for rotation decisions.
///
/// The rotator never reads the system clock directly; everything flows through
/// this trait so tests (and deterministic replays) can pin time.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock reporting UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
  fn now(&self) -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
  }
}

/// Wall clock reporting the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
  fn now(&self) -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
  }
}

/// A clock pinned to an explicit instant, advanced by hand.
pub struct ManualClock {
  instant: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
  pub fn new(start: DateTime<FixedOffset>) -> Self {
    Self {
      instant: Mutex::new(start),
    }
  }

  /// Moves the clock to an absolute instant. Going backwards is allowed.
  pub fn set(&self, to: DateTime<FixedOffset>) {
    *self.instant.lock() = to;
  }

  /// Advances the clock by a delta.
  pub fn advance(&self, by: TimeDelta) {
    let mut instant = self.instant.lock();
    *instant = *instant + by;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<FixedOffset> {
    *self.instant.lock()
  }
}
