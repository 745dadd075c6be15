//! Injected time source
//!
//! Timestamps are milliseconds since the epoch. The store takes the clock
//! as a capability so timestamp-dependent behavior stays deterministic in
//! tests.

/// Millisecond-resolution wall clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
