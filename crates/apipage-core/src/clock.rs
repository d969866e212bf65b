//! Clock abstraction for record timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Source of `createdAt`/`updatedAt` values for stores.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
///
/// Readings are truncated to whole microseconds, the resolution of a
/// PostgreSQL `TIMESTAMPTZ`, so a record reads back with the same timestamps
/// from either store implementation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_system_clock_has_microsecond_resolution() {
        let now = SystemClock.now();
        assert_eq!(now.nanosecond() % 1_000, 0);
    }
}
