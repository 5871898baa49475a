use chrono::{DateTime, TimeZone, Utc};

use crate::checked::{self, ArithmeticError};

/// A point on the time-line: whole seconds since the Unix epoch plus a
/// nanosecond-of-second in `0..1_000_000_000`.
///
/// This is the read-only "instant" collaborator consumed by
/// [`Duration::between`](crate::Duration::between). It carries no zone or
/// calendar information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    epoch_seconds: i64,
    nano_of_second: u32,
}

impl Timestamp {
    pub fn of_epoch_seconds(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds,
            nano_of_second: 0,
        }
    }

    /// Builds a timestamp from epoch seconds and an unconstrained nanosecond
    /// adjustment. The stored nano-of-second is normalized into range, so
    /// `of_epoch_seconds_nanos(0, -1)` lands one nanosecond before the epoch
    /// as `(-1, 999_999_999)`.
    pub fn of_epoch_seconds_nanos(
        epoch_seconds: i64,
        nano_adjustment: i64,
    ) -> Result<Self, ArithmeticError> {
        let (epoch_seconds, nano_of_second) =
            checked::normalize_seconds_nanos(epoch_seconds, nano_adjustment)?;
        Ok(Self {
            epoch_seconds,
            nano_of_second,
        })
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    pub fn nano_of_second(&self) -> u32 {
        self.nano_of_second
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        // chrono folds a leap second into a subsec value of up to
        // 1_999_999_999; the shared normalization carries it back out
        let (epoch_seconds, nano_of_second) = checked::normalize_seconds_nanos(
            value.timestamp(),
            i64::from(value.timestamp_subsec_nanos()),
        )
        .expect("chrono timestamps stay well inside the 64-bit second range");
        Self {
            epoch_seconds,
            nano_of_second,
        }
    }
}

/// Source of the current time, injected wherever "now" is needed so tests
/// can pin the time-line.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Clock reading the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().into()
    }
}

/// Clock pinned to a single timestamp. Useful for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: Timestamp,
}

impl FixedClock {
    pub fn new(instant: Timestamp) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.instant
    }
}
