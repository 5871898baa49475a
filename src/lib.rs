//! Exact elapsed-time values with nanosecond precision.
//!
//! A [`Duration`] is an immutable pair of a signed 64-bit whole-second count
//! and a nanosecond fraction in `0..1_000_000_000` that is added to it. All
//! arithmetic is overflow-checked and fails with [`ArithmeticError`] instead
//! of wrapping, and every value round-trips through the strict ISO-8601
//! `PTnS` text form:
//!
//! ```
//! use timespan::Duration;
//!
//! let d: Duration = "PT-0.5S".parse()?;
//! assert_eq!(d.seconds(), -1);
//! assert_eq!(d.nanos_in_second(), 500_000_000);
//! assert_eq!(d.plus(Duration::of_millis(500))?, Duration::ZERO);
//! assert_eq!(d.to_string(), "PT-0.5S");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`Timestamp`] and the [`Clock`] trait cover the one external concern in
//! scope, a point-in-time source for [`Duration::between`].

mod checked;
mod clock;
mod duration;
mod parse_error;

pub use checked::ArithmeticError;
pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use duration::Duration;
pub use parse_error::ParseError;
