use std::cell::LazyCell;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::checked::{self, ArithmeticError, NANOS_PER_SECOND};
use crate::clock::Timestamp;
use crate::parse_error::ParseError;

const MILLIS_PER_SECOND: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// An exact length of elapsed time with nanosecond precision.
///
/// The length is stored as a signed 64-bit whole-second count plus a
/// nanosecond fraction between 0 and 999,999,999 that is *added* to the
/// seconds. The fraction is never negative, whatever the sign of the
/// duration: minus one nanosecond is stored as -1 seconds plus
/// 999,999,999 nanoseconds, and the negative duration `PT-0.5S` as
/// -1 seconds plus 500,000,000 nanoseconds.
///
/// Durations are immutable; every "modifying" operation returns a new
/// value. Arithmetic whose true result would not fit the 64-bit second
/// range fails with [`ArithmeticError::Overflow`] rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    /// A duration of zero length.
    pub const ZERO: Duration = Duration {
        seconds: 0,
        nanos: 0,
    };

    /// Resolves the zero pair to the shared constant.
    fn create(seconds: i64, nanos: u32) -> Duration {
        if seconds == 0 && nanos == 0 {
            return Self::ZERO;
        }
        Duration { seconds, nanos }
    }

    fn from_total_nanos(total: i128) -> Result<Duration, ArithmeticError> {
        let billion = i128::from(NANOS_PER_SECOND);
        let seconds = i64::try_from(total.div_euclid(billion))
            .map_err(|_| ArithmeticError::Overflow)?;
        Ok(Self::create(seconds, total.rem_euclid(billion) as u32))
    }

    /// Duration of a number of whole seconds.
    pub fn of_seconds(seconds: i64) -> Duration {
        Self::create(seconds, 0)
    }

    /// Duration of a number of seconds plus an arbitrary nanosecond
    /// adjustment, positive or negative. The stored nanosecond is
    /// normalized into `0..1_000_000_000`, so these are all the same value:
    ///
    /// ```
    /// # use timespan::Duration;
    /// assert_eq!(
    ///     Duration::of_seconds_nanos(3, 1),
    ///     Duration::of_seconds_nanos(4, -999_999_999),
    /// );
    /// assert_eq!(
    ///     Duration::of_seconds_nanos(3, 1),
    ///     Duration::of_seconds_nanos(2, 1_000_000_001),
    /// );
    /// ```
    ///
    /// Fails with [`ArithmeticError::Overflow`] if the carried adjustment
    /// pushes the seconds out of the 64-bit range.
    pub fn of_seconds_nanos(
        seconds: i64,
        nano_adjustment: i64,
    ) -> Result<Duration, ArithmeticError> {
        let (secs, nanos) = checked::normalize_seconds_nanos(seconds, nano_adjustment)?;
        Ok(Self::create(secs, nanos))
    }

    /// Duration of an exact decimal number of seconds, such as `"1.5"` or
    /// `"-0.000000001"`. The value is scaled to nanoseconds with no
    /// rounding; text with more than nine fractional digits is not exactly
    /// representable and is rejected.
    pub fn of_decimal_seconds(text: &str) -> Result<Duration, ParseError> {
        Self::parse_decimal(text, text, 0)
    }

    /// Duration of a number of milliseconds, using floored division so
    /// negative inputs still normalize: `of_millis(-1)` is -1 seconds plus
    /// 999,000,000 nanoseconds.
    pub fn of_millis(millis: i64) -> Duration {
        Self::create(
            millis.div_euclid(MILLIS_PER_SECOND),
            (millis.rem_euclid(MILLIS_PER_SECOND) * NANOS_PER_MILLI) as u32,
        )
    }

    /// Duration of a number of nanoseconds, split with floored division.
    pub fn of_nanos(nanos: i64) -> Duration {
        Self::create(
            nanos.div_euclid(NANOS_PER_SECOND),
            nanos.rem_euclid(NANOS_PER_SECOND) as u32,
        )
    }

    /// Duration of a number of nanoseconds beyond the 64-bit range. Fails
    /// with [`ArithmeticError::Overflow`] if the seconds component does not
    /// fit.
    pub fn of_nanos_i128(nanos: i128) -> Result<Duration, ArithmeticError> {
        Self::from_total_nanos(nanos)
    }

    /// Duration of a number of standard 60-second minutes.
    pub fn of_standard_minutes(minutes: i64) -> Result<Duration, ArithmeticError> {
        Ok(Self::create(checked::safe_multiply(minutes, 60)?, 0))
    }

    /// Duration of a number of standard 3600-second hours.
    pub fn of_standard_hours(hours: i64) -> Result<Duration, ArithmeticError> {
        Ok(Self::create(checked::safe_multiply(hours, 3600)?, 0))
    }

    /// Duration of a number of standard 86400-second days.
    pub fn of_standard_days(days: i64) -> Result<Duration, ArithmeticError> {
        Ok(Self::create(checked::safe_multiply(days, 86_400)?, 0))
    }

    /// Elapsed time from `start` to `end`. Negative if `end` is before
    /// `start`.
    pub fn between(start: Timestamp, end: Timestamp) -> Result<Duration, ArithmeticError> {
        let mut secs = checked::safe_subtract(end.epoch_seconds(), start.epoch_seconds())?;
        let mut nanos = i64::from(end.nano_of_second()) - i64::from(start.nano_of_second());
        if nanos < 0 {
            nanos += NANOS_PER_SECOND;
            secs = checked::safe_decrement(secs)?;
        }
        Ok(Self::create(secs, nanos as u32))
    }

    /// The whole-second count. Negative durations carry their sign here; a
    /// duration of -1 nanosecond reports -1 seconds.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// The nanosecond fraction added to [`seconds`](Self::seconds), from 0
    /// to 999,999,999.
    pub fn nanos_in_second(&self) -> u32 {
        self.nanos
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    pub fn is_positive(&self) -> bool {
        self.seconds >= 0 && !self.is_zero()
    }

    pub fn is_positive_or_zero(&self) -> bool {
        self.seconds >= 0
    }

    pub fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    pub fn is_negative_or_zero(&self) -> bool {
        self.seconds < 0 || self.is_zero()
    }

    /// This duration plus another, overflow-checked.
    pub fn plus(self, other: Duration) -> Result<Duration, ArithmeticError> {
        if other.is_zero() {
            return Ok(self);
        }
        let mut secs = checked::safe_add(self.seconds, other.seconds)?;
        // both fractions are below one second, so the raw sum cannot wrap
        let mut nanos = i64::from(self.nanos) + i64::from(other.nanos);
        if nanos >= NANOS_PER_SECOND {
            nanos -= NANOS_PER_SECOND;
            secs = checked::safe_increment(secs)?;
        }
        Ok(Self::create(secs, nanos as u32))
    }

    pub fn plus_seconds(self, seconds_to_add: i64) -> Result<Duration, ArithmeticError> {
        if seconds_to_add == 0 {
            return Ok(self);
        }
        Ok(Self::create(
            checked::safe_add(self.seconds, seconds_to_add)?,
            self.nanos,
        ))
    }

    pub fn plus_millis(self, millis_to_add: i64) -> Result<Duration, ArithmeticError> {
        if millis_to_add == 0 {
            return Ok(self);
        }
        self.plus_split(
            millis_to_add / MILLIS_PER_SECOND,
            (millis_to_add % MILLIS_PER_SECOND) * NANOS_PER_MILLI,
        )
    }

    pub fn plus_nanos(self, nanos_to_add: i64) -> Result<Duration, ArithmeticError> {
        if nanos_to_add == 0 {
            return Ok(self);
        }
        self.plus_split(nanos_to_add / NANOS_PER_SECOND, nanos_to_add % NANOS_PER_SECOND)
    }

    /// Adds a split delta, where `fraction_nanos` may be anywhere in
    /// `-999_999_999..=999_999_999`. Carries into the checked second
    /// addition in either direction.
    fn plus_split(
        self,
        mut seconds_to_add: i64,
        fraction_nanos: i64,
    ) -> Result<Duration, ArithmeticError> {
        let mut nanos = fraction_nanos + i64::from(self.nanos);
        if nanos < 0 {
            nanos += NANOS_PER_SECOND;
            seconds_to_add -= 1;
        } else if nanos >= NANOS_PER_SECOND {
            nanos -= NANOS_PER_SECOND;
            seconds_to_add += 1;
        }
        Ok(Self::create(
            checked::safe_add(self.seconds, seconds_to_add)?,
            nanos as u32,
        ))
    }

    /// This duration minus another, overflow-checked.
    pub fn minus(self, other: Duration) -> Result<Duration, ArithmeticError> {
        if other.is_zero() {
            return Ok(self);
        }
        let mut secs = checked::safe_subtract(self.seconds, other.seconds)?;
        let mut nanos = i64::from(self.nanos) - i64::from(other.nanos);
        if nanos < 0 {
            nanos += NANOS_PER_SECOND;
            secs = checked::safe_decrement(secs)?;
        }
        Ok(Self::create(secs, nanos as u32))
    }

    pub fn minus_seconds(self, seconds_to_subtract: i64) -> Result<Duration, ArithmeticError> {
        if seconds_to_subtract == 0 {
            return Ok(self);
        }
        Ok(Self::create(
            checked::safe_subtract(self.seconds, seconds_to_subtract)?,
            self.nanos,
        ))
    }

    pub fn minus_millis(self, millis_to_subtract: i64) -> Result<Duration, ArithmeticError> {
        if millis_to_subtract == 0 {
            return Ok(self);
        }
        self.minus_split(
            millis_to_subtract / MILLIS_PER_SECOND,
            (millis_to_subtract % MILLIS_PER_SECOND) * NANOS_PER_MILLI,
        )
    }

    pub fn minus_nanos(self, nanos_to_subtract: i64) -> Result<Duration, ArithmeticError> {
        if nanos_to_subtract == 0 {
            return Ok(self);
        }
        self.minus_split(
            nanos_to_subtract / NANOS_PER_SECOND,
            nanos_to_subtract % NANOS_PER_SECOND,
        )
    }

    fn minus_split(
        self,
        mut seconds_to_subtract: i64,
        fraction_nanos: i64,
    ) -> Result<Duration, ArithmeticError> {
        let mut nanos = i64::from(self.nanos) - fraction_nanos;
        if nanos < 0 {
            nanos += NANOS_PER_SECOND;
            seconds_to_subtract += 1;
        } else if nanos >= NANOS_PER_SECOND {
            nanos -= NANOS_PER_SECOND;
            seconds_to_subtract -= 1;
        }
        Ok(Self::create(
            checked::safe_subtract(self.seconds, seconds_to_subtract)?,
            nanos as u32,
        ))
    }

    /// This duration multiplied by a scalar. The whole duration is taken to
    /// total nanoseconds in 128-bit precision, multiplied exactly, and split
    /// back by floored division; [`ArithmeticError::Overflow`] if the
    /// resulting seconds exceed the 64-bit range.
    pub fn multiplied_by(self, multiplicand: i64) -> Result<Duration, ArithmeticError> {
        if multiplicand == 0 {
            return Ok(Self::ZERO);
        }
        if multiplicand == 1 {
            return Ok(self);
        }
        let total = self
            .to_nanos_i128()
            .checked_mul(i128::from(multiplicand))
            .ok_or(ArithmeticError::Overflow)?;
        Self::from_total_nanos(total)
    }

    /// This duration divided by a scalar, truncating the nanosecond result
    /// toward zero. Fails with [`ArithmeticError::DivisionByZero`] for a
    /// zero divisor, and with [`ArithmeticError::Overflow`] in the single
    /// degenerate case of dividing the most negative duration by -1.
    pub fn divided_by(self, divisor: i64) -> Result<Duration, ArithmeticError> {
        if divisor == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        if divisor == 1 {
            return Ok(self);
        }
        Self::from_total_nanos(self.to_nanos_i128() / i128::from(divisor))
    }

    /// Total order: longer durations sort after shorter ones.
    pub fn is_longer_than(&self, other: &Duration) -> bool {
        self.cmp(other) == Ordering::Greater
    }

    pub fn is_shorter_than(&self, other: &Duration) -> bool {
        self.cmp(other) == Ordering::Less
    }

    /// The exact length in seconds as a decimal string with nine fractional
    /// digits, e.g. `"-0.500000000"` for `PT-0.5S`.
    pub fn to_decimal_seconds(&self) -> String {
        let total = self.to_nanos_i128();
        let sign = if total < 0 { "-" } else { "" };
        let magnitude = total.unsigned_abs();
        format!(
            "{sign}{}.{:09}",
            magnitude / NANOS_PER_SECOND as u128,
            magnitude % NANOS_PER_SECOND as u128
        )
    }

    /// The exact total length in nanoseconds. Always representable: the
    /// widest duration is still below 2^94 nanoseconds.
    pub fn to_nanos_i128(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// The total length in nanoseconds, failing with
    /// [`ArithmeticError::Overflow`] only if the true value does not fit
    /// 64 bits.
    pub fn to_nanos(&self) -> Result<i64, ArithmeticError> {
        i64::try_from(self.to_nanos_i128()).map_err(|_| ArithmeticError::Overflow)
    }

    /// The total length in milliseconds, discarding sub-millisecond
    /// precision by integer division of the nanosecond fraction. Fails with
    /// [`ArithmeticError::Overflow`] only if the true value does not fit
    /// 64 bits.
    pub fn to_millis(&self) -> Result<i64, ArithmeticError> {
        let millis = i128::from(self.seconds) * i128::from(MILLIS_PER_SECOND)
            + i128::from(i64::from(self.nanos) / NANOS_PER_MILLI);
        i64::try_from(millis).map_err(|_| ArithmeticError::Overflow)
    }

    /// Parses the ISO-8601 `PTnS` form produced by the `Display` impl.
    ///
    /// `n` is a signed decimal number of seconds: an optional leading `-`,
    /// at least one digit, then optionally a radix point (`.` or `,`) and
    /// one to nine fractional digits. The three letters are accepted in
    /// either case. Output round-trips: `parse(&d.to_string())` yields `d`
    /// for every duration `d`.
    pub fn parse(text: &str) -> Result<Duration, ParseError> {
        let bytes = text.as_bytes();
        let len = bytes.len();
        if len < 4
            || !bytes[0].eq_ignore_ascii_case(&b'P')
            || !bytes[1].eq_ignore_ascii_case(&b'T')
            || !bytes[len - 1].eq_ignore_ascii_case(&b'S')
            // "PT-0S" would be an ambiguous negative zero
            || (len == 5 && bytes[2] == b'-' && bytes[3] == b'0')
        {
            return Err(ParseError::new(text, 0));
        }
        let number = text[2..len - 1].replace(',', ".");
        Self::parse_decimal(&number, text, 2)
    }

    /// Parses a plain signed decimal second count with up to nine
    /// fractional digits. `original` and `offset` locate `number` within
    /// the caller's input for error reporting.
    fn parse_decimal(number: &str, original: &str, offset: usize) -> Result<Duration, ParseError> {
        thread_local! {
            static NUMBER_RE: LazyCell<Regex> = LazyCell::new(|| {
                Regex::new(r"^(-?[0-9]+)(?:\.([0-9]{1,9}))?$").unwrap()
            });
        }
        let captures = NUMBER_RE
            .with(|re| re.captures(number))
            .ok_or_else(|| ParseError::new(original, offset))?;
        let negative = number.starts_with('-');
        let seconds = i64::from_str(&captures[1]).map_err(|_| {
            // the regex leaves only out-of-range values to fail here
            ParseError::with_cause(original, offset, ArithmeticError::Overflow)
        })?;
        let nanos = match captures.get(2) {
            None => 0,
            Some(fraction) => {
                let digits = fraction.as_str();
                let scale = 10u32.pow(9 - digits.len() as u32);
                let fraction: u32 = digits
                    .parse()
                    .expect("regex limits the fraction to nine digits");
                fraction * scale
            }
        };
        if negative {
            // the printed fraction is a positive offset from the bumped
            // integer part, so recombine through the adjustment path
            Self::of_seconds_nanos(seconds, -i64::from(nanos))
                .map_err(|cause| ParseError::with_cause(original, offset, cause))
        } else {
            Ok(Self::create(seconds, nanos))
        }
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> Ordering {
        checked::safe_compare(self.seconds, other.seconds)
            .then_with(|| checked::safe_compare(i64::from(self.nanos), i64::from(other.nanos)))
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Duration {
    /// Canonical ISO-8601 `PTnS` form, always uppercase with a `.` radix
    /// point. When the duration is negative with a fractional part, the
    /// integer part is bumped by one (printing `-0` at -1 seconds) because
    /// the separately printed fraction is a positive offset back toward it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        let mut buf = String::with_capacity(24);
        buf.push_str("PT");
        if self.seconds < 0 && self.nanos > 0 {
            if self.seconds == -1 {
                buf.push_str("-0");
            } else {
                write!(buf, "{}", self.seconds + 1)?;
            }
        } else {
            write!(buf, "{}", self.seconds)?;
        }
        if self.nanos > 0 {
            let pos = buf.len();
            // print a ten-digit number whose leading digit becomes the
            // radix point once trailing zeros are stripped
            if self.seconds < 0 {
                write!(buf, "{}", 2 * NANOS_PER_SECOND - i64::from(self.nanos))?;
            } else {
                write!(buf, "{}", NANOS_PER_SECOND + i64::from(self.nanos))?;
            }
            while buf.ends_with('0') {
                buf.pop();
            }
            buf.replace_range(pos..=pos, ".");
        }
        buf.push('S');
        f.write_str(&buf)
    }
}

impl FromStr for Duration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an ISO-8601 PTnS duration string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
                Duration::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}
