use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Failure of an overflow-checked arithmetic operation.
///
/// Checked operations never wrap or saturate. When the mathematically
/// correct result does not fit the signed 64-bit range, `Overflow` is
/// reported to the caller instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    Overflow,
    DivisionByZero,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticError::Overflow => f.write_str("arithmetic overflow"),
            ArithmeticError::DivisionByZero => f.write_str("division by zero"),
        }
    }
}

impl Error for ArithmeticError {}

pub(crate) fn safe_add(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

pub(crate) fn safe_subtract(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Overflow)
}

pub(crate) fn safe_multiply(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

pub(crate) fn safe_increment(a: i64) -> Result<i64, ArithmeticError> {
    a.checked_add(1).ok_or(ArithmeticError::Overflow)
}

pub(crate) fn safe_decrement(a: i64) -> Result<i64, ArithmeticError> {
    a.checked_sub(1).ok_or(ArithmeticError::Overflow)
}

/// Three-way comparison. Cannot overflow; lives here so every piece of
/// integer arithmetic in the crate goes through the same helper.
pub(crate) fn safe_compare(a: i64, b: i64) -> Ordering {
    a.cmp(&b)
}

/// Folds an unconstrained nanosecond adjustment into a whole-second count,
/// leaving the stored nanosecond in `0..1_000_000_000`. A negative remainder
/// borrows one second, so `(0, -1)` becomes `(-1, 999_999_999)`.
pub(crate) fn normalize_seconds_nanos(
    seconds: i64,
    nano_adjustment: i64,
) -> Result<(i64, u32), ArithmeticError> {
    let mut secs = safe_add(seconds, nano_adjustment / NANOS_PER_SECOND)?;
    let mut nanos = nano_adjustment % NANOS_PER_SECOND;
    if nanos < 0 {
        nanos += NANOS_PER_SECOND;
        secs = safe_decrement(secs)?;
    }
    Ok((secs, nanos as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_add() {
        assert_eq!(safe_add(1, 2), Ok(3));
        assert_eq!(safe_add(i64::MAX, 0), Ok(i64::MAX));
        assert_eq!(safe_add(i64::MAX, 1), Err(ArithmeticError::Overflow));
        assert_eq!(safe_add(i64::MIN, -1), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn test_safe_subtract() {
        assert_eq!(safe_subtract(1, 2), Ok(-1));
        assert_eq!(safe_subtract(i64::MIN, 1), Err(ArithmeticError::Overflow));
        assert_eq!(safe_subtract(0, i64::MIN), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn test_safe_multiply() {
        assert_eq!(safe_multiply(6, 7), Ok(42));
        assert_eq!(safe_multiply(-6, 7), Ok(-42));
        assert_eq!(
            safe_multiply(i64::MAX / 2 + 1, 2),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(safe_multiply(i64::MIN, -1), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn test_safe_increment_decrement() {
        assert_eq!(safe_increment(0), Ok(1));
        assert_eq!(safe_increment(i64::MAX), Err(ArithmeticError::Overflow));
        assert_eq!(safe_decrement(0), Ok(-1));
        assert_eq!(safe_decrement(i64::MIN), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn test_safe_compare() {
        assert_eq!(safe_compare(1, 2), Ordering::Less);
        assert_eq!(safe_compare(2, 2), Ordering::Equal);
        assert_eq!(safe_compare(i64::MAX, i64::MIN), Ordering::Greater);
    }

    #[test]
    fn test_normalize_seconds_nanos() {
        let overflow = Err(ArithmeticError::Overflow);

        assert_eq!(normalize_seconds_nanos(0, 0), Ok((0, 0)));
        assert_eq!(normalize_seconds_nanos(0, 1_000_000_000), Ok((1, 0)));
        assert_eq!(normalize_seconds_nanos(0, -1_000_000_000), Ok((-1, 0)));
        assert_eq!(normalize_seconds_nanos(0, 1_000_000_001), Ok((1, 1)));
        assert_eq!(
            normalize_seconds_nanos(0, -1_000_000_001),
            Ok((-2, 999_999_999))
        );

        assert_eq!(normalize_seconds_nanos(1, 0), Ok((1, 0)));
        assert_eq!(normalize_seconds_nanos(1, 1_000_000_000), Ok((2, 0)));
        assert_eq!(normalize_seconds_nanos(1, -1_000_000_000), Ok((0, 0)));
        assert_eq!(normalize_seconds_nanos(1, 1_000_000_001), Ok((2, 1)));
        assert_eq!(
            normalize_seconds_nanos(1, -1_000_000_001),
            Ok((-1, 999_999_999))
        );

        assert_eq!(normalize_seconds_nanos(-1, 0), Ok((-1, 0)));
        assert_eq!(normalize_seconds_nanos(-1, 1_000_000_000), Ok((0, 0)));
        assert_eq!(normalize_seconds_nanos(-1, -1_000_000_000), Ok((-2, 0)));
        assert_eq!(normalize_seconds_nanos(-1, 1_000_000_001), Ok((0, 1)));
        assert_eq!(
            normalize_seconds_nanos(-1, -1_000_000_001),
            Ok((-3, 999_999_999))
        );

        assert_eq!(normalize_seconds_nanos(i64::MAX, 0), Ok((i64::MAX, 0)));
        assert_eq!(normalize_seconds_nanos(i64::MAX, 1_000_000_000), overflow);
        assert_eq!(
            normalize_seconds_nanos(i64::MAX, -1_000_000_000),
            Ok((i64::MAX - 1, 0))
        );
        assert_eq!(normalize_seconds_nanos(i64::MAX, 1_000_000_001), overflow);
        assert_eq!(
            normalize_seconds_nanos(i64::MAX, -1_000_000_001),
            Ok((i64::MAX - 2, 999_999_999))
        );

        assert_eq!(normalize_seconds_nanos(i64::MIN, 0), Ok((i64::MIN, 0)));
        assert_eq!(
            normalize_seconds_nanos(i64::MIN, 1_000_000_000),
            Ok((i64::MIN + 1, 0))
        );
        assert_eq!(normalize_seconds_nanos(i64::MIN, -1_000_000_000), overflow);
        assert_eq!(
            normalize_seconds_nanos(i64::MIN, 1_000_000_001),
            Ok((i64::MIN + 1, 1))
        );
        assert_eq!(normalize_seconds_nanos(i64::MIN, -1_000_000_001), overflow);
    }
}
