use core::cmp::Ordering;
use core::fmt;

use vc_reflect::ops::{ScalarRef, ScalarValue};

/// An untyped number with the narrowest type it was read into.
///
/// Arithmetic promotes to the wider of the two operands; operands of equal
/// width keep that width unless the result overflows it.
///
/// ```
/// use vc_serial::Number;
///
/// assert_eq!(Number::parse("+007"), Some(Number::I32(7)));
/// assert_eq!(Number::parse_best_fit("-128"), Some(Number::I8(-128)));
/// assert_eq!(Number::parse_best_fit("127"), Some(Number::U8(127)));
///
/// let sum = Number::U8(200).add(Number::U8(100));
/// assert_eq!(sum, Number::U16(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(f32),
    F64(f64),
}

/// Integer widths in ascending order; floats rank above every integer.
const F32_RANK: u8 = 6;
const F64_RANK: u8 = 7;

impl Number {
    /// Reads a number with the default ladder: `i32`, `i64`, `u64`, `i128`,
    /// `u128`, then `f64`.
    ///
    /// A leading `+` and leading zeros are accepted. `NaN` and infinities
    /// are not numbers here.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !is_numeric_text(text) {
            return None;
        }
        if !is_fractional(text) {
            if let Ok(v) = text.parse::<i32>() {
                return Some(Self::I32(v));
            }
            if let Ok(v) = text.parse::<i64>() {
                return Some(Self::I64(v));
            }
            if let Ok(v) = text.parse::<u64>() {
                return Some(Self::U64(v));
            }
            if let Ok(v) = text.parse::<i128>() {
                return Some(Self::I128(v));
            }
            if let Ok(v) = text.parse::<u128>() {
                return Some(Self::U128(v));
            }
        }
        text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Self::F64)
    }

    /// Reads a number into the narrowest type that holds it exactly.
    ///
    /// Whole numbers try `u8`, `i8`, `i16`, `u16`, `i32`, `u32`, `i64`,
    /// `u64`, `i128` and `u128` in that order. Fractional numbers become
    /// `f32` when that is lossless, `f64` otherwise.
    pub fn parse_best_fit(text: &str) -> Option<Self> {
        let text = text.trim();
        if !is_numeric_text(text) {
            return None;
        }
        if !is_fractional(text) {
            if let Ok(v) = text.parse::<i128>() {
                return Some(fit_i128(v));
            }
            if let Ok(v) = text.parse::<u128>() {
                return Some(Self::U128(v));
            }
        }
        let wide = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
        match text.parse::<f32>() {
            Ok(narrow) if f64::from(narrow) == wide => Some(Self::F32(narrow)),
            _ => Some(Self::F64(wide)),
        }
    }

    /// Moves this number to the narrowest type that holds it exactly.
    pub fn best_fit(self) -> Self {
        match self {
            Self::F32(_) => self,
            Self::F64(v) => {
                let narrow = v as f32;
                if f64::from(narrow) == v { Self::F32(narrow) } else { self }
            }
            Self::U128(v) => match i128::try_from(v) {
                Ok(v) => fit_i128(v),
                Err(_) => self,
            },
            other => other.to_i128().map(fit_i128).unwrap_or(other),
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::U8(_) | Self::U16(_) | Self::U32(_) | Self::U64(_) | Self::U128(_)
        )
    }

    const fn rank(self) -> u8 {
        match self {
            Self::I8(_) | Self::U8(_) => 1,
            Self::I16(_) | Self::U16(_) => 2,
            Self::I32(_) | Self::U32(_) => 3,
            Self::I64(_) | Self::U64(_) => 4,
            Self::I128(_) | Self::U128(_) => 5,
            Self::F32(_) => F32_RANK,
            Self::F64(_) => F64_RANK,
        }
    }

    /// The value as `i128`, for integers in range and integral floats.
    pub fn to_i128(self) -> Option<i128> {
        Some(match self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v.into(),
            Self::I128(v) => v,
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v.into(),
            Self::U128(v) => return i128::try_from(v).ok(),
            Self::F32(v) => return float_to_i128(f64::from(v)),
            Self::F64(v) => return float_to_i128(v),
        })
    }

    /// The value as `u128`, for non-negative integers and integral floats.
    pub fn to_u128(self) -> Option<u128> {
        match self {
            Self::U128(v) => Some(v),
            other => other.to_i128().and_then(|v| u128::try_from(v).ok()),
        }
    }

    /// The value as `f64`, possibly rounded.
    pub fn to_f64(self) -> f64 {
        match self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v as f64,
            Self::I128(v) => v as f64,
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v as f64,
            Self::U128(v) => v as f64,
            Self::F32(v) => v.into(),
            Self::F64(v) => v,
        }
    }

    /// The matching scalar of the same type.
    pub fn to_scalar(self) -> ScalarValue {
        match self {
            Self::I8(v) => ScalarValue::I8(v),
            Self::I16(v) => ScalarValue::I16(v),
            Self::I32(v) => ScalarValue::I32(v),
            Self::I64(v) => ScalarValue::I64(v),
            Self::I128(v) => ScalarValue::I128(v),
            Self::U8(v) => ScalarValue::U8(v),
            Self::U16(v) => ScalarValue::U16(v),
            Self::U32(v) => ScalarValue::U32(v),
            Self::U64(v) => ScalarValue::U64(v),
            Self::U128(v) => ScalarValue::U128(v),
            Self::F32(v) => ScalarValue::F32(v),
            Self::F64(v) => ScalarValue::F64(v),
        }
    }

    /// The number held by a numeric scalar.
    pub fn from_scalar(value: ScalarRef<'_>) -> Option<Self> {
        Some(match value {
            ScalarRef::I8(v) => Self::I8(v),
            ScalarRef::I16(v) => Self::I16(v),
            ScalarRef::I32(v) => Self::I32(v),
            ScalarRef::I64(v) => Self::I64(v),
            ScalarRef::I128(v) => Self::I128(v),
            ScalarRef::Isize(v) => Self::I64(v as i64),
            ScalarRef::U8(v) => Self::U8(v),
            ScalarRef::U16(v) => Self::U16(v),
            ScalarRef::U32(v) => Self::U32(v),
            ScalarRef::U64(v) => Self::U64(v),
            ScalarRef::U128(v) => Self::U128(v),
            ScalarRef::Usize(v) => Self::U64(v as u64),
            ScalarRef::F32(v) => Self::F32(v),
            ScalarRef::F64(v) => Self::F64(v),
            _ => return None,
        })
    }

    // -------------------------------------------------------------------------
    // Arithmetic

    pub fn add(self, rhs: Self) -> Self {
        self.binary(rhs, i128::checked_add, u128::checked_add, |a, b| a + b)
            .unwrap_or(Self::F64(self.to_f64() + rhs.to_f64()))
    }

    pub fn sub(self, rhs: Self) -> Self {
        self.binary(rhs, i128::checked_sub, u128::checked_sub, |a, b| a - b)
            .unwrap_or(Self::F64(self.to_f64() - rhs.to_f64()))
    }

    pub fn mul(self, rhs: Self) -> Self {
        self.binary(rhs, i128::checked_mul, u128::checked_mul, |a, b| a * b)
            .unwrap_or(Self::F64(self.to_f64() * rhs.to_f64()))
    }

    /// `None` when dividing an integer by zero.
    pub fn div(self, rhs: Self) -> Option<Self> {
        if !self.is_float() && !rhs.is_float() && rhs.to_i128() == Some(0) {
            return None;
        }
        Some(
            self.binary(rhs, i128::checked_div, u128::checked_div, |a, b| a / b)
                .unwrap_or(Self::F64(self.to_f64() / rhs.to_f64())),
        )
    }

    /// `None` when dividing an integer by zero.
    pub fn rem(self, rhs: Self) -> Option<Self> {
        if !self.is_float() && !rhs.is_float() && rhs.to_i128() == Some(0) {
            return None;
        }
        Some(
            self.binary(rhs, i128::checked_rem, u128::checked_rem, |a, b| a % b)
                .unwrap_or(Self::F64(self.to_f64() % rhs.to_f64())),
        )
    }

    pub fn min(self, rhs: Self) -> Self {
        let pick = if self.compare(rhs) == Some(Ordering::Greater) { rhs } else { self };
        pick.promote_with(self, rhs)
    }

    pub fn max(self, rhs: Self) -> Self {
        let pick = if self.compare(rhs) == Some(Ordering::Less) { rhs } else { self };
        pick.promote_with(self, rhs)
    }

    /// Numeric ordering across types; `None` only for NaN.
    pub fn compare(self, rhs: Self) -> Option<Ordering> {
        if !self.is_float() && !rhs.is_float() {
            return match (self.to_i128(), rhs.to_i128()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                // one side is a u128 beyond i128
                (None, _) => Some(Ordering::Greater),
                (_, None) => Some(Ordering::Less),
            };
        }
        self.to_f64().partial_cmp(&rhs.to_f64())
    }

    fn promote_with(self, a: Self, b: Self) -> Self {
        let (rank, signed) = target(a, b);
        match rank {
            F64_RANK => Self::F64(self.to_f64()),
            F32_RANK => Self::F32(self.to_f64() as f32),
            _ => match self.to_i128() {
                Some(v) => fit_at(v, rank, signed),
                None => self,
            },
        }
    }

    fn binary(
        self,
        rhs: Self,
        int_op: fn(i128, i128) -> Option<i128>,
        uint_op: fn(u128, u128) -> Option<u128>,
        float_op: fn(f64, f64) -> f64,
    ) -> Option<Self> {
        let (rank, signed) = target(self, rhs);
        match rank {
            F64_RANK => Some(Self::F64(float_op(self.to_f64(), rhs.to_f64()))),
            F32_RANK => {
                let wide = float_op(self.to_f64(), rhs.to_f64());
                let narrow = wide as f32;
                Some(if narrow.is_finite() { Self::F32(narrow) } else { Self::F64(wide) })
            }
            _ => {
                if let (Some(a), Some(b)) = (self.to_i128(), rhs.to_i128())
                    && let Some(v) = int_op(a, b)
                {
                    return Some(fit_at(v, rank, signed));
                }
                let (a, b) = (self.to_u128()?, rhs.to_u128()?);
                uint_op(a, b).map(|v| match i128::try_from(v) {
                    Ok(v) => fit_at(v, rank, signed),
                    Err(_) => Self::U128(v),
                })
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::I8(v) => fmt::Display::fmt(&v, f),
            Self::I16(v) => fmt::Display::fmt(&v, f),
            Self::I32(v) => fmt::Display::fmt(&v, f),
            Self::I64(v) => fmt::Display::fmt(&v, f),
            Self::I128(v) => fmt::Display::fmt(&v, f),
            Self::U8(v) => fmt::Display::fmt(&v, f),
            Self::U16(v) => fmt::Display::fmt(&v, f),
            Self::U32(v) => fmt::Display::fmt(&v, f),
            Self::U64(v) => fmt::Display::fmt(&v, f),
            Self::U128(v) => fmt::Display::fmt(&v, f),
            Self::F32(v) => fmt::Display::fmt(&v, f),
            Self::F64(v) => fmt::Display::fmt(&v, f),
        }
    }
}

// -----------------------------------------------------------------------------
// Internal API

fn is_numeric_text(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.bytes().any(|b| b.is_ascii_digit())
        && digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}

#[inline]
fn is_fractional(text: &str) -> bool {
    text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

fn float_to_i128(v: f64) -> Option<i128> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < 1.7e38).then_some(v as i128)
}

/// The rank and signedness of the result of combining `a` and `b`.
fn target(a: Number, b: Number) -> (u8, bool) {
    let rank = a.rank().max(b.rank());
    if rank >= F32_RANK {
        return (rank, true);
    }
    match (a.is_unsigned(), b.is_unsigned()) {
        (true, true) => (rank, false),
        (false, false) => (rank, true),
        _ => {
            let unsigned = if a.is_unsigned() { a } else { b };
            if unsigned.rank() == rank { ((rank + 1).min(5), true) } else { (rank, true) }
        }
    }
}

/// Places `v` at `rank`, widening until it fits.
fn fit_at(v: i128, rank: u8, signed: bool) -> Number {
    for rank in rank..=5 {
        let fitted = if signed || v < 0 {
            match rank {
                1 => i8::try_from(v).ok().map(Number::I8),
                2 => i16::try_from(v).ok().map(Number::I16),
                3 => i32::try_from(v).ok().map(Number::I32),
                4 => i64::try_from(v).ok().map(Number::I64),
                _ => Some(Number::I128(v)),
            }
        } else {
            match rank {
                1 => u8::try_from(v).ok().map(Number::U8),
                2 => u16::try_from(v).ok().map(Number::U16),
                3 => u32::try_from(v).ok().map(Number::U32),
                4 => u64::try_from(v).ok().map(Number::U64),
                _ => u128::try_from(v).ok().map(Number::U128),
            }
        };
        if let Some(number) = fitted {
            return number;
        }
    }
    Number::I128(v)
}

fn fit_i128(v: i128) -> Number {
    if let Ok(v) = u8::try_from(v) {
        return Number::U8(v);
    }
    if let Ok(v) = i8::try_from(v) {
        return Number::I8(v);
    }
    if let Ok(v) = i16::try_from(v) {
        return Number::I16(v);
    }
    if let Ok(v) = u16::try_from(v) {
        return Number::U16(v);
    }
    if let Ok(v) = i32::try_from(v) {
        return Number::I32(v);
    }
    if let Ok(v) = u32::try_from(v) {
        return Number::U32(v);
    }
    if let Ok(v) = i64::try_from(v) {
        return Number::I64(v);
    }
    if let Ok(v) = u64::try_from(v) {
        return Number::U64(v);
    }
    Number::I128(v)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use super::Number;

    #[test]
    fn default_ladder() {
        assert_eq!(Number::parse("42"), Some(Number::I32(42)));
        assert_eq!(Number::parse("-0042"), Some(Number::I32(-42)));
        assert_eq!(Number::parse("3000000000"), Some(Number::I64(3_000_000_000)));
        assert_eq!(Number::parse("18446744073709551615"), Some(Number::U64(u64::MAX)));
        assert_eq!(Number::parse("1.5e3"), Some(Number::F64(1500.0)));
        assert_eq!(Number::parse("NaN"), None);
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse("1,000"), None);
        assert_eq!(Number::parse(""), None);
        assert_eq!(Number::parse("-"), None);
    }

    #[test]
    fn best_fit_boundaries() {
        for _ in 0..2 {
            assert_eq!(Number::parse_best_fit("0"), Some(Number::U8(0)));
            assert_eq!(Number::parse_best_fit("7"), Some(Number::U8(7)));
            assert_eq!(Number::parse_best_fit("255"), Some(Number::U8(255)));
            assert_eq!(Number::parse_best_fit("-1"), Some(Number::I8(-1)));
            assert_eq!(Number::parse_best_fit("-128"), Some(Number::I8(-128)));
            assert_eq!(Number::parse_best_fit("-129"), Some(Number::I16(-129)));
            assert_eq!(Number::parse_best_fit("256"), Some(Number::I16(256)));
            assert_eq!(Number::parse_best_fit("32768"), Some(Number::U16(32768)));
            assert_eq!(Number::parse_best_fit("65536"), Some(Number::I32(65536)));
            assert_eq!(Number::parse_best_fit("4294967295"), Some(Number::U32(u32::MAX)));
            assert_eq!(Number::parse_best_fit("1.5"), Some(Number::F32(1.5)));
            assert_eq!(Number::parse_best_fit("0.1"), Some(Number::F64(0.1)));
        }
        assert_eq!(Number::I64(-5).best_fit(), Number::I8(-5));
        assert_eq!(Number::F64(2.25).best_fit(), Number::F32(2.25));
    }

    #[test]
    fn same_width_keeps_width_until_overflow() {
        assert_eq!(Number::I32(2).add(Number::I32(3)), Number::I32(5));
        assert_eq!(Number::I32(i32::MAX).add(Number::I32(1)), Number::I64(i64::from(i32::MAX) + 1));
        assert_eq!(Number::U8(200).add(Number::U8(100)), Number::U16(300));
        assert_eq!(Number::U64(u64::MAX).mul(Number::U64(2)), Number::U128(u128::from(u64::MAX) * 2));
    }

    #[test]
    fn mixed_operands_promote() {
        assert_eq!(Number::I8(1).add(Number::I64(1)), Number::I64(2));
        assert_eq!(Number::U8(1).add(Number::I8(1)), Number::I16(2));
        assert_eq!(Number::I32(1).add(Number::F32(0.5)), Number::F32(1.5));
        assert_eq!(Number::F32(1.0).add(Number::F64(0.5)), Number::F64(1.5));
        assert_eq!(Number::I32(7).div(Number::I32(2)), Some(Number::I32(3)));
        assert_eq!(Number::I32(7).rem(Number::I32(0)), None);
        assert_eq!(Number::I32(3).sub(Number::I32(5)), Number::I32(-2));
        assert_eq!(Number::U8(3).sub(Number::U8(5)), Number::I8(-2));
    }

    #[test]
    fn min_max_and_compare() {
        assert_eq!(Number::I8(-1).max(Number::U64(3)), Number::I128(3));
        assert_eq!(Number::I32(4).min(Number::I64(9)), Number::I64(4));
        assert_eq!(Number::U128(u128::MAX).compare(Number::I8(0)), Some(Ordering::Greater));
        assert_eq!(Number::F64(0.5).compare(Number::I32(1)), Some(Ordering::Less));
    }
}
