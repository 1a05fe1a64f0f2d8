//! Arbitrary-range non-negative numbers for currency, levels and score.
//!
//! Values below `1e300` are held exactly as a plain `f64` (exponent 0), so
//! everyday arithmetic behaves like ordinary floating point. At and above
//! that the value is stored as `mantissa × 10^exponent` with the mantissa in
//! `[1, 10)`, which extends the range up to `BigNum::MAX` (exponent
//! `i64::MAX`).
//!
//! Limits:
//! - precision is that of `f64` (about 15 significant digits);
//! - operations that would overflow saturate to `BigNum::MAX`;
//! - results below zero are floored at zero (see `saturating_sub`), and
//!   values smaller than ~1e-300 underflow to zero.

use std::cmp::Ordering;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Plain `f64` storage is used strictly below this value.
const SMALL_LIMIT: f64 = 1e300;
/// Exponent at which values switch to mantissa/exponent storage.
const SMALL_LIMIT_EXP: i64 = 300;
/// An addend this many orders of magnitude smaller no longer changes a sum.
const MAX_SIGNIFICANT_DIGITS: i64 = 17;

/// A non-negative number with a range far beyond `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BigNum {
    mantissa: f64,
    exponent: i64,
}

/// Error returned when a decimal string cannot be read as a `BigNum`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBigError {
    #[error("empty numeric literal")]
    Empty,
    #[error("negative value `{0}` is not allowed")]
    Negative(String),
    #[error("invalid numeric literal `{0}`")]
    Invalid(String),
}

fn pow10(k: i64) -> f64 {
    10f64.powi(k.clamp(-400, 400) as i32)
}

/// Split a positive finite value into a `[1, 10)` mantissa and an exponent.
fn scientific(mantissa: f64, exponent: i64) -> (f64, i64) {
    if (1.0..10.0).contains(&mantissa) {
        return (mantissa, exponent);
    }
    let mut shift = mantissa.log10().floor() as i64;
    let mut m = mantissa / pow10(shift);
    while m >= 10.0 && m.is_finite() {
        m /= 10.0;
        shift += 1;
    }
    while m < 1.0 && m > 0.0 {
        m *= 10.0;
        shift -= 1;
    }
    (m, exponent.saturating_add(shift))
}

impl BigNum {
    pub const ZERO: BigNum = BigNum {
        mantissa: 0.0,
        exponent: 0,
    };
    pub const ONE: BigNum = BigNum {
        mantissa: 1.0,
        exponent: 0,
    };
    /// Largest representable value. Overflowing operations saturate here.
    pub const MAX: BigNum = BigNum {
        mantissa: 9.999_999_999_999_998,
        exponent: i64::MAX,
    };

    /// Build the canonical representation of `mantissa × 10^exponent`.
    fn from_parts(mantissa: f64, exponent: i64) -> Self {
        if mantissa.is_nan() || mantissa <= 0.0 {
            return Self::ZERO;
        }
        if mantissa.is_infinite() {
            return Self::MAX;
        }
        if exponent == 0 && mantissa < SMALL_LIMIT {
            return Self {
                mantissa,
                exponent: 0,
            };
        }
        let (m, e) = scientific(mantissa, exponent);
        if e == i64::MAX {
            return Self::MAX;
        }
        if e < SMALL_LIMIT_EXP {
            let plain = m * pow10(e);
            return if plain > 0.0 {
                Self {
                    mantissa: plain,
                    exponent: 0,
                }
            } else {
                Self::ZERO
            };
        }
        Self {
            mantissa: m,
            exponent: e,
        }
    }

    /// Convert from `f64`. Negative and NaN inputs become zero, infinity
    /// becomes `MAX`.
    pub fn from_f64(value: f64) -> Self {
        Self::from_parts(value, 0)
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_parts(value as f64, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    /// True when the value is held in plain `f64` form.
    pub fn is_small(&self) -> bool {
        self.exponent == 0
    }

    /// Nearest `f64`, or `f64::INFINITY` beyond the `f64` range.
    pub fn to_f64(&self) -> f64 {
        if self.exponent == 0 {
            self.mantissa
        } else {
            f64::INFINITY
        }
    }

    /// Integer part as `u64`, saturating at `u64::MAX`.
    pub fn to_u64_saturating(&self) -> u64 {
        let v = self.to_f64().floor();
        if v >= u64::MAX as f64 {
            u64::MAX
        } else {
            v as u64
        }
    }

    /// Base-10 logarithm; negative infinity for zero.
    pub fn log10(&self) -> f64 {
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        if self.exponent == 0 {
            self.mantissa.log10()
        } else {
            self.mantissa.log10() + self.exponent as f64
        }
    }

    pub fn floor(&self) -> Self {
        if self.exponent == 0 {
            Self::from_parts(self.mantissa.floor(), 0)
        } else {
            // Large form always has more integer digits than f64 precision.
            *self
        }
    }

    pub fn is_integer(&self) -> bool {
        self.exponent != 0 || self.mantissa.fract() == 0.0
    }

    /// `self - rhs`, floored at zero.
    pub fn saturating_sub(self, rhs: BigNum) -> Self {
        if rhs >= self {
            return Self::ZERO;
        }
        if rhs.is_zero() {
            return self;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Self::from_parts(self.mantissa - rhs.mantissa, 0);
        }
        let (am, ae) = scientific(self.mantissa, self.exponent);
        let (bm, be) = scientific(rhs.mantissa, rhs.exponent);
        let gap = ae.saturating_sub(be);
        if gap > MAX_SIGNIFICANT_DIGITS {
            return self;
        }
        Self::from_parts(am - bm / pow10(gap), ae)
    }

    /// `self - rhs`, or `None` when `rhs` is larger.
    pub fn checked_sub(self, rhs: BigNum) -> Option<Self> {
        if rhs > self {
            None
        } else {
            Some(self.saturating_sub(rhs))
        }
    }

    /// Raise to a real power. Huge results saturate to `MAX`.
    pub fn pow(self, power: f64) -> Self {
        if power.is_nan() {
            return Self::ZERO;
        }
        if power == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() {
            return if power > 0.0 { Self::ZERO } else { Self::MAX };
        }
        if self == Self::ONE {
            return Self::ONE;
        }
        if self.exponent == 0 {
            let direct = self.mantissa.powf(power);
            if direct.is_finite() && direct < SMALL_LIMIT {
                return Self::from_parts(direct, 0);
            }
        }
        let log = power * self.log10();
        if log.is_nan() {
            return Self::ZERO;
        }
        if log >= i64::MAX as f64 {
            return Self::MAX;
        }
        if log < -400.0 {
            return Self::ZERO;
        }
        let whole = log.floor();
        Self::from_parts(10f64.powf(log - whole), whole as i64)
    }

    /// Raise to a power that is itself a `BigNum`.
    pub fn pow_big(self, power: BigNum) -> Self {
        self.pow(power.to_f64())
    }

    pub fn sqrt(self) -> Self {
        if self.exponent == 0 {
            // Correctly rounded, so perfect squares stay exact.
            Self::from_parts(self.mantissa.sqrt(), 0)
        } else {
            self.pow(0.5)
        }
    }
}

impl Default for BigNum {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Eq for BigNum {}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> Ordering {
        // Large form values are never below 1e300, plain ones always are.
        match (self.exponent == 0, other.exponent == 0) {
            (true, true) => self
                .mantissa
                .partial_cmp(&other.mantissa)
                .unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.exponent.cmp(&other.exponent).then_with(|| {
                self.mantissa
                    .partial_cmp(&other.mantissa)
                    .unwrap_or(Ordering::Equal)
            }),
        }
    }
}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u32> for BigNum {
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<u64> for BigNum {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<f64> for BigNum {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl Add for BigNum {
    type Output = BigNum;

    fn add(self, rhs: BigNum) -> BigNum {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            return Self::from_parts(self.mantissa + rhs.mantissa, 0);
        }
        let (hi, lo) = if self >= rhs { (self, rhs) } else { (rhs, self) };
        let (am, ae) = scientific(hi.mantissa, hi.exponent);
        let (bm, be) = scientific(lo.mantissa, lo.exponent);
        let gap = ae.saturating_sub(be);
        if gap > MAX_SIGNIFICANT_DIGITS {
            return hi;
        }
        Self::from_parts(am + bm / pow10(gap), ae)
    }
}

impl AddAssign for BigNum {
    fn add_assign(&mut self, rhs: BigNum) {
        *self = *self + rhs;
    }
}

impl Mul for BigNum {
    type Output = BigNum;

    fn mul(self, rhs: BigNum) -> BigNum {
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            let product = self.mantissa * rhs.mantissa;
            if product.is_finite() {
                return Self::from_parts(product, 0);
            }
        }
        let (am, ae) = scientific(self.mantissa, self.exponent);
        let (bm, be) = scientific(rhs.mantissa, rhs.exponent);
        Self::from_parts(am * bm, ae.saturating_add(be))
    }
}

impl MulAssign for BigNum {
    fn mul_assign(&mut self, rhs: BigNum) {
        *self = *self * rhs;
    }
}

/// Division by zero yields `MAX` (or zero for `0 / 0`).
impl Div for BigNum {
    type Output = BigNum;

    fn div(self, rhs: BigNum) -> BigNum {
        if self.is_zero() {
            return Self::ZERO;
        }
        if rhs.is_zero() {
            return Self::MAX;
        }
        if self.exponent == 0 && rhs.exponent == 0 {
            let quotient = self.mantissa / rhs.mantissa;
            if quotient.is_finite() {
                return Self::from_parts(quotient, 0);
            }
        }
        let (am, ae) = scientific(self.mantissa, self.exponent);
        let (bm, be) = scientific(rhs.mantissa, rhs.exponent);
        Self::from_parts(am / bm, ae.saturating_sub(be))
    }
}

impl Sum for BigNum {
    fn sum<I: Iterator<Item = BigNum>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for BigNum {
    fn product<I: Iterator<Item = BigNum>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

/// Plain values print as ordinary decimals (`"1234.5"`, or `"1.5e25"` past
/// 1e21); large values print as `"<mantissa>e<exponent>"`. Both forms parse
/// back to the identical value.
impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent == 0 {
            if self.mantissa < 1e21 {
                write!(f, "{}", self.mantissa)
            } else {
                write!(f, "{:e}", self.mantissa)
            }
        } else {
            write!(f, "{}e{}", self.mantissa, self.exponent)
        }
    }
}

impl FromStr for BigNum {
    type Err = ParseBigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBigError::Empty);
        }
        if s.starts_with('-') {
            return Err(ParseBigError::Negative(s.to_string()));
        }
        let invalid = || ParseBigError::Invalid(s.to_string());
        let body = s.strip_prefix('+').unwrap_or(s);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            return Err(invalid());
        }
        if body.matches('.').count() > 1 {
            return Err(invalid());
        }

        if let Ok(v) = body.parse::<f64>() {
            if v.is_finite() {
                return Ok(Self::from_f64(v));
            }
        }

        // Out of f64 range: read the mantissa and exponent separately.
        if let Some((mantissa, exponent)) = body.split_once(['e', 'E']) {
            let m: f64 = mantissa.parse().map_err(|_| invalid())?;
            let e: i64 = exponent.parse().map_err(|_| invalid())?;
            if !m.is_finite() {
                return Err(invalid());
            }
            return Ok(Self::from_parts(m, e));
        }

        // Long integer literal without an exponent.
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }
        let digits = whole.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }
        let head = &digits[..digits.len().min(17)];
        let m: f64 = format!("{}.{}", &head[..1], &head[1..])
            .parse()
            .map_err(|_| invalid())?;
        Ok(Self::from_parts(m, digits.len() as i64 - 1))
    }
}

impl Serialize for BigNum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct BigNumVisitor;

impl<'de> Visitor<'de> for BigNumVisitor {
    type Value = BigNum;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BigNum, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigNum, E> {
        Ok(BigNum::from_u64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigNum, E> {
        if v < 0 {
            return Err(E::custom(ParseBigError::Negative(v.to_string())));
        }
        Ok(BigNum::from_u64(v as u64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigNum, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::custom(ParseBigError::Invalid(v.to_string())));
        }
        Ok(BigNum::from_f64(v))
    }
}

impl<'de> Deserialize<'de> for BigNum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BigNumVisitor)
    }
}
