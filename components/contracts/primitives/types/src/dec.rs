//!
//! # Fixed-point decimal
//!
//! A non-negative decimal with 18 fractional digits, stored as an integer
//! count of `10^-18` units in a `U256`.
//!
//! Every operation is integer arithmetic, so results are identical on every
//! node. Division and multiplication are explicit about their rounding
//! direction: `*_trunc` rounds toward zero, `*_round_up` away from zero.
//!

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Number of fractional digits.
pub const PRECISION: usize = 18;

const ONE_ATTO_UNITS: u64 = 1_000_000_000_000_000_000;

#[inline(always)]
fn precision_multiplier() -> U256 {
    U256::from(ONE_ATTO_UNITS)
}

/// Failures of decimal arithmetic and parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecError {
    Overflow,
    /// `a - b` with `b > a`.
    Underflow,
    DivisionByZero,
    Parse(String),
}

impl fmt::Display for DecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecError::Overflow => write!(f, "decimal overflow"),
            DecError::Underflow => write!(f, "decimal underflow"),
            DecError::DivisionByZero => write!(f, "decimal division by zero"),
            DecError::Parse(s) => write!(f, "invalid decimal: {}", s),
        }
    }
}

impl std::error::Error for DecError {}

type Result<T> = std::result::Result<T, DecError>;

/// Non-negative fixed-point decimal.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(U256);

impl Dec {
    #[inline(always)]
    pub fn zero() -> Self {
        Dec(U256::zero())
    }

    #[inline(always)]
    pub fn one() -> Self {
        Dec(precision_multiplier())
    }

    /// Build from raw `10^-18` units.
    #[inline(always)]
    pub fn from_atto(units: U256) -> Self {
        Dec(units)
    }

    /// Raw `10^-18` units.
    #[inline(always)]
    pub fn atto(&self) -> U256 {
        self.0
    }

    /// `num / den`, truncated.
    pub fn from_ratio<N: Into<U256>, D: Into<U256>>(num: N, den: D) -> Result<Self> {
        let den = den.into();
        if den.is_zero() {
            return Err(DecError::DivisionByZero);
        }
        num.into()
            .checked_mul(precision_multiplier())
            .map(|n| Dec(n / den))
            .ok_or(DecError::Overflow)
    }

    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Dec) -> Result<Dec> {
        self.0
            .checked_add(other.0)
            .map(Dec)
            .ok_or(DecError::Overflow)
    }

    /// Fails instead of going negative.
    pub fn checked_sub(&self, other: Dec) -> Result<Dec> {
        self.0
            .checked_sub(other.0)
            .map(Dec)
            .ok_or(DecError::Underflow)
    }

    #[inline(always)]
    pub fn saturating_sub(&self, other: Dec) -> Dec {
        Dec(self.0.saturating_sub(other.0))
    }

    /// `self * other`, rounded toward zero.
    pub fn checked_mul_trunc(&self, other: Dec) -> Result<Dec> {
        self.0
            .checked_mul(other.0)
            .map(|p| Dec(p / precision_multiplier()))
            .ok_or(DecError::Overflow)
    }

    /// `self * other`, rounded away from zero.
    pub fn checked_mul_round_up(&self, other: Dec) -> Result<Dec> {
        let p = self.0.checked_mul(other.0).ok_or(DecError::Overflow)?;
        let (q, r) = p.div_mod(precision_multiplier());
        if r.is_zero() {
            Ok(Dec(q))
        } else {
            q.checked_add(U256::one())
                .map(Dec)
                .ok_or(DecError::Overflow)
        }
    }

    /// `self / other`, rounded toward zero.
    pub fn checked_quo_trunc(&self, other: Dec) -> Result<Dec> {
        if other.is_zero() {
            return Err(DecError::DivisionByZero);
        }
        self.0
            .checked_mul(precision_multiplier())
            .map(|n| Dec(n / other.0))
            .ok_or(DecError::Overflow)
    }

    /// `self / other`, rounded away from zero.
    pub fn checked_quo_round_up(&self, other: Dec) -> Result<Dec> {
        if other.is_zero() {
            return Err(DecError::DivisionByZero);
        }
        let n = self
            .0
            .checked_mul(precision_multiplier())
            .ok_or(DecError::Overflow)?;
        let (q, r) = n.div_mod(other.0);
        if r.is_zero() {
            Ok(Dec(q))
        } else {
            q.checked_add(U256::one())
                .map(Dec)
                .ok_or(DecError::Overflow)
        }
    }

    /// `self * num / den` with a single truncation at the end.
    pub fn checked_mul_ratio_trunc(&self, num: u64, den: u64) -> Result<Dec> {
        if den == 0 {
            return Err(DecError::DivisionByZero);
        }
        self.0
            .checked_mul(U256::from(num))
            .map(|p| Dec(p / U256::from(den)))
            .ok_or(DecError::Overflow)
    }
}

impl From<u64> for Dec {
    fn from(n: u64) -> Self {
        // u64::MAX * 10^18 < 2^128, never overflows a U256
        Dec(U256::from(n) * precision_multiplier())
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (int, frac) = self.0.div_mod(precision_multiplier());
        write!(
            f,
            "{}.{:0>width$}",
            int,
            frac.to_string(),
            width = PRECISION
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self> {
        let err = || DecError::Parse(s.to_owned());

        let (int, frac) = match s.find('.') {
            Some(i) => (&s[..i], &s[i + 1..]),
            None => (s, ""),
        };
        if int.is_empty() || frac.len() > PRECISION {
            return Err(err());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let int = U256::from_dec_str(int).map_err(|_| err())?;
        let frac = if frac.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(&format!("{:0<width$}", frac, width = PRECISION))
                .map_err(|_| err())?
        };

        int.checked_mul(precision_multiplier())
            .and_then(|i| i.checked_add(frac))
            .map(Dec)
            .ok_or(DecError::Overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Dec::from_str(&s).map_err(de::Error::custom)
    }
}
