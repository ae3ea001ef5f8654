//! Resource quantities in the orchestrator notation (`4096`, `512Mi`, `8Gi`, `1.5G`, `250m`).
//!
//! Only what node capacity reporting needs: non-negative amounts, decimal and
//! binary suffixes, and fractional mantissas. Scientific notation is not accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative amount expressed in base units (bytes for memory).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid quantity: {0}")]
    InvalidNumber(String),
    #[error("unknown quantity suffix in {0}")]
    UnknownSuffix(String),
    #[error("negative quantity: {0}")]
    Negative(String),
    #[error("quantity out of range: {0}")]
    OutOfRange(String),
}

impl Quantity {
    pub fn new(value: u64) -> Self {
        Self(i64::try_from(value).unwrap_or(i64::MAX))
    }

    /// Amount in base units, rounded up when the notation carried a fraction.
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// (multiplier, divisor) for a suffix
fn suffix_scale(suffix: &str) -> Option<(u128, u128)> {
    let scale = match suffix {
        "" => (1, 1),
        "m" => (1, 1_000),
        "k" => (1_000, 1),
        "M" => (1_000_000, 1),
        "G" => (1_000_000_000, 1),
        "T" => (1_000_000_000_000, 1),
        "P" => (1_000_000_000_000_000, 1),
        "E" => (1_000_000_000_000_000_000, 1),
        "Ki" => (1 << 10, 1),
        "Mi" => (1 << 20, 1),
        "Gi" => (1 << 30, 1),
        "Ti" => (1 << 40, 1),
        "Pi" => (1 << 50, 1),
        "Ei" => (1 << 60, 1),
        _ => return None,
    };
    Some(scale)
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(QuantityError::Empty);
        }
        if raw.starts_with('-') {
            return Err(QuantityError::Negative(raw.to_string()));
        }
        let unsigned = raw.strip_prefix('+').unwrap_or(raw);

        let split = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(split);

        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
            return Err(QuantityError::InvalidNumber(raw.to_string()));
        }

        let (multiplier, divisor) =
            suffix_scale(suffix).ok_or_else(|| QuantityError::UnknownSuffix(raw.to_string()))?;

        let out_of_range = || QuantityError::OutOfRange(raw.to_string());

        let mantissa: u128 = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| out_of_range())?;
        let frac_scale = u32::try_from(frac_part.len())
            .ok()
            .and_then(|len| 10u128.checked_pow(len))
            .ok_or_else(out_of_range)?;

        let value = mantissa
            .checked_mul(multiplier)
            .ok_or_else(out_of_range)?
            .div_ceil(frac_scale.checked_mul(divisor).ok_or_else(out_of_range)?);

        i64::try_from(value).map(Quantity).map_err(|_| out_of_range())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawQuantity::deserialize(deserializer)? {
            RawQuantity::Number(n) => i64::try_from(n)
                .map(Quantity)
                .map_err(|_| serde::de::Error::custom(format!("quantity out of range: {n}"))),
            RawQuantity::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
