//! Exact two-decimal averages.
//!
//! The sum is accumulated in `i128` and divided once, so the result never
//! depends on binary floating-point representation. Rounding is half away
//! from zero: `1.125` becomes `1.13` and `-1.125` becomes `-1.13`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::WindowValue;

/// A mean rounded to hundredths, stored as an integer count of hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Average {
    hundredths: i128,
}

impl Average {
    pub const ZERO: Average = Average { hundredths: 0 };

    pub fn of<'a, T, I>(values: I) -> Self
    where
        T: WindowValue + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0i128, 0i128), |(sum, count), v| (sum + v.to_wide(), count + 1));
        if count == 0 {
            return Average::ZERO;
        }
        Average {
            hundredths: div_round_half_away(sum * 100, count),
        }
    }

    pub fn from_hundredths(hundredths: i128) -> Self {
        Average { hundredths }
    }

    pub fn hundredths(&self) -> i128 {
        self.hundredths
    }

    pub fn as_f64(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

/// `numer / denom` rounded half away from zero. `denom` must be positive.
fn div_round_half_away(numer: i128, denom: i128) -> i128 {
    let quotient = numer / denom;
    let remainder = numer % denom;
    if remainder.abs() * 2 >= denom {
        quotient + numer.signum()
    } else {
        quotient
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let abs = self.hundredths.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Average {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Average {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("average must be a finite number"));
        }
        Ok(Average {
            hundredths: (value * 100.0).round() as i128,
        })
    }
}
