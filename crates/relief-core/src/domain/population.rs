//! Validated population counts.

use serde::{Deserialize, Serialize};

use crate::ReliefError;

/// Non-negative head count.
///
/// Request payloads carry signed or floating point numbers; conversion into
/// this type is where negative, non-finite or fractional-overflow values are
/// rejected with [`ReliefError::InvalidInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Population(u64);

impl Population {
    /// Wrap an already non-negative count
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    /// Raw head count
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Validate a signed count coming from an external caller
    pub fn from_signed(field: &str, value: i64) -> Result<Self, ReliefError> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| ReliefError::invalid_input(field, format!("must be non-negative, got {value}")))
    }

    /// Validate a floating point count, truncating any fractional part
    pub fn from_float(field: &str, value: f64) -> Result<Self, ReliefError> {
        if !value.is_finite() {
            return Err(ReliefError::invalid_input(field, "must be a finite number"));
        }
        if value < 0.0 {
            return Err(ReliefError::invalid_input(
                field,
                format!("must be non-negative, got {value}"),
            ));
        }
        if value >= u64::MAX as f64 {
            return Err(ReliefError::invalid_input(field, "is too large"));
        }
        Ok(Self(value.trunc() as u64))
    }
}

impl From<u64> for Population {
    fn from(count: u64) -> Self {
        Self(count)
    }
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", group_thousands(self.0))
    }
}

/// Format an integer with `,` thousands separators (`1696694` -> `1,696,694`)
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
