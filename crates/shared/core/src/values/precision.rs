use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Largest scale a `Decimal` can carry
const MAX_DIGITS: u32 = 28;

/// Quote precision of a symbol, expressed as the number of decimal digits
///
/// A symbol with 5 digits quotes in steps of 0.00001 ("one point").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    pub fn new(digits: u32) -> Self {
        Self {
            digits: digits.min(MAX_DIGITS),
        }
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Size of one price step: 10^-digits
    pub fn point(&self) -> f64 {
        10f64.powi(-(self.digits as i32))
    }

    /// Offset of `steps` points
    pub fn offset(&self, steps: i32) -> f64 {
        steps as f64 * self.point()
    }

    /// Round a price to this precision
    ///
    /// Floating point additions of a point leave representation noise behind
    /// (1.1 + 0.0001 = 1.1001000000000001); the host expects quotes already
    /// rounded to the symbol's digits.
    pub fn normalize(&self, price: f64) -> f64 {
        Decimal::from_f64_retain(price)
            .map(|d| d.round_dp(self.digits))
            .and_then(|d| d.to_f64())
            .unwrap_or(price)
    }
}
