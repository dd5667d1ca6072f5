//! Value objects for the storefront domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Dollar amount value object.
///
/// The storefront trades in a single currency, so this is a thin wrapper over
/// `Decimal` that keeps full precision through arithmetic and only rounds at
/// the display boundary. Serializes transparently as its decimal value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dollars(Decimal);

impl Dollars {
    pub const ZERO: Dollars = Dollars(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount rounded to cents, for display and persisted totals.
    pub fn rounded(&self) -> Decimal {
        self.0.round_dp(2)
    }

    pub fn times_qty(&self, qty: u32) -> Dollars {
        Dollars(self.0 * Decimal::from(qty))
    }

    pub fn times(&self, factor: Decimal) -> Dollars {
        Dollars(self.0 * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Dollars {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Dollars {
    type Output = Dollars;
    fn add(self, other: Dollars) -> Dollars {
        Dollars(self.0 + other.0)
    }
}

impl AddAssign for Dollars {
    fn add_assign(&mut self, other: Dollars) {
        self.0 += other.0;
    }
}

impl Sum for Dollars {
    fn sum<I: Iterator<Item = Dollars>>(iter: I) -> Dollars {
        iter.fold(Dollars::ZERO, Add::add)
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_and_sum() {
        let a = Dollars::new(dec!(100));
        let b = Dollars::new(dec!(50.25));
        assert_eq!((a + b).amount(), dec!(150.25));
        let total: Dollars = [a, b, Dollars::ZERO].into_iter().sum();
        assert_eq!(total.amount(), dec!(150.25));
    }

    #[test]
    fn test_full_precision_then_round() {
        // three line items at a third of a cent do not compound rounding error
        let item = Dollars::new(dec!(10.005));
        let total: Dollars = std::iter::repeat(item).take(3).sum();
        assert_eq!(total.amount(), dec!(30.015));
        assert_eq!(total.rounded(), dec!(30.02));
    }

    #[test]
    fn test_display() {
        assert_eq!(Dollars::new(dec!(7)).to_string(), "$7.00");
        assert_eq!(Dollars::new(dec!(12.345)).to_string(), "$12.35");
    }
}
