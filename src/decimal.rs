use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// decimal places carried by every money amount
pub const MONEY_SCALE: u32 = 8;

/// decimal places used when showing an amount to a borrower
pub const DISPLAY_SCALE: u32 = 2;

/// Money type with 8 decimal places, enough to keep per-installment drift visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MONEY_SCALE))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?.round_dp(MONEY_SCALE)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// amount as shown in the preview table
    pub fn for_display(&self) -> Self {
        self.round_dp(DISPLAY_SCALE)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly below zero; `-0` is not negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// divide evenly over a number of periods
    pub fn per_period(&self, periods: u32) -> Self {
        if periods == 0 {
            return *self;
        }
        Money((self.0 / Decimal::from(periods)).round_dp(MONEY_SCALE))
    }

    /// apply a rate for one period, e.g. one month of interest on a balance
    pub fn apply_rate(&self, rate: Rate) -> Self {
        Money((self.0 * rate.as_decimal()).round_dp(MONEY_SCALE))
    }

    /// `None` when the sum leaves the representable range
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0
            .checked_add(other.0)
            .map(|d| Money(d.round_dp(MONEY_SCALE)))
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0
            .checked_sub(other.0)
            .map(|d| Money(d.round_dp(MONEY_SCALE)))
    }

    /// true when both amounts agree to within `tolerance`
    pub fn approx_eq(&self, other: Money, tolerance: Decimal) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(MONEY_SCALE))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(MONEY_SCALE);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(MONEY_SCALE))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(MONEY_SCALE);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// rate type for interest rates, stored as a fraction (0.12 for 12%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    /// create from a fractional percentage as typed into a form (e.g., 12.5)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_money_parsing_trims_input() {
        let m: Money = " 1500.50 ".parse().unwrap();
        assert_eq!(m, Money::from_decimal(dec!(1500.50)));
        assert!("12,000".parse::<Money>().is_err());
    }

    #[test]
    fn test_per_period_split() {
        let principal = Money::from_major(1_000);
        let share = principal.per_period(12);
        assert_eq!(share, Money::from_decimal(dec!(83.33333333)));
        assert_eq!(share.for_display().to_string(), "83.33");

        // splitting over zero periods leaves the amount untouched
        assert_eq!(principal.per_period(0), principal);
    }

    #[test]
    fn test_monthly_interest() {
        let balance = Money::from_major(10_000);
        let rate = Rate::from_percentage(12).monthly_rate();

        assert_eq!(balance.apply_rate(rate), Money::from_major(100));
    }

    #[test]
    fn test_rate_from_fractional_percent() {
        let rate = Rate::from_percent(dec!(12.5));
        assert_eq!(rate.as_decimal(), dec!(0.125));
        assert_eq!(rate.to_string(), "12.5%");
        assert!(Rate::from_percent(dec!(0)).is_zero());
    }

    #[test]
    fn test_checked_arithmetic_at_range_limit() {
        let near_max = Money::from_decimal(dec!(79000000000000000000000000000));
        assert!(near_max.checked_add(near_max).is_none());
        assert!(Money::ZERO.checked_sub(near_max).unwrap().is_negative());
        assert_eq!(
            Money::from_major(10).checked_add(Money::from_major(5)),
            Some(Money::from_major(15))
        );
        assert_eq!(
            Money::from_major(10).checked_sub(Money::from_major(5)),
            Some(Money::from_major(5))
        );
    }

    #[test]
    fn test_money_sum_and_tolerance() {
        let parts = vec![Money::from_decimal(dec!(0.1)); 3];
        let total: Money = parts.iter().sum();
        assert_eq!(total, Money::from_decimal(dec!(0.3)));
        assert!(total.approx_eq(Money::from_decimal(dec!(0.30000001)), dec!(0.000001)));
        assert!(!total.approx_eq(Money::from_decimal(dec!(0.31)), dec!(0.000001)));
    }
}
