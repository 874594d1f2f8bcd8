//! Value objects shared across the cart domain.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object. Fixed-point decimal internally; formatting to two
/// decimal places happens at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }

    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, "USD")
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch);
        }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }

    pub fn scale(&self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, &self.currency)
    }

    /// Rounds to two decimal places, half away from zero. The canonical
    /// rounding rule for every derived total.
    pub fn round_cents(&self) -> Money {
        Money::new(
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            &self.currency,
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero("USD")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone)]
pub enum MoneyError {
    CurrencyMismatch,
}

impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency mismatch")
    }
}

/// Pricing configuration. These are constants of the storefront, not computed
/// values; defaults match the reference configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingRules {
    pub currency: String,
    pub free_shipping_threshold: Decimal,
    pub standard_shipping: Decimal,
    pub tax_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            free_shipping_threshold: Decimal::new(200, 0),
            standard_shipping: Decimal::new(15, 0),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_add() {
        let a = Money::usd(Decimal::new(100, 0));
        let b = Money::usd(Decimal::new(50, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }

    #[test]
    fn test_money_add_currency_mismatch() {
        let a = Money::usd(Decimal::new(100, 0));
        let b = Money::new(Decimal::new(100, 0), "EUR");
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_round_cents_half_away_from_zero() {
        let m = Money::usd(Decimal::new(10125, 3)); // 10.125
        assert_eq!(m.round_cents().amount(), Decimal::new(1013, 2));
    }

    #[test]
    fn test_default_pricing_rules() {
        let rules = PricingRules::default();
        assert_eq!(rules.free_shipping_threshold, Decimal::new(200, 0));
        assert_eq!(rules.standard_shipping, Decimal::new(15, 0));
        assert_eq!(rules.tax_rate, Decimal::new(8, 2));
    }
}
