//! The catalog pricing rule.
//!
//! A product variant carries a list price plus an optional discount, expressed
//! either as an absolute discounted price or as a percentage. Writers may
//! supply one, both, or neither; [`Pricing::normalize`] runs on every persist
//! and fills in whichever half of the pair is missing so that readers always
//! see a consistent pair.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the pricing derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Derivation of a discount percent requires a non-zero list price.
    #[error("cannot derive a discount from a non-positive price")]
    NonPositivePrice,
    /// Negative discount values are rejected before persisting.
    #[error("discount must not be negative")]
    NegativeDiscount,
}

/// A variant's price together with its optional discount pair.
///
/// Invariant after [`normalize`](Self::normalize): either both discount
/// fields are absent, or both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// List price in the shop's currency, 2-place scale.
    pub price: Decimal,
    /// Absolute discounted price, if the variant is discounted.
    pub discount_price: Option<Decimal>,
    /// Discount expressed as a whole percentage of the list price.
    pub discount_percent: Option<i32>,
}

impl Pricing {
    /// A plain, undiscounted price.
    #[must_use]
    pub const fn list(price: Decimal) -> Self {
        Self {
            price,
            discount_price: None,
            discount_percent: None,
        }
    }

    /// Derive the missing half of the discount pair.
    ///
    /// - Only `discount_percent` supplied: `discount_price = price × (1 −
    ///   percent/100)`, rounded to 2 places.
    /// - Only `discount_price` supplied: `discount_percent = round(100 −
    ///   discount_price/price × 100)`.
    /// - Both supplied: both are trusted as given, no cross-validation.
    /// - Neither supplied: nothing to do.
    ///
    /// This runs on every persist of a variant, not just creation.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NonPositivePrice`] when a percent must be
    /// derived from a non-positive list price, and
    /// [`PricingError::NegativeDiscount`] for negative discount inputs.
    pub fn normalize(self) -> Result<Self, PricingError> {
        if self.discount_price.is_some_and(|dp| dp < Decimal::ZERO)
            || self.discount_percent.is_some_and(|pct| pct < 0)
        {
            return Err(PricingError::NegativeDiscount);
        }

        let (discount_price, discount_percent) = match (self.discount_price, self.discount_percent)
        {
            (Some(dp), Some(pct)) => (Some(dp), Some(pct)),
            (None, None) => (None, None),
            (None, Some(pct)) => {
                let factor = Decimal::ONE - Decimal::from(pct) / Decimal::from(100);
                (Some((self.price * factor).round_dp(2)), Some(pct))
            }
            (Some(dp), None) => {
                if self.price <= Decimal::ZERO {
                    return Err(PricingError::NonPositivePrice);
                }
                let pct = Decimal::from(100) - dp / self.price * Decimal::from(100);
                let pct = pct.round().to_i32().ok_or(PricingError::NonPositivePrice)?;
                (Some(dp), Some(pct))
            }
        };

        Ok(Self {
            price: self.price,
            discount_price,
            discount_percent,
        })
    }

    /// Whether the variant is actually discounted: a discount price is set
    /// and strictly less than the list price.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_price.is_some_and(|dp| dp < self.price)
    }

    /// The price a buyer pays: the discount price when [`has_discount`]
    /// holds, the list price otherwise.
    ///
    /// [`has_discount`]: Self::has_discount
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.has_discount() {
            self.discount_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_derives_price() {
        let pricing = Pricing {
            price: dec!(1000),
            discount_price: None,
            discount_percent: Some(20),
        }
        .normalize()
        .expect("valid input");

        assert_eq!(pricing.discount_price, Some(dec!(800.00)));
        assert_eq!(pricing.discount_percent, Some(20));
    }

    #[test]
    fn test_price_derives_percent() {
        let pricing = Pricing {
            price: dec!(1000),
            discount_price: Some(dec!(750)),
            discount_percent: None,
        }
        .normalize()
        .expect("valid input");

        assert_eq!(pricing.discount_price, Some(dec!(750)));
        assert_eq!(pricing.discount_percent, Some(25));
    }

    #[test]
    fn test_both_supplied_trusted_as_given() {
        // No cross-validation: an inconsistent pair is kept untouched.
        let pricing = Pricing {
            price: dec!(1000),
            discount_price: Some(dec!(900)),
            discount_percent: Some(50),
        }
        .normalize()
        .expect("valid input");

        assert_eq!(pricing.discount_price, Some(dec!(900)));
        assert_eq!(pricing.discount_percent, Some(50));
    }

    #[test]
    fn test_neither_supplied_is_noop() {
        let pricing = Pricing::list(dec!(490.50)).normalize().expect("valid input");
        assert_eq!(pricing.discount_price, None);
        assert_eq!(pricing.discount_percent, None);
        assert!(!pricing.has_discount());
        assert_eq!(pricing.effective_price(), dec!(490.50));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = Pricing {
            price: dec!(1500),
            discount_price: None,
            discount_percent: Some(33),
        }
        .normalize()
        .expect("valid input");
        let twice = once.normalize().expect("valid input");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_has_discount_requires_strictly_lower_price() {
        let equal = Pricing {
            price: dec!(1000),
            discount_price: Some(dec!(1000)),
            discount_percent: Some(0),
        };
        assert!(!equal.has_discount());
        assert_eq!(equal.effective_price(), dec!(1000));

        let lower = Pricing {
            price: dec!(1000),
            discount_price: Some(dec!(999.99)),
            discount_percent: Some(0),
        };
        assert!(lower.has_discount());
        assert_eq!(lower.effective_price(), dec!(999.99));
    }

    #[test]
    fn test_percent_from_zero_price_rejected() {
        let result = Pricing {
            price: dec!(0),
            discount_price: Some(dec!(10)),
            discount_percent: None,
        }
        .normalize();
        assert_eq!(result, Err(PricingError::NonPositivePrice));
    }

    #[test]
    fn test_negative_discount_rejected() {
        let result = Pricing {
            price: dec!(100),
            discount_price: Some(dec!(-5)),
            discount_percent: None,
        }
        .normalize();
        assert_eq!(result, Err(PricingError::NegativeDiscount));
    }

    #[test]
    fn test_derived_price_is_rounded_to_two_places() {
        let pricing = Pricing {
            price: dec!(999.99),
            discount_price: None,
            discount_percent: Some(33),
        }
        .normalize()
        .expect("valid input");

        // 999.99 * 0.67 = 669.9933
        assert_eq!(pricing.discount_price, Some(dec!(669.99)));
    }
}
