//! Integration tests for the catalog pricing rule.

use bazaar_core::{Pricing, PricingError};
use rust_decimal_macros::dec;

#[test]
fn test_percent_20_on_1000_derives_price_800() {
    let pricing = Pricing {
        price: dec!(1000),
        discount_price: None,
        discount_percent: Some(20),
    }
    .normalize()
    .expect("valid");

    assert_eq!(pricing.discount_price, Some(dec!(800.00)));
    assert!(pricing.has_discount());
    assert_eq!(pricing.effective_price(), dec!(800.00));
}

#[test]
fn test_price_750_on_1000_derives_percent_25() {
    let pricing = Pricing {
        price: dec!(1000),
        discount_price: Some(dec!(750)),
        discount_percent: None,
    }
    .normalize()
    .expect("valid");

    assert_eq!(pricing.discount_percent, Some(25));
}

#[test]
fn test_supplying_both_fields_skips_cross_validation() {
    let pricing = Pricing {
        price: dec!(200),
        discount_price: Some(dec!(150)),
        discount_percent: Some(10),
    }
    .normalize()
    .expect("valid");

    // Inconsistent on purpose; both values are trusted as given.
    assert_eq!(pricing.discount_price, Some(dec!(150)));
    assert_eq!(pricing.discount_percent, Some(10));
}

#[test]
fn test_derivation_is_stable_across_repeated_persists() {
    let first = Pricing {
        price: dec!(777),
        discount_price: None,
        discount_percent: Some(15),
    }
    .normalize()
    .expect("valid");

    // The rule runs on every persist; a second run must not drift.
    let second = first.normalize().expect("valid");
    let third = second.normalize().expect("valid");
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_discount_equal_to_price_is_not_a_discount() {
    let pricing = Pricing {
        price: dec!(100),
        discount_price: Some(dec!(100)),
        discount_percent: Some(0),
    };

    assert!(!pricing.has_discount());
    assert_eq!(pricing.effective_price(), dec!(100));
}

#[test]
fn test_zero_price_with_discount_price_is_rejected() {
    let result = Pricing {
        price: dec!(0),
        discount_price: Some(dec!(1)),
        discount_percent: None,
    }
    .normalize();

    assert_eq!(result, Err(PricingError::NonPositivePrice));
}
