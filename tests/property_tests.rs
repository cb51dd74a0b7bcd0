/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use bmi_quote_api::classifier::{Classifier, Features, RuleBasedClassifier};
use bmi_quote_api::conversion::{bmi, height_to_metric, weight_to_metric, METERS_PER_INCH};
use bmi_quote_api::quote::resolve_quote;
use proptest::prelude::*;

// Property: conversions never panic
proptest! {
    #[test]
    fn height_conversion_never_panics(code in "\\PC*") {
        let _ = height_to_metric(&code);
    }

    #[test]
    fn weight_conversion_never_panics(weight in "\\PC*") {
        let _ = weight_to_metric(&weight);
    }
}

// Property: every 3-digit code is feet*12 + inches
proptest! {
    #[test]
    fn three_digit_codes_convert(feet in 0u32..=9, inches in 0u32..=99) {
        let code = format!("{}{:02}", feet, inches);
        let meters = height_to_metric(&code).unwrap();
        let expected = f64::from(feet * 12 + inches) * METERS_PER_INCH;
        prop_assert!((meters - expected).abs() < 1e-9);
    }

    #[test]
    fn codes_of_other_lengths_rejected(code in "[0-9]{0,2}|[0-9]{4,8}") {
        prop_assert!(height_to_metric(&code).is_err());
    }

    #[test]
    fn integer_weights_convert(pounds in -1000i64..=2000) {
        let kg = weight_to_metric(&pounds.to_string()).unwrap();
        prop_assert!((kg - pounds as f64 * 0.453592).abs() < 1e-9);
    }
}

// Property: BMI grows with weight at fixed height
proptest! {
    #[test]
    fn bmi_monotonic_in_weight(height in 1.0f64..2.5, w1 in 30.0f64..200.0, extra in 0.1f64..50.0) {
        prop_assert!(bmi(height, w1) < bmi(height, w1 + extra));
    }
}

// Property: rule classifier output always prices
proptest! {
    #[test]
    fn rule_categories_always_resolve(
        age in 0i64..120,
        gender_code in 0u8..=1,
        bmi in 5.0f64..80.0
    ) {
        let features = Features { age: age as f64, gender_code: f64::from(gender_code), bmi };
        let category = RuleBasedClassifier.predict(&features).unwrap();
        let quote = resolve_quote(category, gender_code == 0).unwrap();
        prop_assert!(quote.amount > 0.0);
        prop_assert!(!quote.reason.is_empty());
    }
}
