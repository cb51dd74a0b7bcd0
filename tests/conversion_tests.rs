/// Unit tests for the quote pipeline building blocks
/// Tests unit conversion, BMI, gender encoding and the quote table
use bmi_quote_api::conversion::{bmi, height_to_metric, weight_to_metric};
use bmi_quote_api::errors::AppError;
use bmi_quote_api::models::Gender;
use bmi_quote_api::quote::{resolve_quote, QuoteCategory};

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_reference_heights() {
        assert!((height_to_metric("510").unwrap() - 1.778).abs() < 1e-3);
        assert!((height_to_metric("503").unwrap() - 1.6002).abs() < 1e-3);
        assert!((height_to_metric("600").unwrap() - 1.8288).abs() < 1e-3);
    }

    #[test]
    fn test_reference_weight() {
        assert!((weight_to_metric("150").unwrap() - 68.0388).abs() < 1e-3);
    }

    #[test]
    fn test_reference_bmi() {
        assert!((bmi(1.778, 68.0388) - 21.53).abs() < 0.01);
    }

    #[test]
    fn test_height_length_validation() {
        assert!(matches!(height_to_metric("51"), Err(AppError::Validation(_))));
        assert!(matches!(height_to_metric("5100"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_zero_height_is_unguarded() {
        let height = height_to_metric("000").unwrap();
        let weight = weight_to_metric("150").unwrap();
        assert!(bmi(height, weight).is_infinite());
    }
}

#[cfg(test)]
mod quote_tests {
    use super::*;

    #[test]
    fn test_male_normal_bmi() {
        let quote = resolve_quote(QuoteCategory::NormalBmi.code(), false).unwrap();
        assert_eq!(quote.amount, 500.0);
        assert_eq!(quote.reason, "BMI is in right range");
    }

    #[test]
    fn test_female_young_abnormal_bmi() {
        let female: Gender = "Female".parse().unwrap();
        let quote = resolve_quote(0, female.is_female()).unwrap();
        assert!((quote.amount - 675.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_gender_is_lookup_failure() {
        assert!(matches!("Other".parse::<Gender>(), Err(AppError::Lookup(_))));
    }
}
