//! Fixed quote table keyed by classifier category.

use crate::errors::AppError;

/// Multiplier applied to the base amount for female applicants.
pub const FEMALE_DISCOUNT_FACTOR: f64 = 0.9;

/// Risk bucket produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteCategory {
    /// Age 18-39 with BMI outside [17.49, 38.5).
    YoungAbnormalBmi = 0,
    /// Age 40-59 with BMI outside [18.49, 38.5).
    MiddleAgeAbnormalBmi = 1,
    /// Age 60+ with BMI outside [18.49, 38.5).
    SeniorAbnormalBmi = 2,
    /// BMI within the normal range.
    NormalBmi = 3,
}

impl QuoteCategory {
    pub const ALL: [QuoteCategory; 4] = [
        QuoteCategory::YoungAbnormalBmi,
        QuoteCategory::MiddleAgeAbnormalBmi,
        QuoteCategory::SeniorAbnormalBmi,
        QuoteCategory::NormalBmi,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Undiscounted amount for this category.
    pub fn base_amount(self) -> u32 {
        match self {
            QuoteCategory::YoungAbnormalBmi => 750,
            QuoteCategory::MiddleAgeAbnormalBmi => 1000,
            QuoteCategory::SeniorAbnormalBmi => 2000,
            QuoteCategory::NormalBmi => 500,
        }
    }

    /// Justification returned to the caller.
    pub fn reason(self) -> &'static str {
        match self {
            QuoteCategory::YoungAbnormalBmi => {
                "Age is between 18 to 39 and 'BMI' is either less than 17.49 or greater than 38.5"
            }
            QuoteCategory::MiddleAgeAbnormalBmi => {
                "Age is between 40 to 59 and 'BMI' is either less than 18.49 or greater than 38.5"
            }
            QuoteCategory::SeniorAbnormalBmi => {
                "Age is greater than 60 and 'BMI' is either less than 18.49 or greater than 38.5"
            }
            QuoteCategory::NormalBmi => "BMI is in right range",
        }
    }
}

/// Final amount and its justification.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub category: QuoteCategory,
    pub amount: f64,
    pub reason: &'static str,
}

/// Applies the female discount to the category's base amount.
pub fn quote_for(category: QuoteCategory, female_discount: bool) -> Quote {
    let base = f64::from(category.base_amount());
    let amount = if female_discount {
        base * FEMALE_DISCOUNT_FACTOR
    } else {
        base
    };

    Quote {
        category,
        amount,
        reason: category.reason(),
    }
}

/// Resolves a raw classifier code into a quote.
///
/// # Errors
///
/// * `AppError::Internal` - the code has no table entry.
pub fn resolve_quote(code: u8, female_discount: bool) -> Result<Quote, AppError> {
    let category = QuoteCategory::from_code(code).ok_or_else(|| {
        AppError::Internal(format!("classifier returned unknown category {}", code))
    })?;

    Ok(quote_for(category, female_discount))
}
