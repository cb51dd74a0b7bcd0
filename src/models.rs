use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::classifier::Features;
use crate::conversion::{bmi, height_to_metric, weight_to_metric};
use crate::errors::AppError;

// ============ Request / Response ============

/// Applicant attributes posted to `/bmi_predict/`.
///
/// `gender` stays a plain string on the wire so that an unrecognized value
/// reaches the encoder and fails as a lookup error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicantRequest {
    /// Caller-assigned application id, echoed back as `appid`.
    #[schema(example = 1)]
    pub app_id: i64,
    /// Applicant age in years.
    #[schema(example = 25)]
    pub age: i64,
    /// "Female" or "Male".
    #[schema(example = "Female")]
    pub gender: String,
    /// Height as feet digit followed by two inch digits, e.g. "510" for 5'10".
    #[schema(example = "510")]
    pub ht: String,
    /// Weight in whole pounds.
    #[schema(example = "150")]
    pub wt: String,
    /// Policy issue date, passed through untouched.
    #[serde(default)]
    pub issue_date: Option<String>,
}

/// Result of a prediction request.
///
/// Failures carry `quote: null`, the generic reason and no `appid`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appid: Option<i64>,
    pub quote: Option<f64>,
    pub reason: String,
}

impl QuoteResponse {
    pub fn success(app_id: i64, quote: f64, reason: impl Into<String>) -> Self {
        Self {
            appid: Some(app_id),
            quote: Some(quote),
            reason: reason.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            appid: None,
            quote: None,
            reason: reason.into(),
        }
    }
}

// ============ Domain ============

/// Applicant gender with its fixed categorical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female = 0,
    Male = 1,
}

impl Gender {
    /// Integer code fed to the classifier.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Female applicants receive the quote discount.
    pub fn is_female(self) -> bool {
        matches!(self, Gender::Female)
    }
}

impl FromStr for Gender {
    type Err = AppError;

    /// Case-sensitive lookup in the `{"Female": 0, "Male": 1}` mapping.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Female" => Ok(Gender::Female),
            "Male" => Ok(Gender::Male),
            other => Err(AppError::Lookup(format!("unknown gender '{}'", other))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
        }
    }
}

/// Applicant after encoding and unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedApplicant {
    pub app_id: i64,
    pub age: i64,
    pub gender: Gender,
    /// Meters.
    pub height_metric: f64,
    /// Kilograms.
    pub weight_metric: f64,
    /// kg/m².
    pub bmi: f64,
    pub issue_date: Option<String>,
}

impl ParsedApplicant {
    pub fn gender_code(&self) -> u8 {
        self.gender.code()
    }

    /// Classifier input vector `[age, gender_code, bmi]`.
    pub fn features(&self) -> Features {
        Features {
            age: self.age as f64,
            gender_code: f64::from(self.gender_code()),
            bmi: self.bmi,
        }
    }
}

impl ApplicantRequest {
    /// Encodes gender, converts height and weight to metric and computes BMI.
    ///
    /// # Errors
    ///
    /// * `AppError::Lookup` - gender is not "Female" or "Male".
    /// * `AppError::Parse` - weight is not an integer.
    /// * `AppError::Validation` - height is not a 3-digit code, or a zero height
    ///   leaves BMI non-finite.
    pub fn parse(&self) -> Result<ParsedApplicant, AppError> {
        let gender: Gender = self.gender.parse()?;
        let weight_metric = weight_to_metric(&self.wt)?;
        let height_metric = height_to_metric(&self.ht)?;

        let bmi = bmi(height_metric, weight_metric);
        if !bmi.is_finite() {
            return Err(AppError::Validation(format!(
                "bmi is {} for height '{}' and weight '{}'",
                bmi, self.ht, self.wt
            )));
        }

        Ok(ParsedApplicant {
            app_id: self.app_id,
            age: self.age,
            gender,
            height_metric,
            weight_metric,
            bmi,
            issue_date: self.issue_date.clone(),
        })
    }
}
