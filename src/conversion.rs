//! Imperial-to-metric conversion and BMI.

use crate::errors::AppError;

/// Kilograms per pound.
pub const KG_PER_POUND: f64 = 0.453592;
/// Meters per inch.
pub const METERS_PER_INCH: f64 = 0.0254;

/// Converts a whole-pound weight string to kilograms.
///
/// Surrounding whitespace is ignored. Any other non-integer input is rejected.
///
/// # Errors
///
/// * `AppError::Parse` - the string is not an integer.
pub fn weight_to_metric(pounds: &str) -> Result<f64, AppError> {
    let pounds: i64 = pounds
        .trim()
        .parse()
        .map_err(|e| AppError::Parse(format!("weight '{}' is not an integer: {}", pounds, e)))?;

    Ok(pounds as f64 * KG_PER_POUND)
}

/// Converts a 3-character height code to meters.
///
/// The first digit is feet and the remaining two are inches: "510" is 5'10",
/// "503" is 5'3". Inch values above 11 are not rejected and simply add up.
///
/// # Errors
///
/// * `AppError::Validation` - the code is not exactly 3 ASCII digits.
pub fn height_to_metric(code: &str) -> Result<f64, AppError> {
    if code.chars().count() != 3 {
        return Err(AppError::Validation(format!(
            "height code '{}' must be 3 characters long",
            code
        )));
    }
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "height code '{}' must contain only digits",
            code
        )));
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let feet = digits[0];
    let inches = digits[1] * 10 + digits[2];
    let total_inches = feet * 12 + inches;

    Ok(f64::from(total_inches) * METERS_PER_INCH)
}

/// Body mass index, kg/m².
///
/// A zero height is not guarded and yields `inf` (or `NaN` for zero weight).
pub fn bmi(height_m: f64, weight_kg: f64) -> f64 {
    weight_kg / height_m.powi(2)
}
