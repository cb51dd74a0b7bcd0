//! BMI Insurance Quote API Library
//!
//! Converts applicant age, gender and imperial height/weight into a BMI, asks a
//! pre-trained classifier for a risk category and prices it from a fixed quote
//! table.
//!
//! # Modules
//!
//! - `api`: Router assembly and OpenAPI document.
//! - `classifier`: Classifier capability, rule-based classifier, startup loading.
//! - `config`: Configuration management.
//! - `conversion`: Imperial-to-metric conversion and BMI.
//! - `errors`: Error handling types.
//! - `gbdt`: Gradient boosted tree model decoded from a JSON artifact.
//! - `handlers`: HTTP request handlers and shared state.
//! - `model_artifact`: Model file reading and checksum verification.
//! - `models`: Request, response and applicant types.
//! - `prediction_cache`: Memoized classifier output.
//! - `quote`: Category-to-quote table.

pub mod api;
pub mod classifier;
pub mod config;
pub mod conversion;
pub mod errors;
pub mod gbdt;
pub mod handlers;
pub mod model_artifact;
pub mod models;
pub mod prediction_cache;
pub mod quote;
