use crate::classifier::Classifier;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{ApplicantRequest, QuoteResponse};
use crate::prediction_cache::PredictionCache;
use crate::quote::resolve_quote;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Classifier loaded once at startup; read-only afterwards.
    pub classifier: Arc<dyn Classifier>,
    /// Memoized predictions keyed by feature vector.
    pub prediction_cache: PredictionCache,
}

impl AppState {
    pub fn new(
        config: Config,
        classifier: Arc<dyn Classifier>,
        prediction_cache: PredictionCache,
    ) -> Self {
        Self {
            config,
            classifier,
            prediction_cache,
        }
    }
}

/// Health check endpoint.
///
/// Returns the service status, version and which classifier is serving.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is healthy"))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "bmi-quote-api",
            "version": env!("CARGO_PKG_VERSION"),
            "classifier": state.classifier.name(),
        })),
    )
}

/// POST /bmi_predict/
///
/// Converts the applicant's imperial measurements, computes BMI, asks the
/// classifier for a risk category and prices it from the quote table.
///
/// Any failure along the way answers HTTP 200 with
/// `{"quote": null, "reason": "Internal Error"}`.
#[utoipa::path(
    post,
    path = "/bmi_predict/",
    tag = "quotes",
    request_body = ApplicantRequest,
    responses(
        (status = 200, description = "Quote, or the generic failure payload", body = QuoteResponse)
    )
)]
pub async fn bmi_predict(
    State(state): State<Arc<AppState>>,
    Json(applicant): Json<ApplicantRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    tracing::info!("POST /bmi_predict/ - app_id: {}", applicant.app_id);

    let parsed = applicant.parse()?;
    tracing::debug!(
        "Applicant {}: age {}, gender {}, height {:.4} m, weight {:.4} kg, bmi {:.2}",
        parsed.app_id,
        parsed.age,
        parsed.gender,
        parsed.height_metric,
        parsed.weight_metric,
        parsed.bmi
    );

    let category = state
        .prediction_cache
        .get_or_predict(state.classifier.as_ref(), &parsed.features())
        .await?;
    let quote = resolve_quote(category, parsed.gender.is_female())?;

    tracing::info!(
        "Quoted app_id {}: category {:?}, amount {}",
        parsed.app_id,
        quote.category,
        quote.amount
    );

    Ok(Json(QuoteResponse::success(
        parsed.app_id,
        quote.amount,
        quote.reason,
    )))
}
