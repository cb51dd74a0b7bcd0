//! HTTP surface: routes, middleware and the generated OpenAPI document.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{self, AppState};
use crate::models::{ApplicantRequest, QuoteResponse};

/// Applicant payloads are a handful of short fields.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::bmi_predict, handlers::health),
    components(schemas(ApplicantRequest, QuoteResponse)),
    tags(
        (name = "quotes", description = "BMI based insurance quotes"),
        (name = "service", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

/// Prediction routes, without state. The server binary layers rate limiting on top.
pub fn prediction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bmi_predict/", post(handlers::bmi_predict))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Assembles the full application around the given prediction routes.
pub fn app(state: Arc<AppState>, prediction_routes: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(prediction_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Application with default prediction routes and no rate limiting.
pub fn router(state: Arc<AppState>) -> Router {
    app(state, prediction_routes())
}
