use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bmi_quote_api::api;
use bmi_quote_api::classifier::load_classifier;
use bmi_quote_api::config::Config;
use bmi_quote_api::handlers::AppState;
use bmi_quote_api::prediction_cache::PredictionCache;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The classifier (loaded once, shared read-only by every request).
/// - The prediction cache.
/// - HTTP routes and middleware (CORS, body limit, rate limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bmi_quote_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let classifier = load_classifier(&config)?;
    tracing::info!("Classifier ready: {}", classifier.name());

    let prediction_cache = PredictionCache::new(
        Duration::from_secs(config.prediction_cache_ttl_secs),
        config.prediction_cache_capacity,
    );
    if prediction_cache.is_enabled() {
        tracing::info!(
            "Prediction cache initialized ({}s TTL, {} capacity)",
            config.prediction_cache_ttl_secs,
            config.prediction_cache_capacity
        );
    } else {
        tracing::info!("Prediction cache disabled");
    }

    let port = config.port;
    let app_state = Arc::new(AppState::new(config, classifier, prediction_cache));

    // Configure rate limiter: 50 requests/second per IP, burst of 100
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(50)
            .burst_size(100)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let prediction_routes = api::prediction_routes().layer(GovernorLayer {
        config: governor_conf,
    });
    let app = api::app(app_state, prediction_routes);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
