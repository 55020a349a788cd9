use analytics::AnalyticsContext;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use configuration::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AnalyticsContext>,
}

impl AppState {
    pub fn new(context: AnalyticsContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

/// Builds the analytics context from the configured data sources.
///
/// The catalog file is required. The price series falls back to the synthetic
/// generator when no candidate file is usable.
pub fn load_context(settings: &Settings) -> anyhow::Result<AnalyticsContext> {
    let catalog = configuration::load_catalog(&settings.data.catalog_path).with_context(|| {
        format!(
            "failed to load catalog from {}",
            settings.data.catalog_path.display()
        )
    })?;
    let series = market_data::load_series(&settings.data.candidate_paths)?;
    tracing::info!(source = %series.source, records = series.records.len(), "Price data ready.");

    Ok(AnalyticsContext::new(
        series.records,
        catalog,
        settings.analysis.clone(),
    ))
}

/// Defines the application routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/prices", get(handlers::get_prices))
        .route("/api/prices/:start_date/:end_date", get(handlers::get_prices_by_date))
        .route("/api/change_points", get(handlers::get_change_points))
        .route("/api/events", get(handlers::get_events))
        .route("/api/event_correlation/:event_id", get(handlers::get_event_correlation))
        .route("/api/volatility", get(handlers::get_volatility))
        .route("/api/summary_stats", get(handlers::get_summary_stats))
        .route("/api/price_impact", post(handlers::post_price_impact))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `addr` until Ctrl-C.
pub async fn run_server(addr: SocketAddr, context: AnalyticsContext) -> anyhow::Result<()> {
    // Tracing is initialized by the binary; nothing to set up here.
    let app = build_router(Arc::new(AppState::new(context)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
    }
}
