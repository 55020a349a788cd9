use crate::{error::AppError, AppState};
use analytics::{
    AnalyticsError, EventCorrelation, ImpactWindow, SummaryStatistics, VolatilityReport,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};
use std::num::IntErrorKind;
use std::sync::Arc;

/// Every route the API serves, listed by the index endpoint.
pub const ENDPOINTS: [&str; 8] = [
    "/api/prices",
    "/api/prices/<start_date>/<end_date>",
    "/api/change_points",
    "/api/events",
    "/api/event_correlation/<event_id>",
    "/api/volatility",
    "/api/summary_stats",
    "/api/price_impact",
];

#[derive(Debug, Deserialize)]
pub struct PriceImpactRequest {
    pub event_date: String,
    #[serde(default)]
    pub window_days: Option<i64>,
}

/// # GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Brent Oil Prices Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ENDPOINTS,
    }))
}

/// # GET /api/prices
/// The full series is serialized straight from the shared context.
pub async fn get_prices(State(state): State<Arc<AppState>>) -> Response {
    Json(state.context.prices()).into_response()
}

/// # GET /api/prices/:start_date/:end_date
pub async fn get_prices_by_date(
    Path((start_date, end_date)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let filtered = state.context.filter_by_date(&start_date, &end_date)?;
    Ok(Json(filtered).into_response())
}

/// # GET /api/change_points
pub async fn get_change_points(State(state): State<Arc<AppState>>) -> Response {
    Json(state.context.change_points()).into_response()
}

/// # GET /api/events
pub async fn get_events(State(state): State<Arc<AppState>>) -> Response {
    Json(state.context.events()).into_response()
}

/// # GET /api/event_correlation/:event_id
pub async fn get_event_correlation(
    Path(event_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventCorrelation>, AppError> {
    let Some(id) = parse_event_id(&event_id)? else {
        return Err(AppError::NotFound("Event not found".to_string()));
    };
    let correlation = state.context.event_correlation(id)?;
    Ok(Json(correlation))
}

/// Any integer is a well-formed id; one the catalog's `u32` ids cannot hold
/// yields `None` and is reported like any other unknown event.
fn parse_event_id(raw: &str) -> Result<Option<u32>, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) => Ok(u32::try_from(id).ok()),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(None)
        }
        Err(_) => Err(AppError::BadRequest(format!("Invalid event id '{}'", raw))),
    }
}

/// # GET /api/volatility
/// A series too short to measure is answered with zeros rather than an error.
pub async fn get_volatility(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VolatilityReport>, AppError> {
    match state.context.volatility() {
        Ok(report) => Ok(Json(report)),
        Err(AnalyticsError::NotEnoughData(reason)) => {
            tracing::warn!(%reason, "Serving zeroed volatility.");
            Ok(Json(VolatilityReport::zeroed()))
        }
        Err(e) => Err(e.into()),
    }
}

/// # GET /api/summary_stats
/// An empty series is answered with a zero-valued summary.
pub async fn get_summary_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryStatistics>, AppError> {
    let context = &state.context;
    match context.summary() {
        Ok(summary) => Ok(Json(summary)),
        Err(AnalyticsError::NotEnoughData(reason)) => {
            tracing::warn!(%reason, "Serving zeroed summary statistics.");
            Ok(Json(SummaryStatistics::zeroed(
                context.events().len(),
                context.change_points().len(),
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// # POST /api/price_impact
/// Body: `{"event_date": "YYYY-MM-DD", "window_days": 30}`. Answers `null` when
/// the window holds no prices.
pub async fn post_price_impact(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<PriceImpactRequest>, AppError>,
) -> Result<Json<ImpactWindow>, AppError> {
    let impact = state
        .context
        .event_impact(&request.event_date, request.window_days)?;
    Ok(Json(impact))
}

/// Any unknown route.
pub async fn fallback() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
