// HTTP request handlers
use crate::application::calculation::forecast_stub;
use crate::application::weather_refresh::RefreshRequest;
use crate::infrastructure::http_response::json_ok;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::views::{refresh_outcome_body, DataResponse};
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WeatherQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct WeatherUpdateQuery {
    pub force: Option<String>,
    pub max_age_min: Option<String>,
    pub max_age_hours: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let settings = state.settings_service.get().await?;
    Ok(json_ok(&settings))
}

/// Replace settings with the sanitized request body
pub async fn post_settings(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let input: Value = serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?;
    state.settings_service.replace(&input).await?;
    Ok(json_ok(&json!({"ok": true})))
}

pub async fn get_pv(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let pv = state.dashboard_service.pv().await?;
    Ok(json_ok(&pv))
}

/// Stored forecast series; `type=hourly` selects hourly, anything else is daily
pub async fn get_weather(
    Query(query): Query<WeatherQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    match query.kind.as_deref() {
        Some("hourly") => get_weather_hourly(State(state)).await,
        _ => get_weather_daily(State(state)).await,
    }
}

pub async fn get_weather_daily(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let records = state.dashboard_service.weather_daily().await?;
    Ok(json_ok(&records))
}

pub async fn get_weather_hourly(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let records = state.dashboard_service.weather_hourly().await?;
    Ok(json_ok(&records))
}

/// Combined dashboard payload with all derived fields
pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let data = state.dashboard_service.load().await?;
    Ok(json_ok(&DataResponse::new(data, state.default_battery_capacity_kwh)))
}

pub async fn get_calculation() -> Response {
    json_ok(&forecast_stub())
}

/// Refresh the weather files unless the stored copy is still fresh
pub async fn weather_update(
    Query(query): Query<WeatherUpdateQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let request = RefreshRequest::from_params(
        query.force.as_deref(),
        query.max_age_min.as_deref(),
        query.max_age_hours.as_deref(),
        state.default_max_age_minutes,
    );
    let outcome = state.weather_refresh.refresh(request).await?;
    Ok(json_ok(&refresh_outcome_body(&outcome)))
}
