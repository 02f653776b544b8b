// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_calculation, get_data, get_pv, get_settings, get_weather, get_weather_daily,
    get_weather_hourly, health_check, method_not_allowed, post_settings, weather_update,
};
use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// JSON API routes. Unsupported methods answer 405 with a JSON body.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check).fallback(method_not_allowed))
        .route(
            "/api/settings",
            get(get_settings).post(post_settings).fallback(method_not_allowed),
        )
        .route("/api/pv", get(get_pv).fallback(method_not_allowed))
        .route("/api/weather", get(get_weather).fallback(method_not_allowed))
        .route("/api/weather/daily", get(get_weather_daily).fallback(method_not_allowed))
        .route("/api/weather/hourly", get(get_weather_hourly).fallback(method_not_allowed))
        .route("/api/data", get(get_data).fallback(method_not_allowed))
        .route("/api/calculation", get(get_calculation).fallback(method_not_allowed))
        .route(
            "/api/weather_update",
            get(weather_update).post(weather_update).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// API routes plus the static dashboard client, with request tracing.
pub fn app_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let router = api_router(state);
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}
