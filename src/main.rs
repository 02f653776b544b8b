// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::settings_service::SettingsService;
use crate::application::weather_refresh::WeatherRefreshService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_store::JsonFileStore;
use crate::infrastructure::open_meteo::OpenMeteoProvider;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::app_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create store and weather provider (infrastructure layer)
    let store = Arc::new(JsonFileStore::new(config.storage.clone()));
    let provider = Arc::new(OpenMeteoProvider::new(config.weather.clone())?);

    // Create services (application layer)
    let state = Arc::new(AppState {
        settings_service: SettingsService::new(store.clone()),
        dashboard_service: DashboardService::new(
            store.clone(),
            config.dashboard.default_mining_min_battery_kwh,
        ),
        weather_refresh: WeatherRefreshService::new(store, provider),
        default_max_age_minutes: config.weather.default_max_age_minutes,
        default_battery_capacity_kwh: config.dashboard.default_battery_capacity_kwh,
    });

    // Build router (presentation layer)
    let static_dir = Some(Path::new(&config.server.static_dir)).filter(|d| !d.as_os_str().is_empty());
    let router = app_router(state, static_dir);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        %addr,
        data_dir = %config.storage.data_dir.display(),
        "Starting plex-dashboard service"
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
