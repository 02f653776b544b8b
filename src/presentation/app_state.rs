// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::settings_service::SettingsService;
use crate::application::weather_refresh::WeatherRefreshService;

#[derive(Clone)]
pub struct AppState {
    pub settings_service: SettingsService,
    pub dashboard_service: DashboardService,
    pub weather_refresh: WeatherRefreshService,
    pub default_max_age_minutes: u64,
    pub default_battery_capacity_kwh: f64,
}
