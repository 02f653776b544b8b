use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub weather: WeatherSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Directory holding the browser dashboard; empty disables static serving.
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: "web".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub settings_file: String,
    pub miners_file: String,
    pub pv_file: String,
    pub weather_daily_file: String,
    pub weather_hourly_file: String,
    /// Single-file daily forecast written by older installs.
    pub legacy_weather_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/config"),
            settings_file: "settings.json".to_string(),
            miners_file: "miners.json".to_string(),
            pv_file: "pv.json".to_string(),
            weather_daily_file: "weather-daily.json".to_string(),
            weather_hourly_file: "weather-hourly.json".to_string(),
            legacy_weather_file: "weather.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherSettings {
    pub base_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub forecast_days: u32,
    pub tilt: f64,
    pub azimuth: f64,
    pub timeout_secs: u64,
    pub default_max_age_minutes: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            latitude: 50.7374,
            longitude: 7.0982,
            timezone: "Europe/Berlin".to_string(),
            forecast_days: 14,
            tilt: 30.0,
            azimuth: 0.0,
            timeout_secs: 20,
            default_max_age_minutes: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub default_mining_min_battery_kwh: f64,
    pub default_battery_capacity_kwh: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_mining_min_battery_kwh: 15.0,
            default_battery_capacity_kwh: 49.9,
        }
    }
}

/// Load `config/dashboard.{toml,json,...}` if present, then apply
/// `DASHBOARD__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let cfg: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert_eq!(cfg.storage.data_dir, PathBuf::from("data/config"));
        assert_eq!(cfg.weather.timeout_secs, 20);
        assert_eq!(cfg.weather.default_max_age_minutes, 60);
        assert_eq!(cfg.dashboard.default_mining_min_battery_kwh, 15.0);
    }

    #[test]
    fn test_toml_overrides_partial_sections() {
        let toml = r#"
            [storage]
            data_dir = "/var/lib/plex"

            [weather]
            latitude = 48.1
            forecast_days = 7
        "#;
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.storage.data_dir, PathBuf::from("/var/lib/plex"));
        assert_eq!(cfg.storage.settings_file, "settings.json");
        assert_eq!(cfg.weather.latitude, 48.1);
        assert_eq!(cfg.weather.forecast_days, 7);
        assert_eq!(cfg.weather.timezone, "Europe/Berlin");
    }
}
