// Open-Meteo forecast provider
use crate::application::weather_provider::{ForecastSeries, ProviderError, WeatherProvider};
use crate::infrastructure::config::WeatherSettings;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: reqwest::Client,
    settings: WeatherSettings,
}

impl OpenMeteoProvider {
    pub fn new(settings: WeatherSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }

    fn build_url(&self, series: ForecastSeries) -> String {
        let s = &self.settings;
        let selection = match series {
            ForecastSeries::Daily => "daily=sunshine_duration,shortwave_radiation_sum".to_string(),
            ForecastSeries::Hourly => format!(
                "hourly=global_tilted_irradiance&tilt={}&azimuth={}",
                s.tilt, s.azimuth
            ),
        };
        format!(
            "{}?latitude={}&longitude={}&{}&timezone={}&forecast_days={}",
            s.base_url.trim_end_matches('/'),
            s.latitude,
            s.longitude,
            selection,
            urlencoding::encode(&s.timezone),
            s.forecast_days
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch(&self, series: ForecastSeries) -> Result<Value, ProviderError> {
        let url = self.build_url(series);
        tracing::debug!(?series, %url, "Requesting forecast");

        let response = self.client.get(&url).send().await.map_err(|e| ProviderError {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Forecast request failed: {}", body);
            return Err(ProviderError {
                status: status.as_u16(),
                message: "http error".to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| ProviderError {
            status: status.as_u16(),
            message: format!("invalid JSON body: {e}"),
        })
    }

    fn source(&self) -> &str {
        "open-meteo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_daily_url() {
        let provider = OpenMeteoProvider::new(WeatherSettings::default()).unwrap();
        assert_eq!(
            provider.build_url(ForecastSeries::Daily),
            "https://api.open-meteo.com/v1/forecast?latitude=50.7374&longitude=7.0982\
             &daily=sunshine_duration,shortwave_radiation_sum&timezone=Europe%2FBerlin&forecast_days=14"
        );
    }

    #[test]
    fn test_build_hourly_url() {
        let provider = OpenMeteoProvider::new(WeatherSettings {
            base_url: "http://localhost:9000/v1/forecast/".to_string(),
            forecast_days: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.build_url(ForecastSeries::Hourly),
            "http://localhost:9000/v1/forecast?latitude=50.7374&longitude=7.0982\
             &hourly=global_tilted_irradiance&tilt=30&azimuth=0&timezone=Europe%2FBerlin&forecast_days=3"
        );
    }
}
