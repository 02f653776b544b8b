// Provider trait for upstream weather forecasts
use async_trait::async_trait;
use serde_json::Value;

/// Which forecast series to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastSeries {
    /// Sunshine duration and shortwave radiation sum per day
    Daily,
    /// Global tilted irradiance per hour
    Hourly,
}

/// Upstream failure: transport error, non-200 status or undecodable body.
/// `status` is 0 when no HTTP response was received.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("upstream responded with status {status}: {message}")]
pub struct ProviderError {
    pub status: u16,
    pub message: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the raw decoded JSON body for one series.
    async fn fetch(&self, series: ForecastSeries) -> Result<Value, ProviderError>;

    /// Short name reported in refresh results.
    fn source(&self) -> &str;
}
