// Weather refresh job - pull forecasts when the stored copy is stale
use crate::application::config_store::{ConfigStore, Resource, StoreError};
use crate::application::weather_provider::{ForecastSeries, ProviderError, WeatherProvider};
use crate::domain::format::round_to;
use crate::domain::lenient::as_number;
use crate::domain::weather::{WeatherDailyRecord, WeatherHourlyRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

/// Freshness controls for one refresh call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub force: bool,
    pub max_age_minutes: u64,
}

impl RefreshRequest {
    /// Build from raw query parameters. `max_age_hours` wins over
    /// `max_age_min`. Only the leading integer of a value is read
    /// (`"5.5"` is 5, `"2h"` is 2); anything without one, or negative, counts as 0.
    pub fn from_params(
        force: Option<&str>,
        max_age_min: Option<&str>,
        max_age_hours: Option<&str>,
        default_max_age_minutes: u64,
    ) -> Self {
        let force = matches!(force, Some("true") | Some("1"));
        let max_age_minutes = match (max_age_hours, max_age_min) {
            (Some(hours), _) => non_negative(hours).saturating_mul(60),
            (None, Some(minutes)) => non_negative(minutes),
            (None, None) => default_max_age_minutes,
        };
        Self {
            force,
            max_age_minutes,
        }
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_minutes.saturating_mul(60)
    }
}

fn non_negative(raw: &str) -> u64 {
    let raw = raw.trim_start();
    if raw.starts_with('-') {
        return 0;
    }
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh {
        daily_age_seconds: u64,
        hourly_age_seconds: u64,
    },
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Skipped {
        daily_age_seconds: u64,
        hourly_age_seconds: u64,
        max_age_seconds: u64,
    },
    Updated {
        daily_count: usize,
        hourly_count: usize,
        daily_file: String,
        hourly_file: String,
        max_age_minutes: u64,
        forced: bool,
        source: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("daily forecast fetch failed: {0}")]
    DailyFetch(ProviderError),
    #[error("hourly forecast fetch failed: {0}")]
    HourlyFetch(ProviderError),
    #[error("unexpected daily format: {0}")]
    DailyFormat(String),
    #[error("unexpected hourly format: {0}")]
    HourlyFormat(String),
    #[error("failed to write weather data: {0}")]
    Write(#[from] StoreError),
}

#[derive(Clone)]
pub struct WeatherRefreshService {
    store: Arc<dyn ConfigStore>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherRefreshService {
    pub fn new(store: Arc<dyn ConfigStore>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { store, provider }
    }

    /// Both files must exist and be younger than the max age to count as fresh.
    pub async fn check(&self, request: &RefreshRequest, now: DateTime<Utc>) -> Freshness {
        if request.force {
            return Freshness::Stale;
        }

        let daily = self.age_seconds(Resource::WeatherDaily, now).await;
        let hourly = self.age_seconds(Resource::WeatherHourly, now).await;
        let max_age = request.max_age_seconds();

        match (daily, hourly) {
            (Some(daily), Some(hourly)) if daily < max_age && hourly < max_age => Freshness::Fresh {
                daily_age_seconds: daily,
                hourly_age_seconds: hourly,
            },
            _ => Freshness::Stale,
        }
    }

    pub async fn refresh(&self, request: RefreshRequest) -> Result<RefreshOutcome, RefreshError> {
        self.refresh_at(request, Utc::now()).await
    }

    pub async fn refresh_at(
        &self,
        request: RefreshRequest,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, RefreshError> {
        if let Freshness::Fresh {
            daily_age_seconds,
            hourly_age_seconds,
        } = self.check(&request, now).await
        {
            tracing::info!(
                daily_age_seconds,
                hourly_age_seconds,
                "Weather cache fresh, skipping refresh"
            );
            return Ok(RefreshOutcome::Skipped {
                daily_age_seconds,
                hourly_age_seconds,
                max_age_seconds: request.max_age_seconds(),
            });
        }

        tracing::info!(forced = request.force, source = self.provider.source(), "Refreshing weather forecast");

        let (daily, hourly) = futures::future::join(
            self.provider.fetch(ForecastSeries::Daily),
            self.provider.fetch(ForecastSeries::Hourly),
        )
        .await;
        let daily = require_object(daily).map_err(RefreshError::DailyFetch)?;
        let hourly = require_object(hourly).map_err(RefreshError::HourlyFetch)?;

        let daily = reshape_daily(&daily)?;
        let hourly = reshape_hourly(&hourly)?;

        self.store.save_weather_daily(&daily).await?;
        self.store.save_weather_hourly(&hourly).await?;

        tracing::info!(
            daily_count = daily.len(),
            hourly_count = hourly.len(),
            "Weather forecast updated"
        );

        Ok(RefreshOutcome::Updated {
            daily_count: daily.len(),
            hourly_count: hourly.len(),
            daily_file: self.store.file_name(Resource::WeatherDaily),
            hourly_file: self.store.file_name(Resource::WeatherHourly),
            max_age_minutes: request.max_age_minutes,
            forced: request.force,
            source: self.provider.source().to_string(),
        })
    }

    async fn age_seconds(&self, resource: Resource, now: DateTime<Utc>) -> Option<u64> {
        let modified = self.store.modified_at(resource).await?;
        Some((now - modified).num_seconds().max(0) as u64)
    }
}

fn require_object(body: Result<Value, ProviderError>) -> Result<Value, ProviderError> {
    match body? {
        body @ Value::Object(_) => Ok(body),
        _ => Err(ProviderError {
            status: 200,
            message: "response body is not a JSON object".to_string(),
        }),
    }
}

/// Column `name` of an Open-Meteo style `{ "<block>": { "time": [...], ... } }` body.
fn column<'a>(body: &'a Value, block: &str, name: &str) -> &'a [Value] {
    body[block][name].as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Turn the parallel `daily.*` arrays into one record per date.
/// Sunshine duration arrives in seconds and is stored in hours.
pub fn reshape_daily(body: &Value) -> Result<Vec<WeatherDailyRecord>, RefreshError> {
    let Some(times) = body["daily"]["time"].as_array() else {
        return Err(RefreshError::DailyFormat("missing daily.time".to_string()));
    };
    let sunshine = column(body, "daily", "sunshine_duration");
    let radiation = column(body, "daily", "shortwave_radiation_sum");

    Ok(times
        .iter()
        .enumerate()
        .map(|(i, time)| WeatherDailyRecord {
            date: time.as_str().map(str::to_string),
            sunshine_hours: sunshine.get(i).and_then(as_number).map(|s| round_to(s / 3600.0, 2)),
            shortwave_radiation_sum_wh_m2: radiation.get(i).and_then(as_number),
            pv_energy_kwh: None,
        })
        .collect())
}

pub fn reshape_hourly(body: &Value) -> Result<Vec<WeatherHourlyRecord>, RefreshError> {
    let Some(times) = body["hourly"]["time"].as_array() else {
        return Err(RefreshError::HourlyFormat("missing hourly.time".to_string()));
    };
    let irradiance = column(body, "hourly", "global_tilted_irradiance");

    Ok(times
        .iter()
        .enumerate()
        .map(|(i, time)| WeatherHourlyRecord {
            datetime: time.as_str().map(str::to_string),
            global_tilted_irradiance: irradiance.get(i).and_then(as_number),
            pv_energy_kwh: None,
        })
        .collect())
}
