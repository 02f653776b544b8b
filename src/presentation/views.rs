// Response bodies - raw derived values plus German-formatted display strings
use crate::application::calculation::ForecastStub;
use crate::application::dashboard_service::DashboardData;
use crate::application::weather_refresh::RefreshOutcome;
use crate::domain::format::format_de;
use crate::domain::miner::DerivedMiner;
use crate::domain::pv::{PvCalculated, PvSnapshot};
use crate::domain::settings::Settings;
use crate::domain::weather::{WeatherAggregate, WeatherDailyRecord, WeatherHourlyRecord};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub settings: Settings,
    pub miners: Vec<DerivedMiner>,
    pub weather_daily: Vec<WeatherDailyRecord>,
    pub weather_hourly: Vec<WeatherHourlyRecord>,
    pub pv: PvView,
    pub calculation: ForecastStub,
    pub mtimes: BTreeMap<&'static str, Option<i64>>,
    pub weather_aggregations: BTreeMap<String, AggregateView>,
}

#[derive(Debug, Serialize)]
pub struct PvView {
    #[serde(flatten)]
    pub snapshot: PvSnapshot,
    pub calculated: PvCalculatedView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvCalculatedView {
    #[serde(flatten)]
    pub values: PvCalculated,
    pub mining_status_text: String,
    pub mining_status_class: &'static str,
    #[serde(rename = "formatted_pv_power")]
    pub formatted_pv_power: String,
    #[serde(rename = "formatted_battery_kwh")]
    pub formatted_battery_kwh: String,
    #[serde(rename = "formatted_battery_capacity")]
    pub formatted_battery_capacity: String,
    #[serde(rename = "formatted_mining_min_battery")]
    pub formatted_mining_min_battery: String,
    #[serde(rename = "formatted_haus_last")]
    pub formatted_haus_last: String,
    #[serde(rename = "formatted_available_power")]
    pub formatted_available_power: String,
}

impl PvCalculatedView {
    pub fn new(
        pv: &PvSnapshot,
        values: PvCalculated,
        mining_min_battery_kwh: f64,
        capacity_fallback_kwh: f64,
    ) -> Self {
        let (mining_status_text, mining_status_class) = if values.mining_possible {
            (format!("{} kWh", format_de(values.battery_difference, 1)), "text-success")
        } else {
            ("nix".to_string(), "text-danger")
        };

        Self {
            values,
            mining_status_text,
            mining_status_class,
            formatted_pv_power: format_de(pv.pv_power_w(), 0),
            formatted_battery_kwh: format_de(pv.battery_kwh(), 1),
            formatted_battery_capacity: format_de(
                pv.battery_capacity_kwh().unwrap_or(capacity_fallback_kwh),
                1,
            ),
            formatted_mining_min_battery: format_de(mining_min_battery_kwh, 1),
            formatted_haus_last: format_de(pv.house_load_w(), 0),
            formatted_available_power: format_de(values.available_power, 0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AggregateView {
    #[serde(flatten)]
    pub values: WeatherAggregate,
    pub formatted: FormattedAggregate,
}

#[derive(Debug, Serialize)]
pub struct FormattedAggregate {
    pub sunshine_hours: String,
    pub radiation_sum: String,
    pub pv_energy: String,
}

impl From<WeatherAggregate> for AggregateView {
    fn from(values: WeatherAggregate) -> Self {
        Self {
            formatted: FormattedAggregate {
                sunshine_hours: format_de(values.sunshine_hours, 2),
                radiation_sum: format_de(values.radiation_sum, 0),
                pv_energy: format_de(values.pv_energy, 2),
            },
            values,
        }
    }
}

impl DataResponse {
    pub fn new(data: DashboardData, capacity_fallback_kwh: f64) -> Self {
        let calculated = PvCalculatedView::new(
            &data.pv,
            data.pv_calculated,
            data.mining_min_battery_kwh,
            capacity_fallback_kwh,
        );

        Self {
            settings: data.settings,
            miners: data.miners,
            weather_daily: data.weather_daily,
            weather_hourly: data.weather_hourly,
            pv: PvView {
                snapshot: data.pv,
                calculated,
            },
            calculation: data.calculation,
            mtimes: data.mtimes,
            weather_aggregations: data
                .weather_aggregations
                .into_iter()
                .map(|(label, agg)| (label, agg.into()))
                .collect(),
        }
    }
}

pub fn refresh_outcome_body(outcome: &RefreshOutcome) -> Value {
    match outcome {
        RefreshOutcome::Skipped {
            daily_age_seconds,
            hourly_age_seconds,
            max_age_seconds,
        } => json!({
            "ok": true,
            "skipped": true,
            "reason": "cache_fresh",
            "daily_age_seconds": daily_age_seconds,
            "hourly_age_seconds": hourly_age_seconds,
            "max_age_seconds": max_age_seconds,
        }),
        RefreshOutcome::Updated {
            daily_count,
            hourly_count,
            daily_file,
            hourly_file,
            max_age_minutes,
            forced,
            source,
        } => json!({
            "ok": true,
            "updated": true,
            "daily_count": daily_count,
            "hourly_count": hourly_count,
            "daily_file": daily_file,
            "hourly_file": hourly_file,
            "max_age_minutes": max_age_minutes,
            "forced": forced,
            "source": source,
        }),
    }
}
