// Dashboard service - load every stored document and derive the combined view
use crate::application::calculation::{forecast_stub, ForecastStub};
use crate::application::config_store::{ConfigStore, Resource, StoreError};
use crate::application::derivation::{
    derive_daily_pv, derive_hourly_pv, derive_miner_fields, derive_pv_calculated,
    derive_weather_aggregates, DEFAULT_HORIZONS,
};
use crate::domain::miner::{DerivedMiner, Miner};
use crate::domain::pv::{PvCalculated, PvSnapshot};
use crate::domain::settings::Settings;
use crate::domain::weather::{WeatherAggregate, WeatherDailyRecord, WeatherHourlyRecord};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything the dashboard renders, with derived fields filled in.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub settings: Settings,
    pub miners: Vec<DerivedMiner>,
    pub weather_daily: Vec<WeatherDailyRecord>,
    pub weather_hourly: Vec<WeatherHourlyRecord>,
    pub pv: PvSnapshot,
    pub pv_calculated: PvCalculated,
    pub mining_min_battery_kwh: f64,
    pub calculation: ForecastStub,
    /// Epoch seconds per resource key, `None` for missing files.
    pub mtimes: BTreeMap<&'static str, Option<i64>>,
    pub weather_aggregations: BTreeMap<String, WeatherAggregate>,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn ConfigStore>,
    default_mining_min_battery_kwh: f64,
}

impl DashboardService {
    pub fn new(store: Arc<dyn ConfigStore>, default_mining_min_battery_kwh: f64) -> Self {
        Self {
            store,
            default_mining_min_battery_kwh,
        }
    }

    pub async fn pv(&self) -> Result<PvSnapshot, StoreError> {
        self.store.load_pv().await
    }

    pub async fn weather_daily(&self) -> Result<Vec<WeatherDailyRecord>, StoreError> {
        self.store.load_weather_daily().await
    }

    pub async fn weather_hourly(&self) -> Result<Vec<WeatherHourlyRecord>, StoreError> {
        self.store.load_weather_hourly().await
    }

    /// Miners embedded in settings win over the standalone legacy file.
    pub async fn miners(&self, settings: &Settings) -> Result<Vec<Miner>, StoreError> {
        match &settings.miners {
            Some(miners) => Ok(miners.clone()),
            None => self.store.load_legacy_miners().await,
        }
    }

    pub async fn load(&self) -> Result<DashboardData, StoreError> {
        let settings = self.store.load_settings().await?;
        let miners = derive_miner_fields(self.miners(&settings).await?);

        let mut weather_daily = self.store.load_weather_daily().await?;
        let mut weather_hourly = self.store.load_weather_hourly().await?;
        if let Some((pv_kwp, pv_factor)) = settings.pv_parameters() {
            weather_daily = derive_daily_pv(weather_daily, pv_kwp, pv_factor);
            weather_hourly = derive_hourly_pv(weather_hourly, pv_kwp, pv_factor);
        }
        let weather_aggregations = derive_weather_aggregates(&weather_daily, &DEFAULT_HORIZONS);

        let pv = self.store.load_pv().await?;
        let mining_min_battery_kwh = settings
            .mining_min_battery_kwh
            .unwrap_or(self.default_mining_min_battery_kwh);
        let pv_calculated = derive_pv_calculated(&pv, mining_min_battery_kwh);

        let mut mtimes = BTreeMap::new();
        for resource in Resource::ALL {
            let modified = self.store.read_modified_at(resource).await;
            mtimes.insert(resource.key(), modified.map(|t| t.timestamp()));
        }

        Ok(DashboardData {
            settings,
            miners,
            weather_daily,
            weather_hourly,
            pv,
            pv_calculated,
            mining_min_battery_kwh,
            calculation: forecast_stub(),
            mtimes,
            weather_aggregations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config_store::memory::MemoryStore;
    use crate::domain::pv::BatteryState;
    use chrono::{TimeZone, Utc};

    fn miner(model: &str, hashrate: f64) -> Miner {
        Miner {
            model: Some(model.to_string()),
            hashrate: Some(hashrate),
            power_kw: Some(3.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_settings_miners_take_precedence() {
        let store = Arc::new(MemoryStore::default());
        *store.legacy_miners.lock().unwrap() = vec![miner("legacy", 10.0)];
        let service = DashboardService::new(store.clone(), 15.0);

        let data = service.load().await.unwrap();
        assert_eq!(data.miners[0].miner.model.as_deref(), Some("legacy"));

        store.settings.lock().unwrap().miners = Some(vec![miner("S21", 200.0), miner("S19", 95.0)]);
        let data = service.load().await.unwrap();
        assert_eq!(data.miners.len(), 2);
        assert_eq!(data.miners[1].cumulative_hashrate, Some(295.0));
    }

    #[tokio::test]
    async fn test_pv_energy_requires_both_parameters() {
        let store = Arc::new(MemoryStore::default());
        *store.daily.lock().unwrap() = vec![WeatherDailyRecord {
            shortwave_radiation_sum_wh_m2: Some(1000.0),
            ..Default::default()
        }];
        *store.hourly.lock().unwrap() = vec![WeatherHourlyRecord {
            global_tilted_irradiance: Some(500.0),
            ..Default::default()
        }];
        store.settings.lock().unwrap().pv_kwp = Some(10.0);
        let service = DashboardService::new(store.clone(), 15.0);

        let data = service.load().await.unwrap();
        assert_eq!(data.weather_daily[0].pv_energy_kwh, None);
        assert_eq!(data.weather_aggregations["today"].pv_energy, 0.0);

        store.settings.lock().unwrap().pv_system_factor = Some(0.8);
        let data = service.load().await.unwrap();
        assert_eq!(data.weather_daily[0].pv_energy_kwh, Some(8.0));
        assert_eq!(data.weather_hourly[0].pv_energy_kwh, Some(4.0));
        assert_eq!(data.weather_aggregations["today"].pv_energy, 8.0);
    }

    #[tokio::test]
    async fn test_mining_threshold_falls_back_to_default() {
        let store = Arc::new(MemoryStore::default());
        *store.pv.lock().unwrap() = PvSnapshot {
            batterie_stand: Some(BatteryState {
                kwh: Some(12.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let service = DashboardService::new(store.clone(), 15.0);

        let data = service.load().await.unwrap();
        assert_eq!(data.mining_min_battery_kwh, 15.0);
        assert!(!data.pv_calculated.mining_possible);

        store.settings.lock().unwrap().mining_min_battery_kwh = Some(10.0);
        let data = service.load().await.unwrap();
        assert!(data.pv_calculated.mining_possible);
        assert_eq!(data.pv_calculated.battery_difference, 2.0);
    }

    #[tokio::test]
    async fn test_mtimes_cover_every_resource() {
        let store = Arc::new(MemoryStore::default());
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        store.touch(Resource::Pv, at);
        let service = DashboardService::new(store, 15.0);

        let data = service.load().await.unwrap();
        assert_eq!(data.mtimes.len(), 5);
        assert_eq!(data.mtimes["pv"], Some(at.timestamp()));
        assert_eq!(data.mtimes["settings"], None);
    }
}
