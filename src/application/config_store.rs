// Repository trait for the JSON config store
use crate::domain::miner::Miner;
use crate::domain::pv::PvSnapshot;
use crate::domain::settings::Settings;
use crate::domain::weather::{WeatherDailyRecord, WeatherHourlyRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Settings,
    Miners,
    Pv,
    WeatherDaily,
    WeatherHourly,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Settings,
        Resource::Miners,
        Resource::WeatherDaily,
        Resource::WeatherHourly,
        Resource::Pv,
    ];

    /// Key used for this resource in API payloads.
    pub fn key(self) -> &'static str {
        match self {
            Resource::Settings => "settings",
            Resource::Miners => "miners",
            Resource::Pv => "pv",
            Resource::WeatherDaily => "weather_daily",
            Resource::WeatherHourly => "weather_hourly",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file} is malformed: {reason}")]
    Malformed { file: String, reason: String },
    #[error("failed to encode {file}: {source}")]
    Encode {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-document storage. Missing documents read as empty values, never as
/// errors; writes replace the document atomically.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_settings(&self) -> Result<Settings, StoreError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    /// Miners from the standalone file kept by older installs.
    async fn load_legacy_miners(&self) -> Result<Vec<Miner>, StoreError>;

    async fn load_pv(&self) -> Result<PvSnapshot, StoreError>;

    async fn load_weather_daily(&self) -> Result<Vec<WeatherDailyRecord>, StoreError>;

    async fn load_weather_hourly(&self) -> Result<Vec<WeatherHourlyRecord>, StoreError>;

    async fn save_weather_daily(&self, records: &[WeatherDailyRecord]) -> Result<(), StoreError>;

    async fn save_weather_hourly(&self, records: &[WeatherHourlyRecord]) -> Result<(), StoreError>;

    /// Last modification time of the file a resource is saved to, `None`
    /// when it does not exist.
    async fn modified_at(&self, resource: Resource) -> Option<DateTime<Utc>>;

    /// Modification time of the document reads are served from, which may be
    /// a legacy file when the current one has not been written yet.
    async fn read_modified_at(&self, resource: Resource) -> Option<DateTime<Utc>> {
        self.modified_at(resource).await
    }

    /// File name backing a resource, for reporting.
    fn file_name(&self, resource: Resource) -> String;
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for service and router tests.
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        pub settings: Mutex<Settings>,
        pub legacy_miners: Mutex<Vec<Miner>>,
        pub pv: Mutex<PvSnapshot>,
        pub daily: Mutex<Vec<WeatherDailyRecord>>,
        pub hourly: Mutex<Vec<WeatherHourlyRecord>>,
        pub mtimes: Mutex<HashMap<Resource, DateTime<Utc>>>,
        pub fail_writes: bool,
    }

    impl MemoryStore {
        pub fn touch(&self, resource: Resource, at: DateTime<Utc>) {
            self.mtimes.lock().unwrap().insert(resource, at);
        }

        fn check_write(&self, resource: Resource) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Io {
                    file: self.file_name(resource),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.touch(resource, Utc::now());
            Ok(())
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn load_settings(&self) -> Result<Settings, StoreError> {
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
            self.check_write(Resource::Settings)?;
            *self.settings.lock().unwrap() = settings.clone();
            Ok(())
        }

        async fn load_legacy_miners(&self) -> Result<Vec<Miner>, StoreError> {
            Ok(self.legacy_miners.lock().unwrap().clone())
        }

        async fn load_pv(&self) -> Result<PvSnapshot, StoreError> {
            Ok(self.pv.lock().unwrap().clone())
        }

        async fn load_weather_daily(&self) -> Result<Vec<WeatherDailyRecord>, StoreError> {
            Ok(self.daily.lock().unwrap().clone())
        }

        async fn load_weather_hourly(&self) -> Result<Vec<WeatherHourlyRecord>, StoreError> {
            Ok(self.hourly.lock().unwrap().clone())
        }

        async fn save_weather_daily(&self, records: &[WeatherDailyRecord]) -> Result<(), StoreError> {
            self.check_write(Resource::WeatherDaily)?;
            *self.daily.lock().unwrap() = records.to_vec();
            Ok(())
        }

        async fn save_weather_hourly(&self, records: &[WeatherHourlyRecord]) -> Result<(), StoreError> {
            self.check_write(Resource::WeatherHourly)?;
            *self.hourly.lock().unwrap() = records.to_vec();
            Ok(())
        }

        async fn modified_at(&self, resource: Resource) -> Option<DateTime<Utc>> {
            self.mtimes.lock().unwrap().get(&resource).copied()
        }

        fn file_name(&self, resource: Resource) -> String {
            format!("{}.json", resource.key().replace('_', "-"))
        }
    }
}
