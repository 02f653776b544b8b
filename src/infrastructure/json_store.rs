// File-backed config store: one pretty-printed JSON document per resource
use crate::application::config_store::{ConfigStore, Resource, StoreError};
use crate::domain::miner::Miner;
use crate::domain::pv::PvSnapshot;
use crate::domain::settings::Settings;
use crate::domain::weather::{WeatherDailyRecord, WeatherHourlyRecord};
use crate::infrastructure::config::StorageSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    files: StorageSettings,
}

impl JsonFileStore {
    pub fn new(files: StorageSettings) -> Self {
        Self {
            dir: files.data_dir.clone(),
            files,
        }
    }

    fn path(&self, resource: Resource) -> PathBuf {
        self.dir.join(self.file_name(resource))
    }

    /// The daily forecast lives in its own file; older installs only have the
    /// combined `weather.json`, which holds the same daily records.
    async fn daily_path(&self) -> PathBuf {
        let current = self.path(Resource::WeatherDaily);
        if tokio::fs::try_exists(&current).await.unwrap_or(false) {
            return current;
        }
        let legacy = self.dir.join(&self.files.legacy_weather_file);
        if tokio::fs::try_exists(&legacy).await.unwrap_or(false) {
            return legacy;
        }
        current
    }
}

fn display(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn mtime(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

/// Read a document as raw JSON. A missing file is `None`.
async fn read_value(path: &Path) -> Result<Option<Value>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                file: display(path),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::Malformed {
            file: display(path),
            reason: e.to_string(),
        })
}

/// Empty JSON arrays were historically written for "no settings yet"; treat
/// them as an empty object wherever an object is expected.
fn empty_array_as_object(value: Value) -> Value {
    match value {
        Value::Array(items) if items.is_empty() => Value::Object(Default::default()),
        other => other,
    }
}

fn decode<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Malformed {
        file: display(path),
        reason: e.to_string(),
    })
}

async fn read_object<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match read_value(path).await? {
        Some(value) => decode(path, empty_array_as_object(value)),
        None => Ok(T::default()),
    }
}

async fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match read_value(path).await? {
        Some(value) => decode(path, value),
        None => Ok(Vec::new()),
    }
}

/// Write to a uniquely named sibling temp file, then rename over the target,
/// so readers see either the old or the new document and never a partial one.
pub async fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Encode {
        file: display(path),
        source,
    })?;

    let tmp = path.with_file_name(format!(
        "{}.{}.tmp",
        display(path),
        uuid::Uuid::new_v4().simple()
    ));
    let io_err = |source| StoreError::Io {
        file: display(path),
        source,
    };

    tokio::fs::write(&tmp, json).await.map_err(io_err)?;
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(source));
    }
    Ok(())
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn load_settings(&self) -> Result<Settings, StoreError> {
        read_object(&self.path(Resource::Settings)).await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        write_json_atomic(&self.path(Resource::Settings), settings).await
    }

    async fn load_legacy_miners(&self) -> Result<Vec<Miner>, StoreError> {
        read_list(&self.path(Resource::Miners)).await
    }

    async fn load_pv(&self) -> Result<PvSnapshot, StoreError> {
        let pv: PvSnapshot = read_object(&self.path(Resource::Pv)).await?;
        Ok(pv.normalized())
    }

    async fn load_weather_daily(&self) -> Result<Vec<WeatherDailyRecord>, StoreError> {
        read_list(&self.daily_path().await).await
    }

    async fn load_weather_hourly(&self) -> Result<Vec<WeatherHourlyRecord>, StoreError> {
        read_list(&self.path(Resource::WeatherHourly)).await
    }

    async fn save_weather_daily(&self, records: &[WeatherDailyRecord]) -> Result<(), StoreError> {
        write_json_atomic(&self.path(Resource::WeatherDaily), records).await
    }

    async fn save_weather_hourly(&self, records: &[WeatherHourlyRecord]) -> Result<(), StoreError> {
        write_json_atomic(&self.path(Resource::WeatherHourly), records).await
    }

    async fn modified_at(&self, resource: Resource) -> Option<DateTime<Utc>> {
        mtime(&self.path(resource)).await
    }

    async fn read_modified_at(&self, resource: Resource) -> Option<DateTime<Utc>> {
        match resource {
            Resource::WeatherDaily => mtime(&self.daily_path().await).await,
            other => self.modified_at(other).await,
        }
    }

    fn file_name(&self, resource: Resource) -> String {
        let name = match resource {
            Resource::Settings => &self.files.settings_file,
            Resource::Miners => &self.files.miners_file,
            Resource::Pv => &self.files.pv_file,
            Resource::WeatherDaily => &self.files.weather_daily_file,
            Resource::WeatherHourly => &self.files.weather_hourly_file,
        };
        name.clone()
    }
}
