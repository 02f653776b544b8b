// Settings service - read and replace operator settings
use crate::application::config_store::{ConfigStore, StoreError};
use crate::application::sanitizer::{sanitize, SanitizeError};
use crate::domain::settings::Settings;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Rejected(#[from] SanitizeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn ConfigStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self) -> Result<Settings, StoreError> {
        self.store.load_settings().await
    }

    /// Sanitize `input` and persist the result as the complete new settings.
    pub async fn replace(&self, input: &Value) -> Result<Settings, UpdateError> {
        let settings = sanitize(input).inspect_err(|e| {
            tracing::warn!("Rejected settings update: {}", e);
        })?;
        self.store.save_settings(&settings).await?;
        tracing::info!(
            miners = settings.miners.as_ref().map(Vec::len).unwrap_or(0),
            "Settings saved"
        );
        Ok(settings)
    }
}
