// Operator settings domain model
use super::lenient;
use super::miner::Miner;
use serde::{Deserialize, Serialize};

/// Operator settings as persisted in `settings.json`.
///
/// Every field is optional: a fresh install has an empty settings file and
/// the dashboard falls back to defaults for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(
        rename = "autoMode",
        default,
        deserialize_with = "lenient::flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_mode: Option<bool>,
    /// Percentage in [0, 100].
    #[serde(
        rename = "systemScale",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub system_scale: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pv_kwp: Option<f64>,
    /// Performance ratio in (0, 1].
    #[serde(
        rename = "pvSystemFactor",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub pv_system_factor: Option<f64>,
    #[serde(
        rename = "miningMinBatteryKwh",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub mining_min_battery_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miners: Option<Vec<Miner>>,
}

impl Settings {
    /// Installed capacity and derate, only when both are configured.
    pub fn pv_parameters(&self) -> Option<(f64, f64)> {
        Some((self.pv_kwp?, self.pv_system_factor?))
    }
}
