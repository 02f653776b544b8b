// Photovoltaic / battery snapshot domain model
use super::lenient;
use serde::{Deserialize, Serialize};

/// Latest PV telemetry snapshot from `pv.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PvSnapshot {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pv_leistung_w: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pv_leistung_kw: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub haus_last_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batterie_stand: Option<BatteryState>,
    #[serde(default, deserialize_with = "lenient::strings", skip_serializing_if = "Vec::is_empty")]
    pub miner_betriebszeiten: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub capacity_kwh: Option<f64>,
}

impl PvSnapshot {
    /// Fill `pv_leistung_w` from the kW field written by older collectors.
    pub fn normalized(mut self) -> Self {
        if self.pv_leistung_w.is_none() {
            self.pv_leistung_w = self.pv_leistung_kw.map(|kw| kw * 1000.0);
        }
        self
    }

    pub fn pv_power_w(&self) -> f64 {
        self.pv_leistung_w
            .or(self.pv_leistung_kw.map(|kw| kw * 1000.0))
            .unwrap_or(0.0)
    }

    pub fn house_load_w(&self) -> f64 {
        self.haus_last_w.unwrap_or(0.0)
    }

    pub fn battery_kwh(&self) -> f64 {
        self.batterie_stand
            .as_ref()
            .and_then(|b| b.kwh)
            .unwrap_or(0.0)
    }

    pub fn battery_capacity_kwh(&self) -> Option<f64> {
        self.batterie_stand.as_ref().and_then(|b| b.capacity_kwh)
    }
}

/// Power budget values derived from a snapshot and the mining threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PvCalculated {
    pub battery_difference: f64,
    pub available_power: f64,
    pub mining_possible: bool,
}
