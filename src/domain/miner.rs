// Miner domain model
use super::lenient;
use serde::{Deserialize, Serialize};

/// A single mining rig as configured by the operator.
///
/// Power is stored either as `power_kw` (current) or `power` in watts
/// (older files). Use [`Miner::power_kw`] to read it regardless of shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Miner {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// TH/s
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub hashrate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub power_kw: Option<f64>,
    /// Watts
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(
        rename = "minBatteryFullKwh",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_battery_full_kwh: Option<f64>,
    #[serde(
        rename = "minBatteryKwh",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_battery_kwh: Option<f64>,
    #[serde(
        rename = "minBatteryReducedKwh",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_battery_reduced_kwh: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl Miner {
    /// Power draw in kW: `power_kw` when present, else `power` (W) / 1000, else 0.
    pub fn power_kw(&self) -> f64 {
        match (self.power_kw, self.power) {
            (Some(kw), _) => kw,
            (None, Some(watts)) => watts / 1000.0,
            (None, None) => 0.0,
        }
    }
}

/// A miner together with the values computed for the dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMiner {
    #[serde(flatten)]
    pub miner: Miner,
    /// Running total up to and including this miner; absent on the first row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_hashrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_power_kw: Option<f64>,
    pub th_per_kwh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_power_kw_prefers_kw_field() {
        let miner = Miner {
            power_kw: Some(3.2),
            power: Some(5000.0),
            ..Default::default()
        };
        assert_eq!(miner.power_kw(), 3.2);

        let legacy = Miner {
            power: Some(3250.0),
            ..Default::default()
        };
        assert_eq!(legacy.power_kw(), 3.25);
        assert_eq!(Miner::default().power_kw(), 0.0);
    }

    #[test]
    fn test_camel_case_battery_fields() {
        let miner: Miner = serde_json::from_value(json!({
            "id": "s19-1",
            "model": "S19 XP",
            "hashrate": "140",
            "minBatteryKwh": 15.5,
            "ip": "192.168.1.20"
        }))
        .unwrap();
        assert_eq!(miner.hashrate, Some(140.0));
        assert_eq!(miner.min_battery_kwh, Some(15.5));

        let out = serde_json::to_value(&miner).unwrap();
        assert_eq!(out["minBatteryKwh"], json!(15.5));
        assert!(out.get("power").is_none());
    }
}
