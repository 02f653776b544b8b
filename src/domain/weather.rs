// Weather forecast domain models
use super::lenient;
use serde::{Deserialize, Serialize};

/// One forecast day as stored in `weather-daily.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDailyRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sunshine_hours: Option<f64>,
    /// Wh/m²
    #[serde(
        rename = "shortwave_radiation_sum_Wh_m2",
        default,
        deserialize_with = "lenient::number"
    )]
    pub shortwave_radiation_sum_wh_m2: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pv_energy_kwh: Option<f64>,
}

/// One forecast hour as stored in `weather-hourly.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherHourlyRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub datetime: Option<String>,
    /// W/m² on the tilted panel surface
    #[serde(default, deserialize_with = "lenient::number")]
    pub global_tilted_irradiance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub pv_energy_kwh: Option<f64>,
}

/// Summed forecast values over a window of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeatherAggregate {
    pub sunshine_hours: f64,
    pub radiation_sum: f64,
    pub pv_energy: f64,
}

impl WeatherAggregate {
    pub fn add(&mut self, record: &WeatherDailyRecord) {
        self.sunshine_hours += record.sunshine_hours.unwrap_or(0.0);
        self.radiation_sum += record.shortwave_radiation_sum_wh_m2.unwrap_or(0.0);
        self.pv_energy += record.pv_energy_kwh.unwrap_or(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_daily_record_field_names() {
        let record: WeatherDailyRecord = serde_json::from_value(json!({
            "date": "2025-06-01",
            "sunshine_hours": 11.25,
            "shortwave_radiation_sum_Wh_m2": 6120
        }))
        .unwrap();
        assert_eq!(record.shortwave_radiation_sum_wh_m2, Some(6120.0));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["shortwave_radiation_sum_Wh_m2"], json!(6120.0));
        assert!(out.get("pv_energy_kwh").is_none());
    }

    #[test]
    fn test_aggregate_skips_missing_values() {
        let mut agg = WeatherAggregate::default();
        agg.add(&WeatherDailyRecord {
            sunshine_hours: Some(2.5),
            ..Default::default()
        });
        agg.add(&WeatherDailyRecord {
            shortwave_radiation_sum_wh_m2: Some(1000.0),
            pv_energy_kwh: Some(8.0),
            ..Default::default()
        });
        assert_eq!(
            agg,
            WeatherAggregate {
                sunshine_hours: 2.5,
                radiation_sum: 1000.0,
                pv_energy: 8.0
            }
        );
    }
}
