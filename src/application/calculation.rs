// Forecast calculation - placeholder values until a real yield model exists
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastStub {
    pub pv_forecast_kwh_next_hours: Vec<f64>,
    pub pv_forecast_kwh_total: f64,
    pub notes: String,
}

pub fn forecast_stub() -> ForecastStub {
    ForecastStub {
        pv_forecast_kwh_next_hours: vec![1.2, 1.8, 2.5, 2.9, 2.0, 1.1],
        pv_forecast_kwh_total: 11.5,
        notes: "Dummy values; replace with real calculation later.".to_string(),
    }
}
