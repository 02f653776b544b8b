// Derivation engine - pure computations over loaded dashboard data
use crate::domain::format::round_to;
use crate::domain::miner::{DerivedMiner, Miner};
use crate::domain::pv::{PvCalculated, PvSnapshot};
use crate::domain::weather::{WeatherAggregate, WeatherDailyRecord, WeatherHourlyRecord};
use std::collections::BTreeMap;

pub const DEFAULT_HORIZONS: [usize; 3] = [1, 7, 14];

/// Expected PV yield in kWh for a radiation value of `radiation / 1000` kW(h)/m².
pub fn pv_energy_kwh(radiation: f64, pv_kwp: f64, pv_factor: f64) -> f64 {
    (radiation / 1000.0) * pv_kwp * pv_factor
}

/// Attach running totals and TH/kWh efficiency to each miner.
///
/// Cumulative fields start at the second miner; the first row only carries
/// its own values. Miners stored with `power` in watts get a `power_kw`.
pub fn derive_miner_fields(miners: Vec<Miner>) -> Vec<DerivedMiner> {
    let mut cumulative_hashrate = 0.0;
    let mut cumulative_power_kw = 0.0;

    miners
        .into_iter()
        .enumerate()
        .map(|(index, mut miner)| {
            let hashrate = miner.hashrate.unwrap_or(0.0);
            let power_kw = miner.power_kw();
            if miner.power_kw.is_none() && miner.power.is_some() {
                miner.power_kw = Some(power_kw);
            }

            cumulative_hashrate += hashrate;
            cumulative_power_kw += power_kw;

            let th_per_kwh = if power_kw > 0.0 {
                round_to(hashrate / power_kw, 3)
            } else {
                0.0
            };

            DerivedMiner {
                miner,
                cumulative_hashrate: (index > 0).then_some(cumulative_hashrate),
                cumulative_power_kw: (index > 0).then_some(cumulative_power_kw),
                th_per_kwh,
            }
        })
        .collect()
}

/// Attach `pv_energy_kwh` to days that have a radiation sum.
pub fn derive_daily_pv(
    records: Vec<WeatherDailyRecord>,
    pv_kwp: f64,
    pv_factor: f64,
) -> Vec<WeatherDailyRecord> {
    records
        .into_iter()
        .map(|mut day| {
            if let Some(radiation) = day.shortwave_radiation_sum_wh_m2 {
                day.pv_energy_kwh = Some(pv_energy_kwh(radiation, pv_kwp, pv_factor));
            }
            day
        })
        .collect()
}

/// Attach `pv_energy_kwh` to hours that have a tilted irradiance value.
///
/// Irradiance is instantaneous (W/m²); the resulting kW is taken as the
/// energy of that one hour.
pub fn derive_hourly_pv(
    records: Vec<WeatherHourlyRecord>,
    pv_kwp: f64,
    pv_factor: f64,
) -> Vec<WeatherHourlyRecord> {
    const HOURS: f64 = 1.0;

    records
        .into_iter()
        .map(|mut hour| {
            if let Some(irradiance) = hour.global_tilted_irradiance {
                hour.pv_energy_kwh = Some(pv_energy_kwh(irradiance, pv_kwp, pv_factor) * HOURS);
            }
            hour
        })
        .collect()
}

/// Sum the first N days for each horizon, plus single-day `today` and
/// `tomorrow` windows. Missing days and fields count as zero.
pub fn derive_weather_aggregates(
    records: &[WeatherDailyRecord],
    horizons: &[usize],
) -> BTreeMap<String, WeatherAggregate> {
    let mut aggregates = BTreeMap::new();

    for &days in horizons {
        let mut agg = WeatherAggregate::default();
        for day in records.iter().take(days) {
            agg.add(day);
        }
        aggregates.insert(format!("{days}d"), agg);
    }

    for (label, index) in [("today", 0), ("tomorrow", 1)] {
        let mut agg = WeatherAggregate::default();
        if let Some(day) = records.get(index) {
            agg.add(day);
        }
        aggregates.insert(label.to_string(), agg);
    }

    aggregates
}

pub fn derive_pv_calculated(pv: &PvSnapshot, mining_min_battery_kwh: f64) -> PvCalculated {
    let battery_kwh = pv.battery_kwh();
    PvCalculated {
        battery_difference: battery_kwh - mining_min_battery_kwh,
        available_power: pv.pv_power_w() - pv.house_load_w(),
        mining_possible: battery_kwh >= mining_min_battery_kwh,
    }
}
