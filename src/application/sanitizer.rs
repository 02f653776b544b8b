// Settings sanitizer - whitelist and validate operator input before it is stored
use crate::domain::lenient::as_number;
use crate::domain::miner::Miner;
use crate::domain::settings::Settings;
use serde_json::{Map, Value};

const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SanitizeError {
    /// The body was not a JSON object at all.
    #[error("invalid json")]
    InvalidJson,
    /// A whitelisted field failed validation; carries the field path.
    #[error("invalid settings data: {0}")]
    InvalidSettings(String),
}

fn invalid(field: impl Into<String>) -> SanitizeError {
    SanitizeError::InvalidSettings(field.into())
}

/// Validate an incoming settings object.
///
/// Unknown keys are dropped silently. Any invalid whitelisted field rejects
/// the whole input, nothing is partially accepted.
pub fn sanitize(input: &Value) -> Result<Settings, SanitizeError> {
    let Value::Object(fields) = input else {
        return Err(SanitizeError::InvalidJson);
    };

    let mut settings = Settings::default();
    for (key, value) in fields {
        match key.as_str() {
            "autoMode" => {
                settings.auto_mode = Some(value.as_bool().ok_or_else(|| invalid(key))?);
            }
            "systemScale" => {
                settings.system_scale = Some(number_where(key, value, |x| (0.0..=100.0).contains(&x))?);
            }
            "pv_kwp" => {
                settings.pv_kwp = Some(number_where(key, value, |x| x > 0.0)?);
            }
            "pvSystemFactor" => {
                settings.pv_system_factor = Some(number_where(key, value, |x| x > 0.0 && x <= 1.0)?);
            }
            "miningMinBatteryKwh" => {
                settings.mining_min_battery_kwh = Some(number_where(key, value, |x| x >= 0.0)?);
            }
            "miners" => {
                settings.miners = Some(sanitize_miners(value)?);
            }
            _ => {}
        }
    }

    Ok(settings)
}

fn number_where(field: &str, value: &Value, accept: impl Fn(f64) -> bool) -> Result<f64, SanitizeError> {
    as_number(value).filter(|x| accept(*x)).ok_or_else(|| invalid(field))
}

fn sanitize_miners(value: &Value) -> Result<Vec<Miner>, SanitizeError> {
    let Value::Array(items) = value else {
        return Err(invalid("miners"));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => sanitize_miner(index, fields),
            _ => Err(invalid(format!("miners[{index}]"))),
        })
        .collect()
}

fn sanitize_miner(index: usize, fields: &Map<String, Value>) -> Result<Miner, SanitizeError> {
    let text = |key: &str| -> Result<Option<String>, SanitizeError> {
        match fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.chars().count() > MAX_TEXT_LEN {
                    return Err(invalid(format!("miners[{index}].{key}")));
                }
                Ok(Some(trimmed.to_string()))
            }
            Some(_) => Err(invalid(format!("miners[{index}].{key}"))),
        }
    };
    let amount = |key: &str| -> Result<Option<f64>, SanitizeError> {
        match fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => as_number(value)
                .filter(|x| *x >= 0.0)
                .map(Some)
                .ok_or_else(|| invalid(format!("miners[{index}].{key}"))),
        }
    };

    let miner = Miner {
        id: text("id")?,
        model: text("model")?,
        hashrate: amount("hashrate")?,
        power_kw: amount("power_kw")?,
        power: amount("power")?,
        min_battery_full_kwh: amount("minBatteryFullKwh")?,
        min_battery_kwh: amount("minBatteryKwh")?,
        min_battery_reduced_kwh: amount("minBatteryReducedKwh")?,
        ip: text("ip")?,
    };

    match miner.model.as_deref() {
        Some(model) if !model.is_empty() => Ok(miner),
        _ => Err(invalid(format!("miners[{index}].model"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_is_invalid_json() {
        assert_eq!(sanitize(&json!([1, 2])), Err(SanitizeError::InvalidJson));
        assert_eq!(sanitize(&json!("settings")), Err(SanitizeError::InvalidJson));
        assert_eq!(sanitize(&Value::Null), Err(SanitizeError::InvalidJson));
    }

    #[test]
    fn test_only_unknown_keys_yields_empty_settings() {
        let settings = sanitize(&json!({"theme": "dark", "debug": 1})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_scalars_are_coerced() {
        let settings = sanitize(&json!({
            "autoMode": false,
            "systemScale": "55",
            "pv_kwp": 9.9,
            "pvSystemFactor": 0.85,
            "miningMinBatteryKwh": 15
        }))
        .unwrap();
        assert_eq!(settings.auto_mode, Some(false));
        assert_eq!(settings.system_scale, Some(55.0));
        assert_eq!(settings.pv_kwp, Some(9.9));
        assert_eq!(settings.pv_system_factor, Some(0.85));
        assert_eq!(settings.mining_min_battery_kwh, Some(15.0));
    }

    #[test]
    fn test_system_scale_out_of_range_rejects_everything() {
        for scale in [json!(-0.1), json!(100.5), json!("abc")] {
            let result = sanitize(&json!({"autoMode": true, "systemScale": scale}));
            assert!(matches!(result, Err(SanitizeError::InvalidSettings(ref f)) if f == "systemScale"));
        }
        assert!(sanitize(&json!({"systemScale": 0})).is_ok());
        assert!(sanitize(&json!({"systemScale": 100})).is_ok());
    }

    #[test]
    fn test_pv_bounds() {
        assert!(sanitize(&json!({"pv_kwp": 0})).is_err());
        assert!(sanitize(&json!({"pvSystemFactor": 0})).is_err());
        assert!(sanitize(&json!({"pvSystemFactor": 1.01})).is_err());
        assert!(sanitize(&json!({"pvSystemFactor": 1})).is_ok());
    }

    #[test]
    fn test_auto_mode_must_be_bool() {
        assert!(sanitize(&json!({"autoMode": "true"})).is_err());
        assert!(sanitize(&json!({"autoMode": 1})).is_err());
    }

    #[test]
    fn test_miners_whitelist_and_trim() {
        let settings = sanitize(&json!({
            "miners": [{
                "id": "  rig-1 ",
                "model": " S21 ",
                "hashrate": 200,
                "power_kw": "3.5",
                "minBatteryKwh": 12,
                "ip": "10.0.0.5",
                "password": "hunter2"
            }]
        }))
        .unwrap();

        let miners = settings.miners.unwrap();
        assert_eq!(miners.len(), 1);
        assert_eq!(miners[0].id.as_deref(), Some("rig-1"));
        assert_eq!(miners[0].model.as_deref(), Some("S21"));
        assert_eq!(miners[0].power_kw, Some(3.5));
        assert_eq!(miners[0].power, None);

        let stored = serde_json::to_value(&miners[0]).unwrap();
        assert!(stored.get("password").is_none());
    }

    #[test]
    fn test_miner_without_model_rejects_whole_call() {
        let input = json!({
            "autoMode": true,
            "miners": [
                {"model": "S19", "hashrate": 95},
                {"id": "x", "model": "   "}
            ]
        });
        assert_eq!(
            sanitize(&input),
            Err(SanitizeError::InvalidSettings("miners[1].model".to_string()))
        );
        assert!(sanitize(&json!({"miners": [{"id": "no-model"}]})).is_err());
    }

    #[test]
    fn test_miner_field_violations() {
        assert!(sanitize(&json!({"miners": [{"model": "S19", "hashrate": -1}]})).is_err());
        assert!(sanitize(&json!({"miners": [{"model": "S19", "power": "lots"}]})).is_err());
        assert!(sanitize(&json!({"miners": [{"model": "S19", "ip": 42}]})).is_err());
        assert!(sanitize(&json!({"miners": ["S19"]})).is_err());
        assert!(sanitize(&json!({"miners": {"model": "S19"}})).is_err());

        let long = "x".repeat(256);
        assert!(sanitize(&json!({"miners": [{"model": long}]})).is_err());
        let max = "x".repeat(255);
        assert!(sanitize(&json!({"miners": [{"model": max}]})).is_ok());
    }
}
