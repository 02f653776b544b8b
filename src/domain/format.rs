// German-locale number formatting (decimal comma, thousands dot)

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a number the way the dashboard displays it, e.g. `12345.678` with
/// two decimals becomes `12.345,68`.
pub fn format_de(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let rounded = round_to(value, decimals);
    let negative = rounded < 0.0;
    let plain = format!("{:.*}", decimals as usize, rounded.abs());

    let (integer, fraction) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}
