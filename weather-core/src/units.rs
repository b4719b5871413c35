//! Unit conversions and the rounding policy shared by the fetcher and formatters.
//!
//! Imperial values are always derived from the *rounded* metric value, never
//! from the raw reading, so `20.6 °C` becomes `21 °C` and then `70 °F`.

const KMH_TO_MPH: f64 = 0.621371;

/// Round half toward positive infinity (`-2.5` → `-2`, `2.5` → `3`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph / KMH_TO_MPH
}

/// Fixed-point formatting where exact ties round away from zero
/// (`1.03125` → `"1.0313"`), unlike `{:.N}` which rounds ties to even.
/// Negative zero prints without a sign.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let rounded = format!("{value:.digits$}");

    // Every finite f64 has a terminating expansion of at most 1074 fractional digits.
    let exact = format!("{:.1074}", value.abs());
    let Some((int_part, frac)) = exact.split_once('.') else {
        return rounded;
    };
    let tail = &frac[digits..];
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return rounded;
    }

    let mut magnitude: Vec<u8> = int_part.bytes().chain(frac[..digits].bytes()).collect();
    let mut carry = true;
    for d in magnitude.iter_mut().rev() {
        if !carry {
            break;
        }
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            carry = false;
        }
    }
    if carry {
        magnitude.insert(0, b'1');
    }

    let split = magnitude.len() - digits;
    let whole = String::from_utf8_lossy(&magnitude[..split]);
    let sign = if value < 0.0 { "-" } else { "" };
    if digits == 0 {
        format!("{sign}{whole}")
    } else {
        let fraction = String::from_utf8_lossy(&magnitude[split..]);
        format!("{sign}{whole}.{fraction}")
    }
}

/// Rounded Celsius and the Fahrenheit value derived from it.
pub fn temperature_pair(raw_celsius: f64) -> (i64, i64) {
    let c = round_half_up(raw_celsius);
    let f = round_half_up(celsius_to_fahrenheit(c as f64));
    (c, f)
}

/// Rounded km/h and the mph value derived from it.
pub fn wind_speed_pair(raw_kmh: f64) -> (i64, i64) {
    let kmh = round_half_up(raw_kmh);
    let mph = round_half_up(kmh_to_mph(kmh as f64));
    (kmh, mph)
}
