use serde::{Deserialize, Serialize};

use crate::units::to_fixed;

/// What the user typed, parsed into one of the two shapes the resolver handles.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates { lat: f64, lon: f64 },
    NamedPlace { city: String, region: Option<String> },
}

/// A single geocoding hit. Read-only to the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub name: String,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl ResolvedPlace {
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        Self {
            latitude: lat,
            longitude: lon,
            display_name: format!("{}, {}", to_fixed(lat, 4), to_fixed(lon, 4)),
        }
    }

    pub fn from_candidate(candidate: &GeocodeCandidate) -> Self {
        let region = candidate
            .admin1
            .as_deref()
            .map(|a| format!("{a}, "))
            .unwrap_or_default();
        let country = candidate.country.as_deref().unwrap_or_default();

        Self {
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            display_name: format!("{}, {region}{country}", candidate.name),
        }
    }
}

/// Units requested from the forecast service. The fetcher always asks for
/// metric; imperial is part of the service contract for other callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// The `current` block of a forecast response, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub weather_code: i64,
    pub wind_speed: f64,
    pub raw: serde_json::Value,
}

/// Normalized result of one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub condition: String,
    pub temp_c: i64,
    pub temp_f: i64,
    pub humidity: f64,
    pub wind_speed_kmh: i64,
    pub wind_speed_mph: i64,
    pub timestamp: String,
    #[serde(default)]
    pub raw_payload: serde_json::Value,
}

impl WeatherSnapshot {
    pub fn temperature_label(&self, use_celsius: bool) -> String {
        if use_celsius {
            format!("{}°C", self.temp_c)
        } else {
            format!("{}°F", self.temp_f)
        }
    }

    pub fn wind_label(&self, use_celsius: bool) -> String {
        if use_celsius {
            format!("{} km/h", self.wind_speed_kmh)
        } else {
            format!("{} mph", self.wind_speed_mph)
        }
    }

    /// Line written into the author's note. Always starts with
    /// [`crate::note::SENTINEL`].
    pub fn note_line(&self, use_celsius: bool) -> String {
        format!(
            "{} {}: {}, {}, Humidity: {}%, Wind: {}",
            crate::note::SENTINEL,
            self.location_name,
            self.condition,
            self.temperature_label(use_celsius),
            self.humidity,
            self.wind_label(use_celsius),
        )
    }

    /// Single-line form appended to the chat compose box.
    pub fn chat_line(&self, use_celsius: bool) -> String {
        format!(
            "[Weather in {}: {}, {}, humidity {}%, wind {}]",
            self.location_name,
            self.condition,
            self.temperature_label(use_celsius),
            self.humidity,
            self.wind_label(use_celsius),
        )
    }
}
