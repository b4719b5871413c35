use std::sync::Arc;

use chrono::{DateTime, Local, Utc};

use crate::{
    ResolvedPlace, UnitSystem, WeatherError, WeatherSnapshot, conditions,
    provider::ForecastService,
    units::{temperature_pair, wind_speed_pair},
};

/// Fetches current conditions and normalizes them into a [`WeatherSnapshot`].
///
/// Metric is the canonical fetch unit; imperial values are derived locally.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    forecast: Arc<dyn ForecastService>,
}

impl WeatherFetcher {
    pub fn new(forecast: Arc<dyn ForecastService>) -> Self {
        Self { forecast }
    }

    pub async fn fetch(
        &self,
        place: &ResolvedPlace,
        captured_at: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let current = self
            .forecast
            .current(place.latitude, place.longitude, UnitSystem::Metric)
            .await?;

        let (temp_c, temp_f) = temperature_pair(current.temperature);
        let (wind_speed_kmh, wind_speed_mph) = wind_speed_pair(current.wind_speed);
        let condition = conditions::describe(current.weather_code);

        tracing::debug!(code = current.weather_code, condition, "weather code mapped");

        Ok(WeatherSnapshot {
            location_name: place.display_name.clone(),
            condition: condition.to_string(),
            temp_c,
            temp_f,
            humidity: current.humidity,
            wind_speed_kmh,
            wind_speed_mph,
            timestamp: format_timestamp(captured_at),
            raw_payload: current.raw,
        })
    }
}

/// `1/5/2026, 3:04:05 PM` in the local time zone.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}
