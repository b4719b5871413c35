use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    CurrentConditions, GeocodeCandidate, ServiceConfig, UnitSystem, WeatherError,
    provider::{ForecastService, GeocodingService},
};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Open-Meteo geocoding and forecast APIs. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(services: &ServiceConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(services.timeout_secs))
            .user_agent(concat!("realworld-weather/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self {
            geocoding_url: services.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: services.forecast_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_body(&self, url: &str, query: &[(&str, String)], what: &str) -> Result<String, WeatherError> {
        let res = self.http.get(url).query(query).send().await.map_err(|e| {
            WeatherError::Network(format!("Failed to send request to Open-Meteo ({what}): {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!("Failed to read Open-Meteo {what} response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Network(format!(
                "Open-Meteo {what} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    #[serde(default)]
    results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: i64,
    wind_speed_10m: f64,
}

#[async_trait]
impl GeocodingService for OpenMeteoClient {
    async fn search(&self, name: &str, count: usize) -> Result<Vec<GeocodeCandidate>, WeatherError> {
        let url = format!("{}/v1/search", self.geocoding_url);
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let body = self.get_body(&url, &query, "geocoding").await?;

        // A search with no hits omits `results` entirely.
        let parsed: OmSearchResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("Failed to parse Open-Meteo geocoding JSON: {e}"))
        })?;

        tracing::debug!(name, hits = parsed.results.len(), "geocoding search finished");
        Ok(parsed.results)
    }
}

#[async_trait]
impl ForecastService for OpenMeteoClient {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/v1/forecast", self.forecast_url);
        let (temperature_unit, wind_speed_unit) = match units {
            UnitSystem::Metric => ("celsius", "kmh"),
            UnitSystem::Imperial => ("fahrenheit", "mph"),
        };
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("temperature_unit", temperature_unit.to_string()),
            ("wind_speed_unit", wind_speed_unit.to_string()),
        ];

        let body = self.get_body(&url, &query, "forecast").await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("Failed to parse Open-Meteo forecast JSON: {e}"))
        })?;

        let raw = parsed.current.ok_or_else(|| {
            WeatherError::MalformedResponse("forecast response has no `current` block".to_string())
        })?;

        let current: OmCurrent = serde_json::from_value(raw.clone()).map_err(|e| {
            WeatherError::MalformedResponse(format!("incomplete `current` block: {e}"))
        })?;

        Ok(CurrentConditions {
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m,
            weather_code: current.weather_code,
            wind_speed: current.wind_speed_10m,
            raw,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
