use crate::{
    CurrentConditions, GeocodeCandidate, ServiceConfig, UnitSystem, WeatherError,
    provider::open_meteo::OpenMeteoClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Number of candidates requested from the geocoder for a name lookup.
pub const GEOCODE_CANDIDATES: usize = 10;

/// Name → candidate list. Matching is on the place name alone.
#[async_trait]
pub trait GeocodingService: Send + Sync + Debug {
    async fn search(&self, name: &str, count: usize) -> Result<Vec<GeocodeCandidate>, WeatherError>;
}

/// Current conditions at a coordinate.
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError>;
}

/// Construct the Open-Meteo client from the configured endpoints.
pub fn open_meteo_from_config(services: &ServiceConfig) -> anyhow::Result<OpenMeteoClient> {
    OpenMeteoClient::new(services)
}
