//! Core library for Real-World Weather.
//!
//! This crate defines:
//! - Location resolution (coordinates or geocoded names with region hints)
//! - Weather normalization (rounding, unit derivation, condition names)
//! - The 60-second fetch gate and the session orchestrating both user actions
//! - Narrow traits for the host: settings store, notifications, text fields, display
//! - Open-Meteo implementations of the geocoding and forecast services
//!
//! It is used by `realworld-weather-cli`, but any host implementing the
//! traits in [`host`] and [`settings`] can drive a [`WeatherSession`].

pub mod cache;
pub mod conditions;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod model;
pub mod note;
pub mod provider;
pub mod region;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod units;

pub use cache::{CacheGate, Clock, SystemClock};
pub use config::{Config, ServiceConfig};
pub use error::{RegionMismatch, WeatherError};
pub use fetcher::WeatherFetcher;
pub use host::{Notifier, Severity, TextField, WeatherDisplay};
pub use model::{
    CurrentConditions, GeocodeCandidate, LocationQuery, ResolvedPlace, UnitSystem,
    WeatherSnapshot,
};
pub use provider::{ForecastService, GeocodingService, open_meteo::OpenMeteoClient};
pub use resolver::{LocationResolver, Resolution};
pub use session::{FetchOutcome, HostBindings, SharedSession, WeatherSession};
pub use settings::{JsonSettingsStore, Settings, SettingsStore};
