use std::time::Duration;

/// Failures surfaced by the resolver, fetcher and session.
///
/// None of these escape [`crate::WeatherSession`]; they are logged and turned
/// into notifications at that boundary.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Please enter a location first")]
    EmptyLocation,

    #[error("Location \"{city}\" not found")]
    LocationNotFound { city: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No weather data yet. Fetch weather first.")]
    NoCachedWeather,

    #[error("A weather fetch is already in progress")]
    FetchInProgress,

    #[error("Could not read the {field}: {reason}")]
    UnreadableText { field: &'static str, reason: String },
}

impl WeatherError {
    /// Message shown to the user, with format examples for unknown locations.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::LocationNotFound { city } => format!(
                "Location \"{city}\" not found. Try:\n\
                 - \"City, State\" (e.g., \"Decatur, Georgia\")\n\
                 - \"City, Country\" (e.g., \"Paris, France\")\n\
                 - Coordinates (e.g., \"33.7748,-84.2963\")"
            ),
            WeatherError::Network(_) | WeatherError::MalformedResponse(_) => {
                "Failed to fetch weather data. Check logs for details.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// How long the notification should stay up, if longer than the host default.
    pub fn display_duration(&self) -> Option<Duration> {
        match self {
            WeatherError::LocationNotFound { .. } => Some(Duration::from_secs(8)),
            _ => None,
        }
    }
}

/// The region hint matched no candidate; the first candidate was used instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("No match for region \"{hint}\"; using {used}")]
pub struct RegionMismatch {
    pub hint: String,
    pub used: String,
}
