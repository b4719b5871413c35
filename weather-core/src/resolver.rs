//! Location resolution: coordinates pass straight through, names are geocoded
//! and disambiguated with an optional region hint.

use std::sync::Arc;

use crate::{
    GeocodeCandidate, LocationQuery, RegionMismatch, ResolvedPlace, WeatherError,
    provider::{GEOCODE_CANDIDATES, GeocodingService},
    region,
};

/// A resolved place plus the non-fatal warning raised while picking it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub place: ResolvedPlace,
    pub warning: Option<RegionMismatch>,
}

/// Parses `input` (already trimmed, non-empty) into a [`LocationQuery`].
///
/// `"33.7748, -84.2963"` is a coordinate pair; anything else is a name where
/// the first comma-separated part is the city and the second, lower-cased,
/// the region hint.
pub fn parse_query(input: &str) -> LocationQuery {
    if let Some((lat, lon)) = parse_coordinates(input) {
        return LocationQuery::Coordinates { lat, lon };
    }

    let mut parts = input.split(',').map(str::trim);
    let city = parts.next().unwrap_or_default().to_string();
    let region = parts
        .next()
        .filter(|r| !r.is_empty())
        .map(str::to_lowercase);

    LocationQuery::NamedPlace { city, region }
}

fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let (lat, lon) = input.split_once(',')?;
    let lat = parse_coordinate(lat.trim())?;
    let lon = parse_coordinate(lon.trim())?;
    Some((lat, lon))
}

/// Accepts `-?\d+\.?\d*` only: no exponent, no leading `+`, no leading dot.
fn parse_coordinate(s: &str) -> Option<f64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };

    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    s.parse().ok()
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn GeocodingService>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn GeocodingService>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, input: &str) -> Result<Resolution, WeatherError> {
        match parse_query(input) {
            LocationQuery::Coordinates { lat, lon } => {
                tracing::debug!(lat, lon, "using coordinates as given");
                Ok(Resolution {
                    place: ResolvedPlace::from_coordinates(lat, lon),
                    warning: None,
                })
            }
            LocationQuery::NamedPlace { city, region } => {
                self.resolve_named(&city, region.as_deref()).await
            }
        }
    }

    async fn resolve_named(
        &self,
        city: &str,
        region: Option<&str>,
    ) -> Result<Resolution, WeatherError> {
        // The geocoder matches on the name alone; the region is applied locally.
        let candidates = self.geocoder.search(city, GEOCODE_CANDIDATES).await?;

        let (chosen, warning) = select_candidate(&candidates, region)
            .ok_or_else(|| WeatherError::LocationNotFound { city: city.to_string() })?;

        let place = ResolvedPlace::from_candidate(chosen);
        tracing::debug!(
            lat = place.latitude,
            lon = place.longitude,
            name = %place.display_name,
            "resolved location"
        );

        Ok(Resolution { place, warning })
    }
}

/// Picks the first candidate whose admin1 or country matches `region`,
/// falling back to the first candidate with a [`RegionMismatch`].
/// Returns `None` only for an empty list.
pub fn select_candidate<'a>(
    candidates: &'a [GeocodeCandidate],
    region: Option<&str>,
) -> Option<(&'a GeocodeCandidate, Option<RegionMismatch>)> {
    let first = candidates.first()?;
    let Some(hint) = region else {
        return Some((first, None));
    };

    let matching = candidates.iter().find(|c| {
        c.admin1.as_deref().is_some_and(|a| region::matches(hint, a))
            || c.country.as_deref().is_some_and(|co| region::matches(hint, co))
    });

    match matching {
        Some(c) => Some((c, None)),
        None => {
            let used = ResolvedPlace::from_candidate(first).display_name;
            tracing::warn!(hint, %used, "region hint matched no candidate");
            Some((
                first,
                Some(RegionMismatch {
                    hint: hint.to_string(),
                    used,
                }),
            ))
        }
    }
}
