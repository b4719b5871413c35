//! Region token normalization used to disambiguate geocoding candidates.

const US_STATES: &[(&str, &str)] = &[
    ("al", "alabama"),
    ("ak", "alaska"),
    ("az", "arizona"),
    ("ar", "arkansas"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("de", "delaware"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("hi", "hawaii"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ia", "iowa"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("me", "maine"),
    ("md", "maryland"),
    ("ma", "massachusetts"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("ms", "mississippi"),
    ("mo", "missouri"),
    ("mt", "montana"),
    ("ne", "nebraska"),
    ("nv", "nevada"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("ny", "new york"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("vt", "vermont"),
    ("va", "virginia"),
    ("wa", "washington"),
    ("wv", "west virginia"),
    ("wi", "wisconsin"),
    ("wy", "wyoming"),
    ("dc", "district of columbia"),
];

/// Lower-cases `token` and expands a US state abbreviation to the full name.
/// Anything else passes through lower-cased.
pub fn normalize(token: &str) -> String {
    let lower = token.trim().to_lowercase();
    US_STATES
        .iter()
        .find(|(abbr, _)| *abbr == lower)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or(lower)
}

/// Whether a region hint refers to `field` (an admin1 or country value).
///
/// Matches on equality of the normalized forms, or when either the raw
/// lower-cased hint or the raw lower-cased field contains the other.
pub fn matches(hint: &str, field: &str) -> bool {
    let hint_lower = hint.trim().to_lowercase();
    let field_lower = field.trim().to_lowercase();
    if hint_lower.is_empty() || field_lower.is_empty() {
        return false;
    }

    normalize(&hint_lower) == normalize(&field_lower)
        || field_lower.contains(&hint_lower)
        || hint_lower.contains(&field_lower)
}
