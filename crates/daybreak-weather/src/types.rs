use serde::Deserialize;

/// Current weather for one region, resolved at most once per process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSnapshot {
    /// Condition text, e.g. "Cloudy"
    pub condition: String,

    /// Preformatted temperature, e.g. "21°C"
    pub temperature: String,

    /// Wind direction text
    pub wind_direction: String,
}

// Upstream responses are decoded leniently: provider quirks surface as
// lookup errors, not decode errors.

#[derive(Debug, Deserialize)]
pub(crate) struct GeoResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub location: Vec<GeoLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoLocation {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NowResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub now: Option<NowBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NowBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub temp: String,
    #[serde(rename = "windDir", default)]
    pub wind_dir: String,
}
