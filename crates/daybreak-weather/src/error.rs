use thiserror::Error;

/// Region or weather data could not be obtained.
///
/// Recoverable: composition falls back to placeholder fields instead of
/// aborting the run.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("region not found: {0}")]
    RegionNotFound(String),

    #[error("weather unavailable for {0}")]
    WeatherUnavailable(String),
}
