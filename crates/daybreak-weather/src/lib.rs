//! Weather resolution for Daybreak
//!
//! Resolves a region name to current weather through a two-step API call
//! chain (region -> location id -> current weather), memoized per region
//! for the process lifetime.

pub mod error;
pub mod resolver;
pub mod types;

pub use error::LookupError;
pub use resolver::WeatherResolver;
pub use types::WeatherSnapshot;
