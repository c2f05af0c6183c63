//! Core building blocks for Daybreak
//!
//! Provides configuration, the shared retrying HTTP fetch client, and the
//! pure date arithmetic the notification content is derived from.

pub mod config;
pub mod datemath;
pub mod error;
pub mod fetch;
pub mod lunar;

pub use config::{Config, DateEntry};
pub use error::ParseError;
pub use fetch::LookupClient;
