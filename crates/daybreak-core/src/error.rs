use thiserror::Error;

/// A date specification that could not be turned into a calendar date.
///
/// Malformed specs are fatal only for the entry that carries them; callers
/// skip the entry and keep composing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid date spec: {0}")]
    InvalidDate(String),

    #[error("invalid lunar date spec: {0}")]
    InvalidLunar(String),
}
