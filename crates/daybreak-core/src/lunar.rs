//! Lunar-to-solar conversion seam.
//!
//! The conversion algorithm itself is an external concern; this module
//! only adapts the `lunardate` crate to the crate's error vocabulary.

use chrono::NaiveDate;
use lunardate::LunarDate;

use crate::error::ParseError;

/// Convert a lunar calendar date to its solar (Gregorian) equivalent.
pub fn lunar_to_solar(year: i32, month: u32, day: u32) -> Result<NaiveDate, ParseError> {
    LunarDate::new(year, month, day, false)
        .to_solar_date()
        .map_err(|err| ParseError::InvalidLunar(format!("{year}-{month}-{day}: {err}")))
}
