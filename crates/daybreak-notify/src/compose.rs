//! Payload composition: fixed fields plus indexed anniversary and
//! birthday entries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use daybreak_core::datemath;
use daybreak_core::Config;
use daybreak_weather::WeatherSnapshot;
use daybreak_wechat::FieldEntry;

/// Weekday names for the date field, indexed from Sunday.
const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Placeholder for the weather fields when resolution failed.
const UNKNOWN: &str = "unknown";

/// Build the notification field mapping for `today`.
///
/// The five fixed entries are always present; weather fields fall back to
/// a placeholder so delivery proceeds even without weather data. An entry
/// with a malformed date spec is skipped and logged; the rest of the
/// payload still composes. Fixed and generated key names are disjoint, so
/// collisions cannot occur.
pub fn compose(
    config: &Config,
    weather: Option<&WeatherSnapshot>,
    today: NaiveDate,
) -> BTreeMap<String, FieldEntry> {
    let mut data = BTreeMap::new();

    let weekday = WEEKDAYS[today.weekday().num_days_from_sunday() as usize];
    data.insert("date".to_string(), entry(format!("{today} {weekday}")));
    data.insert("region".to_string(), entry(config.region.clone()));

    match weather {
        Some(snapshot) => {
            data.insert("weather".to_string(), entry(snapshot.condition.clone()));
            data.insert("temp".to_string(), entry(snapshot.temperature.clone()));
            data.insert(
                "wind_dir".to_string(),
                entry(snapshot.wind_direction.clone()),
            );
        }
        None => {
            for key in ["weather", "temp", "wind_dir"] {
                data.insert(key.to_string(), entry(UNKNOWN.to_string()));
            }
        }
    }

    for (idx, anniversary) in config.anniversaries.iter().enumerate() {
        let start = match datemath::resolve_date(&anniversary.date) {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(name = %anniversary.name, %err, "skipping anniversary");
                continue;
            }
        };
        let days = datemath::days_between(start, today);
        data.insert(
            format!("anniversary_{idx}"),
            entry(format!("{} has been {} days", anniversary.name, days)),
        );
    }

    for (idx, birthday) in config.birthdays.iter().enumerate() {
        let birth = match datemath::resolve_date(&birthday.date) {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(name = %birthday.name, %err, "skipping birthday");
                continue;
            }
        };
        let next = datemath::next_occurrence(birth, today);
        let remaining = datemath::days_between(today, next);
        let status = if remaining == 0 {
            "today is the birthday!".to_string()
        } else {
            format!("{remaining} days remaining")
        };
        data.insert(
            format!("birthday_{idx}"),
            entry(format!("{}'s birthday {}", birthday.name, status)),
        );
    }

    data
}

fn entry(value: String) -> FieldEntry {
    FieldEntry {
        value,
        color: datemath::random_color(),
    }
}
