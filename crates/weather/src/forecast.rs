//! Forecast record, mock generation, and date validation.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Forecasts are only available this many days ahead.
pub const FORECAST_WINDOW_DAYS: i64 = 7;

/// A single weather forecast.
///
/// Constructed fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Human-readable location, usually "City, Country".
    pub location: String,
    /// The calendar date this forecast applies to.
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub conditions: String,
    /// Chance of precipitation, 0–100.
    pub precipitation_prob: u8,
    pub wind_speed: f64,
    /// Relative humidity, 0–100.
    pub humidity: u8,
}

/// °C to rounded °F.
pub(crate) fn celsius_to_fahrenheit(celsius: f64) -> i32 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i32
}

/// Deterministic fold of the city name into the 10–30 °C range.
///
/// Same city, same temperature — this is what makes the offline path
/// usable in tests.
fn mock_temperature(city: &str) -> i32 {
    let hash = city
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    (hash % 21 + 10) as i32
}

/// Generate an offline forecast for the given location.
///
/// The date defaults to today when none is supplied.
pub fn mock_forecast(city: &str, country: &str, date: Option<NaiveDate>) -> Forecast {
    let temperature_c = mock_temperature(city);
    Forecast {
        location: format!("{city}, {country}"),
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        temperature_c,
        temperature_f: celsius_to_fahrenheit(f64::from(temperature_c)),
        conditions: "partly cloudy".to_string(),
        precipitation_prob: 20,
        wind_speed: 15.0,
        humidity: 65,
    }
}

/// Whether an ISO date string falls within the forecast window.
///
/// True iff the string parses as a calendar date and
/// `today <= date <= today + 7 days`.
pub fn validate_date(date_str: &str) -> bool {
    validate_date_from(date_str, Local::now().date_naive())
}

pub(crate) fn validate_date_from(date_str: &str, today: NaiveDate) -> bool {
    match date_str.parse::<NaiveDate>() {
        Ok(date) => today <= date && date <= today + chrono::Duration::days(FORECAST_WINDOW_DAYS),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    #[test]
    fn mock_is_deterministic() {
        let a = mock_forecast("Berlin", "Germany", None);
        let b = mock_forecast("Berlin", "Germany", None);
        assert_eq!(a.temperature_c, b.temperature_c);
        assert_eq!(a.location, "Berlin, Germany");
        assert_eq!(a.conditions, "partly cloudy");
    }

    #[test]
    fn mock_temperature_in_range() {
        for city in ["Berlin", "Tokyo", "New York", "Stockholm", "Zurich", "x"] {
            let forecast = mock_forecast(city, "Anywhere", None);
            assert!(
                (10..=30).contains(&forecast.temperature_c),
                "{city} out of range: {}",
                forecast.temperature_c
            );
        }
    }

    #[test]
    fn mock_honors_supplied_date() {
        let date = today() + chrono::Duration::days(3);
        let forecast = mock_forecast("Berlin", "Germany", Some(date));
        assert_eq!(forecast.date, date);
    }

    #[test]
    fn mock_defaults_to_today() {
        let forecast = mock_forecast("Berlin", "Germany", None);
        assert_eq!(forecast.date, today());
    }

    #[test]
    fn fahrenheit_conversion() {
        assert_eq!(celsius_to_fahrenheit(5.0), 41);
        assert_eq!(celsius_to_fahrenheit(0.0), 32);
        assert_eq!(celsius_to_fahrenheit(30.0), 86);
        assert_eq!(celsius_to_fahrenheit(-10.0), 14);
    }

    #[test]
    fn date_within_window_is_valid() {
        let base = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(validate_date_from("2026-03-10", base));
        assert!(validate_date_from("2026-03-11", base));
        assert!(validate_date_from("2026-03-17", base));
    }

    #[test]
    fn date_outside_window_is_invalid() {
        let base = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(!validate_date_from("2026-03-09", base));
        assert!(!validate_date_from("2026-03-18", base));
        assert!(!validate_date_from("2026-03-20", base));
    }

    #[test]
    fn unparseable_date_is_invalid() {
        let base = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(!validate_date_from("invalid-date", base));
        assert!(!validate_date_from("", base));
        assert!(!validate_date_from("2026-13-40", base));
    }

    #[test]
    fn tomorrow_is_valid_against_real_today() {
        let tomorrow = (today() + chrono::Duration::days(1)).to_string();
        assert!(validate_date(&tomorrow));

        let far = (today() + chrono::Duration::days(10)).to_string();
        assert!(!validate_date(&far));
    }
}
