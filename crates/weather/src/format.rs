//! Render a forecast as a conversational sentence.

use chrono::{Duration, Local, NaiveDate};

use crate::forecast::Forecast;

/// Format a forecast for the user, optionally tying it to a partner visit.
///
/// Date phrasing is relative to the current date ("today", "tomorrow",
/// else the full weekday and month). Advice sentences are appended for
/// high precipitation probability and for extreme temperatures.
pub fn format_forecast(forecast: &Forecast, partner_name: Option<&str>) -> String {
    format_with_today(forecast, partner_name, Local::now().date_naive())
}

fn format_with_today(forecast: &Forecast, partner_name: Option<&str>, today: NaiveDate) -> String {
    let mut out = match partner_name {
        Some(name) => format!(
            "The weather in {} for your visit to {} ",
            forecast.location, name
        ),
        None => format!("The weather in {} ", forecast.location),
    };

    if forecast.date == today {
        out.push_str("today ");
    } else if forecast.date == today + Duration::days(1) {
        out.push_str("tomorrow ");
    } else {
        out.push_str(&format!("on {} ", forecast.date.format("%A, %B %d")));
    }

    out.push_str(&format!(
        "will be {} with temperatures around {}°C ({}°F). ",
        forecast.conditions, forecast.temperature_c, forecast.temperature_f
    ));

    if forecast.precipitation_prob > 50 {
        out.push_str(&format!(
            "There's a {}% chance of rain - pack an umbrella! ",
            forecast.precipitation_prob
        ));
    } else if forecast.precipitation_prob > 20 {
        out.push_str(&format!(
            "There's a {}% chance of rain. ",
            forecast.precipitation_prob
        ));
    }

    if forecast.temperature_c < 5 {
        out.push_str("It will be quite cold, so dress warmly.");
    } else if forecast.temperature_c > 30 {
        out.push_str("It will be hot, so stay hydrated and consider light clothing.");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_forecast(date: NaiveDate) -> Forecast {
        Forecast {
            location: "Berlin, Germany".to_string(),
            date,
            temperature_c: 5,
            temperature_f: 41,
            conditions: "partly cloudy".to_string(),
            precipitation_prob: 20,
            wind_speed: 15.0,
            humidity: 65,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn mentions_location_partner_and_conditions() {
        let text = format_with_today(
            &base_forecast(today()),
            Some("TechVentures GmbH"),
            today(),
        );
        assert!(text.contains("Berlin"));
        assert!(text.contains("TechVentures GmbH"));
        assert!(text.contains("5°C"));
        assert!(text.contains("41°F"));
        assert!(text.contains("partly cloudy"));
    }

    #[test]
    fn no_partner_clause_without_partner() {
        let text = format_with_today(&base_forecast(today()), None, today());
        assert!(!text.contains("your visit"));
        assert!(text.starts_with("The weather in Berlin, Germany today "));
    }

    #[test]
    fn date_phrasing() {
        let t = today();
        assert!(format_with_today(&base_forecast(t), None, t).contains(" today "));

        let tomorrow = t + Duration::days(1);
        assert!(format_with_today(&base_forecast(tomorrow), None, t).contains(" tomorrow "));

        // 2026-03-14 is a Saturday.
        let later = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let text = format_with_today(&base_forecast(later), None, t);
        assert!(text.contains("on Saturday, March 14"));
    }

    #[test]
    fn precipitation_advice_tiers() {
        let mut forecast = base_forecast(today());

        forecast.precipitation_prob = 70;
        let text = format_with_today(&forecast, None, today());
        assert!(text.contains("70% chance of rain"));
        assert!(text.contains("umbrella"));

        forecast.precipitation_prob = 40;
        let text = format_with_today(&forecast, None, today());
        assert!(text.contains("40% chance of rain"));
        assert!(!text.contains("umbrella"));

        forecast.precipitation_prob = 20;
        let text = format_with_today(&forecast, None, today());
        assert!(!text.contains("chance of rain"));
    }

    #[test]
    fn temperature_advice_tiers() {
        let mut forecast = base_forecast(today());

        forecast.temperature_c = 2;
        assert!(format_with_today(&forecast, None, today()).contains("dress warmly"));

        forecast.temperature_c = 33;
        assert!(format_with_today(&forecast, None, today()).contains("stay hydrated"));

        forecast.temperature_c = 18;
        let text = format_with_today(&forecast, None, today());
        assert!(!text.contains("dress warmly"));
        assert!(!text.contains("stay hydrated"));
    }
}
