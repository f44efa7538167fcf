//! Forecast retrieval: deterministic mock or live OpenWeatherMap.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use serde::Deserialize;

use crate::error::WeatherError;
use crate::forecast::{Forecast, celsius_to_fahrenheit, mock_forecast};

const GEOCODE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
const FORECAST_URL: &str = "http://api.openweathermap.org/data/2.5/forecast";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Entry point for forecast retrieval.
///
/// With no API key the client serves deterministic mock data; with one,
/// it geocodes the location and fetches a live forecast. The choice is
/// made once at construction and never per request.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl WeatherClient {
    /// Create a client. An empty key counts as no key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Create a client that only serves mock data.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Whether this client talks to the live provider.
    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the forecast for a city and country, optionally for a
    /// specific date within the forecast window.
    pub async fn forecast(
        &self,
        city: &str,
        country: &str,
        date: Option<NaiveDate>,
    ) -> Result<Forecast, WeatherError> {
        match &self.api_key {
            None => Ok(mock_forecast(city, country, date)),
            Some(key) => self.live_forecast(key, city, country, date).await,
        }
    }

    async fn live_forecast(
        &self,
        api_key: &str,
        city: &str,
        country: &str,
        date: Option<NaiveDate>,
    ) -> Result<Forecast, WeatherError> {
        let (lat, lon) = self.geocode(api_key, city, country).await?;
        tracing::debug!(city, country, lat, lon, "location geocoded");

        let response = self
            .http
            .get(FORECAST_URL)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let response = check_status(response)?;
        let parsed: OwForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        let target = date.unwrap_or_else(|| Local::now().date_naive());
        forecast_from_response(parsed, target)
    }

    async fn geocode(
        &self,
        api_key: &str,
        city: &str,
        country: &str,
    ) -> Result<(f64, f64), WeatherError> {
        let response = self
            .http
            .get(GEOCODE_URL)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("q", format!("{city},{country}")),
                ("limit", "1".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let response = check_status(response)?;
        let hits: Vec<GeoHit> = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

        match hits.first() {
            Some(hit) => Ok((hit.lat, hit.lon)),
            None => Err(WeatherError::LocationNotFound(format!("{city}, {country}"))),
        }
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, WeatherError> {
    let status = response.status();
    if status.as_u16() == 429 {
        return Err(WeatherError::RateLimited);
    }
    if !status.is_success() {
        return Err(WeatherError::Provider(status.as_u16()));
    }
    Ok(response)
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenWeatherMap wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeoHit {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwConditions>,
    wind: OwWind,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwConditions {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

/// Reduce a multi-point forecast to the entry nearest the target date.
///
/// Entries come in three-hour steps; the target is anchored at noon UTC
/// so a date maps to the middle of its day.
fn forecast_from_response(
    response: OwForecastResponse,
    target: NaiveDate,
) -> Result<Forecast, WeatherError> {
    let target_ts = target
        .and_hms_opt(12, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();

    let entry = response
        .list
        .iter()
        .min_by_key(|e| (e.dt - target_ts).abs())
        .ok_or_else(|| WeatherError::InvalidResponse("forecast list is empty".to_string()))?;

    let date = DateTime::from_timestamp(entry.dt, 0)
        .ok_or_else(|| WeatherError::InvalidResponse(format!("bad timestamp {}", entry.dt)))?
        .date_naive();

    let conditions = entry
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(Forecast {
        location: format!("{}, {}", response.city.name, response.city.country),
        date,
        temperature_c: entry.main.temp.round() as i32,
        temperature_f: celsius_to_fahrenheit(entry.main.temp),
        conditions,
        precipitation_prob: (entry.pop * 100.0).round().clamp(0.0, 100.0) as u8,
        wind_speed: entry.wind.speed,
        humidity: entry.main.humidity,
    })
}
