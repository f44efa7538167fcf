//! Weather forecasts for Waypoint.
//!
//! This crate resolves a city/country pair (plus an optional date within
//! the next seven days) to a [`Forecast`], and renders forecasts into
//! conversational text.
//!
//! Two data paths exist behind one entry point, [`WeatherClient`]:
//!
//! - **Mock** — no API credential configured. Forecasts are derived
//!   deterministically from the city name, so the same city always gets
//!   the same temperature. This keeps development and tests offline and
//!   reproducible.
//! - **Live** — an OpenWeatherMap credential is configured. The location
//!   is geocoded first, then a multi-point forecast is fetched and the
//!   entry nearest the requested date is selected.
//!
//! Upstream failures surface as [`WeatherError`]; nothing in this crate
//! retries.

mod client;
mod error;
mod forecast;
mod format;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use forecast::{Forecast, FORECAST_WINDOW_DAYS, mock_forecast, validate_date};
pub use format::format_forecast;
