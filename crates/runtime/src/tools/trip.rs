//! The two trip-planning tools exposed to the model.

use chrono::NaiveDate;
use serde_json::{Value, json};

use partners::PartnerDirectory;
use weather::{WeatherClient, format_forecast, validate_date};

use crate::model::{ToolCall, ToolSpec};
use crate::tools::{ToolError, ToolHost};

pub const PARTNER_LOOKUP_TOOL: &str = "business_partner_lookup";
pub const WEATHER_FORECAST_TOOL: &str = "weather_forecast";

const INVALID_LOCATION: &str = "Invalid location format. Please provide location as \
    'City, Country' (e.g., 'Berlin, Germany')";
const DATE_OUT_OF_RANGE: &str = "Date must be within the next 7 days. Weather forecasts \
    are only available for the next week.";

/// Tool host backing the trip-planning agent.
///
/// Exposes `business_partner_lookup` and `weather_forecast`. Both tools
/// always answer the model with human-readable text — misses, invalid
/// arguments, and provider failures are worded for the end user so the
/// loop never has to special-case them.
pub struct TripToolHost {
    directory: PartnerDirectory,
    weather: WeatherClient,
    specs: Vec<ToolSpec>,
}

impl TripToolHost {
    pub fn new(directory: PartnerDirectory, weather: WeatherClient) -> Self {
        Self {
            directory,
            weather,
            specs: vec![partner_lookup_spec(), weather_forecast_spec()],
        }
    }

    /// Look up a business partner by name and describe their location.
    pub async fn partner_lookup(&self, partner_name: &str) -> String {
        match self.directory.search(partner_name).await {
            Some(partner) => format!(
                "Found business partner: {} (ID: {}). Location: {}, {}",
                partner.name, partner.id, partner.city, partner.country
            ),
            None => {
                let suggestions = self.directory.suggestions(partner_name);
                if suggestions.is_empty() {
                    format!(
                        "Business partner '{partner_name}' not found. \
                         Please check the spelling or try a different name."
                    )
                } else {
                    format!(
                        "Business partner '{partner_name}' not found. \
                         Did you mean one of these? {}",
                        suggestions.join(", ")
                    )
                }
            }
        }
    }

    /// Get a formatted weather forecast for a "City, Country" location.
    ///
    /// The location shape and the date window are validated before any
    /// network call is made.
    pub async fn weather_forecast(&self, location: &str, date: Option<&str>) -> String {
        let Some((city, country)) = parse_location(location) else {
            return INVALID_LOCATION.to_string();
        };

        let date = match date {
            None => None,
            Some(s) => {
                if !validate_date(s) {
                    return DATE_OUT_OF_RANGE.to_string();
                }
                s.parse::<NaiveDate>().ok()
            }
        };

        match self.weather.forecast(&city, &country, date).await {
            Ok(forecast) => format_forecast(&forecast, None),
            Err(e) => {
                tracing::warn!(error = %e, location, "weather lookup failed");
                format!("Unable to retrieve weather data: {e}. Please try again later.")
            }
        }
    }
}

impl ToolHost for TripToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        match call.name.as_str() {
            PARTNER_LOOKUP_TOOL => {
                let name = require_str(&call.input, "partner_name")?;
                Ok(Value::String(self.partner_lookup(name).await))
            }
            WEATHER_FORECAST_TOOL => {
                let location = require_str(&call.input, "location")?;
                let date = call.input.get("date").and_then(Value::as_str);
                Ok(Value::String(self.weather_forecast(location, date).await))
            }
            other => Err(ToolError::NotFound(other.to_string())),
        }
    }
}

fn require_str<'a>(input: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    input
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidInput(format!("missing '{field}' argument")))
}

/// Split a "City, Country" string into its segments.
///
/// Exactly one comma and two non-empty segments; anything else is
/// rejected without a lookup.
fn parse_location(location: &str) -> Option<(String, String)> {
    let mut parts = location.split(',');
    let city = parts.next()?.trim();
    let country = parts.next()?.trim();
    if parts.next().is_some() || city.is_empty() || country.is_empty() {
        return None;
    }
    Some((city.to_string(), country.to_string()))
}

fn partner_lookup_spec() -> ToolSpec {
    ToolSpec {
        name: PARTNER_LOOKUP_TOOL.to_string(),
        description: "Look up a business partner by name and return their location \
                      information. Use this when the user asks about a partner's \
                      location or wants weather for a partner visit."
            .to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "partner_name": {
                    "type": "string",
                    "description": "The name of the business partner to look up"
                }
            },
            "required": ["partner_name"]
        }),
    }
}

fn weather_forecast_spec() -> ToolSpec {
    ToolSpec {
        name: WEATHER_FORECAST_TOOL.to_string(),
        description: "Get the weather forecast for a location and optional date. \
                      The location must be in the format 'City, Country' \
                      (e.g., 'Berlin, Germany'); the date must be an ISO date \
                      within the next 7 days."
            .to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Location in the format 'City, Country'"
                },
                "date": {
                    "type": "string",
                    "description": "Optional ISO date (YYYY-MM-DD) within the next 7 days"
                }
            },
            "required": ["location"]
        }),
    }
}
