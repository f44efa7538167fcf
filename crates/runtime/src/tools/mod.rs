//! Tool execution: host trait and the trip-planning tools.

pub mod errors;
mod host;
mod trip;

pub use errors::ToolError;
pub use host::ToolHost;
pub use trip::{PARTNER_LOOKUP_TOOL, TripToolHost, WEATHER_FORECAST_TOOL};
