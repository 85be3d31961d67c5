use serde_json::json;
use tracing::info;

use super::page::{html_to_markdown, parse_current, parse_forecast, parse_location};
use super::units::{TemperatureUnit, convert_temperatures, resolve_unit};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::fetch_text;
use crate::domains::tools::{OpResult, OperationError};

/// Fill the `{query}` slot of the configured page URL.
pub fn forecast_url(template: &str, latitude: f64, longitude: f64) -> Result<String, OperationError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(OperationError::invalid_input(format!(
            "Latitude must be between -90 and 90 (got {})",
            latitude
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(OperationError::invalid_input(format!(
            "Longitude must be between -180 and 180 (got {})",
            longitude
        )));
    }

    let query = serde_urlencoded::to_string([("lat", latitude), ("lon", longitude)])
        .map_err(|e| OperationError::invalid_input(format!("Invalid coordinates: {}", e)))?;
    Ok(template.replace("{query}", &query))
}

pub fn current_with_forecast(
    latitude: f64,
    longitude: f64,
    unit: &str,
    config: &Config,
) -> OpResult {
    let url = forecast_url(&config.tools.weather_url, latitude, longitude)?;
    info!("Fetching forecast for {}, {}", latitude, longitude);

    let html = fetch_text(&url, config.tools.weather_timeout(), "text/html")
        .map_err(|e| OperationError::external(format!("Failed to fetch weather: {}", e)))?;

    let markdown = html_to_markdown(&html);
    if markdown.is_empty() || !markdown.to_lowercase().contains("forecast") {
        return Err(OperationError::external(
            "No forecast data found. Coordinates may be outside the US or invalid.",
        ));
    }

    let unit = resolve_unit(unit, config);
    let mut current = parse_current(&html);
    let mut forecast = parse_forecast(&html);

    if unit == TemperatureUnit::Celsius {
        if let Some(serde_json::Value::String(t)) = current.get_mut("temperature") {
            *t = convert_temperatures(t);
        }
        for period in &mut forecast {
            for text in [&mut period.temperature, &mut period.detail].into_iter().flatten() {
                *text = convert_temperatures(text);
            }
        }
    }

    Ok(json!({
        "location": parse_location(&html),
        "current": current,
        "forecast": forecast,
        "unit": unit.as_str(),
    }))
}
