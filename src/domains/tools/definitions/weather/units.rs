use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::countries::to_alpha2;
use crate::core::config::Config;
use crate::domains::tools::definitions::common::locale_country_code;
use crate::domains::tools::{OpResult, OperationError};

/// Countries and territories that report temperatures in Fahrenheit.
const FAHRENHEIT_COUNTRIES: &[&str] = &[
    "AS", "BS", "BZ", "FM", "GU", "KY", "LR", "MH", "MP", "PR", "PW", "US", "VI",
];

static FAHRENHEIT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+)\s*°F").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// `c`, `celsius`, `f` or `fahrenheit`, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Some(Self::Celsius),
            "f" | "fahrenheit" => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    /// Default unit of an alpha-2 country code.
    pub fn for_country(alpha2: &str) -> Self {
        if FAHRENHEIT_COUNTRIES.contains(&alpha2) {
            Self::Fahrenheit
        } else {
            Self::Celsius
        }
    }
}

/// Unit used when the caller does not pick one: the configured unit, then
/// the locale country's default, then Fahrenheit.
pub fn preferred_unit(config: &Config) -> TemperatureUnit {
    if let Some(configured) = config.tools.temperature_unit.as_deref() {
        match TemperatureUnit::parse(configured) {
            Some(unit) => return unit,
            None => warn!("Ignoring invalid temperature unit '{}'", configured),
        }
    }

    locale_country_code()
        .as_deref()
        .and_then(to_alpha2)
        .map(TemperatureUnit::for_country)
        .unwrap_or(TemperatureUnit::Fahrenheit)
}

pub fn resolve_unit(requested: &str, config: &Config) -> TemperatureUnit {
    TemperatureUnit::parse(requested).unwrap_or_else(|| {
        if !requested.trim().is_empty() {
            debug!("Unrecognised unit '{}', using the default", requested);
        }
        preferred_unit(config)
    })
}

/// Rounded to one decimal.
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0 * 10.0).round_ties_even() / 10.0
}

/// Rewrite every `NN°F` in `text` as `N.N°C`.
pub fn convert_temperatures(text: &str) -> String {
    FAHRENHEIT_VALUE
        .replace_all(text, |caps: &Captures| match caps[1].parse::<f64>() {
            Ok(f) => format!("{:.1}°C", fahrenheit_to_celsius(f)),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

pub fn temperature_unit_for_country(country_code: &str) -> OpResult {
    let alpha2 = to_alpha2(country_code).ok_or_else(|| {
        OperationError::not_found(format!("Unknown country code: '{}'", country_code.trim()))
    })?;

    Ok(json!({
        "country_code": alpha2,
        "default_unit": TemperatureUnit::for_country(alpha2),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unit_for_country_alpha2_and_alpha3() {
        assert_eq!(
            temperature_unit_for_country("US").unwrap(),
            json!({ "country_code": "US", "default_unit": "fahrenheit" })
        );
        assert_eq!(
            temperature_unit_for_country("usa").unwrap(),
            json!({ "country_code": "US", "default_unit": "fahrenheit" })
        );
        assert_eq!(temperature_unit_for_country("FR").unwrap()["default_unit"], "celsius");
        assert_eq!(temperature_unit_for_country("PRI").unwrap()["default_unit"], "fahrenheit");
        assert_eq!(temperature_unit_for_country("LR").unwrap()["default_unit"], "fahrenheit");
    }

    #[test]
    fn test_unit_for_unknown_country_is_soft() {
        let err = temperature_unit_for_country("ZZ").unwrap_err();
        assert!(err.is_soft());
        assert_eq!(err.to_string(), "Unknown country code: 'ZZ'");
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(TemperatureUnit::parse("C"), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::parse(" fahrenheit "), Some(TemperatureUnit::Fahrenheit));
        assert_eq!(TemperatureUnit::parse("kelvin"), None);
    }

    #[test]
    fn test_configured_unit_wins() {
        let mut config = Config::default();
        config.tools.temperature_unit = Some("celsius".into());
        assert_eq!(resolve_unit("", &config), TemperatureUnit::Celsius);
        assert_eq!(resolve_unit("f", &config), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_conversion() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
        assert_eq!(fahrenheit_to_celsius(75.0), 23.9);
        assert_eq!(convert_temperatures("High: 75 °F"), "High: 23.9°C");
        assert_eq!(convert_temperatures("-4°F to 50°F"), "-20.0°C to 10.0°C");
        assert_eq!(convert_temperatures("no temperatures"), "no temperatures");
    }
}
