//! Weather namespace.
//!
//! Forecasts come from the National Weather Service MapClick page, so only
//! US coordinates return data.

mod countries;
mod forecast;
mod page;
mod units;

pub use forecast::*;
pub use units::*;

use crate::domains::tools::{NamespaceDef, ParamSpec};
use crate::operation;

pub const DESCRIPTION: &str = "Weather forecast utilities (US only, via weather.gov).";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION)
        .operation(
            operation!(
                "current_with_forecast",
                "Current conditions and forecast periods for a US location. Unit is c, celsius, f or fahrenheit; blank uses the configured or locale default.",
                |args, config| current_with_forecast(
                    args.float("latitude")?,
                    args.float("longitude")?,
                    args.str("unit")?,
                    config
                )
            )
            .param(ParamSpec::float("latitude", "Latitude in decimal degrees"))
            .param(ParamSpec::float("longitude", "Longitude in decimal degrees"))
            .param(ParamSpec::string("unit", "Temperature unit").with_default("")),
        )
        .operation(
            operation!(
                "temperature_unit_for_country",
                "Default temperature unit (celsius or fahrenheit) of a country, by ISO alpha-2 or alpha-3 code.",
                |args, _| temperature_unit_for_country(args.str("country_code")?)
            )
            .param(ParamSpec::string("country_code", "ISO 3166 alpha-2 or alpha-3 code")),
        )
}
