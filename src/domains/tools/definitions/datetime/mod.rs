//! Date and time namespace.
//!
//! Zones come from the bundled IANA database (`chrono-tz`); country
//! listings read `zone.tab` and `iso3166.tab` from the configured zoneinfo
//! directory.

mod clock;
mod zones;

pub use clock::*;
pub use zones::*;

use crate::domains::tools::{NamespaceDef, ParamSpec};
use crate::operation;

pub const DESCRIPTION: &str = "Date and time utilities.";

pub fn namespace() -> NamespaceDef {
    NamespaceDef::from_module(module_path!(), DESCRIPTION)
        .operation(
            operation!(
                "current",
                "Current date and time in a time zone (IANA name or abbreviation such as PST). Blank uses the local zone.",
                |args, config| current(args.str("time_zone")?, config)
            )
            .param(
                ParamSpec::string("time_zone", "IANA time zone name or abbreviation")
                    .with_default(""),
            ),
        )
        .operation(operation!(
            "configured_timezone",
            "The IANA name of the locally configured time zone.",
            |_, config| configured_timezone(config)
        ))
        .operation(
            operation!(
                "country_timezones",
                "All time zones of a country with their current abbreviation and UTC offset. Blank detects the country from the locale.",
                |args, config| country_timezones(args.str("country_code")?, config)
            )
            .param(
                ParamSpec::string("country_code", "ISO 3166 alpha-2 country code")
                    .with_default(""),
            ),
        )
}
