use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::json;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::domains::tools::{OpResult, OperationError};

/// Abbreviations accepted in place of an IANA name.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("PT", "America/Los_Angeles"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("MT", "America/Denver"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("CT", "America/Chicago"),
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("ET", "America/New_York"),
    ("AKST", "America/Anchorage"),
    ("AKDT", "America/Anchorage"),
    ("HST", "Pacific/Honolulu"),
    ("GMT", "UTC"),
    ("UTC", "UTC"),
    ("Z", "UTC"),
    ("BST", "Europe/London"),
    ("WET", "Europe/Lisbon"),
    ("CET", "Europe/Paris"),
    ("CEST", "Europe/Paris"),
    ("EET", "Europe/Athens"),
    ("MSK", "Europe/Moscow"),
    ("IST", "Asia/Kolkata"),
    ("ICT", "Asia/Ho_Chi_Minh"),
    ("SGT", "Asia/Singapore"),
    ("HKT", "Asia/Hong_Kong"),
    ("JST", "Asia/Tokyo"),
    ("KST", "Asia/Seoul"),
    ("AEST", "Australia/Sydney"),
    ("AEDT", "Australia/Sydney"),
    ("NZST", "Pacific/Auckland"),
    ("NZDT", "Pacific/Auckland"),
];

/// Resolve an IANA name (any case) or a common abbreviation.
pub fn resolve_zone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if let Some((_, iana)) = ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(name))
    {
        return Tz::from_str(iana).ok();
    }
    Tz::from_str(name).ok().or_else(|| {
        chrono_tz::TZ_VARIANTS
            .iter()
            .find(|tz| tz.name().eq_ignore_ascii_case(name))
            .copied()
    })
}

/// IANA name of the local zone: `TZ`, the `/etc/localtime` symlink,
/// `/etc/timezone`, then `UTC`.
pub fn local_zone_name() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':').trim();
        if !tz.is_empty() {
            return tz.to_string();
        }
    }

    if let Some(name) = zone_from_localtime_link(Path::new("/etc/localtime")) {
        return name;
    }

    if let Ok(contents) = std::fs::read_to_string("/etc/timezone") {
        let name = contents.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    "UTC".to_string()
}

/// `/usr/share/zoneinfo/Europe/Paris` -> `Europe/Paris`.
fn zone_from_localtime_link(link: &Path) -> Option<String> {
    let target = std::fs::read_link(link).ok()?;
    let target = target.to_string_lossy();
    let (_, name) = target.split_once("/zoneinfo/")?;
    (!name.is_empty()).then(|| name.to_string())
}

/// The local zone, falling back to UTC when its name is not in the database.
pub fn local_zone() -> Tz {
    let name = local_zone_name();
    resolve_zone(&name).unwrap_or_else(|| {
        warn!("Local time zone '{}' is unknown, using UTC", name);
        Tz::UTC
    })
}

/// Date, time and zone details of `instant` seen from `tz`.
pub fn describe_instant(instant: DateTime<Utc>, tz: Tz) -> serde_json::Value {
    let local = instant.with_timezone(&tz);
    json!({
        "date_time": {
            "value": local.format("%Y-%m-%d %I:%M:%S %p").to_string(),
            "iso8601": local.to_rfc3339_opts(SecondsFormat::Micros, false),
            "unix_timestamp": instant.timestamp_micros() as f64 / 1_000_000.0,
        },
        "timezone": {
            "name": tz.name(),
            "code": local.format("%Z").to_string(),
            "utc_offset": local.format("%z").to_string(),
        },
    })
}

/// Abbreviation and `%z` offset of `tz` at `instant`.
pub fn zone_offset_at(instant: DateTime<Utc>, tz: Tz) -> (String, String) {
    let local = tz.from_utc_datetime(&instant.naive_utc());
    (
        local.format("%Z").to_string(),
        local.format("%z").to_string(),
    )
}

pub fn current(time_zone: &str, _config: &Config) -> OpResult {
    let tz = if time_zone.trim().is_empty() {
        local_zone()
    } else {
        resolve_zone(time_zone).ok_or_else(|| {
            OperationError::not_found(format!("Unknown time zone: '{}'", time_zone))
        })?
    };
    debug!("Current time in {}", tz.name());
    Ok(describe_instant(Utc::now(), tz))
}

pub fn configured_timezone(_config: &Config) -> OpResult {
    Ok(json!({ "timezone_name": local_zone_name() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_resolve_zone_names_and_abbreviations() {
        assert_eq!(resolve_zone("PST"), Some(Tz::America__Los_Angeles));
        assert_eq!(resolve_zone("est"), Some(Tz::America__New_York));
        assert_eq!(resolve_zone("Asia/Tokyo"), Some(Tz::Asia__Tokyo));
        assert_eq!(resolve_zone("europe/paris"), Some(Tz::Europe__Paris));
        assert_eq!(resolve_zone("NOT_A_REAL_TZ"), None);
    }

    #[test]
    fn test_describe_instant_in_winter_and_summer() {
        let tz = Tz::America__Los_Angeles;

        let winter = describe_instant(instant(2024, 1, 15, 20, 30, 0), tz);
        assert_eq!(winter["date_time"]["value"], "2024-01-15 12:30:00 PM");
        assert_eq!(winter["date_time"]["iso8601"], "2024-01-15T12:30:00.000000-08:00");
        assert_eq!(winter["date_time"]["unix_timestamp"], json!(1_705_350_600.0));
        assert_eq!(winter["timezone"]["name"], "America/Los_Angeles");
        assert_eq!(winter["timezone"]["code"], "PST");
        assert_eq!(winter["timezone"]["utc_offset"], "-0800");

        let summer = describe_instant(instant(2024, 7, 1, 8, 0, 0), tz);
        assert_eq!(summer["date_time"]["value"], "2024-07-01 01:00:00 AM");
        assert_eq!(summer["timezone"]["code"], "PDT");
        assert_eq!(summer["timezone"]["utc_offset"], "-0700");
    }

    #[test]
    fn test_zone_offset_at() {
        let (code, offset) = zone_offset_at(instant(2024, 1, 1, 0, 0, 0), Tz::Asia__Tokyo);
        assert_eq!(code, "JST");
        assert_eq!(offset, "+0900");
    }

    #[test]
    fn test_current_unknown_zone_is_soft() {
        let err = current("NOT_A_REAL_TZ", &Config::default()).unwrap_err();
        assert!(err.is_soft());
        assert!(err.to_string().contains("NOT_A_REAL_TZ"));
    }

    #[test]
    fn test_current_shape() {
        let payload = current("PST", &Config::default()).unwrap();
        assert_eq!(payload["timezone"]["name"], "America/Los_Angeles");
        assert!(payload["date_time"]["unix_timestamp"].is_f64());

        let keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["date_time", "timezone"]);
    }

    #[test]
    fn test_configured_timezone_is_never_blank() {
        let payload = configured_timezone(&Config::default()).unwrap();
        assert!(!payload["timezone_name"].as_str().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_zone_from_localtime_link() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("localtime");
        std::os::unix::fs::symlink("/usr/share/zoneinfo/Europe/Paris", &link).unwrap();
        assert_eq!(zone_from_localtime_link(&link).as_deref(), Some("Europe/Paris"));

        assert_eq!(zone_from_localtime_link(&dir.path().join("missing")), None);
    }
}
