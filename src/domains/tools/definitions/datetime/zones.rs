use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::clock::{resolve_zone, zone_offset_at};
use crate::core::config::Config;
use crate::domains::tools::definitions::common::{locale_country_code, structured, title_case};
use crate::domains::tools::{OpResult, OperationError};

#[derive(Debug, Serialize)]
pub struct ZoneSummary {
    pub name: String,
    pub code: String,
    pub utc_offset: String,
}

#[derive(Debug, Serialize)]
pub struct CountryZones {
    pub country: String,
    pub country_code: String,
    pub timezones: Vec<ZoneSummary>,
    pub count: usize,
}

/// Country code -> zone names, from `zone.tab`.
pub fn read_zone_tab(dir: &Path) -> Result<BTreeMap<String, Vec<String>>, OperationError> {
    let mut mapping: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for fields in read_tab(&dir.join("zone.tab"))? {
        if let (Some(code), Some(name)) = (fields.first(), fields.get(2)) {
            mapping.entry(code.clone()).or_default().push(name.clone());
        }
    }
    Ok(mapping)
}

/// Country name for a code, from `iso3166.tab`, title-cased.
pub fn country_name(dir: &Path, code: &str) -> Result<String, OperationError> {
    Ok(read_tab(&dir.join("iso3166.tab"))?
        .into_iter()
        .find(|fields| fields.first().is_some_and(|c| c == code))
        .and_then(|fields| fields.get(1).map(|name| title_case(&name.to_lowercase())))
        .unwrap_or_default())
}

fn read_tab(path: &Path) -> Result<Vec<Vec<String>>, OperationError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        OperationError::not_found(format!(
            "Time zone table {} is not available: {}",
            path.display(),
            e
        ))
    })?;

    Ok(contents
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| line.trim().split('\t').map(str::to_string).collect())
        .collect())
}

pub fn country_timezones(country_code: &str, config: &Config) -> OpResult {
    let code = match country_code.trim() {
        "" => locale_country_code().ok_or_else(|| {
            OperationError::invalid_input("Could not detect country from locale.")
        })?,
        code => code.to_ascii_uppercase(),
    };

    let dir = &config.tools.zoneinfo_dir;
    let mut zone_tab = read_zone_tab(dir)?;
    let mut names = zone_tab
        .remove(&code)
        .ok_or_else(|| OperationError::not_found(format!("Unknown country code: '{}'", code)))?;
    names.sort();
    debug!("{} has {} zone(s)", code, names.len());

    let now = Utc::now();
    let timezones: Vec<ZoneSummary> = names
        .into_iter()
        .map(|name| {
            let (code, utc_offset) = resolve_zone(&name)
                .map(|tz| zone_offset_at(now, tz))
                .unwrap_or_default();
            ZoneSummary {
                name,
                code,
                utc_offset,
            }
        })
        .collect();

    structured(CountryZones {
        country: country_name(dir, &code)?,
        country_code: code,
        count: timezones.len(),
        timezones,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn zoneinfo_fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("zone.tab"),
            "# comment line\n\
             US\t+404251-0740023\tAmerica/New_York\tEastern (most areas)\n\
             US\t+340308-1181434\tAmerica/Los_Angeles\tPacific\n\
             JP\t+353916+1394441\tAsia/Tokyo\n\
             \n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("iso3166.tab"),
            "# ISO 3166 alpha-2 country codes\n\
             JP\tJapan\n\
             KR\tKorea (South)\n\
             US\tUnited States\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.tools.zoneinfo_dir = dir.path().to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_country_timezones_sorted() {
        let (_dir, config) = zoneinfo_fixture();
        let payload = country_timezones("us", &config).unwrap();

        assert_eq!(payload["country"], "United States");
        assert_eq!(payload["country_code"], "US");
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["timezones"][0]["name"], "America/Los_Angeles");
        assert_eq!(payload["timezones"][1]["name"], "America/New_York");

        let keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["country", "country_code", "timezones", "count"]);
    }

    #[test]
    fn test_country_timezones_zone_details() {
        let (_dir, config) = zoneinfo_fixture();
        let payload = country_timezones("JP", &config).unwrap();
        assert_eq!(
            payload["timezones"],
            json!([{ "name": "Asia/Tokyo", "code": "JST", "utc_offset": "+0900" }])
        );
    }

    #[test]
    fn test_country_timezones_unknown_code() {
        let (_dir, config) = zoneinfo_fixture();
        let err = country_timezones("ZZ", &config).unwrap_err();
        assert!(err.is_soft());
        assert_eq!(err.to_string(), "Unknown country code: 'ZZ'");
    }

    #[test]
    fn test_missing_tables_are_soft() {
        let mut config = Config::default();
        config.tools.zoneinfo_dir = "/nonexistent/zoneinfo".into();
        assert!(country_timezones("US", &config).unwrap_err().is_soft());
    }

    #[test]
    fn test_country_name_title_case() {
        let (dir, _) = zoneinfo_fixture();
        assert_eq!(country_name(dir.path(), "KR").unwrap(), "Korea (South)");
        assert_eq!(country_name(dir.path(), "ZZ").unwrap(), "");
    }
}
