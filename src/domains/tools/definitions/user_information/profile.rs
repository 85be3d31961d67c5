use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use serde_json::{Map, Value};
use tracing::debug;

use super::identity::{Identity, SystemIdentity};
use crate::core::config::Config;
use crate::domains::tools::{OpResult, OperationError};

/// Fields the profile file must provide.
pub const REQUIRED_FIELDS: [&str; 4] = ["birthday", "email", "phone", "addresss"];

fn field_str(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Whether `field` is absent or blank. Names may be a string or a
/// `{first, middle, last}` object; addresses must be a list with at least
/// one non-blank entry.
pub fn is_missing(field: &str, value: Option<&Value>) -> bool {
    match (field, value) {
        ("name", Some(Value::Object(parts))) => name_parts(parts).is_empty(),
        ("name", other) => field_str(other).is_empty(),
        ("addresss", Some(Value::Array(items))) => {
            !items.iter().any(|item| !field_str(Some(item)).is_empty())
        }
        ("addresss", _) => true,
        (_, None | Some(Value::Null) | Some(Value::Bool(false))) => true,
        (_, Some(Value::String(s))) => s.trim().is_empty(),
        (_, Some(Value::Array(a))) => a.is_empty(),
        (_, Some(Value::Object(o))) => o.is_empty(),
        (_, Some(Value::Number(n))) => n.as_f64() == Some(0.0),
        (_, Some(Value::Bool(true))) => false,
    }
}

fn name_parts(parts: &Map<String, Value>) -> Vec<String> {
    ["first", "middle", "last"]
        .iter()
        .map(|key| field_str(parts.get(*key)))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Required fields that are absent or blank, in declaration order.
pub fn missing_fields(data: &Map<String, Value>) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| is_missing(field, data.get(**field)))
        .map(|field| field.to_string())
        .collect()
}

/// Read the profile file; `None` when it does not exist.
pub fn read_profile(path: &Path) -> Result<Option<Map<String, Value>>, OperationError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(OperationError::configuration_missing(format!(
                "Cannot read {}: {}",
                path.display(),
                e
            )));
        }
    };

    match serde_json::from_str(&contents) {
        Ok(Value::Object(data)) => Ok(Some(data)),
        Ok(_) => Err(OperationError::configuration_missing(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(OperationError::configuration_missing(format!(
            "{} is not valid JSON: {}",
            path.display(),
            e
        ))),
    }
}

/// Whole years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let had_birthday = (today.month(), today.day()) >= (born.month(), born.day());
    today.year() - born.year() - i32::from(!had_birthday)
}

/// Resolve `(name, long_name)`: a non-blank file name wins, otherwise the
/// OS identity.
fn resolve_name(raw: Option<&Value>, identity: &dyn Identity) -> (Value, String) {
    let full_name = || identity.full_name().unwrap_or_default();

    match raw {
        Some(value) if !is_missing("name", Some(value)) => {
            let long_name = match value {
                Value::Object(parts) => name_parts(parts).join(" "),
                other => field_str(Some(other)),
            };
            let long_name = if long_name.is_empty() { full_name() } else { long_name };
            (value.clone(), long_name)
        }
        _ => {
            debug!("No name in profile, using the OS identity");
            (
                Value::String(identity.username().unwrap_or_default()),
                full_name(),
            )
        }
    }
}

pub fn personal_data_with(
    path: &Path,
    identity: &dyn Identity,
    today: NaiveDate,
) -> OpResult {
    let data = read_profile(path)?.unwrap_or_default();

    let missing = missing_fields(&data);
    if !missing.is_empty() {
        return Err(OperationError::configuration_missing(format!(
            "{} is missing or incomplete. Run 'tools --setup-profile' to set it up. Missing fields: {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let birthday = field_str(data.get("birthday"));
    let born = NaiveDate::parse_from_str(&birthday, "%Y-%m-%d").map_err(|_| {
        OperationError::configuration_missing(format!(
            "Invalid birthday '{}' in {}: expected YYYY-MM-DD",
            birthday,
            path.display()
        ))
    })?;

    let (name, long_name) = resolve_name(data.get("name"), identity);

    let mut info = Map::new();
    info.insert("name".into(), name.clone());
    info.insert("long_name".into(), Value::String(long_name.clone()));
    info.extend(data);
    info.insert("name".into(), name);
    info.insert("long_name".into(), Value::String(long_name));
    info.insert("age".into(), Value::from(age_on(born, today)));

    Ok(Value::Object(info))
}

pub fn personal_data(config: &Config) -> OpResult {
    let identity = SystemIdentity::new(config.tools.command_timeout());
    personal_data_with(
        &config.tools.user_data_path,
        &identity,
        Local::now().date_naive(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FixedIdentity;

    impl Identity for FixedIdentity {
        fn username(&self) -> Option<String> {
            Some("jane".into())
        }

        fn full_name(&self) -> Option<String> {
            Some("Jane Doe".into())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_profile(dir: &tempfile::TempDir, data: Value) -> std::path::PathBuf {
        let path = dir.path().join("user.data.json");
        std::fs::write(&path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
        path
    }

    fn complete() -> Value {
        json!({
            "birthday": "1990-01-31",
            "email": "jane@example.com",
            "phone": "+1-555-123-4567",
            "addresss": ["123 Main St"],
        })
    }

    #[test]
    fn test_age_on() {
        assert_eq!(age_on(date(1990, 1, 31), date(2024, 1, 30)), 33);
        assert_eq!(age_on(date(1990, 1, 31), date(2024, 1, 31)), 34);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing("email", None));
        assert!(is_missing("email", Some(&json!("  "))));
        assert!(!is_missing("email", Some(&json!("a@b.c"))));
        assert!(is_missing("addresss", Some(&json!("123 Main St"))));
        assert!(is_missing("addresss", Some(&json!(["", " "]))));
        assert!(!is_missing("addresss", Some(&json!(["123 Main St"]))));
        assert!(is_missing("name", Some(&json!({ "first": " " }))));
        assert!(!is_missing("name", Some(&json!({ "last": "Doe" }))));
    }

    #[test]
    fn test_falls_back_to_os_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, complete());

        let payload = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap();
        assert_eq!(payload["name"], "jane");
        assert_eq!(payload["long_name"], "Jane Doe");
        assert_eq!(payload["age"], 34);
        assert_eq!(payload["email"], "jane@example.com");
    }

    #[test]
    fn test_file_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = complete();
        data["name"] = json!({ "first": "Janet", "middle": "Q", "last": "Public" });
        let path = write_profile(&dir, data);

        let payload = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap();
        assert_eq!(payload["name"], json!({ "first": "Janet", "middle": "Q", "last": "Public" }));
        assert_eq!(payload["long_name"], "Janet Q Public");

        let mut data = complete();
        data["name"] = json!("JQ");
        let path = write_profile(&dir, data);
        let payload = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap();
        assert_eq!(payload["name"], "JQ");
        assert_eq!(payload["long_name"], "JQ");
    }

    #[test]
    fn test_output_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, complete());

        let payload = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap();
        let keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["name", "long_name", "birthday", "email", "phone", "addresss", "age"]
        );
    }

    #[test]
    fn test_missing_fields_are_hard_and_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_profile(&dir, json!({ "email": "jane@example.com" }));

        let err = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap_err();
        assert!(!err.is_soft());
        let message = err.to_string();
        assert!(message.contains("birthday"));
        assert!(message.contains("phone"));
        assert!(message.contains("addresss"));
        assert!(!message.contains("email,"));
    }

    #[test]
    fn test_missing_file_names_every_field() {
        let err = personal_data_with(
            Path::new("/nonexistent/user.data.json"),
            &FixedIdentity,
            date(2024, 6, 1),
        )
        .unwrap_err();
        assert!(!err.is_soft());
        assert!(err.to_string().ends_with("birthday, email, phone, addresss"));
    }

    #[test]
    fn test_invalid_birthday_is_hard() {
        let dir = tempfile::tempdir().unwrap();
        let mut data = complete();
        data["birthday"] = json!("31/01/1990");
        let path = write_profile(&dir, data);

        let err = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap_err();
        assert!(!err.is_soft());
        assert!(err.to_string().contains("Invalid birthday"));
    }

    #[test]
    fn test_invalid_json_is_hard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = personal_data_with(&path, &FixedIdentity, date(2024, 6, 1)).unwrap_err();
        assert!(!err.is_soft());
    }
}
