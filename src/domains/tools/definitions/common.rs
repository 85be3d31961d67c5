//! Common utilities shared across namespaces.
//!
//! Network fetches, bounded subprocess calls and locale detection. Nothing
//! here is registered as an operation.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use serde_json::{Map, Number, Value};
use tracing::{debug, error, warn};

use crate::domains::tools::{OpResult, OperationError};

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("toolbox-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Poll interval while waiting on a subprocess.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Fetch a URL as text with a hard timeout.
///
/// `file://` URLs are read from disk, which is how fixtures stand in for
/// the real services.
pub fn fetch_text(url: &str, timeout: Duration, accept: &str) -> Result<String, OperationError> {
    if let Some(path) = url.strip_prefix("file://") {
        debug!("Reading local source {}", path);
        return std::fs::read_to_string(path)
            .map_err(|e| OperationError::external(format!("Failed to read {}: {}", path, e)));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| OperationError::external(format!("HTTP client error: {}", e)))?;

    let response = client.get(url).header(ACCEPT, accept).send().map_err(|e| {
        error!("Request to {} failed: {}", url, e);
        if e.is_timeout() {
            OperationError::external(format!("Request timed out after {:?}", timeout))
        } else if e.is_connect() {
            OperationError::external(format!("Failed to connect: {}", e))
        } else {
            OperationError::external(format!("HTTP request failed: {}", e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(OperationError::external(format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    response
        .text()
        .map_err(|e| OperationError::external(format!("Failed to read response: {}", e)))
}

/// Run a command and return its trimmed stdout.
///
/// Returns `None` on spawn failure, non-zero exit, empty output, or when
/// the command outlives `timeout` (it is killed). Stdout is drained on a
/// separate thread so chatty commands cannot stall on a full pipe.
pub fn run_command(program: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| debug!("Cannot run {}: {}", program, e))
        .ok()?;

    let mut pipe = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut stdout = String::new();
        pipe.read_to_string(&mut stdout).map(|_| stdout)
    });

    let deadline = Instant::now() + timeout;
    let succeeded = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status.success(),
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) => {
                warn!("{} timed out after {:?}", program, timeout);
                let _ = child.kill();
                let _ = child.wait();
                break false;
            }
            Err(e) => {
                warn!("Waiting on {} failed: {}", program, e);
                let _ = child.kill();
                let _ = child.wait();
                break false;
            }
        }
    };

    // The pipe closes once the child is gone, which ends the read.
    let stdout = reader.join().ok()?.ok()?;
    if !succeeded {
        return None;
    }
    let stdout = stdout.trim();
    (!stdout.is_empty()).then(|| stdout.to_string())
}

/// Extract the territory from a locale name like `en_US.UTF-8`.
pub fn country_from_locale(locale: &str) -> Option<String> {
    let (_, territory) = locale.split_once('_')?;
    let code: String = territory.chars().take(2).collect();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| code.to_ascii_uppercase())
}

/// Country of the process locale (`LC_ALL`, `LC_CTYPE`, then `LANG`).
pub fn locale_country_code() -> Option<String> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty())
        .and_then(|locale| country_from_locale(&locale))
}

/// Wrap a serializable value as an operation result.
pub fn structured<T: serde::Serialize>(value: T) -> OpResult {
    serde_json::to_value(value)
        .map_err(|e| OperationError::external(format!("Failed to encode result: {}", e)))
}

/// `{"result": x}` for a float, rejecting non-finite values.
pub fn number_result(x: f64) -> OpResult {
    if x.is_finite() {
        Ok(serde_json::json!({ "result": x }))
    } else if x.is_nan() {
        Err(OperationError::invalid_input("Result is not a real number"))
    } else {
        Err(OperationError::invalid_input("Result is too large to represent"))
    }
}

/// `{"result": n}` for an integer of any size; the digits reach JSON as an
/// exact number.
pub fn integer_result(digits: &str) -> OpResult {
    let number: Number = digits
        .parse()
        .map_err(|e| OperationError::invalid_input(format!("Result is not an integer: {}", e)))?;

    let mut payload = Map::new();
    payload.insert("result".into(), Value::Number(number));
    Ok(Value::Object(payload))
}

/// Capitalise every word: "korea (south)" -> "Korea (South)".
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_from_locale() {
        assert_eq!(country_from_locale("en_US.UTF-8").as_deref(), Some("US"));
        assert_eq!(country_from_locale("fr_fr").as_deref(), Some("FR"));
        assert_eq!(country_from_locale("C"), None);
        assert_eq!(country_from_locale("POSIX"), None);
    }

    #[test]
    fn test_number_result_rejects_non_finite() {
        assert!(number_result(1.5).is_ok());
        assert!(number_result(f64::INFINITY).is_err());
        assert!(number_result(f64::NAN).is_err());
    }

    #[test]
    fn test_integer_result_keeps_every_digit() {
        let payload = integer_result("51090942171709440000").unwrap();
        assert!(payload["result"].is_number());
        assert_eq!(payload["result"].to_string(), "51090942171709440000");
        assert_eq!(integer_result("42").unwrap(), serde_json::json!({ "result": 42 }));
        assert!(integer_result("4.2e1x").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("united states"), "United States");
        assert_eq!(title_case("viet nam"), "Viet Nam");
        assert_eq!(title_case("korea (south)"), "Korea (South)");
    }

    #[test]
    fn test_fetch_text_reads_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        std::fs::write(&path, "{\"ip\":\"203.0.113.1\"}").unwrap();

        let url = format!("file://{}", path.display());
        let body = fetch_text(&url, Duration::from_secs(1), "application/json").unwrap();
        assert!(body.contains("203.0.113.1"));

        assert!(fetch_text("file:///nonexistent/x.json", Duration::from_secs(1), "*/*").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_output_and_timeout() {
        assert_eq!(
            run_command("echo", &["hello"], Duration::from_secs(5)).as_deref(),
            Some("hello")
        );
        assert_eq!(run_command("false", &[], Duration::from_secs(5)), None);
        assert_eq!(run_command("sleep", &["5"], Duration::from_millis(100)), None);
        assert_eq!(run_command("definitely-not-a-command", &[], Duration::from_secs(1)), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_drains_large_output() {
        // Well past a 64 KiB pipe buffer.
        let output = run_command("seq", &["1", "100000"], Duration::from_secs(10)).unwrap();
        assert!(output.starts_with("1\n2\n"));
        assert!(output.ends_with("100000"));
        assert_eq!(output.lines().count(), 100_000);
    }
}
