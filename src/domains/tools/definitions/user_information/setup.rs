use std::io;
use std::path::Path;

use chrono::NaiveDate;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use serde_json::{Map, Value};
use tracing::info;

use super::profile::{missing_fields, read_profile};
use crate::core::error::{Error, Result};

/// Line-oriented interaction used by the profile setup.
pub trait Prompter {
    /// Ask for one line of input. Blank answers are allowed.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
    fn say(&mut self, message: &str);
}

/// Terminal prompts via `dialoguer`.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn say(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// Nothing to ask; the file was left untouched.
    AlreadyComplete,
    /// The listed fields were collected and the profile was written.
    Saved { filled: Vec<String> },
}

/// Prompt for every missing required field and write the merged profile.
///
/// Fields already present are never asked for again. Birthdays are asked
/// until they parse as `YYYY-MM-DD`; addresses are read one per line until
/// a blank line, with at least one required.
pub fn ensure_profile(path: &Path, prompter: &mut dyn Prompter) -> Result<SetupOutcome> {
    let mut data = read_profile(path)
        .map_err(|e| Error::config(e.to_string()))?
        .unwrap_or_default();

    let missing = missing_fields(&data);
    if missing.is_empty() {
        prompter.say(&format!("{} already has all required fields.", path.display()));
        return Ok(SetupOutcome::AlreadyComplete);
    }

    prompter.say(&format!("Setting up {}...", path.display()));
    if !data.is_empty() {
        prompter.say(&format!("Missing fields: {}", missing.join(", ")));
    }

    for field in &missing {
        let value = match field.as_str() {
            "addresss" => ask_addresses(prompter)?,
            "birthday" => ask_birthday(prompter)?,
            other => Value::String(prompter.ask(other)?),
        };
        data.insert(field.clone(), value);
    }

    write_profile(path, &data)?;
    info!("Profile saved to {}", path.display());
    prompter.say(&format!("Saved to {}", path.display()));

    Ok(SetupOutcome::Saved { filled: missing })
}

fn ask_birthday(prompter: &mut dyn Prompter) -> io::Result<Value> {
    loop {
        let answer = prompter.ask("birthday (YYYY-MM-DD)")?;
        if NaiveDate::parse_from_str(&answer, "%Y-%m-%d").is_ok() {
            return Ok(Value::String(answer));
        }
        prompter.say("  Invalid date format. Use YYYY-MM-DD.");
    }
}

fn ask_addresses(prompter: &mut dyn Prompter) -> io::Result<Value> {
    prompter.say("addresss (enter one address per line, blank line to stop):");
    let mut addresses = Vec::new();
    loop {
        let answer = prompter.ask("  address")?;
        if !answer.is_empty() {
            addresses.push(Value::String(answer));
        } else if addresses.is_empty() {
            prompter.say("  (at least one address required)");
        } else {
            return Ok(Value::Array(addresses));
        }
    }
}

fn write_profile(path: &Path, data: &Map<String, Value>) -> Result<()> {
    let mut contents = serde_json::to_string_pretty(data)?;
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Answers questions from a script and records everything said.
    struct ScriptedPrompter {
        answers: VecDeque<&'static str>,
        asked: Vec<String>,
        said: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
                said: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, prompt: &str) -> io::Result<String> {
            self.asked.push(prompt.to_string());
            self.answers
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }

        fn say(&mut self, message: &str) {
            self.said.push(message.to_string());
        }
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_creates_profile_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.data.json");
        let mut prompter = ScriptedPrompter::new(&[
            "not-a-date",
            "1990-01-31",
            "jane@example.com",
            "+1-555-123-4567",
            "",
            "123 Main St",
            "456 Side Ave",
            "",
        ]);

        let outcome = ensure_profile(&path, &mut prompter).unwrap();
        assert_eq!(
            outcome,
            SetupOutcome::Saved {
                filled: vec![
                    "birthday".into(),
                    "email".into(),
                    "phone".into(),
                    "addresss".into()
                ]
            }
        );
        assert_eq!(
            read(&path),
            json!({
                "birthday": "1990-01-31",
                "email": "jane@example.com",
                "phone": "+1-555-123-4567",
                "addresss": ["123 Main St", "456 Side Ave"],
            })
        );
        assert!(prompter.said.iter().any(|m| m.contains("Invalid date format")));
        assert!(prompter.said.iter().any(|m| m.contains("at least one address")));
    }

    #[test]
    fn test_only_missing_fields_are_prompted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.data.json");
        std::fs::write(
            &path,
            json!({ "name": "JQ", "birthday": "1990-01-31", "email": "jq@example.com" }).to_string(),
        )
        .unwrap();

        let mut prompter = ScriptedPrompter::new(&["555-0100", "1 Loop Rd", ""]);
        ensure_profile(&path, &mut prompter).unwrap();

        assert_eq!(prompter.asked, vec!["phone", "  address", "  address"]);
        assert!(prompter.said.iter().any(|m| m == "Missing fields: phone, addresss"));

        let saved = read(&path);
        assert_eq!(saved["name"], "JQ");
        assert_eq!(saved["phone"], "555-0100");
        assert_eq!(saved["addresss"], json!(["1 Loop Rd"]));
    }

    #[test]
    fn test_complete_profile_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.data.json");
        let original = json!({
            "birthday": "1990-01-31",
            "email": "jane@example.com",
            "phone": "+1-555-123-4567",
            "addresss": ["123 Main St"],
        })
        .to_string();
        std::fs::write(&path, &original).unwrap();

        let mut prompter = ScriptedPrompter::new(&[]);
        assert_eq!(
            ensure_profile(&path, &mut prompter).unwrap(),
            SetupOutcome::AlreadyComplete
        );
        assert!(prompter.asked.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_aborted_prompt_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.data.json");
        let mut prompter = ScriptedPrompter::new(&["1990-01-31"]);

        assert!(ensure_profile(&path, &mut prompter).is_err());
        assert!(!path.exists());
    }
}
