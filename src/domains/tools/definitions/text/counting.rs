use serde_json::json;

use crate::domains::tools::OpResult;

/// Words are runs of non-whitespace.
pub fn words_count(text: &str) -> OpResult {
    Ok(json!({ "words": text.split_whitespace().count() }))
}

/// Counts Unicode scalar values; only U+0020 counts as a space.
pub fn characters_count(text: &str) -> OpResult {
    let with_spaces = text.chars().count();
    let excluding_spaces = text.chars().filter(|&c| c != ' ').count();
    Ok(json!({
        "characters": {
            "with_spaces": with_spaces,
            "excluding_spaces": excluding_spaces,
        }
    }))
}

pub fn show_characters(word: &str) -> OpResult {
    let characters: Vec<String> = word.chars().map(String::from).collect();
    Ok(json!({ "word": word, "characters": characters }))
}
