//! Extraction from the NWS MapClick HTML page.
//!
//! The page is scraped with targeted patterns rather than a DOM: only a
//! handful of classes carry the data we need.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid regex"));
    };
}

pattern!(TAG, r"<[^>]+>");
pattern!(WHITESPACE, r"\s+");
pattern!(SCRIPT, r"(?is)<script[^>]*>.*?</script>");
pattern!(STYLE, r"(?is)<style[^>]*>.*?</style>");
pattern!(HEADING, r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>");
pattern!(LINE_BREAK, r"(?i)<br\s*/?>");
pattern!(BLOCK_END, r"(?i)</(?:p|tr)>");
pattern!(CELL_END, r"(?i)</td>");
pattern!(LIST_ITEM, r"(?i)<li[^>]*>");
pattern!(BLANK_LINES, r"\n{3,}");

pattern!(LOCATION, r#"(?s)<h2 class="panel-title"[^>]*>(.*?)</h2>"#);
pattern!(CURRENT_TEMPERATURE, r#"(?s)class="myforecast-current-lrg"[^>]*>(.*?)</p>"#);
pattern!(CURRENT_CONDITIONS, r#"(?s)class="myforecast-current"[^>]*>(.*?)</p>"#);
pattern!(DETAIL_TABLE, r#"(?s)id="current_conditions_detail"[^>]*>(.*?)</div>"#);
pattern!(ROW, r"(?s)<tr>(.*?)</tr>");
pattern!(CELL, r"(?s)<td[^>]*>(.*?)</td>");
pattern!(TOMBSTONE, r#"(?s)class="tombstone-container"[^>]*>(.*?)</div>"#);
pattern!(PERIOD_NAME, r#"(?s)class="period-name"[^>]*>(.*?)</p>"#);
pattern!(SHORT_DESC, r#"(?s)class="short-desc"[^>]*>(.*?)</p>"#);
pattern!(PERIOD_TEMPERATURE, r#"(?s)class="temp[^"]*"[^>]*>(.*?)</p>"#);
pattern!(IMAGE_ALT, r#"(?s)<img[^>]+alt="([^"]*)""#);

const ENTITIES: &[(&str, &str)] = &[
    ("&deg;", "°"),
    ("&#176;", "°"),
    ("&amp;", "&"),
    ("&nbsp;", " "),
];

/// One forecast period ("Tonight", "Wednesday", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastPeriod {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

/// Drop tags, decode entities and collapse whitespace.
pub fn strip_tags(html: &str) -> String {
    let text = decode_entities(&TAG.replace_all(html, " "));
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Rough Markdown rendering of the page, used to check that it carries a
/// forecast at all.
pub fn html_to_markdown(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "\n## $1\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = BLOCK_END.replace_all(&text, "\n");
    let text = CELL_END.replace_all(&text, " | ");
    let text = LIST_ITEM.replace_all(&text, "- ");
    let text = decode_entities(&TAG.replace_all(&text, ""));
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

/// First capture of `pattern` in `html`, tag-stripped; empty if absent.
fn find(pattern: &Regex, html: &str) -> String {
    pattern
        .captures(html)
        .map(|caps| strip_tags(&caps[1]))
        .unwrap_or_default()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

pub fn parse_location(html: &str) -> String {
    find(&LOCATION, html)
}

/// Current temperature, conditions and every detail row keyed in snake_case.
pub fn parse_current(html: &str) -> Map<String, Value> {
    let mut current = Map::new();

    let temperature = find(&CURRENT_TEMPERATURE, html);
    if !temperature.is_empty() {
        current.insert("temperature".into(), Value::String(temperature));
    }

    let conditions = find(&CURRENT_CONDITIONS, html);
    if !conditions.is_empty() && conditions != "NA" {
        current.insert("conditions".into(), Value::String(conditions));
    }

    if let Some(table) = DETAIL_TABLE.captures(html) {
        for row in ROW.captures_iter(&table[1]) {
            let cells: Vec<String> = CELL
                .captures_iter(&row[1])
                .map(|cell| strip_tags(&cell[1]))
                .collect();
            if let [key, value, ..] = cells.as_slice() {
                if !key.is_empty() {
                    current.insert(
                        key.to_lowercase().replace(' ', "_"),
                        Value::String(value.clone()),
                    );
                }
            }
        }
    }

    current
}

/// Forecast periods in page order; tombstones without a name are skipped.
pub fn parse_forecast(html: &str) -> Vec<ForecastPeriod> {
    TOMBSTONE
        .captures_iter(html)
        .filter_map(|tomb| {
            let tomb = &tomb[1];
            let name = non_empty(find(&PERIOD_NAME, tomb))?;
            Some(ForecastPeriod {
                name,
                summary: non_empty(find(&SHORT_DESC, tomb)),
                temperature: non_empty(find(&PERIOD_TEMPERATURE, tomb)),
                detail: IMAGE_ALT.captures(tomb).map(|caps| caps[1].to_string()),
            })
        })
        .collect()
}
