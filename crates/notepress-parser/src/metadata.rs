//! Normalization of raw frontmatter into [`Metadata`].
//!
//! Title and tags are always produced. Dates accept a handful of common
//! spellings; anything else falls back to the file's timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use notepress_core::utils::humanize_title;
use notepress_core::Metadata;
use serde_json::{Map, Value};

/// Keys with dedicated [`Metadata`] fields
const RESERVED_KEYS: &[&str] = &["title", "date", "tags", "path"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// File-level facts used to fill in defaults during normalization.
#[derive(Debug, Clone, Default)]
pub struct NoteContext {
    /// Corpus-relative identifier; empty when parsing free-standing text
    pub id: String,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl NoteContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attach file timestamps
    pub fn with_times(
        mut self,
        created: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        self.created = created;
        self.modified = modified;
        self
    }

    fn fallback_title(&self) -> String {
        let title = humanize_title(&self.id);
        if title.is_empty() {
            "Untitled".to_string()
        } else {
            title
        }
    }

    fn fallback_date(&self) -> Option<DateTime<Utc>> {
        self.created.or(self.modified)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize_title(value: Option<&Value>, ctx: &NoteContext) -> String {
    value
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ctx.fallback_title())
}

fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Value::Object(_)) => {
            log::warn!("Ignoring tags given as a mapping");
            Vec::new()
        }
        Some(scalar) => scalar_to_string(scalar)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .into_iter()
            .collect(),
    }
}

/// Parse a frontmatter date value.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC), a bare `YYYY-MM-DD`
/// (midnight UTC) or an integer unix timestamp.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Turn raw frontmatter fields into normalized metadata.
pub fn normalize_metadata(fields: Map<String, Value>, ctx: &NoteContext) -> Metadata {
    let title = normalize_title(fields.get("title"), ctx);
    let tags = normalize_tags(fields.get("tags"));

    let mut custom_fields = Map::new();
    let date = match fields.get("date") {
        None | Some(Value::Null) => ctx.fallback_date(),
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                log::warn!(
                    "Unrecognized date {} in {}, using file time",
                    raw,
                    if ctx.id.is_empty() { "<text>" } else { &ctx.id }
                );
                custom_fields.insert("date".to_string(), raw.clone());
                ctx.fallback_date()
            }
        },
    };

    for (key, value) in fields {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value = match value {
            Value::Bool(b) => Value::String(b.to_string()),
            other => other,
        };
        custom_fields.insert(key, value);
    }

    Metadata {
        title,
        date,
        tags,
        custom_fields,
        path: ctx.id.clone(),
    }
}
