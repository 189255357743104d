//! Frontmatter extraction: ---\nYAML\n---
//!
//! A note may open with a YAML block between two bare `---` lines. The block
//! must be a mapping; anything else (or an unterminated block) is reported as
//! [`Error::MalformedFrontmatter`] so the caller can surface it.
//!
//! Scalar keys such as `2024:` or `true:` are kept as their string form.

use crate::metadata::{NoteContext, normalize_metadata};
use notepress_core::{Error, Metadata, Result};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Raw frontmatter split from a note
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    /// Parsed key-value block (empty when the note has none)
    pub fields: Map<String, Value>,
    /// Whether a delimited block was present at all
    pub present: bool,
    /// Everything after the closing delimiter
    pub body: &'a str,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Split `raw` into the YAML text between the delimiters and the body.
///
/// Returns `(None, raw)` when the first line is not a bare `---`.
pub fn split_frontmatter(raw: &str) -> Result<(Option<&str>, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let (first, rest) = match raw.find('\n') {
        Some(idx) => (&raw[..idx], &raw[idx + 1..]),
        None => (raw, ""),
    };

    if !is_delimiter(first) {
        return Ok((None, raw));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(Error::malformed_frontmatter(
        "opening `---` has no closing `---` line",
    ))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn yaml_key(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key(tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(Error::malformed_frontmatter(
            "mapping keys must be scalars",
        )),
    }
}

fn yaml_to_json(value: YamlValue) -> Result<Value> {
    let value = match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // NaN and infinities have no JSON form
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    };
    Ok(value)
}

/// Parse a YAML block into a key-value map.
pub fn parse_yaml_block(yaml: &str) -> Result<Map<String, Value>> {
    let only_comments = yaml
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'));
    if only_comments {
        return Ok(Map::new());
    }

    let parsed = serde_yaml::from_str::<YamlValue>(yaml)
        .map_err(|e| Error::malformed_frontmatter(e.to_string()))?;
    match yaml_to_json(parsed)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(Error::malformed_frontmatter(format!(
            "expected a mapping, found {}",
            describe(&other)
        ))),
    }
}

/// Split and parse the frontmatter of a note without normalizing it.
pub fn extract_frontmatter(raw: &str) -> Result<Frontmatter<'_>> {
    match split_frontmatter(raw)? {
        (Some(yaml), body) => Ok(Frontmatter {
            fields: parse_yaml_block(yaml)?,
            present: true,
            body,
        }),
        (None, body) => Ok(Frontmatter {
            fields: Map::new(),
            present: false,
            body,
        }),
    }
}

/// Parse and normalize a note's frontmatter, returning metadata and body.
pub fn parse_frontmatter_with(raw: &str, ctx: &NoteContext) -> Result<(Metadata, String)> {
    let fm = extract_frontmatter(raw)?;
    let metadata = normalize_metadata(fm.fields, ctx);
    Ok((metadata, fm.body.to_string()))
}

/// Parse a note with no file context (title falls back to "Untitled").
///
/// # Example
/// ```
/// use notepress_parser::parse_frontmatter;
///
/// let (meta, body) = parse_frontmatter("---\ntitle: X\n---\nhello").unwrap();
/// assert_eq!(meta.title, "X");
/// assert_eq!(body, "hello");
/// ```
pub fn parse_frontmatter(raw: &str) -> Result<(Metadata, String)> {
    parse_frontmatter_with(raw, &NoteContext::default())
}
