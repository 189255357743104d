//! Shared utilities for operations across notepress crates.
//!
//! Provides helpers for:
//! - Serialization with consistent error handling
//! - Path validation and identifier mapping
//! - Display text derived from file names (titles, slugs, label casing)

use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Generic JSON serialization with consistent error handling
/// Works with any type that implements Serialize (including slices)
pub fn to_json_string<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::other(format!("Failed to serialize {} as JSON: {}", context, e)))
}

/// Path validation helpers
pub struct PathValidator;

impl PathValidator {
    /// Join a caller-supplied relative path onto `root`, refusing anything
    /// that could escape it (absolute paths, `..`, drive prefixes).
    pub fn join_within(root: &Path, relative: &Path) -> Result<PathBuf> {
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::path_traversal(relative));
                }
            }
        }
        Ok(root.join(relative))
    }
}

/// Words kept lowercase by [`titlecase`] unless they open the phrase
const TITLECASE_EXCEPTIONS: &[&str] = &[
    "a", "an", "the", "v", "vs", "am", "at", "and", "as", "but", "by", "en", "for", "if", "be",
    "in", "of", "on", "or", "to", "via",
];

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Title-case a phrase, keeping short connecting words lowercase and leaving
/// words without lowercase letters (acronyms, numbers) untouched.
pub fn titlecase(subject: &str) -> String {
    subject
        .split([' ', '\t'])
        .filter(|w| !w.is_empty())
        .enumerate()
        .map(|(i, word)| {
            let keep = !word.chars().any(|c| c.is_lowercase())
                || (i != 0 && TITLECASE_EXCEPTIONS.contains(&word));
            if keep {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable title from a file name: extension stripped, `-`/`_`
/// separators turned into spaces, each word capitalized.
///
/// ```
/// use notepress_core::utils::humanize_title;
///
/// assert_eq!(humanize_title("my-first_note.md"), "My First Note");
/// assert_eq!(humanize_title("projects/rust-tips"), "Rust Tips");
/// ```
pub fn humanize_title(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

static SLUG_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Fragment-safe slug: lowercase, punctuation dropped, whitespace and hyphen
/// runs collapsed to a single `-`.
///
/// ```
/// use notepress_core::utils::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// ```
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lower, "");
    SLUG_SEPARATORS
        .replace_all(stripped.trim(), "-")
        .trim_matches('-')
        .to_string()
}

/// Hands out unique slugs within one document (`intro`, `intro-1`, ...).
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and disambiguate against earlier slugs.
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() { "section".to_string() } else { base };
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base.clone()
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// File-system candidates for a note identifier, most literal first.
///
/// Identifiers with spaces map to file names with `-`; the reverse mapping
/// is tried as well so both spellings resolve.
pub fn identifier_candidates(id: &str) -> Vec<String> {
    let mut candidates = vec![id.to_string()];
    for variant in [id.replace(' ', "-"), id.replace('-', " ")] {
        if !candidates.contains(&variant) {
            candidates.push(variant);
        }
    }
    candidates
}

/// Escape text for use inside HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted HTML attribute.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
