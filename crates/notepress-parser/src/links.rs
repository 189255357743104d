//! Link classification, label derivation and reference matching.
//!
//! The renderer uses these helpers to resolve `[[wiki links]]` and
//! `[markdown](links)`; backlink discovery uses [`ReferencePatterns`] to
//! decide whether a note's text refers to a target note.

use notepress_core::utils::{capitalize, titlecase};
use notepress_core::{Error, LabelCase, Result};
use regex::Regex;
use std::sync::LazyLock;

/// File suffixes rendered as images rather than links
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());
static LABEL_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\..*$").unwrap());
static LABEL_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Coarse link target classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Has a URL scheme (`https:`, `mailto:`) or is protocol-relative
    External,
    /// Same-document fragment (`#section`)
    Anchor,
    /// Resolved against the configured base URL
    Relative,
}

/// Whether `url` points outside the corpus.
pub fn is_external(url: &str) -> bool {
    url.starts_with("//") || SCHEME_PATTERN.is_match(url)
}

/// Classify a link target.
///
/// # Examples
///
/// ```
/// use notepress_parser::links::{classify_url, LinkKind};
///
/// assert_eq!(classify_url("https://example.com"), LinkKind::External);
/// assert_eq!(classify_url("mailto:me@example.com"), LinkKind::External);
/// assert_eq!(classify_url("#section"), LinkKind::Anchor);
/// assert_eq!(classify_url("docs/api#section"), LinkKind::Relative);
/// ```
pub fn classify_url(url: &str) -> LinkKind {
    if is_external(url) {
        LinkKind::External
    } else if url.starts_with('#') {
        LinkKind::Anchor
    } else {
        LinkKind::Relative
    }
}

/// Split `note#Heading` into the page part and the fragment.
pub fn split_fragment(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((page, fragment)) => (page, Some(fragment)),
        None => (target, None),
    }
}

/// Whether the target names an image file.
pub fn is_image_target(target: &str) -> bool {
    let (page, _) = split_fragment(target);
    let page = page.split('?').next().unwrap_or(page);
    match page.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        None => false,
    }
}

/// Display label for a link given without one.
///
/// The base name of the target (or the fragment for `[[#Heading]]`) with
/// everything from the first `.` dropped and separator runs turned into
/// spaces, then cased per `case`.
///
/// ```
/// use notepress_core::LabelCase;
/// use notepress_parser::links::derive_label;
///
/// assert_eq!(derive_label("guides/getting_started.md", LabelCase::Titlecase), "Getting Started");
/// assert_eq!(derive_label("the-art-of-war", LabelCase::Titlecase), "The Art of War");
/// ```
pub fn derive_label(target: &str, case: LabelCase) -> String {
    let (page, fragment) = split_fragment(target);
    let source = if page.trim().is_empty() {
        fragment.unwrap_or("")
    } else {
        page.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(page)
    };

    let stem = LABEL_EXTENSION.replace(source, "");
    let spaced = LABEL_SEPARATORS.replace_all(stem.trim(), " ");
    let spaced = spaced.trim();

    match case {
        LabelCase::Titlecase => titlecase(spaced),
        LabelCase::Capitalize => capitalize(spaced),
        LabelCase::None => spaced.to_string(),
    }
}

/// Target identifier with a trailing extension and surrounding slashes removed.
pub fn normalize_target(target: &str) -> String {
    let trimmed = target.trim().trim_matches('/');
    trimmed
        .strip_suffix(".md")
        .unwrap_or(trimmed)
        .to_string()
}

/// Regex fragment matching a note name with flexible separators.
///
/// Whitespace and `-` are interchangeable in note names, and markdown URLs
/// may spell a space as `%20`.
fn name_fragment(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            segment
                .split(|c: char| c.is_whitespace() || c == '-')
                .filter(|piece| !piece.is_empty())
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"(?:\s+|-|%20)+")
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn wiki_pattern(name: &str) -> Result<Regex> {
    compile(&format!(
        r"(?i)\[\[\s*(?:{})(?:\.md)?\s*(?:[#|][^\]]*)?\]\]",
        name_fragment(name)
    ))
}

fn markdown_pattern(name: &str) -> Result<Regex> {
    compile(&format!(
        r#"(?i)\]\(\s*<?(?:[^()<>\s]*/)?(?:{})(?:\.md)?(?:#[^()\s>]*)?>?(?:\s+"[^"]*")?\s*\)"#,
        name_fragment(name)
    ))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::other(format!("Invalid reference pattern: {}", e)))
}

/// Compiled patterns recognizing references to one target note.
///
/// A note refers to `projects/rust tips` when it contains
/// `[[projects/rust tips]]`, `[[rust-tips|label]]`, `[[Rust Tips#Heading]]`,
/// or a markdown link whose URL ends in the full path or the file name.
/// Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct ReferencePatterns {
    target: String,
    patterns: Vec<Regex>,
}

impl ReferencePatterns {
    /// Compile the patterns for `target` (a note identifier, optionally with `.md`).
    pub fn for_target(target: &str) -> Result<Self> {
        let normalized = normalize_target(target);
        if normalized.is_empty() {
            return Err(Error::invalid_argument("empty backlink target"));
        }

        let basename = normalized
            .rsplit('/')
            .next()
            .unwrap_or(&normalized)
            .to_string();

        let mut patterns = vec![wiki_pattern(&normalized)?];
        if basename != normalized {
            patterns.push(wiki_pattern(&basename)?);
        }
        patterns.push(markdown_pattern(&normalized)?);
        if basename != normalized {
            patterns.push(markdown_pattern(&basename)?);
        }

        Ok(Self {
            target: normalized,
            patterns,
        })
    }

    /// The normalized target identifier
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether `content` contains at least one reference to the target.
    pub fn is_referenced_by(&self, content: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(content))
    }

    /// Total reference occurrences across all patterns (a link may be
    /// counted by both the path and the file-name pattern).
    pub fn count_in(&self, content: &str) -> usize {
        self.patterns.iter().map(|p| p.find_iter(content).count()).sum()
    }
}
