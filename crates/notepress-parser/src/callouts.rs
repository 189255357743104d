//! Callout parser: > `[!NOTE]`, > `[!TIP]-`, etc.
//!
//! Only the header and continuation syntax lives here. Turning a callout
//! block into HTML (including nested callouts) is the renderer's job.

use notepress_core::{CalloutHeader, CalloutKind, Foldable};
use regex::Regex;
use std::sync::LazyLock;

/// Matches > [!TYPE]+ Optional title
static CALLOUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s*\[!([\w-]+)\]([+-]?)\s*(.*?)\s*$").unwrap());

/// Matches continuation lines (start with >); one space after the marker is dropped
static CONTINUATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?(.*)$").unwrap());

/// Map a callout type and its aliases to the canonical kind.
pub fn canonical_kind(type_str: &str) -> CalloutKind {
    match type_str.to_lowercase().as_str() {
        "note" => CalloutKind::Note,
        "abstract" | "summary" | "tldr" => CalloutKind::Abstract,
        "info" => CalloutKind::Info,
        "todo" => CalloutKind::Todo,
        "tip" | "hint" | "important" => CalloutKind::Tip,
        "success" | "check" | "done" => CalloutKind::Success,
        "question" | "help" | "faq" => CalloutKind::Question,
        "warning" | "caution" | "attention" => CalloutKind::Warning,
        "failure" | "fail" | "missing" => CalloutKind::Failure,
        "danger" | "error" => CalloutKind::Danger,
        "bug" => CalloutKind::Bug,
        "example" => CalloutKind::Example,
        "quote" | "cite" => CalloutKind::Quote,
        other => CalloutKind::Custom(other.to_string()),
    }
}

/// Parse a callout header line.
///
/// # Example
/// ```
/// use notepress_core::{CalloutKind, Foldable};
/// use notepress_parser::parse_callout_header;
///
/// let header = parse_callout_header("> [!tldr]- Short version").unwrap();
/// assert_eq!(header.kind, CalloutKind::Abstract);
/// assert_eq!(header.fold, Foldable::Collapsed);
/// assert_eq!(header.title.as_deref(), Some("Short version"));
/// ```
pub fn parse_callout_header(line: &str) -> Option<CalloutHeader> {
    if !line.contains("[!") {
        return None;
    }

    let caps = CALLOUT_PATTERN.captures(line)?;
    let fold = match caps.get(2).map_or("", |m| m.as_str()) {
        "+" => Foldable::Expanded,
        "-" => Foldable::Collapsed,
        _ => Foldable::Static,
    };
    let title = caps
        .get(3)
        .map(|m| m.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Some(CalloutHeader {
        kind: canonical_kind(&caps[1]),
        title,
        fold,
    })
}

/// Content of a `>`-prefixed line, or `None` when the line is not quoted.
pub fn callout_continuation(line: &str) -> Option<&str> {
    CONTINUATION_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
