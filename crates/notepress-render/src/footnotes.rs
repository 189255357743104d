//! Footnote stage: `[^key]: text` definitions and `[^key]` references.
//!
//! Definitions are lifted out of the body into a [`FootnoteTable`].
//! References to defined keys become numbered superscripts, numbered in
//! order of first reference. The list itself is rendered after the base
//! renderer has run (see `Renderer::render`).

use crate::text::{map_outside_code_spans, map_prose_lines};
use notepress_parser::CodeTracker;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static DEFINITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\^([^\]\s]+)\]:[ \t]?(.*)$").unwrap());
static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^([^\]\s]+)\]").unwrap());

/// One collected footnote, ready for the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub number: usize,
    pub text: String,
    /// Whether anything in the body refers to it
    pub referenced: bool,
}

/// Footnote definitions and numbering for one document.
#[derive(Debug, Default)]
pub struct FootnoteTable {
    /// Keys in definition order
    keys: Vec<String>,
    definitions: HashMap<String, String>,
    numbers: HashMap<String, usize>,
    /// Reference count per number, for unique `fnref` ids
    uses: HashMap<usize, usize>,
}

impl FootnoteTable {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn define(&mut self, key: &str, text: String) {
        if self.definitions.contains_key(key) {
            log::debug!("Duplicate footnote definition [^{}] ignored", key);
            return;
        }
        self.keys.push(key.to_string());
        self.definitions.insert(key.to_string(), text);
    }

    fn reference(&mut self, caps: &Captures) -> String {
        let key = &caps[1];
        if !self.definitions.contains_key(key) {
            return caps[0].to_string();
        }

        let next = self.numbers.len() + 1;
        let number = *self.numbers.entry(key.to_string()).or_insert(next);
        let uses = self.uses.entry(number).or_insert(0);
        *uses += 1;

        let id = if *uses == 1 {
            format!("fnref{}", number)
        } else {
            format!("fnref{}-{}", number, uses)
        };
        format!(
            "<sup id=\"{id}\"><a href=\"#fn{number}\" class=\"footnote-ref\">{number}</a></sup>"
        )
    }

    /// Footnotes in list order: referenced ones by number, then the rest
    /// in definition order.
    pub fn entries(&self) -> Vec<Footnote> {
        let mut entries: Vec<Footnote> = self
            .keys
            .iter()
            .filter_map(|key| {
                self.numbers.get(key).map(|&number| Footnote {
                    number,
                    text: self.definitions[key].clone(),
                    referenced: true,
                })
            })
            .collect();
        entries.sort_by_key(|f| f.number);

        let mut next = entries.len();
        for key in &self.keys {
            if !self.numbers.contains_key(key) {
                next += 1;
                entries.push(Footnote {
                    number: next,
                    text: self.definitions[key].clone(),
                    referenced: false,
                });
            }
        }

        entries
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t']) && !line.trim().is_empty()
}

/// Remove definitions from `text` into `table`.
fn collect_definitions(text: &str, table: &mut FootnoteTable) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut code = CodeTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if code.observe(line) {
            out.push(line);
            continue;
        }

        let Some(caps) = DEFINITION_PATTERN.captures(line) else {
            out.push(line);
            continue;
        };

        let mut body = caps[2].trim().to_string();
        loop {
            match lines.get(i) {
                Some(next) if is_indented(next) => {
                    body.push('\n');
                    body.push_str(next.trim());
                    i += 1;
                }
                // A blank line continues the definition only when an indented line follows
                Some(next)
                    if next.trim().is_empty() && lines.get(i + 1).is_some_and(|l| is_indented(l)) =>
                {
                    body.push_str("\n\n");
                    body.push_str(lines[i + 1].trim());
                    i += 2;
                }
                _ => break,
            }
        }
        table.define(&caps[1], body);
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}

/// Collect definitions, then number and link every reference.
pub(crate) fn collect_and_link(text: &str, table: &mut FootnoteTable) -> String {
    let body = collect_definitions(text, table);
    if table.is_empty() {
        return body;
    }

    map_prose_lines(&body, |line| {
        map_outside_code_spans(line, |segment| {
            REFERENCE_PATTERN
                .replace_all(segment, |caps: &Captures| table.reference(caps))
                .into_owned()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_removed_and_references_numbered() {
        let mut table = FootnoteTable::default();
        let out = collect_and_link(
            "First[^b] then[^a].\n\n[^a]: Alpha\n[^b]: Beta\n",
            &mut table,
        );
        assert!(!out.contains("Alpha"));
        assert!(out.contains(
            "First<sup id=\"fnref1\"><a href=\"#fn1\" class=\"footnote-ref\">1</a></sup>"
        ));
        assert!(out.contains("then<sup id=\"fnref2\"><a href=\"#fn2\""));

        let entries = table.entries();
        assert_eq!(entries[0].text, "Beta");
        assert_eq!(entries[1].text, "Alpha");
    }

    #[test]
    fn test_repeated_reference_reuses_number() {
        let mut table = FootnoteTable::default();
        let out = collect_and_link("a[^x] b[^x]\n[^x]: note", &mut table);
        assert!(out.contains("id=\"fnref1\""));
        assert!(out.contains("id=\"fnref1-2\""));
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn test_undefined_reference_stays_literal() {
        let mut table = FootnoteTable::default();
        let out = collect_and_link("a[^nope] b[^x]\n[^x]: yes", &mut table);
        assert!(out.contains("a[^nope]"));
    }

    #[test]
    fn test_continuation_lines() {
        let mut table = FootnoteTable::default();
        collect_and_link("x[^1]\n\n[^1]: first\n    second\n\n    third\nnot part", &mut table);
        assert_eq!(table.entries()[0].text, "first\nsecond\n\nthird");
    }

    #[test]
    fn test_unreferenced_numbered_after() {
        let mut table = FootnoteTable::default();
        collect_and_link("[^u]: unused\n[^r]: used\nsee[^r]", &mut table);
        let entries = table.entries();
        assert_eq!(entries[0].number, 1);
        assert_eq!(entries[0].text, "used");
        assert!(entries[0].referenced);
        assert_eq!(entries[1].number, 2);
        assert!(!entries[1].referenced);
    }

    #[test]
    fn test_code_is_opaque() {
        let mut table = FootnoteTable::default();
        let out = collect_and_link(
            "`[^a]` and [^a]\n```\n[^b]: in code\n[^a]\n```\n[^a]: real",
            &mut table,
        );
        assert!(out.starts_with("`[^a]` and <sup"));
        assert!(out.contains("[^b]: in code\n[^a]\n```"));
        assert_eq!(table.entries().len(), 1);
    }

    #[test]
    fn test_no_definitions_leaves_text_alone() {
        let mut table = FootnoteTable::default();
        assert_eq!(collect_and_link("plain [^x]\n", &mut table), "plain [^x]\n");
    }
}
