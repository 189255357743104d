//! The ordered stage list and the state stages share during one render.
//!
//! Each stage is a text-to-text transform. Later stages rely on earlier ones:
//! callouts are unwrapped before anything looks inside them, mermaid fences
//! are lifted out before inline substitution could touch diagram source, and
//! footnote definitions are removed before the base renderer sees them.

use crate::footnotes::FootnoteTable;

/// One transform in the rendering pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `> [!type]` blocks to container markup
    Callouts,
    /// ```` ```mermaid ```` fences to diagram containers
    Mermaid,
    /// `[^key]` definitions collected, references numbered
    Footnotes,
    /// Embeds, strikethrough, highlight, wiki and markdown links
    Inline,
    /// Block-level CommonMark to HTML
    Markdown,
}

/// Stages in the order they run
pub const PIPELINE: [Stage; 5] = [
    Stage::Callouts,
    Stage::Mermaid,
    Stage::Footnotes,
    Stage::Inline,
    Stage::Markdown,
];

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Callouts => "callouts",
            Stage::Mermaid => "mermaid",
            Stage::Footnotes => "footnotes",
            Stage::Inline => "inline",
            Stage::Markdown => "markdown",
        }
    }
}

/// Per-render state threaded through the stages.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Finished HTML fragments parked behind placeholders
    stash: Vec<String>,
    pub(crate) footnotes: FootnoteTable,
    /// Mermaid diagrams found so far
    pub(crate) diagrams: usize,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn placeholder(index: usize) -> String {
        format!("<!--notepress-stash-{}-->", index)
    }

    /// Park `html` and return the placeholder standing in for it.
    pub(crate) fn stash(&mut self, html: String) -> String {
        let key = Self::placeholder(self.stash.len());
        self.stash.push(html);
        key
    }

    /// Swap every placeholder in `html` for its parked fragment.
    pub(crate) fn restore(&self, html: &str) -> String {
        self.stash
            .iter()
            .enumerate()
            .fold(html.to_string(), |acc, (i, fragment)| {
                acc.replace(&Self::placeholder(i), fragment)
            })
    }
}
