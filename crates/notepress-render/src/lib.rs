//! # Notepress Render
//!
//! Markdown body to HTML through an explicit, ordered pipeline of text
//! stages (see [`PIPELINE`]):
//!
//! 1. **Callouts** - `> [!type]` blocks to container markup, nested
//! 2. **Mermaid** - diagram fences to `<div class="mermaid">`
//! 3. **Footnotes** - definitions collected, references numbered
//! 4. **Inline** - embeds, `~~strike~~`, `==highlight==`, wiki and markdown links
//! 5. **Markdown** - CommonMark blocks, tables, task lists, highlighted code
//!
//! Rendering never fails: syntax nothing recognizes passes through as text.
//!
//! ## Example
//!
//! ```
//! use notepress_render::render;
//!
//! let html = render("See [[home]] and ==this==.", "/wiki");
//! assert!(html.contains("<a class=\"wikilink\" href=\"/wiki/home\">Home</a>"));
//! assert!(html.contains("<mark>this</mark>"));
//! ```

pub mod callouts;
pub mod footnotes;
pub mod highlight;
pub mod inline;
pub mod markdown;
pub mod mermaid;
pub mod pipeline;
mod text;

pub use footnotes::{Footnote, FootnoteTable};
pub use highlight::{code_block_html, highlight_code};
pub use inline::InlineRenderer;
pub use pipeline::{PIPELINE, RenderContext, Stage};

use notepress_core::{LinkConfig, RenderConfig, Toc};

/// Renders note bodies with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Run one stage over `text`.
    pub fn apply(&self, stage: Stage, text: &str, ctx: &mut RenderContext) -> String {
        match stage {
            Stage::Callouts => callouts::render_callouts(text),
            Stage::Mermaid => mermaid::extract_diagrams(text, ctx),
            Stage::Footnotes => footnotes::collect_and_link(text, &mut ctx.footnotes),
            Stage::Inline => InlineRenderer::new(&self.config.links).apply(text),
            Stage::Markdown => markdown::render_markdown(text, &self.config),
        }
    }

    /// Render a markdown body (frontmatter already removed) to HTML.
    pub fn render(&self, body: &str) -> String {
        let mut ctx = RenderContext::new();
        let mut text = body.to_string();
        for stage in PIPELINE {
            text = self.apply(stage, &text, &mut ctx);
            log::trace!("Stage {} produced {} bytes", stage.name(), text.len());
        }

        let mut html = ctx.restore(&text);
        html.push_str(&self.footnote_section(&ctx.footnotes));
        if ctx.diagrams > 0 && !self.config.mermaid_script.is_empty() {
            html.push_str(&self.config.mermaid_script);
            html.push('\n');
        }
        html
    }

    /// Table of contents for `body` with anchors equal to the rendered
    /// heading ids.
    pub fn toc(&self, body: &str) -> Toc {
        notepress_parser::build_toc_with(body, self.config.links.label_case)
    }

    /// Inline markdown for a footnote body, without a lone `<p>` wrapper.
    fn render_fragment(&self, text: &str) -> String {
        let inline = self.apply(Stage::Inline, text, &mut RenderContext::new());
        let html = markdown::render_markdown(&inline, &self.config);
        let trimmed = html.trim_end();
        match trimmed
            .strip_prefix("<p>")
            .and_then(|s| s.strip_suffix("</p>"))
        {
            Some(inner) if !inner.contains("<p>") => inner.to_string(),
            _ => trimmed.to_string(),
        }
    }

    fn footnote_section(&self, table: &FootnoteTable) -> String {
        let entries = table.entries();
        if entries.is_empty() {
            return String::new();
        }

        let mut section = String::from("<section class=\"footnotes\">\n<hr>\n<ol>\n");
        for note in entries {
            let backref = if note.referenced {
                format!(
                    concat!(
                        " <a href=\"#fnref{}\" class=\"footnote-backref\" ",
                        "aria-label=\"Back to content\">\u{21a9}\u{fe0e}</a>"
                    ),
                    note.number
                )
            } else {
                String::new()
            };
            section.push_str(&format!(
                "<li id=\"fn{}\">{}{}</li>\n",
                note.number,
                self.render_fragment(&note.text),
                backref
            ));
        }
        section.push_str("</ol>\n</section>\n");
        section
    }
}

/// Render `body` with default settings and links resolved against `base_url`.
pub fn render(body: &str, base_url: &str) -> String {
    let config = RenderConfig {
        links: LinkConfig::with_base_url(base_url),
        ..RenderConfig::default()
    };
    Renderer::new(config).render(body)
}
