//! Base renderer: block-level CommonMark via pulldown-cmark.
//!
//! Runs last, after the text stages have substituted their HTML. Code
//! blocks are swapped for highlighted markup and headings get slug ids
//! matching the table of contents anchors.

use crate::highlight::code_block_html;
use notepress_core::{RenderConfig, SlugRegistry};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

fn block_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info
            .split_whitespace()
            .next()
            .filter(|lang| !lang.is_empty())
            .map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Heading whose id is assigned once its text is known
struct OpenHeading {
    /// Index of the Start event in the output
    start: usize,
    title: String,
    /// Image alt text is not part of the title
    image_depth: usize,
}

impl OpenHeading {
    fn push(&mut self, text: &str) {
        if self.image_depth == 0 {
            self.title.push_str(text);
        }
    }
}

fn transform_events<'a>(
    events: impl Iterator<Item = Event<'a>>,
    config: &RenderConfig,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut slugs = SlugRegistry::new();
    // (language, buffered source) of the open code block
    let mut code: Option<(Option<String>, String)> = None;
    let mut heading: Option<OpenHeading> = None;

    for event in events {
        if code.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some((_, source)) = code.as_mut() {
                        source.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, source)) = code.take() {
                        let markup =
                            code_block_html(&source, lang.as_deref(), config.highlight_code);
                        out.push(Event::Html(markup.into()));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code = Some((block_language(&kind), String::new()));
            }
            Event::Start(Tag::Heading { .. }) if config.heading_ids => {
                heading = Some(OpenHeading {
                    start: out.len(),
                    title: String::new(),
                    image_depth: 0,
                });
                out.push(event);
            }
            Event::Text(text) => {
                if let Some(open) = heading.as_mut() {
                    open.push(&text);
                }
                out.push(Event::Text(text));
            }
            Event::Code(text) => {
                if let Some(open) = heading.as_mut() {
                    open.push(&text);
                }
                out.push(Event::Code(text));
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(open) = heading.as_mut() {
                    open.push(" ");
                }
                out.push(event);
            }
            Event::Start(Tag::Image { .. }) => {
                if let Some(open) = heading.as_mut() {
                    open.image_depth += 1;
                }
                out.push(event);
            }
            Event::End(TagEnd::Image) => {
                if let Some(open) = heading.as_mut() {
                    open.image_depth = open.image_depth.saturating_sub(1);
                }
                out.push(event);
            }
            Event::End(TagEnd::Heading(level)) => {
                // Headings without visible text get no id and no TOC entry
                if let Some(open) = heading.take().filter(|h| !h.title.trim().is_empty()) {
                    let slug = slugs.unique(&open.title);
                    if let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(open.start) {
                        *id = Some(CowStr::from(slug));
                    }
                }
                out.push(Event::End(TagEnd::Heading(level)));
            }
            other => out.push(other),
        }
    }

    out
}

/// Render markdown to HTML.
pub(crate) fn render_markdown(text: &str, config: &RenderConfig) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(text, options);
    let events = transform_events(parser, config);

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        render_markdown(text, &RenderConfig::default())
    }

    #[test]
    fn test_heading_ids() {
        let html = render("# Getting Started\n## Intro\n## Intro");
        assert!(html.contains("<h1 id=\"getting-started\">Getting Started</h1>"));
        assert!(html.contains("<h2 id=\"intro\">Intro</h2>"));
        assert!(html.contains("<h2 id=\"intro-1\">Intro</h2>"));
    }

    #[test]
    fn test_empty_and_image_headings_get_no_id() {
        let html = render("#\n# ![banner](top.png)\n# Title");
        assert!(html.contains("<h1></h1>"));
        assert!(html.contains("<h1><img src=\"top.png\" alt=\"banner\" /></h1>"));
        assert!(html.contains("<h1 id=\"title\">Title</h1>"));
    }

    #[test]
    fn test_heading_ids_disabled() {
        let config = RenderConfig {
            heading_ids: false,
            ..RenderConfig::default()
        };
        assert!(render_markdown("# Title", &config).contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_tables_and_tasks() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n- [ ] open");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_code_block_replaced() {
        let html = render("```python\nprint('hi')\n```");
        assert!(html.contains("<div class=\"codehilite\"><pre><code class=\"language-python\">"));
        assert!(!html.contains("<pre><code class=\"language-python\">print"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render("a <mark>b</mark> c");
        assert!(html.contains("<p>a <mark>b</mark> c</p>"));
    }

    #[test]
    fn test_strikethrough_syntax_left_to_inline_stage() {
        assert!(render("~~x~~").contains("~~x~~"));
    }
}
