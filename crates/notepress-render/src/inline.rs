//! Inline stage: embeds, strikethrough, highlight and the link unifier.
//!
//! Patterns run in a fixed order on each prose line, skipping inline code:
//! 1. `![[target]]` image embeds
//! 2. `~~text~~` to `<del>`
//! 3. `==text==` to `<mark>`
//! 4. `[[target]]`, `[[target|label]]`, `[label](url)` and `![alt](url)`

use crate::text::{map_outside_code_spans, map_prose_lines};
use notepress_core::utils::{escape_attr, escape_html, slugify};
use notepress_core::{LinkConfig, UrlCase};
use notepress_parser::links::{
    LinkKind, classify_url, derive_label, is_image_target, split_fragment,
};
use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;

static EMBED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]]+?)\]\]").unwrap());
static STRIKE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~([^~\s](?:[^~]*[^~\s])?)~~").unwrap());
static HIGHLIGHT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=\s](?:[^=]*[^=\s])?)==").unwrap());
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<bang>!)?(?:",
        r"\[\[\s*(?P<target>[^\[\]|]+?)(?:\s*\|\s*(?P<label>[^\[\]]*?))?\s*\]\]",
        r"|",
        r#"\[(?P<alt>[^\[\]]*)\]\(\s*(?P<url><[^>]*>|[^)\s]+)(?:\s+"(?P<title>[^"]*)")?\s*\)"#,
        r")"
    ))
    .unwrap()
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Applies the inline patterns with one link configuration.
pub struct InlineRenderer<'a> {
    links: &'a LinkConfig,
}

impl<'a> InlineRenderer<'a> {
    pub fn new(links: &'a LinkConfig) -> Self {
        Self { links }
    }

    /// Run the inline patterns over a whole text, leaving code alone.
    pub fn apply(&self, text: &str) -> String {
        map_prose_lines(text, |line| {
            map_outside_code_spans(line, |segment| self.apply_segment(segment))
        })
    }

    fn apply_segment(&self, segment: &str) -> String {
        let embedded = EMBED_PATTERN.replace_all(segment, |caps: &Captures| self.embed(&caps[1]));
        let struck = STRIKE_PATTERN.replace_all(&embedded, "<del>$1</del>");
        let marked = HIGHLIGHT_PATTERN.replace_all(&struck, "<mark>$1</mark>");
        LINK_PATTERN
            .replace_all(&marked, |caps: &Captures| self.link(caps))
            .into_owned()
    }

    fn embed(&self, inner: &str) -> String {
        let (target, alt) = match inner.split_once('|') {
            Some((target, alt)) => (target.trim(), alt.trim()),
            None => (inner.trim(), inner.trim()),
        };
        format!(
            "<img src=\"{}{}\" alt=\"{}\">",
            escape_attr(&self.links.image_prefix),
            escape_attr(target),
            escape_attr(alt)
        )
    }

    fn link(&self, caps: &Captures) -> String {
        let sigil = caps.name("bang").is_some();

        if let Some(target) = caps.name("target") {
            let label = caps
                .name("label")
                .map(|m| m.as_str().trim())
                .filter(|l| !l.is_empty());
            return self.link_html(target.as_str().trim(), label, None, sigil, true);
        }

        let url = caps.name("url").map_or("", |m| m.as_str());
        let url = url
            .strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .unwrap_or(url)
            .trim();
        let label = caps
            .name("alt")
            .map(|m| m.as_str().trim())
            .filter(|l| !l.is_empty());
        let title = caps.name("title").map(|m| m.as_str());
        self.link_html(url, label, title, sigil, false)
    }

    fn link_html(
        &self,
        target: &str,
        label: Option<&str>,
        title: Option<&str>,
        sigil: bool,
        wiki: bool,
    ) -> String {
        let image = sigil || is_image_target(target);
        let url = self.build_url(target, image, wiki);
        let label = match label {
            Some(label) => label.to_string(),
            None => derive_label(target, self.links.label_case),
        };
        let title_attr = title
            .map(|t| format!(" title=\"{}\"", escape_attr(t)))
            .unwrap_or_default();

        if image {
            format!(
                "<img alt=\"{}\"{} src=\"{}\"{}>",
                escape_attr(&label),
                class_attr(&self.links.image_class),
                escape_attr(&url),
                title_attr
            )
        } else {
            format!(
                "<a{} href=\"{}\"{}>{}</a>",
                class_attr(&self.links.html_class),
                escape_attr(&url),
                title_attr,
                escape_html(&label)
            )
        }
    }

    /// Resolve a link target against the configured base URL.
    ///
    /// External targets are returned unchanged and anchors stay in the
    /// current document. Relative targets get the base URL prepended,
    /// whitespace replaced, a `.md` suffix dropped for notes, `end_url`
    /// appended (not for images) and the URL case policy applied. A
    /// wiki-link fragment is slugified to match heading ids.
    pub fn build_url(&self, target: &str, image: bool, wiki: bool) -> String {
        let (page, fragment) = split_fragment(target);
        let page = match classify_url(target.trim_start()) {
            LinkKind::External => return target.to_string(),
            LinkKind::Anchor => "",
            LinkKind::Relative => page.trim(),
        };
        let fragment = fragment
            .map(|f| if wiki { slugify(f) } else { f.to_string() })
            .filter(|f| !f.is_empty());

        if page.is_empty() {
            return fragment.map(|f| format!("#{}", f)).unwrap_or_default();
        }

        let page = page.trim_start_matches("./").trim_start_matches('/');
        let page = if image {
            page
        } else {
            page.strip_suffix(".md").unwrap_or(page)
        };
        let clean = WHITESPACE.replace_all(page, NoExpand(&self.links.url_whitespace));

        let mut url = format!("{}/{}", self.links.base_url.trim_end_matches('/'), clean);
        if !image {
            url.push_str(&self.links.end_url);
        }
        let mut url = match self.links.url_case {
            UrlCase::None => url,
            UrlCase::Lowercase => url.to_lowercase(),
            UrlCase::Uppercase => url.to_uppercase(),
        };

        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(&fragment);
        }
        url
    }
}

fn class_attr(class: &str) -> String {
    if class.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape_attr(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notepress_core::LabelCase;

    fn apply(text: &str) -> String {
        let links = LinkConfig::default();
        InlineRenderer::new(&links).apply(text)
    }

    #[test]
    fn test_strike_and_highlight() {
        let out = apply("==hi==  and ~~bye~~");
        assert!(out.contains("<mark>hi</mark>"));
        assert!(out.contains("<del>bye</del>"));
    }

    #[test]
    fn test_spaced_markers_are_literal() {
        assert_eq!(apply("a == b == c"), "a == b == c");
        assert_eq!(apply("~~ x ~~"), "~~ x ~~");
    }

    #[test]
    fn test_embed() {
        let out = apply("![[diagram.png]]");
        assert_eq!(out, "<img src=\"/images/diagram.png\" alt=\"diagram.png\">");
        let out = apply("![[cat.jpg|A cat]]");
        assert!(out.contains("src=\"/images/cat.jpg\""));
        assert!(out.contains("alt=\"A cat\""));
    }

    #[test]
    fn test_wikilink_with_derived_label() {
        let out = apply("See [[the_art-of war]].");
        assert_eq!(
            out,
            "See <a class=\"wikilink\" href=\"/the_art-of-war\">The Art of War</a>."
        );
    }

    #[test]
    fn test_wikilink_with_label_and_heading() {
        let out = apply("[[guides/setup#First Steps|start here]]");
        assert_eq!(
            out,
            "<a class=\"wikilink\" href=\"/guides/setup#first-steps\">start here</a>"
        );
    }

    #[test]
    fn test_wikilink_image_by_suffix() {
        let out = apply("[[photo.png]]");
        assert!(out.starts_with("<img alt=\"Photo\" class=\"wikilink-image\" src=\"/photo.png\""));
    }

    #[test]
    fn test_markdown_links() {
        let out = apply("[Docs](docs/intro.md) and [ext](https://example.com \"Example\")");
        assert!(out.contains("<a class=\"wikilink\" href=\"/docs/intro\">Docs</a>"));
        assert!(out.contains("href=\"https://example.com\" title=\"Example\">ext</a>"));

        let out = apply("![alt text](<my pic.png>)");
        assert!(out.contains(
            "<img alt=\"alt text\" class=\"wikilink-image\" src=\"/my-pic.png\">"
        ));
    }

    #[test]
    fn test_inline_code_is_opaque() {
        assert_eq!(apply("`[[x]] ==y==`"), "`[[x]] ==y==`");
    }

    #[test]
    fn test_build_url_policies() {
        let links = LinkConfig {
            base_url: "https://notes.example.com/wiki/".to_string(),
            end_url: ".html".to_string(),
            url_whitespace: "_".to_string(),
            url_case: UrlCase::Lowercase,
            label_case: LabelCase::None,
            ..LinkConfig::default()
        };
        let inline = InlineRenderer::new(&links);
        assert_eq!(
            inline.build_url("My Page", false, true),
            "https://notes.example.com/wiki/my_page.html"
        );
        assert_eq!(
            inline.build_url("img/Logo.PNG", true, false),
            "https://notes.example.com/wiki/img/logo.png"
        );
        assert_eq!(inline.build_url("#Top Part", false, true), "#top-part");
        assert_eq!(inline.build_url("#raw", false, false), "#raw");
        assert_eq!(inline.build_url("mailto:a@b.c", false, false), "mailto:a@b.c");
    }

    #[test]
    fn test_build_url_by_link_kind() {
        let links = LinkConfig::with_base_url("/wiki");
        let inline = InlineRenderer::new(&links);
        // External: untouched, fragment included
        assert_eq!(
            inline.build_url("https://Example.com/A Page#Top", false, true),
            "https://Example.com/A Page#Top"
        );
        assert_eq!(
            inline.build_url("//cdn.example.com/x.png", true, false),
            "//cdn.example.com/x.png"
        );
        // Anchor: stays in the current document
        assert_eq!(inline.build_url("#Next Steps", false, true), "#next-steps");
        assert_eq!(inline.build_url("#", false, true), "");
        // Relative: resolved against the base URL
        assert_eq!(inline.build_url("notes/a#Part", false, true), "/wiki/notes/a#part");
        assert_eq!(
            apply("[[#Setup]] [top](#top)"),
            concat!(
                "<a class=\"wikilink\" href=\"#setup\">Setup</a> ",
                "<a class=\"wikilink\" href=\"#top\">top</a>"
            )
        );
    }

    #[test]
    fn test_task_list_brackets_untouched() {
        assert_eq!(apply("- [ ] todo\n- [x] done"), "- [ ] todo\n- [x] done");
    }
}
