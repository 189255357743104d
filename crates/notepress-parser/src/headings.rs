//! Heading extraction and table-of-contents construction.
//!
//! Headings are found with the same CommonMark parser the renderer uses, so
//! headings inside callouts and setext headings are included and code blocks
//! are not. Titles are the text a reader sees: wiki-links reduce to their
//! label, embeds and images drop out and highlight or strikethrough markers
//! are removed. Anchors therefore match the ids on the rendered headings.

use crate::links::{derive_label, is_image_target};
use lazy_static::lazy_static;
use notepress_core::{HeadingNode, LabelCase, SlugRegistry, Toc};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};

lazy_static! {
    static ref EMBED_PATTERN: Regex = Regex::new(r"!\[\[([^\[\]]+?)\]\]").unwrap();
    static ref STRIKE_PATTERN: Regex = Regex::new(r"~~([^~\s](?:[^~]*[^~\s])?)~~").unwrap();
    static ref HIGHLIGHT_PATTERN: Regex = Regex::new(r"==([^=\s](?:[^=]*[^=\s])?)==").unwrap();
    /// `[[target]]` or `[[target|label]]`, with an optional `!`
    static ref WIKI_LINK_PATTERN: Regex = Regex::new(
        r"(?P<bang>!)?\[\[\s*(?P<target>[^\[\]|]+?)(?:\s*\|\s*(?P<label>[^\[\]]*?))?\s*\]\]"
    )
    .unwrap();
}

/// A heading found in a markdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLine {
    pub level: u8,
    pub title: String,
    /// 1-based line number
    pub line: usize,
}

/// Reduce inline note syntax in a text run to its visible text.
fn visible_text(run: &str, case: LabelCase) -> String {
    let run = EMBED_PATTERN.replace_all(run, "");
    let run = STRIKE_PATTERN.replace_all(&run, "$1");
    let run = HIGHLIGHT_PATTERN.replace_all(&run, "$1");
    WIKI_LINK_PATTERN
        .replace_all(&run, |caps: &Captures| {
            let target = caps["target"].trim();
            if caps.name("bang").is_some() || is_image_target(target) {
                return String::new();
            }
            match caps.name("label").map(|m| m.as_str().trim()) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => derive_label(target, case),
            }
        })
        .into_owned()
}

/// Links rendered as anchors show their text; image links show none.
enum LinkFrame {
    Shown { mark: usize, dest: String },
    Hidden,
}

/// Visible text of the heading being parsed.
struct HeadingText {
    case: LabelCase,
    title: String,
    /// Prose not yet reduced; code spans flush it
    run: String,
    /// Depth of images and image links, whose text is not shown
    hidden: usize,
    links: Vec<LinkFrame>,
}

impl HeadingText {
    fn new(case: LabelCase) -> Self {
        Self {
            case,
            title: String::new(),
            run: String::new(),
            hidden: 0,
            links: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if !self.run.is_empty() {
            self.title.push_str(&visible_text(&self.run, self.case));
            self.run.clear();
        }
    }

    fn text(&mut self, text: &str) {
        if self.hidden == 0 {
            self.run.push_str(text);
        }
    }

    fn code(&mut self, code: &str) {
        if self.hidden == 0 {
            self.flush();
            self.title.push_str(code);
        }
    }

    fn open_link(&mut self, dest: &str) {
        self.flush();
        if self.hidden > 0 || is_image_target(dest) {
            self.hidden += 1;
            self.links.push(LinkFrame::Hidden);
        } else {
            self.links.push(LinkFrame::Shown {
                mark: self.title.len(),
                dest: dest.to_string(),
            });
        }
    }

    fn close_link(&mut self) {
        self.flush();
        match self.links.pop() {
            Some(LinkFrame::Hidden) => self.hidden = self.hidden.saturating_sub(1),
            // An empty label falls back to one derived from the target
            Some(LinkFrame::Shown { mark, dest }) if self.title[mark..].trim().is_empty() => {
                self.title.push_str(&derive_label(&dest, self.case));
            }
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.title.trim().to_string()
    }
}

fn line_at(body: &str, offset: usize) -> usize {
    body[..offset].matches('\n').count() + 1
}

/// Parse all headings, deriving labels for bare wiki-links in title case.
pub fn extract_headings(body: &str) -> Vec<HeadingLine> {
    extract_headings_with(body, LabelCase::default())
}

/// Parse all headings with the given label case for bare wiki-links.
///
/// Headings without visible text are skipped; the renderer leaves them
/// without an id.
pub fn extract_headings_with(body: &str, case: LabelCase) -> Vec<HeadingLine> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut headings = Vec::new();
    let mut current: Option<(u8, usize, HeadingText)> = None;

    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        if let Event::Start(Tag::Heading { level, .. }) = event {
            current = Some((level as u8, line_at(body, range.start), HeadingText::new(case)));
            continue;
        }
        let Some((level, line, text)) = current.as_mut() else {
            continue;
        };

        match event {
            Event::Text(t) => text.text(&t),
            Event::Code(c) => text.code(&c),
            Event::SoftBreak | Event::HardBreak => text.text(" "),
            Event::Start(Tag::Image { .. }) => text.hidden += 1,
            Event::End(TagEnd::Image) => text.hidden = text.hidden.saturating_sub(1),
            Event::Start(Tag::Link { dest_url, .. }) => text.open_link(&dest_url),
            Event::End(TagEnd::Link) => text.close_link(),
            Event::End(TagEnd::Heading(_)) => {
                let (level, line) = (*level, *line);
                if let Some((_, _, text)) = current.take() {
                    let title = text.finish();
                    if !title.is_empty() {
                        headings.push(HeadingLine { level, title, line });
                    }
                }
            }
            _ => {}
        }
    }

    headings
}

fn close_top(open: &mut Vec<HeadingNode>, root: &mut Vec<HeadingNode>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.push(node),
        }
    }
}

/// Fold a flat heading sequence into a tree.
///
/// Each heading becomes a child of the nearest preceding heading with a
/// strictly smaller level, or of the root when there is none. Anchors are
/// assigned in document order, deduplicated the same way the renderer
/// assigns heading ids.
pub fn toc_from_headings(headings: &[HeadingLine]) -> Toc {
    let mut slugs = SlugRegistry::new();
    let mut root = Vec::new();
    // Open path from the root to the most recent heading
    let mut open: Vec<HeadingNode> = Vec::new();

    for heading in headings {
        while open.last().is_some_and(|n| n.level >= heading.level) {
            close_top(&mut open, &mut root);
        }
        let anchor = slugs.unique(&heading.title);
        open.push(HeadingNode::new(&heading.title, heading.level, anchor));
    }
    while !open.is_empty() {
        close_top(&mut open, &mut root);
    }

    Toc { headings: root }
}

/// Build the table of contents for a markdown body.
///
/// # Example
/// ```
/// use notepress_parser::build_toc;
///
/// let toc = build_toc("# A\n## B\n# C");
/// assert_eq!(toc.flatten(), vec!["A", "B", "C"]);
/// assert_eq!(toc.headings[0].children[0].title, "B");
/// ```
pub fn build_toc(body: &str) -> Toc {
    toc_from_headings(&extract_headings(body))
}

/// [`build_toc`] with the label case the renderer derives link labels with.
pub fn build_toc_with(body: &str, case: LabelCase) -> Toc {
    toc_from_headings(&extract_headings_with(body, case))
}
