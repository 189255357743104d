//! Core data models representing notes and the results computed from them.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize
//! - **Owned**: no borrowed views into corpus files outlive a call
//! - **Type-Safe**: Enums replace magic strings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Normalized note metadata.
///
/// `title` and `tags` are always present after normalization, even when the
/// source YAML omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    /// Every frontmatter key outside {title, date, tags, path}
    pub custom_fields: serde_json::Map<String, serde_json::Value>,
    /// Corpus-relative identifier (no extension)
    pub path: String,
}

impl Metadata {
    /// Metadata with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: None,
            tags: Vec::new(),
            custom_fields: serde_json::Map::new(),
            path: String::new(),
        }
    }

    /// Whether this note carries `tag` (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// A note read fresh from the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Corpus-relative identifier (no extension)
    pub id: String,
    /// Absolute file path
    pub file: PathBuf,
    pub raw: String,
    pub metadata: Metadata,
    /// Markdown body with frontmatter removed
    pub body: String,
}

/// A note rendered for publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedNote {
    pub id: String,
    pub metadata: Metadata,
    pub markdown: String,
    pub html: String,
    pub toc: Toc,
}

/// One node of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    pub title: String,
    /// Markdown heading level (1-6)
    pub level: u8,
    /// Fragment identifier matching the rendered heading's `id`
    pub anchor: String,
    /// Child headings in document order
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Create a leaf node
    pub fn new(title: impl Into<String>, level: u8, anchor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level,
            anchor: anchor.into(),
            children: Vec::new(),
        }
    }

    /// First child with the given title
    pub fn child(&self, title: &str) -> Option<&HeadingNode> {
        self.children.iter().find(|c| c.title == title)
    }
}

/// A heading tree rooted at an implicit document node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toc {
    pub headings: Vec<HeadingNode>,
}

impl Toc {
    /// Top-level heading with the given title
    pub fn get(&self, title: &str) -> Option<&HeadingNode> {
        self.headings.iter().find(|h| h.title == title)
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Titles in depth-first, pre-order traversal.
    pub fn flatten(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [HeadingNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                out.push(&node.title);
                walk(&node.children, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.headings, &mut out);
        out
    }

    /// Depth of the deepest node (0 for an empty tree)
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[HeadingNode]) -> usize {
            nodes
                .iter()
                .map(|n| 1 + depth_of(&n.children))
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.headings)
    }
}

/// A note that references a target note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    pub title: String,
    /// Corpus-relative identifier of the referencing note
    pub path: String,
}

/// What the fuzzy search engine matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// File names only
    #[default]
    Name,
    /// Full file contents
    Content,
}

impl std::str::FromStr for SearchMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SearchMode::Name),
            "content" | "full" | "text" => Ok(SearchMode::Content),
            other => Err(crate::Error::invalid_argument(format!(
                "Unknown search mode: {}",
                other
            ))),
        }
    }
}

/// One ranked fuzzy search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// Corpus-relative identifier
    pub path: String,
    /// Context around the match (the file name in name mode)
    pub snippet: String,
    /// Edit operations needed; lower is closer
    pub distance: usize,
}

/// Callout type after alias canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalloutKind {
    Note,
    Abstract,
    Info,
    Todo,
    Tip,
    Success,
    Question,
    Warning,
    Failure,
    Danger,
    Bug,
    Example,
    Quote,
    /// Any unrecognized type, lowercased
    Custom(String),
}

impl CalloutKind {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            CalloutKind::Note => "note",
            CalloutKind::Abstract => "abstract",
            CalloutKind::Info => "info",
            CalloutKind::Todo => "todo",
            CalloutKind::Tip => "tip",
            CalloutKind::Success => "success",
            CalloutKind::Question => "question",
            CalloutKind::Warning => "warning",
            CalloutKind::Failure => "failure",
            CalloutKind::Danger => "danger",
            CalloutKind::Bug => "bug",
            CalloutKind::Example => "example",
            CalloutKind::Quote => "quote",
            CalloutKind::Custom(name) => name,
        }
    }
}

/// Collapse state of a callout (`+` / `-` marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Foldable {
    /// No marker
    Static,
    /// `+`: collapsible, initially open
    Expanded,
    /// `-`: collapsible, initially closed
    Collapsed,
}

/// Header line of a callout block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutHeader {
    pub kind: CalloutKind,
    pub title: Option<String>,
    pub fold: Foldable,
}

/// A note in listings (file tree, tag index)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    /// Corpus-relative identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// A directory in the corpus file tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    /// Corpus-relative directory path ("" for the root)
    pub path: String,
    pub notes: Vec<NoteSummary>,
    pub folders: Vec<Folder>,
}

impl Folder {
    /// Total notes in this folder and below
    pub fn note_count(&self) -> usize {
        self.notes.len() + self.folders.iter().map(Folder::note_count).sum::<usize>()
    }
}

/// A tag together with the notes carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub tag: String,
    pub notes: Vec<NoteSummary>,
}
