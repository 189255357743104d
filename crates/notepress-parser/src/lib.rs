//! # Notepress Parser
//!
//! Text-level parsing of markdown notes: everything that can be decided
//! without producing HTML.
//!
//! This crate provides:
//! - Frontmatter extraction and metadata normalization
//! - Heading extraction and table-of-contents trees
//! - Callout header and continuation syntax
//! - Link classification, label derivation and backlink reference patterns
//! - **Code block awareness**: line scanners skip fenced and indented code via
//!   [`CodeTracker`]
//!
//! ## Quick Start
//!
//! ```
//! use notepress_parser::{build_toc, parse_frontmatter_with, NoteContext};
//!
//! let content = "---\ntags: [rust]\n---\n# Intro\n## Setup\n# Usage\n";
//!
//! let ctx = NoteContext::new("guides/getting-started");
//! let (meta, body) = parse_frontmatter_with(content, &ctx).unwrap();
//! assert_eq!(meta.title, "Getting Started");
//! assert_eq!(meta.tags, vec!["rust"]);
//!
//! let toc = build_toc(&body);
//! assert_eq!(toc.flatten(), vec!["Intro", "Setup", "Usage"]);
//! ```

pub mod callouts;
pub mod fences;
pub mod frontmatter;
pub mod headings;
pub mod links;
pub mod metadata;

pub use callouts::{callout_continuation, canonical_kind, parse_callout_header};
pub use fences::{CodeTracker, FenceMarker, FenceTracker, fence_marker};
pub use frontmatter::{
    Frontmatter, extract_frontmatter, parse_frontmatter, parse_frontmatter_with,
    parse_yaml_block, split_frontmatter,
};
pub use headings::{
    HeadingLine, build_toc, build_toc_with, extract_headings, extract_headings_with,
    toc_from_headings,
};
pub use links::{LinkKind, ReferencePatterns, classify_url, derive_label, is_external};
pub use metadata::{NoteContext, normalize_metadata, parse_date};
