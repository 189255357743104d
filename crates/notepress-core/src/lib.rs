//! # Notepress Core
//!
//! Core data models, error types, and configuration for the note content engine.
//! This crate defines the canonical types that all other crates depend on.
//!
//! ## Architecture Principles
//!
//! - **Type-Driven Design**: Strong types replace string-based APIs
//! - **Zero Panic in Libraries**: All errors are `Result<T, Error>`
//! - **Builder Pattern for Configuration**: [`EngineConfig::builder`] validates on build
//! - **Stateless Callers**: nothing here caches corpus state between calls
//!
//! ## Core Modules
//!
//! - [`models`] - Note, metadata, heading tree, backlink and search result types
//! - [`error`] - Error type, error kinds and Result alias
//! - [`config`] - Corpus, renderer and search configuration
//! - [`utils`] - Titles, slugs, identifier mapping and escaping helpers
//!
//! ## Error Handling
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! fn lookup(id: &str) -> Result<()> {
//!     if id.trim().is_empty() {
//!         return Err(Error::invalid_argument("empty note identifier"));
//!     }
//!     Ok(())
//! }
//!
//! let err = lookup("").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! ```
//!
//! ## Configuration
//!
//! ```
//! use notepress_core::prelude::*;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.search.default_max_distance, 2);
//! assert_eq!(config.render.links.image_prefix, "/images/");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::*;
pub use error::{Error, ErrorKind, Result};
pub use models::*;
pub use utils::{PathValidator, SlugRegistry, to_json_string};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        CorpusConfig, EngineConfig, LabelCase, LinkConfig, RenderConfig, SearchConfig, UrlCase,
    };
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::models::{
        Backlink, CalloutHeader, CalloutKind, Foldable, Folder, FuzzyMatch, HeadingNode, Metadata,
        Note, NoteSummary, RenderedNote, SearchMode, TagEntry, Toc,
    };
}
