//! # Notepress
//!
//! A markdown note engine over a directory of notes. [`NoteEngine`] ties the
//! workspace crates together behind one configuration:
//!
//! - `notepress-parser` - frontmatter, metadata normalization, TOC
//! - `notepress-render` - the ordered HTML rendering pipeline
//! - `notepress-vault` - corpus walking, identifier lookup, tree and tags
//! - `notepress-search` - backlinks and fuzzy search
//!
//! Every call re-reads the corpus; nothing is cached between calls, so the
//! engine is safe to share across threads.
//!
//! ```no_run
//! use notepress::prelude::*;
//!
//! let config = EngineConfig::builder("notes").base_url("/wiki").build()?;
//! let engine = NoteEngine::new(config)?;
//!
//! let note = engine.note("home")?;
//! println!("{}: {} headings", note.metadata.title, note.toc.headings.len());
//!
//! for hit in engine.search("helo", Some(1), SearchMode::Content)? {
//!     println!("{} ({})", hit.path, hit.distance);
//! }
//! # Ok::<(), notepress::Error>(())
//! ```

pub use notepress_core::prelude::*;
pub use notepress_parser::{build_toc, parse_frontmatter};
pub use notepress_render::{Renderer, render};
pub use notepress_search::{SearchOptions, find_backlinks, fuzzy_search};
pub use notepress_vault::Corpus;

use tracing::instrument;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::NoteEngine;
    pub use notepress_core::prelude::*;
    pub use notepress_search::SearchOptions;
}

/// Read-only operations over one configured corpus.
#[derive(Debug, Clone)]
pub struct NoteEngine {
    config: EngineConfig,
    corpus: Corpus,
    renderer: Renderer,
}

impl NoteEngine {
    /// Validate `config` and open its corpus.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let corpus = Corpus::new(config.corpus.clone())?;
        let renderer = Renderer::new(config.render.clone());

        log::debug!("Opened corpus at {}", corpus.root().display());
        Ok(Self {
            config,
            corpus,
            renderer,
        })
    }

    /// Engine over `root` with default settings.
    pub fn open(root: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::new(EngineConfig::builder(root).build()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Every note identifier in walk order.
    pub fn list_notes(&self) -> Result<Vec<String>> {
        self.corpus.list_notes()
    }

    pub fn file_tree(&self) -> Result<Folder> {
        self.corpus.file_tree()
    }

    /// Unmodified file text of a note.
    pub fn raw(&self, id: &str) -> Result<String> {
        self.corpus.read_raw(id)
    }

    pub fn metadata(&self, id: &str) -> Result<Metadata> {
        Ok(self.corpus.load(id)?.metadata)
    }

    /// Load a note and render its body. Malformed frontmatter fails the call.
    #[instrument(skip(self), name = "engine_note")]
    pub fn note(&self, id: &str) -> Result<RenderedNote> {
        let note = self.corpus.load(id)?;
        let html = self.renderer.render(&note.body);
        let toc = self.renderer.toc(&note.body);

        Ok(RenderedNote {
            id: note.id,
            metadata: note.metadata,
            markdown: note.body,
            html,
            toc,
        })
    }

    pub fn toc(&self, id: &str) -> Result<Toc> {
        let note = self.corpus.load(id)?;
        Ok(self.renderer.toc(&note.body))
    }

    /// Notes linking to `id`. The target itself need not exist.
    pub fn backlinks(&self, id: &str) -> Result<Vec<Backlink>> {
        find_backlinks(&self.corpus, id.trim())
    }

    /// Search options seeded from this engine's configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::from_config(&self.config.search)
    }

    /// Fuzzy search; `max_distance` falls back to the configured default.
    pub fn search(
        &self,
        query: &str,
        max_distance: Option<usize>,
        mode: SearchMode,
    ) -> Result<Vec<FuzzyMatch>> {
        let mut options = self.search_options().with_mode(mode);
        if let Some(distance) = max_distance {
            options = options.with_max_distance(distance);
        }
        self.search_with(query, &options)
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Result<Vec<FuzzyMatch>> {
        fuzzy_search(&self.corpus, query, options)
    }

    pub fn tags(&self) -> Result<Vec<TagEntry>> {
        self.corpus.tags()
    }

    pub fn notes_with_tag(&self, tag: &str) -> Result<Vec<NoteSummary>> {
        self.corpus.notes_with_tag(tag)
    }
}
