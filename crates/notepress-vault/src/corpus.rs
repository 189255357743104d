//! Corpus walker: markdown enumeration and note lookup.
//!
//! Nothing is cached. Every call walks or reads the file system again, so a
//! note edited between two calls is always seen fresh.

use chrono::{DateTime, Utc};
use notepress_core::utils::identifier_candidates;
use notepress_core::{CorpusConfig, Error, Note, PathValidator, Result};
use notepress_parser::{NoteContext, parse_frontmatter_with};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;
use walkdir::{DirEntry, WalkDir};

/// A note file found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// Corpus-relative identifier (no extension, `/` separated)
    pub id: String,
    /// Full file path
    pub path: PathBuf,
}

/// A directory tree of markdown notes.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    config: CorpusConfig,
}

impl Corpus {
    /// Open a corpus; fails when the root is missing or not a directory.
    pub fn new(config: CorpusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            root: config.resolved_root(),
            config,
        })
    }

    /// Open a corpus at `root` with default settings.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(CorpusConfig {
            root: root.into(),
            ..CorpusConfig::default()
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    fn is_excluded_name(&self, name: &str) -> bool {
        self.config.excluded_paths.contains(name)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.is_excluded_name(name))
    }

    fn has_note_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.config.extension))
    }

    /// Identifier of a file under the root (`dir/name` for `dir/name.md`).
    pub fn note_id(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Every note in walk order (file names sorted within each directory).
    ///
    /// Unreadable directories and oversized files are logged and skipped.
    #[instrument(skip(self), fields(root = ?self.root), name = "corpus_entries")]
    pub fn entries(&self) -> Result<Vec<NoteEntry>> {
        if !self.root.is_dir() {
            return Err(Error::not_found(self.root.display().to_string()));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded(e));

        let mut entries = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.has_note_extension(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > self.config.max_file_size => {
                    log::warn!(
                        "Skipping {} ({} bytes exceeds limit)",
                        entry.path().display(),
                        meta.len()
                    );
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            }

            if let Some(id) = self.note_id(entry.path()) {
                entries.push(NoteEntry {
                    id,
                    path: entry.into_path(),
                });
            }
        }

        log::debug!("Found {} notes under {}", entries.len(), self.root.display());
        Ok(entries)
    }

    /// Every note identifier in walk order.
    pub fn list_notes(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|e| e.id).collect())
    }

    /// Map an identifier to its file.
    ///
    /// Tries the identifier verbatim, then with spaces as `-`, then with
    /// `-` as spaces. A trailing extension is accepted. Paths escaping the
    /// root are rejected.
    pub fn resolve(&self, id: &str) -> Result<PathBuf> {
        let id = id.trim().trim_start_matches('/');
        if id.is_empty() {
            return Err(Error::invalid_argument("empty note identifier"));
        }

        let suffix = format!(".{}", self.config.extension);
        let id = id.strip_suffix(suffix.as_str()).unwrap_or(id);

        for candidate in identifier_candidates(id) {
            let relative = PathBuf::from(format!("{}{}", candidate, suffix));
            let path = PathValidator::join_within(&self.root, &relative)?;
            let excluded = relative
                .components()
                .any(|c| c.as_os_str().to_str().is_some_and(|n| self.is_excluded_name(n)));
            if !excluded && path.is_file() {
                return Ok(path);
            }
        }

        Err(Error::not_found(id))
    }

    /// Unmodified text of a note.
    pub fn read_raw(&self, id: &str) -> Result<String> {
        let path = self.resolve(id)?;
        fs::read_to_string(&path).map_err(Error::io)
    }

    /// Load and parse a note; malformed frontmatter is an error.
    #[instrument(skip(self), name = "corpus_load")]
    pub fn load(&self, id: &str) -> Result<Note> {
        let path = self.resolve(id)?;
        let id = self.note_id(&path).unwrap_or_else(|| id.to_string());
        self.load_entry(&NoteEntry { id, path })
    }

    /// Load and parse a walked entry.
    pub fn load_entry(&self, entry: &NoteEntry) -> Result<Note> {
        let raw = fs::read_to_string(&entry.path).map_err(Error::io)?;
        let (created, modified) = file_times(&entry.path);
        let ctx = NoteContext::new(&entry.id).with_times(created, modified);
        let (metadata, body) = parse_frontmatter_with(&raw, &ctx)?;

        Ok(Note {
            id: entry.id.clone(),
            file: entry.path.clone(),
            raw,
            metadata,
            body,
        })
    }
}

/// Creation and modification times, where the platform reports them.
fn file_times(path: &Path) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match fs::metadata(path) {
        Ok(meta) => (
            meta.created().ok().map(DateTime::<Utc>::from),
            meta.modified().ok().map(DateTime::<Utc>::from),
        ),
        Err(_) => (None, None),
    }
}
