//! Fuzzy search over note names or contents.
//!
//! A brute-force scan: every call walks the corpus and runs the bounded
//! matcher over each candidate. Results are ordered by distance, ties kept
//! in walk order.

use crate::matcher::{best_match, prepare, snippet};
use notepress_core::{Error, FuzzyMatch, Result, SearchConfig, SearchMode};
use notepress_vault::{Corpus, NoteEntry};
use std::fs;
use tracing::instrument;

/// Parameters for one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Edit operations tolerated
    pub max_distance: usize,
    pub mode: SearchMode,
    pub case_sensitive: bool,
    /// Keep at most this many results
    pub limit: Option<usize>,
    /// Context chars on each side of a content match
    pub snippet_radius: usize,
    /// Requests above this distance are rejected
    pub max_distance_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SearchOptions {
    /// Options seeded from configuration defaults.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_distance: config.default_max_distance,
            mode: SearchMode::Name,
            case_sensitive: config.case_sensitive,
            limit: config.default_limit,
            snippet_radius: config.snippet_radius,
            max_distance_limit: config.max_distance_limit,
        }
    }

    pub fn with_max_distance(mut self, max_distance: usize) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn validate(&self, query: &str) -> Result<()> {
        if query.is_empty() {
            return Err(Error::invalid_argument("empty search query"));
        }
        if self.max_distance > self.max_distance_limit {
            return Err(Error::invalid_argument(format!(
                "max_distance {} exceeds the limit of {}",
                self.max_distance, self.max_distance_limit
            )));
        }
        Ok(())
    }
}

fn file_name(entry: &NoteEntry) -> String {
    entry
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.id.clone())
}

fn file_stem(entry: &NoteEntry) -> String {
    entry
        .path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.id.clone())
}

/// Search the corpus for `query`.
///
/// The tolerated distance is clamped to one less than the query length, so
/// every match shares at least one character with the query.
#[instrument(
    skip(corpus, options),
    fields(mode = ?options.mode, max_distance = options.max_distance),
    name = "fuzzy_search"
)]
pub fn fuzzy_search(
    corpus: &Corpus,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<FuzzyMatch>> {
    let query = query.trim();
    options.validate(query)?;

    let pattern = prepare(query, options.case_sensitive);
    let bound = options.max_distance.min(pattern.len().saturating_sub(1));

    let mut results = Vec::new();
    for entry in corpus.entries()? {
        let hit = match options.mode {
            SearchMode::Name => {
                let name = prepare(&file_stem(&entry), options.case_sensitive);
                best_match(&pattern, &name, bound).map(|m| (m.distance, file_name(&entry)))
            }
            SearchMode::Content => {
                let content = match fs::read_to_string(&entry.path) {
                    Ok(content) => content,
                    Err(e) => {
                        log::warn!("Skipping {} in search: {}", entry.path.display(), e);
                        continue;
                    }
                };
                // Snippets come from the normalized text with original case
                let original = prepare(&content, true);
                let haystack = if options.case_sensitive {
                    original.clone()
                } else {
                    prepare(&content, false)
                };
                best_match(&pattern, &haystack, bound).map(|m| {
                    (m.distance, snippet(&original, m.start, m.end, options.snippet_radius))
                })
            }
        };

        if let Some((distance, snippet)) = hit {
            results.push(FuzzyMatch {
                path: entry.id,
                snippet,
                distance,
            });
        }
    }

    // Stable: equal distances keep walk order
    results.sort_by_key(|m| m.distance);
    if let Some(limit) = options.limit {
        results.truncate(limit);
    }

    log::debug!("Search for {:?} matched {} notes", query, results.len());
    Ok(results)
}
