//! Tag index built from frontmatter tags.

use crate::corpus::Corpus;
use notepress_core::{Error, Note, NoteSummary, Result, TagEntry};
use std::collections::BTreeMap;
use tracing::instrument;

fn summary(note: &Note) -> NoteSummary {
    NoteSummary {
        id: note.id.clone(),
        name: note.metadata.title.clone(),
    }
}

impl Corpus {
    /// Parse every note, skipping (and logging) the ones that fail.
    fn parsed_notes(&self) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        for entry in self.entries()? {
            match self.load_entry(&entry) {
                Ok(note) => notes.push(note),
                Err(e) => log::warn!("Skipping {} in tag scan: {}", entry.id, e),
            }
        }
        Ok(notes)
    }

    /// Every tag with the notes carrying it, sorted by tag.
    ///
    /// Tags differing only in case are merged under the first spelling seen.
    #[instrument(skip(self), name = "corpus_tags")]
    pub fn tags(&self) -> Result<Vec<TagEntry>> {
        let mut index: BTreeMap<String, TagEntry> = BTreeMap::new();

        for note in self.parsed_notes()? {
            for tag in &note.metadata.tags {
                let entry = index.entry(tag.to_lowercase()).or_insert_with(|| TagEntry {
                    tag: tag.clone(),
                    notes: Vec::new(),
                });
                if !entry.notes.iter().any(|n| n.id == note.id) {
                    entry.notes.push(summary(&note));
                }
            }
        }

        Ok(index.into_values().collect())
    }

    /// Notes whose tags include `tag` (case-insensitive, leading `#` ignored).
    #[instrument(skip(self), name = "corpus_notes_with_tag")]
    pub fn notes_with_tag(&self, tag: &str) -> Result<Vec<NoteSummary>> {
        let tag = tag.trim().trim_start_matches('#');
        if tag.is_empty() {
            return Err(Error::invalid_argument("empty tag"));
        }

        Ok(self
            .parsed_notes()?
            .iter()
            .filter(|note| note.metadata.has_tag(tag))
            .map(summary)
            .collect())
    }
}
