//! Backlink discovery: which notes link to a target note.

use notepress_core::utils::humanize_title;
use notepress_core::{Backlink, Result};
use notepress_parser::{NoteContext, ReferencePatterns, parse_frontmatter_with};
use notepress_vault::Corpus;
use std::fs;
use tracing::instrument;

/// Display title of a referencing note: its frontmatter title, else one
/// derived from the path. A malformed block falls back to the path title.
fn source_title(raw: &str, id: &str) -> String {
    match parse_frontmatter_with(raw, &NoteContext::new(id)) {
        Ok((metadata, _)) => metadata.title,
        Err(e) => {
            log::debug!("Untitled backlink source {}: {}", id, e);
            humanize_title(id)
        }
    }
}

/// Every note whose text references `target`, in walk order.
///
/// Each note appears at most once however many links it holds. The target
/// need not exist, and a note linking to itself is included. Unreadable
/// files are logged and skipped.
#[instrument(skip(corpus), name = "find_backlinks")]
pub fn find_backlinks(corpus: &Corpus, target: &str) -> Result<Vec<Backlink>> {
    let patterns = ReferencePatterns::for_target(target)?;

    let mut backlinks = Vec::new();
    for entry in corpus.entries()? {
        let raw = match fs::read_to_string(&entry.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping {} in backlink scan: {}", entry.path.display(), e);
                continue;
            }
        };

        if !patterns.is_referenced_by(&raw) {
            continue;
        }

        log::trace!(
            "{} references {} ({} hits)",
            entry.id,
            patterns.target(),
            patterns.count_in(&raw)
        );
        backlinks.push(Backlink {
            title: source_title(&raw, &entry.id),
            path: entry.id,
        });
    }

    log::debug!("{} backlinks to {}", backlinks.len(), patterns.target());
    Ok(backlinks)
}
