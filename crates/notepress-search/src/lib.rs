//! # Notepress Search
//!
//! Corpus-wide queries that re-scan the notes on every call:
//!
//! - [`find_backlinks`] - notes referencing a target by wiki-link or markdown link
//! - [`fuzzy_search`] - edit-distance bounded matching over names or contents
//!
//! ```no_run
//! use notepress_core::SearchMode;
//! use notepress_search::{SearchOptions, find_backlinks, fuzzy_search};
//! use notepress_vault::Corpus;
//!
//! let corpus = Corpus::open("notes")?;
//! let links = find_backlinks(&corpus, "home")?;
//!
//! let options = SearchOptions::default()
//!     .with_mode(SearchMode::Content)
//!     .with_max_distance(1);
//! for hit in fuzzy_search(&corpus, "helo", &options)? {
//!     println!("{} ({}): {}", hit.path, hit.distance, hit.snippet);
//! }
//! # Ok::<(), notepress_core::Error>(())
//! ```

pub mod backlinks;
pub mod fuzzy;
pub mod matcher;

pub use backlinks::find_backlinks;
pub use fuzzy::{SearchOptions, fuzzy_search};
pub use matcher::{SubstringMatch, best_match};
