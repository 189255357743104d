//! # Notepress Vault
//!
//! The corpus walker: enumerates markdown notes under a root directory and
//! maps note identifiers to files and back.
//!
//! - [`Corpus::entries`] / [`Corpus::list_notes`] - sorted recursive walk
//! - [`Corpus::resolve`] / [`Corpus::read_raw`] / [`Corpus::load`] - lookup by identifier
//! - [`Corpus::file_tree`] - nested folder view
//! - [`Corpus::tags`] / [`Corpus::notes_with_tag`] - tag index
//!
//! The corpus holds no index between calls.
//!
//! ```no_run
//! use notepress_vault::Corpus;
//!
//! let corpus = Corpus::open("~/notes")?;
//! for id in corpus.list_notes()? {
//!     println!("{}", id);
//! }
//! # Ok::<(), notepress_core::Error>(())
//! ```

pub mod corpus;
pub mod tags;
pub mod tree;

pub use corpus::{Corpus, NoteEntry};
pub use tree::build_tree;
