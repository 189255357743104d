//! Nested folder view of the corpus.

use crate::corpus::{Corpus, NoteEntry};
use notepress_core::{Folder, NoteSummary, Result};

/// Fold walked entries into a folder tree rooted at `root_name`.
pub fn build_tree(root_name: &str, entries: &[NoteEntry]) -> Folder {
    let mut root = Folder {
        name: root_name.to_string(),
        ..Folder::default()
    };

    for entry in entries {
        let mut parts: Vec<&str> = entry.id.split('/').collect();
        let Some(file_name) = parts.pop() else {
            continue;
        };

        let mut folder = &mut root;
        let mut path = String::new();
        for part in parts {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(part);

            let idx = match folder.folders.iter().position(|f| f.name == part) {
                Some(idx) => idx,
                None => {
                    folder.folders.push(Folder {
                        name: part.to_string(),
                        path: path.clone(),
                        ..Folder::default()
                    });
                    folder.folders.len() - 1
                }
            };
            folder = &mut folder.folders[idx];
        }

        folder.notes.push(NoteSummary {
            id: entry.id.clone(),
            name: file_name.to_string(),
        });
    }

    sort_folder(&mut root);
    root
}

fn sort_folder(folder: &mut Folder) {
    folder.notes.sort_by(|a, b| a.name.cmp(&b.name));
    folder.folders.sort_by(|a, b| a.name.cmp(&b.name));
    for sub in &mut folder.folders {
        sort_folder(sub);
    }
}

impl Corpus {
    /// Notes grouped by directory, files and folders sorted by name.
    pub fn file_tree(&self) -> Result<Folder> {
        let entries = self.entries()?;
        let root_name = self
            .root()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(build_tree(&root_name, &entries))
    }
}
