//! End-to-end tests through the NoteEngine facade

use notepress::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_engine() -> (TempDir, NoteEngine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let files = [
        (
            "home.md",
            concat!(
                "---\ntitle: Home\ntags: [start, Index]\n---\n",
                "# A\n## B\n# C\n\nSee [[My Note]] and ==this==.\n"
            ),
        ),
        (
            "my-note.md",
            "---\ntags: start\n---\n# Details\n\n> [!tip] Hint\n> Back to [[home]].\n",
        ),
        ("journal/2024.md", "Well, hello there! [[home#C]]\n"),
        ("broken.md", "---\ntitle: [unclosed\n---\nbody\n"),
    ];
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(&path, content).expect("Failed to write note");
    }

    let config = EngineConfig::builder(temp_dir.path())
        .base_url("/wiki")
        .build()
        .expect("Failed to build config");
    let engine = NoteEngine::new(config).expect("Failed to open engine");
    (temp_dir, engine)
}

#[test]
fn test_list_notes_in_walk_order() {
    let (_temp, engine) = setup_engine();
    assert_eq!(
        engine.list_notes().unwrap(),
        vec!["broken", "home", "journal/2024", "my-note"]
    );
}

#[test]
fn test_file_tree() {
    let (_temp, engine) = setup_engine();
    let tree = engine.file_tree().unwrap();
    assert_eq!(tree.note_count(), 4);
    assert_eq!(tree.folders.len(), 1);
    assert_eq!(tree.folders[0].name, "journal");
    assert_eq!(tree.folders[0].notes[0].id, "journal/2024");
}

#[test]
fn test_rendered_note() {
    let (_temp, engine) = setup_engine();
    let note = engine.note("home").unwrap();

    assert_eq!(note.id, "home");
    assert_eq!(note.metadata.title, "Home");
    assert!(note.markdown.starts_with("# A"));
    assert!(note.html.contains("<h1 id=\"a\">A</h1>"));
    assert!(note.html.contains("<mark>this</mark>"));
    assert!(note.html.contains("href=\"/wiki/My-Note\""));

    assert_eq!(note.toc.flatten(), vec!["A", "B", "C"]);
    assert_eq!(note.toc.get("A").unwrap().children[0].title, "B");
    assert_eq!(note.toc.get("C").unwrap().anchor, "c");
}

#[test]
fn test_rendered_note_serializes() {
    let (_temp, engine) = setup_engine();
    let note = engine.note("my-note").unwrap();
    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], "my-note");
    assert_eq!(json["metadata"]["title"], "My Note");
    assert!(json["html"].as_str().unwrap().contains("callout-tip"));
}

#[test]
fn test_identifier_with_spaces_resolves() {
    let (_temp, engine) = setup_engine();
    let note = engine.note("my note").unwrap();
    assert_eq!(note.id, "my-note");
    assert_eq!(engine.metadata("my note").unwrap().tags, vec!["start"]);
}

#[test]
fn test_raw_is_unmodified() {
    let (temp, engine) = setup_engine();
    let expected = fs::read_to_string(temp.path().join("home.md")).unwrap();
    assert_eq!(engine.raw("home").unwrap(), expected);
}

#[test]
fn test_toc_scenario() {
    let (_temp, engine) = setup_engine();
    let toc = engine.toc("home").unwrap();
    assert_eq!(toc.headings.len(), 2);
    assert_eq!(toc.depth(), 2);
}

#[test]
fn test_target_note_errors_surface() {
    let (_temp, engine) = setup_engine();

    let err = engine.note("missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = engine.note("broken").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedFrontmatter);

    let err = engine.metadata("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = engine.raw("../outside").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_backlinks_through_engine() {
    let (_temp, engine) = setup_engine();
    let links = engine.backlinks("home").unwrap();
    let paths: Vec<_> = links.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(paths, vec!["journal/2024", "my-note"]);
    assert_eq!(links[1].title, "My Note");

    let links = engine.backlinks("my note").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path, "home");
}

#[test]
fn test_search_defaults_and_overrides() {
    let (_temp, engine) = setup_engine();

    let hits = engine.search("helo", Some(1), SearchMode::Content).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "journal/2024");
    assert_eq!(hits[0].distance, 1);

    let hits = engine.search("my-nte", None, SearchMode::Name).unwrap();
    assert_eq!(hits[0].path, "my-note");
    assert_eq!(hits[0].snippet, "my-note.md");

    let err = engine.search("home", Some(50), SearchMode::Name).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_tag_index_skips_malformed_notes() {
    let (_temp, engine) = setup_engine();
    let tags = engine.tags().unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(names, vec!["Index", "start"]);

    let start = &tags[1];
    let ids: Vec<_> = start.notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["home", "my-note"]);

    let tagged = engine.notes_with_tag("#INDEX").unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].name, "Home");
}

#[test]
fn test_missing_root_rejected() {
    let temp = TempDir::new().unwrap();
    let mut config = EngineConfig::default();
    config.corpus.root = temp.path().join("nowhere");
    let err = NoteEngine::new(config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}
