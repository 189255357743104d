//! Integration tests for backlinks and fuzzy search

use notepress_core::{ErrorKind, SearchMode};
use notepress_search::{SearchOptions, find_backlinks, fuzzy_search};
use notepress_vault::Corpus;
use std::fs;
use tempfile::TempDir;

fn setup_corpus(files: &[(&str, &str)]) -> (TempDir, Corpus) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(&path, content).expect("Failed to write note");
    }
    let corpus = Corpus::open(temp_dir.path()).expect("Failed to open corpus");
    (temp_dir, corpus)
}

fn setup_linked_corpus() -> (TempDir, Corpus) {
    setup_corpus(&[
        ("index.md", "---\ntitle: The Index\n---\n[[note1]] [[Note2|second]]"),
        ("note1.md", "# Note 1\n[[note2]] and [[note2]] again"),
        ("note2.md", "# Note 2\n[back](index.md)"),
        ("guides/setup.md", "See [[note2#Details]]"),
        ("orphan.md", "# Orphan\nNo links, just note2 in prose"),
    ])
}

#[test]
fn test_backlink_scenario() {
    let (_temp, corpus) = setup_corpus(&[("a.md", "[[b]]"), ("b.md", "no link")]);
    let links = find_backlinks(&corpus, "b").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path, "a");
    assert_eq!(links[0].title, "A");
}

#[test]
fn test_backlinks_all_forms_once_each() {
    let (_temp, corpus) = setup_linked_corpus();
    let links = find_backlinks(&corpus, "note2").unwrap();
    let paths: Vec<_> = links.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(paths, vec!["guides/setup", "index", "note1"]);
    assert_eq!(links[1].title, "The Index");
    assert_eq!(links[0].title, "Setup");
}

#[test]
fn test_backlinks_by_markdown_link() {
    let (_temp, corpus) = setup_linked_corpus();
    let links = find_backlinks(&corpus, "index").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].path, "note2");
}

#[test]
fn test_backlinks_by_basename_for_nested_target() {
    let (_temp, corpus) = setup_corpus(&[
        ("guides/setup.md", "# Setup"),
        ("a.md", "[[setup]]"),
        ("b.md", "[[guides/setup|Setup guide]]"),
        ("c.md", "[[setups]]"),
    ]);
    let links = find_backlinks(&corpus, "guides/setup").unwrap();
    let paths: Vec<_> = links.iter().map(|l| l.path.as_str()).collect();
    assert_eq!(paths, vec!["a", "b"]);
}

#[test]
fn test_backlinks_skip_malformed_titles_not_files() {
    let (_temp, corpus) =
        setup_corpus(&[("bad-one.md", "---\nnever closed\n[[home]]"), ("home.md", "")]);
    let links = find_backlinks(&corpus, "home").unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].title, "Bad One");
}

#[test]
fn test_backlinks_empty_target() {
    let (_temp, corpus) = setup_linked_corpus();
    let err = find_backlinks(&corpus, "  ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_content_search_scenario() {
    let (_temp, corpus) = setup_corpus(&[
        ("greeting.md", "Well, hello there!"),
        ("other.md", "nothing here"),
    ]);
    let options = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(1);
    let results = fuzzy_search(&corpus, "helo", &options).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "greeting");
    assert_eq!(results[0].distance, 1);
    assert!(results[0].snippet.contains("hello"));
}

#[test]
fn test_zero_distance_is_exact_substring() {
    let (_temp, corpus) = setup_corpus(&[
        ("a.md", "the quick brown fox"),
        ("b.md", "the quick brwn fox"),
    ]);
    let options = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(0);
    let results = fuzzy_search(&corpus, "brown", &options).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "a");
    assert_eq!(results[0].distance, 0);
}

#[test]
fn test_results_sorted_by_distance_then_walk_order() {
    let (_temp, corpus) = setup_corpus(&[
        ("1.md", "markdwn"),
        ("2.md", "markdown"),
        ("3.md", "mrkdwn"),
        ("4.md", "markdown again"),
    ]);
    let options = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(2);
    let results = fuzzy_search(&corpus, "markdown", &options).unwrap();
    let order: Vec<_> = results.iter().map(|r| (r.path.as_str(), r.distance)).collect();
    assert_eq!(order, vec![("2", 0), ("4", 0), ("1", 1), ("3", 2)]);

    let limited = fuzzy_search(&corpus, "markdown", &options.clone().with_limit(2)).unwrap();
    assert_eq!(limited.len(), 2);
}

#[test]
fn test_name_search() {
    let (_temp, corpus) = setup_corpus(&[
        ("projects/notepress.md", "body"),
        ("journal.md", "notepress mentioned here"),
    ]);
    let results = fuzzy_search(&corpus, "notepres", &SearchOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, "projects/notepress");
    assert_eq!(results[0].snippet, "notepress.md");
    assert_eq!(results[0].distance, 0);
}

#[test]
fn test_case_policy() {
    let (_temp, corpus) = setup_corpus(&[("a.md", "Rust is nice")]);
    let base = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(0);

    assert!(fuzzy_search(&corpus, "rust", &base).unwrap().is_empty());

    let results = fuzzy_search(&corpus, "rust", &base.clone().with_case_sensitive(false)).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].snippet.starts_with("Rust"));
}

#[test]
fn test_snippet_is_bounded() {
    let text = format!("{}needle{}", "a".repeat(100), "b".repeat(100));
    let (_temp, corpus) = setup_corpus(&[("long.md", &text)]);
    let options = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(0);
    let results = fuzzy_search(&corpus, "needle", &options).unwrap();
    assert_eq!(results[0].snippet, format!("{}needle{}", "a".repeat(30), "b".repeat(30)));
}

#[test]
fn test_invalid_search_parameters() {
    let (_temp, corpus) = setup_corpus(&[("a.md", "x")]);
    let err = fuzzy_search(&corpus, "   ", &SearchOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let options = SearchOptions::default().with_max_distance(99);
    let err = fuzzy_search(&corpus, "x", &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_short_query_needs_a_shared_character() {
    let (_temp, corpus) = setup_corpus(&[("a.md", "zzz")]);
    let options = SearchOptions::default()
        .with_mode(SearchMode::Content)
        .with_max_distance(2);
    assert!(fuzzy_search(&corpus, "ab", &options).unwrap().is_empty());
}
