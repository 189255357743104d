//! Notepress CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use notepress::prelude::*;
use notepress_core::to_json_string;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Notepress - render, index and search a directory of markdown notes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Corpus root directory
    #[arg(short, long, env = "NOTEPRESS_ROOT")]
    root: Option<PathBuf>,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL that wiki-links and images resolve against
    #[arg(long)]
    base_url: Option<String>,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every note identifier
    Ls,
    /// Nested folder tree of notes
    Tree,
    /// Print a note's file text unmodified
    Raw { id: String },
    /// Normalized frontmatter of a note
    Meta { id: String },
    /// Render a note to HTML
    Render {
        id: String,
        /// Print only the HTML body instead of the full JSON document
        #[arg(long, action = clap::ArgAction::SetTrue)]
        html: bool,
    },
    /// Heading tree of a note
    Toc { id: String },
    /// Notes linking to a note
    Backlinks { id: String },
    /// Fuzzy search over note names or contents
    Search {
        query: String,
        /// Edit operations tolerated (defaults to the configured value)
        #[arg(short = 'd', long)]
        max_distance: Option<usize>,
        /// Match file contents instead of file names
        #[arg(long, action = clap::ArgAction::SetTrue)]
        content: bool,
        /// Keep at most this many results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Fold case before matching
        #[arg(short = 'i', long, action = clap::ArgAction::SetTrue)]
        ignore_case: bool,
    },
    /// Tag index, or the notes carrying one tag
    Tags { tag: Option<String> },
    /// Print the effective configuration
    Config,
}

/// Defaults, then the config file, then `NOTEPRESS_*` variables, then flags.
fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&EngineConfig::default()).context("Failed to seed default configuration")?,
    );

    builder = match &args.config {
        Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
        None => builder.add_source(File::with_name("notepress").required(false)),
    };

    let mut config: EngineConfig = builder
        .add_source(
            Environment::with_prefix("NOTEPRESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    if let Some(root) = &args.root {
        config.corpus.root = root.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.render.links.base_url = base_url.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

/// Human-readable logs go to stderr so stdout carries only results.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: serde::Serialize + ?Sized>(data: &T, context: &str) -> anyhow::Result<()> {
    println!("{}", to_json_string(data, context)?);
    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    init_logging(&config.log_level);

    log::debug!("Notepress v{}", env!("CARGO_PKG_VERSION"));

    let engine = NoteEngine::new(config)?;

    match args.command {
        Command::Ls => print_json(&engine.list_notes()?, "note list"),
        Command::Tree => print_json(&engine.file_tree()?, "file tree"),
        Command::Raw { id } => {
            print!("{}", engine.raw(&id)?);
            Ok(())
        }
        Command::Meta { id } => print_json(&engine.metadata(&id)?, "metadata"),
        Command::Render { id, html } => {
            let note = engine.note(&id)?;
            if html {
                print!("{}", note.html);
                Ok(())
            } else {
                print_json(&note, "rendered note")
            }
        }
        Command::Toc { id } => print_json(&engine.toc(&id)?, "table of contents"),
        Command::Backlinks { id } => print_json(&engine.backlinks(&id)?, "backlinks"),
        Command::Search {
            query,
            max_distance,
            content,
            limit,
            ignore_case,
        } => {
            let mode = if content {
                SearchMode::Content
            } else {
                SearchMode::Name
            };
            let mut options = engine.search_options().with_mode(mode);
            if let Some(distance) = max_distance {
                options = options.with_max_distance(distance);
            }
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            if ignore_case {
                options = options.with_case_sensitive(false);
            }
            print_json(&engine.search_with(&query, &options)?, "search results")
        }
        Command::Tags { tag: Some(tag) } => {
            print_json(&engine.notes_with_tag(&tag)?, "tagged notes")
        }
        Command::Tags { tag: None } => print_json(&engine.tags()?, "tag index"),
        Command::Config => print_json(engine.config(), "configuration"),
    }
}

/// Exit status for a failed run: 3 not found, 2 bad input, 1 anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>().map(Error::kind) {
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::InvalidArgument | ErrorKind::MalformedFrontmatter) => 2,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args() {
        let args = Args::try_parse_from([
            "notepress", "--root", "/tmp/notes", "search", "helo", "-d", "1", "--content", "-i",
        ])
        .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/tmp/notes")));
        match args.command {
            Command::Search {
                query,
                max_distance,
                content,
                limit,
                ignore_case,
            } => {
                assert_eq!(query, "helo");
                assert_eq!(max_distance, Some(1));
                assert!(content);
                assert!(ignore_case);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_rejected() {
        assert!(Args::try_parse_from(["notepress", "render"]).is_err());
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        assert_eq!(exit_code(&Error::not_found("home").into()), 3);
        assert_eq!(exit_code(&Error::invalid_argument("empty").into()), 2);
        assert_eq!(exit_code(&Error::malformed_frontmatter("bad").into()), 2);
        assert_eq!(exit_code(&Error::other("boom").into()), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("plain")), 1);
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "notepress",
            "--root",
            "/srv/notes",
            "--base-url",
            "/wiki",
            "--log-level",
            "debug",
            "ls",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.corpus.root, PathBuf::from("/srv/notes"));
        assert_eq!(config.render.links.base_url, "/wiki");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.search.snippet_radius, 30);
    }
}
