//! Configuration types for the note content engine.
//!
//! Follows a builder pattern for the top-level configuration with validation.
//! Every struct deserializes with defaults so partial YAML files and
//! environment overrides compose cleanly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where the corpus lives and which files belong to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Corpus root directory (`~` is expanded)
    pub root: PathBuf,
    /// Note file extension, without the dot
    pub extension: String,
    /// File or directory names skipped during the walk
    pub excluded_paths: HashSet<String>,
    /// Files larger than this are skipped
    pub max_file_size: u64,
    /// Follow symlinks while walking
    pub follow_links: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("notes"),
            extension: "md".to_string(),
            excluded_paths: [".obsidian", ".git", ".DS_Store", "node_modules"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            follow_links: false,
        }
    }
}

impl CorpusConfig {
    /// Corpus root with a leading `~` expanded to the home directory.
    pub fn resolved_root(&self) -> PathBuf {
        let raw = self.root.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    /// Validate the corpus configuration
    pub fn validate(&self) -> Result<()> {
        let root = self.resolved_root();

        if !root.exists() {
            return Err(Error::config_error(format!(
                "Corpus root does not exist: {}",
                root.display()
            )));
        }

        if !root.is_dir() {
            return Err(Error::config_error(format!(
                "Corpus root is not a directory: {}",
                root.display()
            )));
        }

        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::config_error(
                "Note extension must be non-empty and given without a dot",
            ));
        }

        Ok(())
    }
}

/// How auto-derived link labels are cased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelCase {
    #[default]
    Titlecase,
    Capitalize,
    None,
}

/// How resolved link paths are cased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UrlCase {
    #[default]
    None,
    Lowercase,
    Uppercase,
}

/// Wiki-link and markdown-link resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Prefix for relative targets
    pub base_url: String,
    /// Suffix appended to non-image relative targets
    pub end_url: String,
    /// Replacement for whitespace runs in relative targets
    pub url_whitespace: String,
    pub label_case: LabelCase,
    pub url_case: UrlCase,
    /// CSS class on rendered `<a>` links (empty for none)
    pub html_class: String,
    /// CSS class on rendered `<img>` links (empty for none)
    pub image_class: String,
    /// Source prefix for `![[image]]` embeds
    pub image_prefix: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            end_url: String::new(),
            url_whitespace: "-".to_string(),
            label_case: LabelCase::Titlecase,
            url_case: UrlCase::None,
            html_class: "wikilink".to_string(),
            image_class: "wikilink-image".to_string(),
            image_prefix: "/images/".to_string(),
        }
    }
}

impl LinkConfig {
    /// Default link settings with a different base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Script appended once to documents containing mermaid diagrams
pub const DEFAULT_MERMAID_SCRIPT: &str = concat!(
    "<script type=\"module\">",
    "import mermaid from 'https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs';",
    "mermaid.initialize({ startOnLoad: true });",
    "</script>"
);

/// Markdown renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub links: LinkConfig,
    /// Syntax-highlight fenced code blocks with a known language
    pub highlight_code: bool,
    /// Emit `id` attributes on headings
    pub heading_ids: bool,
    pub mermaid_script: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            links: LinkConfig::default(),
            highlight_code: true,
            heading_ids: true,
            mermaid_script: DEFAULT_MERMAID_SCRIPT.to_string(),
        }
    }
}

/// Fuzzy search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Edit budget used when the caller does not supply one
    pub default_max_distance: usize,
    /// Largest edit budget a caller may request
    pub max_distance_limit: usize,
    /// Characters of context kept on each side of a content match
    pub snippet_radius: usize,
    pub case_sensitive: bool,
    pub default_limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_distance: 2,
            max_distance_limit: 8,
            snippet_radius: 30,
            case_sensitive: true,
            default_limit: None,
        }
    }
}

/// Global engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub corpus: CorpusConfig,
    pub render: RenderConfig,
    pub search: SearchConfig,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            render: RenderConfig::default(),
            search: SearchConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with builder
    pub fn builder(root: impl Into<PathBuf>) -> EngineConfigBuilder {
        EngineConfigBuilder::new(root)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.corpus.validate()?;

        if self.search.default_max_distance > self.search.max_distance_limit {
            return Err(Error::config_error(format!(
                "default_max_distance ({}) exceeds max_distance_limit ({})",
                self.search.default_max_distance, self.search.max_distance_limit
            )));
        }

        Ok(())
    }

    /// Save configuration to a YAML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| Error::config_error(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, yaml).map_err(|e| {
            Error::config_error(format!(
                "Failed to save config to {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!(
                "Failed to load config from {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))
    }
}

/// Builder for EngineConfig
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut config = EngineConfig::default();
        config.corpus.root = root.into();
        Self { config }
    }

    /// Set the base URL relative links resolve against
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.render.links.base_url = base_url.into();
        self
    }

    /// Set how auto-derived labels are cased
    pub fn label_case(mut self, label_case: LabelCase) -> Self {
        self.config.render.links.label_case = label_case;
        self
    }

    /// Enable or disable code highlighting
    pub fn highlight_code(mut self, enabled: bool) -> Self {
        self.config.render.highlight_code = enabled;
        self
    }

    /// Skip an additional file or directory name during walks
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.config.corpus.excluded_paths.insert(name.into());
        self
    }

    /// Set the default fuzzy edit budget
    pub fn default_max_distance(mut self, distance: usize) -> Self {
        self.config.search.default_max_distance = distance;
        self
    }

    /// Match search queries case-sensitively or not
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.search.case_sensitive = case_sensitive;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
