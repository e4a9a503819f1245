//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Listing
    pub date_format: String,
    pub recent_posts: usize,
    pub recent_projects: usize,

    // Writing
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "_content".to_string(),
            public_dir: "public".to_string(),

            date_format: "YYYY-MM-DD".to_string(),
            recent_posts: 5,
            recent_projects: 3,

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Syntax highlighting configuration
///
/// The theme and language list are fixed for the lifetime of a process:
/// the highlighter is built once from them and never rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect bundled theme
    pub theme: String,
    /// Language identifiers (fence info words) that get highlighted
    pub languages: Vec<String>,
}

/// Languages highlighted when `highlight.languages` is not configured
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "jsx",
    "tsx",
    "css",
    "bash",
    "python",
    "java",
    "kotlin",
    "json",
    "yaml",
    "markdown",
    "html",
    "sql",
];

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}
