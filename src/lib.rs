//! folio-rs: a content pipeline for a personal blog and portfolio
//!
//! Markdown posts and projects are read from a content directory, rendered
//! to syntax-highlighted HTML with heading anchors, and served either as a
//! generated static site or by a request-time HTTP server.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod highlight;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentIndex, ContentStore, MarkdownRenderer};
use highlight::HighlighterCache;

/// The main application handle
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory (posts and projects)
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Highlighter shared by every renderer created from this handle
    pub highlighter: Arc<HighlighterCache>,
}

impl Folio {
    /// Create a new instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let highlighter = Arc::new(HighlighterCache::new(config.highlight.clone()));

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            highlighter,
        }
    }

    /// Content store over the content directory
    pub fn store(&self) -> ContentStore {
        ContentStore::new(&self.content_dir)
    }

    /// Sorted views over the content store
    pub fn index(&self) -> ContentIndex {
        ContentIndex::new(self.store())
    }

    /// Markdown renderer backed by the shared highlighter
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::new(Arc::clone(&self.highlighter))
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
