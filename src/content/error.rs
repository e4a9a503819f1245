//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Why an existing content file could not be turned into an item
#[derive(Debug, Error)]
pub enum ContentError {
    /// The markdown file exists but could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The front-matter block is not valid YAML for the item's schema
    #[error("invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
