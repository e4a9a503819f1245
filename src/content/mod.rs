//! Content module - loads, indexes and renders posts and projects

mod error;
mod frontmatter;
mod headings;
pub mod index;
mod item;
pub mod loader;
mod markdown;

pub use error::ContentError;
pub use frontmatter::{Author, FrontMatter, OgImage, PostMeta, ProjectMeta};
pub use headings::{extract_headings, heading_id, Heading};
pub use index::ContentIndex;
pub use item::{sort_newest_first, Dated, Post, PostRef, Project};
pub use loader::{find_markdown_file, ContentStore};
pub use markdown::{MarkdownRenderer, RenderedDocument};
