//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::SiteConfig;
pub use site::DEFAULT_LANGUAGES;
