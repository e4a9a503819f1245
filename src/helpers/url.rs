//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters left alone in a path segment (same set as `encodeURIComponent`)
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/posts/") // -> "/blog/posts/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Percent-encode a single path segment (category names may be Hangul)
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Path of a category listing page
pub fn category_path(category: &str) -> String {
    format!("/posts/{}/", encode_segment(category))
}

/// Path of a single post page
pub fn post_path(category: &str, slug: &str) -> String {
    format!(
        "/posts/{}/{}/",
        encode_segment(category),
        encode_segment(slug)
    )
}

/// Path of a single project page
pub fn project_path(slug: &str) -> String {
    format!("/projects/{}/", encode_segment(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let mut config = SiteConfig::default();
        assert_eq!(url_for(&config, "/posts/"), "/posts/");
        assert_eq!(url_for(&config, ""), "/");

        config.root = "/blog/".to_string();
        assert_eq!(url_for(&config, "/posts/dev/"), "/blog/posts/dev/");
    }

    #[test]
    fn test_full_url_for() {
        let config = SiteConfig::default();
        assert_eq!(
            full_url_for(&config, "/projects/folio/"),
            "http://example.com/projects/folio/"
        );
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("my-post"), "my-post");
        assert_eq!(encode_segment("a b"), "a%20b");
        assert_eq!(encode_segment("개발"), "%EA%B0%9C%EB%B0%9C");
    }

    #[test]
    fn test_content_paths() {
        assert_eq!(category_path("dev"), "/posts/dev/");
        assert_eq!(post_path("dev", "my post"), "/posts/dev/my%20post/");
        assert_eq!(project_path("folio"), "/projects/folio/");
    }
}
