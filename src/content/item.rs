//! Post and Project models

use serde::Serialize;
use std::path::PathBuf;

use super::frontmatter::{Author, OgImage, PostMeta, ProjectMeta};
use crate::helpers::{parse_period_start, ProjectPeriod};

/// Location of a post in the content store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostRef {
    pub category: String,
    pub slug: String,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Directory name of the post
    pub slug: String,

    /// Directory name of the post's category
    pub category: String,

    /// Post title
    pub title: String,

    /// Publication date, as written in front-matter
    pub date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<OgImage>,

    /// Raw markdown body
    pub content: String,

    /// Public path of the post's asset directory
    pub assets_path: String,

    /// Markdown file the post was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Build a post from its location, front-matter and body
    pub fn new(
        category: &str,
        slug: &str,
        meta: PostMeta,
        content: String,
        source: PathBuf,
    ) -> Self {
        Self {
            slug: slug.to_string(),
            category: category.to_string(),
            title: meta.title.unwrap_or_else(|| slug.to_string()),
            date: meta.date.unwrap_or_default(),
            cover_image: meta.cover_image,
            excerpt: meta.excerpt,
            author: meta.author,
            og_image: meta.og_image,
            content,
            assets_path: format!("/posts/{}/{}/assets", category, slug),
            source,
        }
    }

    /// Location of this post in the content store
    pub fn post_ref(&self) -> PostRef {
        PostRef {
            category: self.category.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Directory name of the project
    pub slug: String,

    /// Project title
    pub title: String,

    /// Project period, e.g. `2025-10 ~ 2025-11` or `2025-10 ~ ` when ongoing
    pub date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Raw markdown body
    pub content: String,

    /// Public path of the project's asset directory
    pub assets_path: String,

    /// Technologies used
    pub tech: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,

    /// Markdown file the project was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl Project {
    /// Build a project from its location, front-matter and body
    pub fn new(slug: &str, meta: ProjectMeta, content: String, source: PathBuf) -> Self {
        Self {
            slug: slug.to_string(),
            title: meta.title.unwrap_or_else(|| slug.to_string()),
            date: meta.date.unwrap_or_default(),
            cover_image: meta.cover_image,
            description: meta.description,
            content,
            assets_path: format!("/projects/{}/assets", slug),
            tech: meta.tech,
            github: meta.github,
            demo: meta.demo,
            source,
        }
    }

    /// Display form of the project date
    pub fn period(&self) -> ProjectPeriod {
        ProjectPeriod::parse(&self.date)
    }
}

/// Anything that can be ordered by its front-matter date
pub trait Dated {
    fn date(&self) -> &str;
}

impl Dated for Post {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for Project {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Sort items newest first
///
/// Periods sort by their start. Items whose date cannot be parsed go after
/// all dated items; the sort is stable so their relative order is kept.
pub fn sort_newest_first<T: Dated>(items: &mut [T]) {
    items.sort_by_cached_key(|item| std::cmp::Reverse(parse_period_start(item.date())));
}
