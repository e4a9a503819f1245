//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary, so a site directory only needs
//! `_config.yml` and its content.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Author, Post, Project};
use crate::helpers::{category_path, format_date, post_path, project_path, url_for, ProjectPeriod};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered markdown and URLs go in as-is; templates escape text fields
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("posts.html", include_str!("site/posts.html")),
            ("post.html", include_str!("site/post.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("project.html", include_str!("site/project.html")),
            ("404.html", include_str!("site/404.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
            (
                "partials/project_card.html",
                include_str!("site/partials/project_card.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format a front-matter date string (moment-style format)
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    Ok(tera::Value::String(format_date(&s, &format)))
}

/// Data structures for template context and the JSON listings

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub date_format: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            date_format: config.date_format.clone(),
        }
    }
}

/// A post without its body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub category: String,
    pub slug: String,
    pub path: String,
    pub category_path: String,
    pub assets_path: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub og_image: Option<String>,
}

impl PostData {
    pub fn from_post(post: &Post, config: &SiteConfig) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date.clone(),
            category: post.category.clone(),
            slug: post.slug.clone(),
            path: url_for(config, &post_path(&post.category, &post.slug)),
            category_path: url_for(config, &category_path(&post.category)),
            assets_path: url_for(config, &post.assets_path),
            excerpt: post.excerpt.clone(),
            cover_image: post.cover_image.clone(),
            author: post.author.clone(),
            og_image: post.og_image.as_ref().map(|og| og.url.clone()),
        }
    }
}

/// A project without its body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub title: String,
    pub date: String,
    pub period: ProjectPeriod,
    pub slug: String,
    pub path: String,
    pub assets_path: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub tech: Vec<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
}

impl ProjectData {
    pub fn from_project(project: &Project, config: &SiteConfig) -> Self {
        Self {
            title: project.title.clone(),
            date: project.date.clone(),
            period: project.period(),
            slug: project.slug.clone(),
            path: url_for(config, &project_path(&project.slug)),
            assets_path: url_for(config, &project.assets_path),
            description: project.description.clone(),
            cover_image: project.cover_image.clone(),
            tech: project.tech.clone(),
            github: project.github.clone(),
            demo: project.demo.clone(),
        }
    }
}

/// A category with the number of posts in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub path: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{OgImage, PostMeta};
    use std::path::PathBuf;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_post_data_paths() {
        let mut config = SiteConfig::default();
        config.root = "/blog/".to_string();
        let meta = PostMeta {
            og_image: Some(OgImage {
                url: "/og.png".to_string(),
            }),
            ..Default::default()
        };
        let post = Post::new("개발", "hello", meta, String::new(), PathBuf::new());

        let data = PostData::from_post(&post, &config);
        assert_eq!(data.path, "/blog/posts/%EA%B0%9C%EB%B0%9C/hello/");
        assert_eq!(data.category_path, "/blog/posts/%EA%B0%9C%EB%B0%9C/");
        assert_eq!(data.assets_path, "/blog/posts/개발/hello/assets");
        assert_eq!(data.og_image.as_deref(), Some("/og.png"));

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["categoryPath"], "/blog/posts/%EA%B0%9C%EB%B0%9C/");
    }

    #[test]
    fn test_filters() {
        let mut tera = Tera::default();
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);
        tera.add_raw_template(
            "t",
            "{{ html | strip_html }}|{{ text | truncate_chars(length=5) }}|{{ date | date_format(format=\"YYYY.MM.DD\") }}",
        )
        .unwrap();

        let mut context = Context::new();
        context.insert("html", "<p>Hi <b>there</b></p>");
        context.insert("text", "abcdefghij");
        context.insert("date", "2024-01-15");
        let out = tera.render("t", &context).unwrap();
        assert_eq!(out, "Hi there|abcde...|2024.01.15");
    }
}
