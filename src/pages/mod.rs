//! Page builders shared by the static generator and the HTTP server
//!
//! Each builder reads the content store at call time, so the server always
//! renders what is on disk. `Ok(None)` means the requested item does not
//! exist and the caller should answer with the 404 page.

use anyhow::Result;
use tera::Context;

use crate::content::{ContentIndex, MarkdownRenderer, Post};
use crate::helpers::{category_path, post_path, project_path, toc, url_for};
use crate::templates::{CategoryData, NavPost, PostData, ProjectData, SiteData, TemplateRenderer};
use crate::Folio;

/// Renders every page and listing of the site
pub struct Pages {
    folio: Folio,
    index: ContentIndex,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
}

impl Pages {
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            index: folio.index(),
            markdown: folio.renderer(),
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn folio(&self) -> &Folio {
        &self.folio
    }

    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    /// Posts without bodies, newest first, optionally of one category
    pub fn post_list(&self, category: Option<&str>) -> Vec<PostData> {
        let posts = match category {
            Some(category) => self.index.get_posts_by_category(category),
            None => self.index.get_all_posts(),
        };
        posts
            .iter()
            .map(|p| PostData::from_post(p, &self.folio.config))
            .collect()
    }

    /// Projects without bodies, newest first
    pub fn project_list(&self) -> Vec<ProjectData> {
        self.index
            .get_all_projects()
            .iter()
            .map(|p| ProjectData::from_project(p, &self.folio.config))
            .collect()
    }

    /// Categories with their post counts
    pub fn category_list(&self) -> Vec<CategoryData> {
        self.index
            .category_counts()
            .into_iter()
            .map(|(name, count)| CategoryData {
                path: url_for(&self.folio.config, &category_path(&name)),
                name,
                count,
            })
            .collect()
    }

    /// Create a base context with common variables
    fn base_context(&self, current_path: &str, page_title: Option<&str>) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from_config(&self.folio.config));
        context.insert("current_path", current_path);
        context.insert("page_title", &page_title);
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context
    }

    /// Home page: the most recent posts and projects
    pub fn home(&self) -> Result<String> {
        let config = &self.folio.config;
        let recent_posts: Vec<PostData> = self
            .index
            .recent_posts(config.recent_posts)
            .iter()
            .map(|p| PostData::from_post(p, config))
            .collect();
        let recent_projects: Vec<ProjectData> = self
            .index
            .recent_projects(config.recent_projects)
            .iter()
            .map(|p| ProjectData::from_project(p, config))
            .collect();

        let mut context = self.base_context("/", None);
        context.insert("recent_posts", &recent_posts);
        context.insert("recent_projects", &recent_projects);

        self.templates.render("home.html", &context)
    }

    /// Post listing, all posts or one category
    ///
    /// `None` when the category does not exist.
    pub fn posts(&self, category: Option<&str>) -> Result<Option<String>> {
        let categories = self.category_list();
        if let Some(category) = category {
            if !categories.iter().any(|c| c.name == category) {
                return Ok(None);
            }
        }

        let total_posts: usize = categories.iter().map(|c| c.count).sum();
        let posts = self.post_list(category);
        let current_path = match category {
            Some(category) => category_path(category),
            None => "/posts/".to_string(),
        };

        let mut context = self.base_context(&current_path, Some(category.unwrap_or("Posts")));
        context.insert("posts", &posts);
        context.insert("categories", &categories);
        context.insert("active_category", &category);
        context.insert("total_posts", &total_posts);

        self.templates.render("posts.html", &context).map(Some)
    }

    /// A single post with its table of contents
    pub fn post(&self, category: &str, slug: &str) -> Result<Option<String>> {
        let Some(post) = self.index.get_post(category, slug) else {
            return Ok(None);
        };
        let siblings = self.index.get_posts_by_category(category);
        self.render_post(&post, &siblings).map(Some)
    }

    /// Render an already loaded post
    ///
    /// `siblings` are the posts of its category, newest first, used for the
    /// previous and next links.
    pub fn render_post(&self, post: &Post, siblings: &[Post]) -> Result<String> {
        let document = self.markdown.render_document(&post.content);
        let (prev_post, next_post) = self.neighbours(post, siblings);

        let mut context =
            self.base_context(&post_path(&post.category, &post.slug), Some(&post.title));
        context.insert("post", &PostData::from_post(post, &self.folio.config));
        context.insert("content", &document.html);
        context.insert("toc", &toc(&document.headings));
        context.insert("headings", &document.headings);
        context.insert("prev_post", &prev_post);
        context.insert("next_post", &next_post);

        tracing::debug!("Rendered post {}/{}", post.category, post.slug);
        self.templates.render("post.html", &context)
    }

    /// Older and newer post among `siblings`
    fn neighbours(&self, post: &Post, siblings: &[Post]) -> (Option<NavPost>, Option<NavPost>) {
        let Some(i) = siblings.iter().position(|p| p.slug == post.slug) else {
            return (None, None);
        };

        let nav = |p: &Post| NavPost {
            title: p.title.clone(),
            path: url_for(&self.folio.config, &post_path(&p.category, &p.slug)),
        };

        let prev = siblings.get(i + 1).map(nav);
        let next = i.checked_sub(1).and_then(|j| siblings.get(j)).map(nav);
        (prev, next)
    }

    /// Project listing
    pub fn projects(&self) -> Result<String> {
        let mut context = self.base_context("/projects/", Some("Projects"));
        context.insert("projects", &self.project_list());
        self.templates.render("projects.html", &context)
    }

    /// A single project with its table of contents
    pub fn project(&self, slug: &str) -> Result<Option<String>> {
        let Some(project) = self.index.get_project(slug) else {
            return Ok(None);
        };

        let document = self.markdown.render_document(&project.content);

        let mut context = self.base_context(&project_path(slug), Some(&project.title));
        context.insert(
            "project",
            &ProjectData::from_project(&project, &self.folio.config),
        );
        context.insert("content", &document.html);
        context.insert("toc", &toc(&document.headings));
        context.insert("headings", &document.headings);

        tracing::debug!("Rendered project {}", slug);
        self.templates.render("project.html", &context).map(Some)
    }

    /// The not-found page
    pub fn not_found(&self) -> Result<String> {
        let context = self.base_context("/404", Some("Not Found"));
        self.templates.render("404.html", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, Pages) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("_content");
        write(
            &content,
            "posts/dev/first/index.md",
            "---\ntitle: First Post\ndate: \"2024-01-01\"\nexcerpt: The first one\n---\n# Intro\n\n## Setup & Run\n\n```bash\ncargo run\n```\n",
        );
        write(
            &content,
            "posts/dev/second/index.md",
            "---\ntitle: Second Post\ndate: \"2024-02-01\"\n---\nBody\n",
        );
        write(
            &content,
            "posts/life/walk/index.md",
            "---\ntitle: A Walk\ndate: \"2023-05-05\"\n---\nOutside\n",
        );
        write(
            &content,
            "projects/folio/index.md",
            "---\ntitle: Folio\ndate: \"2025-10 ~ \"\ntech: [Rust, Tokio]\n---\n## Goals\n",
        );

        let folio = Folio::new(dir.path()).unwrap();
        let pages = Pages::new(&folio).unwrap();
        (dir, pages)
    }

    #[test]
    fn test_home_lists_recent_content() {
        let (_dir, pages) = site();
        let html = pages.home().unwrap();
        assert!(html.contains("Second Post"));
        assert!(html.contains("A Walk"));
        assert!(html.contains("2025-10 ~"));
        assert!(html.find("Second Post") < html.find("First Post"));
    }

    #[test]
    fn test_post_page() {
        let (_dir, pages) = site();
        let html = pages.post("dev", "first").unwrap().unwrap();
        assert!(html.contains("<title>First Post | Folio</title>"));
        assert!(html.contains(r#"<h2 id="setup-run">"#));
        assert!(html.contains(r##"href="#setup-run""##));
        assert!(html.contains(r#"<span class="code-lang">bash</span>"#));
        // Newer post in the same category
        assert!(html.contains(r#"<a class="next" href="/posts/dev/second/">"#));
    }

    #[test]
    fn test_render_post_uses_loaded_siblings() {
        let (dir, pages) = site();
        let siblings = pages.index().get_posts_by_category("dev");
        let first = siblings.iter().find(|p| p.slug == "first").unwrap();

        // Rendering from the loaded list does not go back to disk
        fs::remove_dir_all(dir.path().join("_content/posts/dev/second")).unwrap();
        let html = pages.render_post(first, &siblings).unwrap();
        assert!(html.contains(r#"<a class="next" href="/posts/dev/second/">"#));
        assert!(html.contains(r#"<h2 id="setup-run">"#));

        let html = pages.render_post(first, &siblings[1..]).unwrap();
        assert!(!html.contains(r#"class="next""#));
    }

    #[test]
    fn test_missing_items() {
        let (_dir, pages) = site();
        assert!(pages.post("dev", "nope").unwrap().is_none());
        assert!(pages.project("nope").unwrap().is_none());
        assert!(pages.posts(Some("nope")).unwrap().is_none());
        assert!(pages.not_found().unwrap().contains("404"));
    }

    #[test]
    fn test_category_listing() {
        let (_dir, pages) = site();
        let html = pages.posts(Some("dev")).unwrap().unwrap();
        assert!(html.contains("First Post"));
        assert!(!html.contains("A Walk"));
        assert!(html.contains("All (3)"));

        let all = pages.posts(None).unwrap().unwrap();
        assert!(all.contains("A Walk"));
    }

    #[test]
    fn test_project_page() {
        let (_dir, pages) = site();
        let html = pages.project("folio").unwrap().unwrap();
        assert!(html.contains(r#"<h2 id="goals">Goals</h2>"#));
        assert!(html.contains("<li>Tokio</li>"));
        assert!(html.contains("project-period ongoing"));
    }

    #[test]
    fn test_lists() {
        let (_dir, pages) = site();
        let posts = pages.post_list(Some("dev"));
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);

        let mut categories = pages.category_list();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(categories[0].name, "dev");
        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[0].path, "/posts/dev/");

        assert_eq!(pages.project_list()[0].period.text, "2025-10 ~");
    }
}
