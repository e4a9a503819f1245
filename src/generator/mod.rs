//! Generator module - writes the whole site as static files

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::Post;
use crate::pages::Pages;
use crate::Folio;

/// What a generation run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub pages: usize,
    pub posts: usize,
    pub projects: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    pages: Pages,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            pages: Pages::new(folio)?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<GenerateStats> {
        let mut stats = GenerateStats::default();

        fs::create_dir_all(&self.folio.public_dir)?;

        self.write_page("index.html", &self.pages.home()?, &mut stats)?;
        self.write_page("404.html", &self.pages.not_found()?, &mut stats)?;

        self.generate_post_pages(&mut stats)?;
        self.generate_project_pages(&mut stats)?;
        self.generate_api()?;

        Ok(stats)
    }

    /// Post listings, one page per category and one per post
    fn generate_post_pages(&self, stats: &mut GenerateStats) -> Result<()> {
        if let Some(html) = self.pages.posts(None)? {
            self.write_page("posts/index.html", &html, stats)?;
        }

        for category in self.pages.index().get_categories() {
            if let Some(html) = self.pages.posts(Some(&category))? {
                self.write_page(&format!("posts/{}/index.html", category), &html, stats)?;
            }
        }

        // Posts are loaded once; each category's list doubles as the neighbour list
        let mut by_category: IndexMap<String, Vec<Post>> = IndexMap::new();
        for post in self.pages.index().get_all_posts() {
            by_category.entry(post.category.clone()).or_default().push(post);
        }

        let store = self.pages.index().store();
        for siblings in by_category.values() {
            for post in siblings {
                let html = self.pages.render_post(post, siblings)?;
                let dir = format!("posts/{}/{}", post.category, post.slug);
                self.write_page(&format!("{}/index.html", dir), &html, stats)?;
                stats.assets += self.copy_assets(
                    &store.post_dir(&post.category, &post.slug).join("assets"),
                    &dir,
                )?;
                stats.posts += 1;
            }
        }

        Ok(())
    }

    /// Project listing and one page per project
    fn generate_project_pages(&self, stats: &mut GenerateStats) -> Result<()> {
        self.write_page("projects/index.html", &self.pages.projects()?, stats)?;

        let store = self.pages.index().store();
        for project in self.pages.index().get_all_projects() {
            let Some(html) = self.pages.project(&project.slug)? else {
                continue;
            };
            let dir = format!("projects/{}", project.slug);
            self.write_page(&format!("{}/index.html", dir), &html, stats)?;
            stats.assets +=
                self.copy_assets(&store.project_dir(&project.slug).join("assets"), &dir)?;
            stats.projects += 1;
        }

        Ok(())
    }

    /// JSON listings under `api/`
    fn generate_api(&self) -> Result<()> {
        self.write_json("api/posts.json", &self.pages.post_list(None))?;
        self.write_json("api/projects.json", &self.pages.project_list())?;
        self.write_json("api/categories.json", &self.pages.category_list())?;
        tracing::debug!("Generated api/*.json");
        Ok(())
    }

    fn write_page(&self, relative: &str, html: &str, stats: &mut GenerateStats) -> Result<()> {
        self.write_file(relative, html)?;
        stats.pages += 1;
        Ok(())
    }

    fn write_json<T: Serialize>(&self, relative: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_file(relative, &json)
    }

    fn write_file(&self, relative: &str, contents: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy an item's `assets/` directory next to its generated page
    fn copy_assets(&self, assets_dir: &Path, page_dir: &str) -> Result<usize> {
        if !assets_dir.is_dir() {
            return Ok(0);
        }

        let dest_root = self.folio.public_dir.join(page_dir).join("assets");
        let mut copied = 0;

        for entry in WalkDir::new(assets_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(assets_dir)?;
            let dest = dest_root.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            copied += 1;
        }

        Ok(copied)
    }
}
