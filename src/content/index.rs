//! Sorted, category-partitioned views over the content store
//!
//! The index keeps no state of its own: every query walks the store again,
//! so edits on disk show up on the next call.

use indexmap::IndexMap;

use super::loader::ContentStore;
use super::{sort_newest_first, Post, Project};

/// Read-only queries over a [`ContentStore`]
#[derive(Debug, Clone)]
pub struct ContentIndex {
    store: ContentStore,
}

impl ContentIndex {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Every loadable post, newest first
    ///
    /// Posts that are missing or fail to parse are skipped; the failure is
    /// logged by the store.
    pub fn get_all_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .store
            .list_post_refs()
            .iter()
            .filter_map(|r| self.store.load_post(&r.category, &r.slug))
            .collect();

        sort_newest_first(&mut posts);
        tracing::debug!("Indexed {} posts", posts.len());
        posts
    }

    /// Posts of one category (exact name match), newest first
    pub fn get_posts_by_category(&self, category: &str) -> Vec<Post> {
        self.get_all_posts()
            .into_iter()
            .filter(|post| post.category == category)
            .collect()
    }

    /// Every loadable project, newest first
    pub fn get_all_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .store
            .list_project_refs()
            .iter()
            .filter_map(|slug| self.store.load_project(slug))
            .collect();

        sort_newest_first(&mut projects);
        tracing::debug!("Indexed {} projects", projects.len());
        projects
    }

    /// Category directory names, in directory-listing order
    pub fn get_categories(&self) -> Vec<String> {
        self.store.list_categories()
    }

    /// The `limit` newest posts
    pub fn recent_posts(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.get_all_posts();
        posts.truncate(limit);
        posts
    }

    /// The `limit` newest projects
    pub fn recent_projects(&self, limit: usize) -> Vec<Project> {
        let mut projects = self.get_all_projects();
        projects.truncate(limit);
        projects
    }

    /// Number of loadable posts per category
    ///
    /// Categories appear in [`get_categories`](Self::get_categories) order,
    /// including empty ones.
    pub fn category_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = self
            .get_categories()
            .into_iter()
            .map(|category| (category, 0))
            .collect();

        for post in self.get_all_posts() {
            *counts.entry(post.category).or_insert(0) += 1;
        }

        counts
    }

    /// A single post, `None` when it does not exist or cannot be parsed
    pub fn get_post(&self, category: &str, slug: &str) -> Option<Post> {
        self.store.load_post(category, slug)
    }

    /// A single project, `None` when it does not exist or cannot be parsed
    pub fn get_project(&self, slug: &str) -> Option<Project> {
        self.store.load_project(slug)
    }
}
