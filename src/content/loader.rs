//! Content loader - reads posts and projects from the content directory
//!
//! Layout:
//!
//! ```text
//! <root>/posts/<category>/<slug>/index.md
//! <root>/projects/<slug>/index.md
//! ```
//!
//! Nothing is cached: every call goes back to the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use super::frontmatter::{FrontMatter, PostMeta, ProjectMeta};
use super::{ContentError, Post, PostRef, Project};

/// Filesystem-backed, read-only content repository
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    /// Create a store over a content root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.root.join("posts")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// Directory of a single post
    pub fn post_dir(&self, category: &str, slug: &str) -> PathBuf {
        self.posts_dir().join(category).join(slug)
    }

    /// Directory of a single project
    pub fn project_dir(&self, slug: &str) -> PathBuf {
        self.projects_dir().join(slug)
    }

    /// Category names, in directory-listing order
    ///
    /// Every sub-directory of `posts/` is a category except hidden ones
    /// (names starting with `.`, such as `.git`), which are skipped.
    pub fn list_categories(&self) -> Vec<String> {
        list_directories(&self.posts_dir())
    }

    /// Every post directory under every category
    pub fn list_post_refs(&self) -> Vec<PostRef> {
        let posts_dir = self.posts_dir();

        self.list_categories()
            .into_iter()
            .flat_map(|category| {
                list_directories(&posts_dir.join(&category))
                    .into_iter()
                    .map(move |slug| PostRef {
                        category: category.clone(),
                        slug,
                    })
            })
            .collect()
    }

    /// Every project directory
    pub fn list_project_refs(&self) -> Vec<String> {
        list_directories(&self.projects_dir())
    }

    /// Load a post, logging and swallowing any failure
    pub fn load_post(&self, category: &str, slug: &str) -> Option<Post> {
        match self.try_load_post(category, slug) {
            Ok(Some(post)) => Some(post),
            Ok(None) => {
                tracing::warn!("Post not found: {}/{}", category, slug);
                None
            }
            Err(e) => {
                tracing::error!("Failed to read post {}/{}: {}", category, slug, e);
                None
            }
        }
    }

    /// Load a post
    ///
    /// `Ok(None)` means the post does not exist: the directory is missing,
    /// holds no markdown file, or the path segments are not plain names.
    pub fn try_load_post(&self, category: &str, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_plain_segment(category) || !is_plain_segment(slug) {
            return Ok(None);
        }

        let Some(path) = find_markdown_file(&self.post_dir(category, slug)) else {
            return Ok(None);
        };

        let raw = read_file(&path)?;
        let front_matter = FrontMatter::split(&raw);
        let meta: PostMeta = front_matter
            .parse()
            .map_err(|source| ContentError::FrontMatter {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Loaded post {}/{} from {:?}", category, slug, path);
        Ok(Some(Post::new(
            category,
            slug,
            meta,
            front_matter.body.to_string(),
            path,
        )))
    }

    /// Load a project, logging and swallowing any failure
    pub fn load_project(&self, slug: &str) -> Option<Project> {
        match self.try_load_project(slug) {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                tracing::warn!("Project not found: {}", slug);
                None
            }
            Err(e) => {
                tracing::error!("Failed to read project {}: {}", slug, e);
                None
            }
        }
    }

    /// Load a project; `Ok(None)` means it does not exist
    pub fn try_load_project(&self, slug: &str) -> Result<Option<Project>, ContentError> {
        if !is_plain_segment(slug) {
            return Ok(None);
        }

        let Some(path) = find_markdown_file(&self.project_dir(slug)) else {
            return Ok(None);
        };

        let raw = read_file(&path)?;
        let front_matter = FrontMatter::split(&raw);
        let meta: ProjectMeta = front_matter
            .parse()
            .map_err(|source| ContentError::FrontMatter {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Loaded project {} from {:?}", slug, path);
        Ok(Some(Project::new(
            slug,
            meta,
            front_matter.body.to_string(),
            path,
        )))
    }
}

/// Find the markdown file of a content item directory
///
/// `index.md` wins; otherwise the first markdown file in directory-listing
/// order (not sorted). `None` when the directory is missing or has no
/// markdown file.
pub fn find_markdown_file(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    for index in ["index.md", "index.markdown"] {
        let index_path = dir.join(index);
        if index_path.is_file() {
            return Some(index_path);
        }
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read directory {:?}: {}", dir, e);
            return None;
        }
    };

    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|path| path.is_file() && is_markdown_file(path))
}

/// Names of the sub-directories of `dir`, in directory-listing order
///
/// A missing or unreadable directory has no sub-directories.
fn list_directories(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| match e.file_name().into_string() {
            Ok(name) => Some(name),
            Err(name) => {
                tracing::debug!("Skipping non UTF-8 directory name {:?}", name);
                None
            }
        })
        .filter(|name| !name.starts_with('.'))
        .collect()
}

fn read_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// A single directory name: no separators, not `.`/`..`
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn store() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_post_derives_category_and_slug() {
        let (dir, store) = store();
        write(
            dir.path(),
            "posts/dev/my-post/index.md",
            "---\ntitle: \"T\"\ndate: \"2024-01-01\"\n---\nHello\n",
        );

        let post = store.load_post("dev", "my-post").unwrap();
        assert_eq!(post.category, "dev");
        assert_eq!(post.slug, "my-post");
        assert_eq!(post.title, "T");
        assert_eq!(post.date, "2024-01-01");
        assert_eq!(post.assets_path, "/posts/dev/my-post/assets");
        assert_eq!(post.content, "Hello\n");
        assert!(post.source.ends_with("index.md"));
    }

    #[test]
    fn test_front_matter_cannot_override_path_fields() {
        let (dir, store) = store();
        write(
            dir.path(),
            "posts/dev/real-slug/index.md",
            "---\ntitle: T\ncategory: other\nslug: fake\n---\n",
        );

        let post = store.load_post("dev", "real-slug").unwrap();
        assert_eq!(post.category, "dev");
        assert_eq!(post.slug, "real-slug");
    }

    #[test]
    fn test_index_md_preferred() {
        let (dir, store) = store();
        write(dir.path(), "posts/dev/p/aaa.md", "---\ntitle: Other\n---\n");
        write(dir.path(), "posts/dev/p/index.md", "---\ntitle: Index\n---\n");
        write(dir.path(), "posts/dev/p/zzz.md", "---\ntitle: Last\n---\n");

        let post = store.load_post("dev", "p").unwrap();
        assert_eq!(post.title, "Index");
    }

    #[test]
    fn test_falls_back_to_other_markdown_file() {
        let (dir, store) = store();
        write(dir.path(), "projects/folio/notes.txt", "not markdown");
        write(dir.path(), "projects/folio/readme.md", "---\ntitle: Folio\n---\n");

        let project = store.load_project("folio").unwrap();
        assert_eq!(project.title, "Folio");
        assert!(project.source.ends_with("readme.md"));
    }

    #[test]
    fn test_directory_without_markdown_is_not_found() {
        let (dir, store) = store();
        write(dir.path(), "posts/dev/empty/assets/cover.png", "png");
        fs::create_dir_all(dir.path().join("posts/dev/empty/dir.md")).unwrap();

        assert!(store.load_post("dev", "empty").is_none());
        assert!(store.try_load_post("dev", "empty").unwrap().is_none());
        assert!(store.load_post("dev", "missing").is_none());
        assert!(store.load_project("missing").is_none());
    }

    #[test]
    fn test_malformed_front_matter_is_an_error() {
        let (dir, store) = store();
        write(
            dir.path(),
            "posts/dev/broken/index.md",
            "---\ntitle: [oops\n---\nBody",
        );

        assert!(matches!(
            store.try_load_post("dev", "broken"),
            Err(ContentError::FrontMatter { .. })
        ));
        assert!(store.load_post("dev", "broken").is_none());
    }

    #[test]
    fn test_path_traversal_is_not_found() {
        let (dir, store) = store();
        write(dir.path(), "secret/x/index.md", "---\ntitle: Secret\n---\n");

        assert!(store.load_post("..", "secret").is_none());
        assert!(store.load_post("dev", "../../secret/x").is_none());
        assert!(store.load_project("..").is_none());
    }

    #[test]
    fn test_list_refs() {
        let (dir, store) = store();
        write(dir.path(), "posts/dev/a/index.md", "");
        write(dir.path(), "posts/dev/b/index.md", "");
        write(dir.path(), "posts/life/c/index.md", "");
        write(dir.path(), "posts/README.md", "");
        fs::create_dir_all(dir.path().join("posts/.git")).unwrap();
        write(dir.path(), "posts/.drafts/d/index.md", "");
        write(dir.path(), "projects/folio/index.md", "");
        write(dir.path(), "projects/.hidden/index.md", "");

        let mut categories = store.list_categories();
        categories.sort();
        assert_eq!(categories, vec!["dev", "life"]);

        let mut refs: Vec<_> = store
            .list_post_refs()
            .into_iter()
            .map(|r| format!("{}/{}", r.category, r.slug))
            .collect();
        refs.sort();
        assert_eq!(refs, vec!["dev/a", "dev/b", "life/c"]);

        assert_eq!(store.list_project_refs(), vec!["folio"]);
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let store = ContentStore::new("/definitely/not/here");
        assert!(store.list_categories().is_empty());
        assert!(store.list_post_refs().is_empty());
        assert!(store.list_project_refs().is_empty());
    }
}
