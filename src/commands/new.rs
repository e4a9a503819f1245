//! Create a new post or project

use anyhow::Result;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create `posts/<category>/<slug>/index.md` and return its path
pub fn create_post(folio: &Folio, title: &str, category: &str) -> Result<PathBuf> {
    if category.is_empty() || category.contains(['/', '\\']) || category.starts_with('.') {
        anyhow::bail!("Invalid category name: {:?}", category);
    }

    let now = chrono::Local::now();
    let mut front_matter = IndexMap::new();
    front_matter.insert("title", Value::from(title));
    front_matter.insert("date", Value::from(now.format("%Y-%m-%d").to_string()));
    front_matter.insert("excerpt", Value::from(""));

    let dir = folio.store().post_dir(category, &slugify(title));
    write_item(dir, &front_matter)
}

/// Create `projects/<slug>/index.md` and return its path
pub fn create_project(folio: &Folio, title: &str) -> Result<PathBuf> {
    let now = chrono::Local::now();
    let mut front_matter = IndexMap::new();
    front_matter.insert("title", Value::from(title));
    front_matter.insert("date", Value::from(format!("{} ~ ", now.format("%Y-%m"))));
    front_matter.insert("description", Value::from(""));
    front_matter.insert("tech", Value::Sequence(Vec::new()));

    let dir = folio.store().project_dir(&slugify(title));
    write_item(dir, &front_matter)
}

fn write_item(dir: PathBuf, front_matter: &IndexMap<&str, Value>) -> Result<PathBuf> {
    let file_path = dir.join("index.md");
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(dir.join("assets"))?;
    let content = format!("---\n{}---\n", serde_yaml::to_string(front_matter)?);
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);
    Ok(file_path)
}

fn slugify(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
