//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Folio
subtitle: ''
description: ''
author: John Doe

# URL
url: http://example.com
root: /

# Directory
content_dir: _content
public_dir: public

# Listing
date_format: YYYY-MM-DD
recent_posts: 5
recent_projects: 3

# Code highlighting
highlight:
  theme: base16-ocean.dark
  languages:
    - javascript
    - typescript
    - jsx
    - tsx
    - css
    - bash
    - python
    - java
    - kotlin
    - json
    - yaml
    - markdown
    - html
    - sql
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let content = target_dir.join("_content");
    fs::create_dir_all(content.join("posts/general/hello-world/assets"))?;
    fs::create_dir_all(content.join("projects/folio/assets"))?;

    fs::write(&config_path, CONFIG)?;

    let today = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: "Hello World"
date: "{}"
excerpt: "The first post of this site."
author:
  name: John Doe
---

Welcome! This post lives in `_content/posts/general/hello-world/index.md`.
Images and other files go in the `assets/` directory next to it.

## Writing

Posts are markdown with a YAML front-matter block. Level 1 to 3 headings
show up in the table of contents.

## Code

```bash
folio-rs new post "My New Post" --category general
folio-rs server
```
"#,
        today.format("%Y-%m-%d")
    );
    fs::write(
        content.join("posts/general/hello-world/index.md"),
        sample_post,
    )?;

    let sample_project = format!(
        r#"---
title: "Folio"
date: "{} ~ "
description: "This site."
tech:
  - Rust
github: https://github.com/example/folio
---

## Overview

A blog and portfolio built from markdown files.
"#,
        today.format("%Y-%m")
    );
    fs::write(content.join("projects/folio/index.md"), sample_project)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_loadable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.config.title, "Folio");

        let index = folio.index();
        let posts = index.get_all_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello World");

        let projects = index.get_all_projects();
        assert!(projects[0].period().is_ongoing);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
