//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    print!("{}", listing(folio, content_type)?);
    Ok(())
}

/// Text listing of posts, projects or categories
pub fn listing(folio: &Folio, content_type: &str) -> Result<String> {
    let index = folio.index();
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = index.get_all_posts();
            out.push_str(&format!("Posts ({}):\n", posts.len()));
            for post in posts {
                out.push_str(&format!(
                    "  {} - {} [{}/{}]\n",
                    display_date(&post.date),
                    post.title,
                    post.category,
                    post.slug
                ));
            }
        }
        "project" | "projects" => {
            let projects = index.get_all_projects();
            out.push_str(&format!("Projects ({}):\n", projects.len()));
            for project in projects {
                out.push_str(&format!(
                    "  {} - {} [{}]\n",
                    display_date(&project.period().text),
                    project.title,
                    project.slug
                ));
            }
        }
        "category" | "categories" => {
            let counts = index.category_counts();
            out.push_str(&format!("Categories ({}):\n", counts.len()));
            for (category, count) in counts {
                out.push_str(&format!("  {} ({})\n", category, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, category",
                content_type
            );
        }
    }

    Ok(out)
}

fn display_date(date: &str) -> &str {
    if date.is_empty() {
        "(no date)"
    } else {
        date
    }
}
