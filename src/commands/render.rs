//! Render a single markdown file to HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;
use crate::Folio;

/// Print the rendered body of a content file, or its headings as JSON
pub fn run(folio: &Folio, path: &Path, headings: bool) -> Result<()> {
    println!("{}", render_file(folio, path, headings)?);
    Ok(())
}

pub fn render_file(folio: &Folio, path: &Path, headings: bool) -> Result<String> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let body = FrontMatter::split(&raw).body;

    let document = folio.renderer().render_document(body);
    tracing::debug!(
        "Rendered {:?}: {} headings, {} bytes",
        path,
        document.headings.len(),
        document.html.len()
    );

    if headings {
        Ok(serde_json::to_string_pretty(&document.headings)?)
    } else {
        Ok(document.html)
    }
}
