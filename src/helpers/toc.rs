//! Table of contents helper

use super::html::html_escape;
use crate::content::Heading;

/// Render a table of contents from extracted headings
///
/// Returns an empty string when there are no headings so templates can
/// skip the sidebar entirely.
pub fn toc(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="toc"><p class="toc-title">Contents</p>"#);

    for heading in headings {
        let text = html_escape(&heading.text);
        html.push_str(&format!(
            r##"<a class="toc-link toc-level-{}" href="#{}" title="{}">{}</a>"##,
            heading.level, heading.id, text, text
        ));
    }

    html.push_str("</nav>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::extract_headings;

    #[test]
    fn test_toc_empty() {
        assert_eq!(toc(&[]), "");
    }

    #[test]
    fn test_toc_levels_and_anchors() {
        let headings = extract_headings("# Intro\n\n## Setup & Run\n\n### Details\n");
        let html = toc(&headings);
        assert!(html.starts_with(r#"<nav class="toc">"#));
        assert!(html.contains(r##"class="toc-link toc-level-1" href="#intro""##));
        assert!(html.contains(r##"href="#setup-run""##));
        assert!(html.contains("Setup &amp; Run"));
        assert!(html.contains(r#"toc-level-3"#));
    }
}
