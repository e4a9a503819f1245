//! Heading extraction for the table of contents
//!
//! Ids produced here must match the `id` attributes the markdown renderer
//! puts on rendered headings, so both go through [`heading_id`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref HEADING_LINE: Regex = Regex::new(r"^ {0,3}(#{1,3})\s+(.+)$").unwrap();
    static ref CLOSING_HASHES: Regex = Regex::new(r"(?:^|\s+)#+\s*$").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref NON_ID_CHARS: Regex = Regex::new(r"[^a-z0-9\x{AC00}-\x{D7A3}\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Derive the anchor id of a heading from its text
///
/// Lowercase, strip HTML tags, keep only ASCII letters and digits, Hangul
/// syllables, whitespace and hyphens, then turn each whitespace run into a
/// single hyphen. Identical texts give identical ids.
///
/// # Examples
/// ```
/// use folio_rs::content::heading_id;
///
/// assert_eq!(heading_id("Hello World!"), "hello-world");
/// ```
pub fn heading_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let without_tags = HTML_TAG.replace_all(&lower, "");
    let filtered = NON_ID_CHARS.replace_all(&without_tags, "");
    WHITESPACE.replace_all(&filtered, "-").into_owned()
}

/// Extract level 1-3 ATX headings from raw markdown, in document order
///
/// Lines inside fenced code blocks are not headings.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence = Fence::default();

    for line in markdown.lines() {
        if fence.advance(line) {
            continue;
        }

        let Some(caps) = HEADING_LINE.captures(line) else {
            continue;
        };

        let level = caps[1].len() as u8;
        let text = CLOSING_HASHES.replace(caps[2].trim(), "");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        headings.push(Heading {
            id: heading_id(text),
            text: text.to_string(),
            level,
        });
    }

    headings
}

/// Tracks whether the scan is inside a ``` or ~~~ fenced code block
#[derive(Debug, Default)]
struct Fence {
    /// Marker character and run length of the open fence
    open: Option<(char, usize)>,
}

impl Fence {
    /// Feed one line; returns true if the line belongs to a fence
    fn advance(&mut self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        let marker = if indent <= 3 {
            fence_marker(&line[indent..])
        } else {
            None
        };

        match (self.open, marker) {
            (None, Some(opener)) => {
                self.open = Some(opener);
                true
            }
            (Some((open_ch, open_len)), Some((ch, len)))
                if ch == open_ch && len >= open_len && line.trim().chars().all(|c| c == ch) =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

/// Fence marker at the start of a line: at least three backticks or tildes
fn fence_marker(s: &str) -> Option<(char, usize)> {
    let first = s.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = s.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_id() {
        assert_eq!(heading_id("Hello World!"), "hello-world");
        assert_eq!(heading_id("Hello World!"), heading_id("Hello World!"));
        assert_eq!(heading_id("  Spaced   out  "), "-spaced-out-");
        assert_eq!(heading_id("Rust 2024: what's new?"), "rust-2024-whats-new");
        assert_eq!(heading_id("Use <code>cargo</code> now"), "use-cargo-now");
        assert_eq!(heading_id("Setup & Run"), "setup-run");
    }

    #[test]
    fn test_heading_id_hangul() {
        assert_eq!(heading_id("안녕하세요 World"), "안녕하세요-world");
        // Jamo and CJK outside the syllable block are dropped
        assert_eq!(heading_id("ㄱ漢字 테스트"), "-테스트");
    }

    #[test]
    fn test_extract_levels_in_order() {
        let markdown = "# One\n\ntext\n\n## Two\n### Three\n#### Four\n";
        let headings = extract_headings(markdown);
        assert_eq!(
            headings,
            vec![
                Heading {
                    id: "one".to_string(),
                    text: "One".to_string(),
                    level: 1
                },
                Heading {
                    id: "two".to_string(),
                    text: "Two".to_string(),
                    level: 2
                },
                Heading {
                    id: "three".to_string(),
                    text: "Three".to_string(),
                    level: 3
                },
            ]
        );
    }

    #[test]
    fn test_extract_requires_space_after_hashes() {
        let headings = extract_headings("#hashtag\n#\n# Real\n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_extract_strips_closing_hashes() {
        let headings = extract_headings("## Title ##\n## C# ##\n");
        assert_eq!(headings[0].text, "Title");
        assert_eq!(headings[0].id, "title");
        assert_eq!(headings[1].text, "C#");
    }

    #[test]
    fn test_extract_skips_fenced_code() {
        let markdown = "# Intro\n\n```bash\n# not a heading\n```\n\n~~~~\n## nope\n~~~\n## still code\n~~~~\n\n## After\n";
        let headings = extract_headings(markdown);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Intro", "After"]);
    }

    #[test]
    fn test_extract_duplicates_keep_same_id() {
        let headings = extract_headings("## Notes\n\n## Notes\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, headings[1].id);
    }

    #[test]
    fn test_extract_is_pure() {
        let markdown = "# A\n## B\n";
        assert_eq!(extract_headings(markdown), extract_headings(markdown));
    }
}
