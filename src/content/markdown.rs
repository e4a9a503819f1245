//! Markdown rendering with heading anchors and syntax highlighting

use std::sync::Arc;

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use serde::Serialize;

use super::headings::{extract_headings, heading_id, Heading};
use crate::helpers::decode_entities;
use crate::highlight::HighlighterCache;

lazy_static! {
    /// Headings written as raw HTML, without attributes
    static ref RAW_HEADING: Regex = Regex::new(r"(?s)<h([1-3])>(.+?)</h([1-3])>").unwrap();
}

/// Rendered body of a post or project together with its table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Markdown renderer backed by a shared highlighter
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    highlighter: Arc<HighlighterCache>,
}

impl MarkdownRenderer {
    /// Create a renderer that highlights code through `highlighter`
    pub fn new(highlighter: Arc<HighlighterCache>) -> Self {
        Self { highlighter }
    }

    /// Render markdown to HTML
    ///
    /// Never fails: a code block that cannot be highlighted is emitted as a
    /// plain `<pre><code class="language-..">` block and the rest of the
    /// document is unaffected.
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let mut parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();

        while let Some(event) = parser.next() {
            match event {
                Event::Start(Tag::Heading { level, .. }) if (level as u8) <= 3 => {
                    let inner: Vec<Event> = parser
                        .by_ref()
                        .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))))
                        .map(decode_inline_html)
                        .collect();
                    events.push(Event::Html(CowStr::from(render_heading(level, inner))));
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let Some(lang) = highlight_candidate(&info) else {
                        events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                        continue;
                    };

                    let body: Vec<Event> = parser
                        .by_ref()
                        .take_while(|e| !matches!(e, Event::End(TagEnd::CodeBlock)))
                        .collect();

                    match self.highlight_block(&lang, &body) {
                        Some(block) => events.push(Event::Html(CowStr::from(block))),
                        None => {
                            events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                            events.extend(body);
                            events.push(Event::End(TagEnd::CodeBlock));
                        }
                    }
                }
                Event::Html(raw) => {
                    events.push(Event::Html(CowStr::from(decode_entities(&raw))));
                }
                other => events.push(decode_inline_html(other)),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        // Raw headings can span several inline events, so anchor them last
        anchor_raw_headings(&html_output)
    }

    /// Render markdown and extract its table of contents
    pub fn render_document(&self, markdown: &str) -> RenderedDocument {
        RenderedDocument {
            html: self.render(markdown),
            headings: extract_headings(markdown),
        }
    }

    /// Highlight a fenced block; `None` means emit it unhighlighted
    fn highlight_block(&self, lang: &str, body: &[Event]) -> Option<String> {
        let mut code = String::new();
        for event in body {
            if let Event::Text(text) = event {
                code.push_str(text);
            }
        }
        let code = code.trim_end();

        match self.highlighter.get().highlight(code, lang) {
            Ok(highlighted) => {
                let line_count = code.split('\n').count();
                Some(format!(
                    r#"<div class="code-block"><div class="code-header"><span class="code-lang">{}</span><span class="code-lines">{} lines</span></div><div class="code-wrapper">{}</div></div>"#,
                    lang, line_count, highlighted
                ))
            }
            Err(e) => {
                tracing::warn!("Failed to highlight code block with language {}: {}", lang, e);
                None
            }
        }
    }
}

/// Language of a fenced block if it is a word (`[A-Za-z0-9_]+`)
fn highlight_candidate(info: &str) -> Option<String> {
    let lang = info.split_whitespace().next()?;
    lang.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then(|| lang.to_string())
}

fn decode_inline_html(event: Event) -> Event {
    match event {
        Event::InlineHtml(raw) => Event::InlineHtml(CowStr::from(decode_entities(&raw))),
        other => other,
    }
}

/// `<hN id="..">inner</hN>` for a markdown heading
fn render_heading(level: HeadingLevel, inner: Vec<Event>) -> String {
    let mut inner_html = String::new();
    html::push_html(&mut inner_html, inner.into_iter());

    let level = level as u8;
    let id = heading_id(&decode_entities(&inner_html));
    format!("<h{level} id=\"{id}\">{inner_html}</h{level}>\n")
}

/// Add ids to `<h1>`..`<h3>` headings written as raw HTML
///
/// Markdown headings already carry an id attribute and escaped code never
/// contains a literal `<h`, so only raw headings match.
fn anchor_raw_headings(html: &str) -> String {
    RAW_HEADING
        .replace_all(html, |caps: &Captures| {
            if caps[1] != caps[3] {
                return caps[0].to_string();
            }
            let level = &caps[1];
            let inner = &caps[2];
            let id = heading_id(&decode_entities(inner));
            format!("<h{level} id=\"{id}\">{inner}</h{level}>")
        })
        .into_owned()
}
