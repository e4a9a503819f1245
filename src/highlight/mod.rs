//! Syntax highlighting for fenced code blocks
//!
//! Loading syntect's grammars and themes is the slowest part of rendering a
//! page, so one [`Highlighter`] is built per process and shared through a
//! [`HighlighterCache`]. The cache builds lazily on first use and guarantees
//! a single construction even when several renders race for it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;

use crate::config::HighlightConfig;

/// Theme used when the configured one is not bundled with syntect
const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Fence words accepted as another name for a language
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("py", "python"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("htm", "html"),
];

/// Grammar used for languages syntect does not bundle
const FALLBACK_GRAMMARS: &[(&str, &str)] = &[
    ("typescript", "js"),
    ("jsx", "js"),
    ("tsx", "js"),
    ("kotlin", "java"),
];

/// Why a code block could not be highlighted
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("no grammar available for language: {0}")]
    MissingGrammar(String),

    #[error("highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

/// Map a fence word to its canonical language name
pub fn canonical_language(lang: &str) -> String {
    let lang = lang.to_ascii_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lang)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lang)
}

/// A loaded highlighting engine: grammars, one theme, a language allow-list
#[derive(Debug)]
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    theme_name: String,
    languages: Vec<String>,
}

impl Highlighter {
    /// Load grammars and the configured theme
    pub fn new(config: &HighlightConfig) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;

        let (theme_name, theme) = match themes.remove(&config.theme) {
            Some(theme) => (config.theme.clone(), theme),
            None => {
                tracing::warn!(
                    "Unknown highlight theme {:?}, using {}",
                    config.theme,
                    FALLBACK_THEME
                );
                let theme = themes.remove(FALLBACK_THEME).unwrap_or_default();
                (FALLBACK_THEME.to_string(), theme)
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            theme_name,
            languages: config
                .languages
                .iter()
                .map(|l| canonical_language(l))
                .collect(),
        }
    }

    /// Name of the theme in use
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Whether code fenced with `lang` gets highlighted
    pub fn supports(&self, lang: &str) -> bool {
        let lang = canonical_language(lang);
        self.languages.iter().any(|l| *l == lang) && self.find_syntax(&lang).is_some()
    }

    /// Highlight code into themed HTML (`<pre style=...>` with inline spans)
    pub fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError> {
        let canonical = canonical_language(lang);

        if !self.languages.iter().any(|l| *l == canonical) {
            return Err(HighlightError::UnsupportedLanguage(lang.to_string()));
        }

        let syntax = self
            .find_syntax(&canonical)
            .ok_or_else(|| HighlightError::MissingGrammar(lang.to_string()))?;

        Ok(highlighted_html_for_string(
            code,
            &self.syntax_set,
            syntax,
            &self.theme,
        )?)
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        self.syntax_set.find_syntax_by_token(lang).or_else(|| {
            FALLBACK_GRAMMARS
                .iter()
                .find(|(name, _)| *name == lang)
                .and_then(|(_, grammar)| self.syntax_set.find_syntax_by_token(grammar))
        })
    }
}

/// Process-wide, lazily built [`Highlighter`]
///
/// Owned by the application and handed to every renderer by reference.
/// Concurrent first callers of [`HighlighterCache::get`] block on the one
/// in-flight construction; nobody ever sees a partially built engine.
#[derive(Debug)]
pub struct HighlighterCache {
    config: HighlightConfig,
    highlighter: OnceLock<Highlighter>,
    builds: AtomicUsize,
}

impl HighlighterCache {
    /// Create an empty cache; nothing is loaded until the first [`get`](Self::get)
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            highlighter: OnceLock::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// The shared highlighter, built on first call
    pub fn get(&self) -> &Highlighter {
        self.highlighter.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::SeqCst);
            let start = Instant::now();
            let highlighter = Highlighter::new(&self.config);
            tracing::debug!(
                "Highlighter initialized with theme {} in {:.2}s",
                highlighter.theme_name(),
                start.elapsed().as_secs_f64()
            );
            highlighter
        })
    }

    /// Whether the highlighter has been built yet
    pub fn is_initialized(&self) -> bool {
        self.highlighter.get().is_some()
    }

    /// How many times the highlighter was constructed (0 or 1)
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }
}

impl Default for HighlighterCache {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_canonical_language() {
        assert_eq!(canonical_language("js"), "javascript");
        assert_eq!(canonical_language("YML"), "yaml");
        assert_eq!(canonical_language("python"), "python");
        assert_eq!(canonical_language("rust"), "rust");
    }

    #[test]
    fn test_supported_languages() {
        let cache = HighlighterCache::default();
        let highlighter = cache.get();
        for lang in crate::config::DEFAULT_LANGUAGES {
            assert!(highlighter.supports(lang), "{} should be supported", lang);
        }
        assert!(highlighter.supports("js"));
        assert!(highlighter.supports("sh"));
        // Bundled by syntect but not on the allow-list
        assert!(!highlighter.supports("rust"));
        assert!(!highlighter.supports("brainfuck"));
    }

    #[test]
    fn test_highlight_produces_themed_html() {
        let cache = HighlighterCache::default();
        let html = cache.get().highlight("const x = 1;", "js").unwrap();
        assert!(html.starts_with("<pre style="));
        assert!(html.contains("<span"));
        assert!(html.contains("const"));
    }

    #[test]
    fn test_highlight_escapes_code() {
        let cache = HighlighterCache::default();
        let html = cache.get().highlight("<div>&</div>", "html").unwrap();
        assert!(html.contains("&lt;"));
        assert!(!html.contains("<div>"));
    }

    #[test]
    fn test_highlight_unsupported_language() {
        let cache = HighlighterCache::default();
        let err = cache.get().highlight("fn main() {}", "rust").unwrap_err();
        assert!(matches!(err, HighlightError::UnsupportedLanguage(ref l) if l == "rust"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = HighlightConfig {
            theme: "tokyo-night".to_string(),
            ..Default::default()
        };
        let highlighter = Highlighter::new(&config);
        assert_eq!(highlighter.theme_name(), FALLBACK_THEME);
    }

    #[test]
    fn test_cache_is_lazy() {
        let cache = HighlighterCache::default();
        assert!(!cache.is_initialized());
        assert_eq!(cache.build_count(), 0);

        cache.get();
        cache.get();
        assert!(cache.is_initialized());
        assert_eq!(cache.build_count(), 1);
    }

    #[test]
    fn test_concurrent_first_use_builds_once() {
        let cache = Arc::new(HighlighterCache::default());
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get().highlight("x = 1", "python").unwrap()
                })
            })
            .collect();

        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.build_count(), 1);
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }
}
