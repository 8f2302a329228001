//! Render configuration and external collaborators.
//!
//! The renderer performs no I/O, resolves no links and highlights no
//! code itself; it records handles to the collaborators configured here
//! and delegates. Every collaborator has a working default, so
//! [`RenderConfig::default()`] renders out of the box.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::inline::{self, TagToken};
use crate::styled::{Style, StyledText};

/// Syntax highlighting for fenced code blocks.
///
/// The returned fragment is inserted verbatim into the output buffer;
/// the renderer does not tokenize code itself.
pub trait SyntaxHighlight: Send + Sync {
    fn highlight(&self, lang: Option<&str>, code: &str) -> Result<StyledText, RenderError>;
}

/// Interprets raw inline HTML-like tags the markup parser left alone.
pub trait TagHandler: Send + Sync {
    /// Lex a raw token like `<b>`, `</em>` or `<br/>`. `None` means the
    /// token is not tag-shaped and renders as ordinary content.
    fn parse_tag(&self, raw: &str) -> Option<TagToken>;

    /// Tier 1: the direct style for a tag name, if one exists.
    fn resolve_by_name(&self, name: &str) -> Result<Option<Style>, RenderError>;

    /// Tier 2: styles for a reconstructed `<name>content</name>`
    /// fragment. Called only when tier 1 produced nothing; the
    /// fragment itself never reaches the output buffer.
    fn resolve_fragment(&self, fragment: &str) -> Result<Vec<Style>, RenderError>;

    /// Replacement content for an opening void tag's raw token.
    fn pass_through(&self, raw: &str) -> Result<StyledText, RenderError>;
}

/// Resolves link activation. Invoked by the display layer on
/// interaction, never by the renderer.
pub trait LinkResolver: Send + Sync {
    fn open(&self, destination: &str);
}

/// Fetches image content. Invoked by the display layer, which later
/// swaps the loaded content in; any asynchrony is the loader's own and
/// never blocks rendering.
pub trait ImageLoader: Send + Sync {
    fn request(&self, destination: &str);
    fn cancel(&self, destination: &str);
}

/// Display-layer visual parameters.
///
/// The renderer itself never consumes these; they ride along in the
/// configuration for preview renderers and display layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Bullet glyphs by nesting level; the last entry repeats for
    /// deeper levels.
    pub bullets: Vec<char>,
    /// Glyph drawn at the left edge of block quotes.
    pub quote_bar: char,
    /// Glyph repeated to draw a thematic break.
    pub rule_glyph: char,
    /// Number of rule glyphs in a thematic break.
    pub rule_width: usize,
    /// Spaces per indent step for nested items.
    pub indent: usize,
}

impl Theme {
    /// Bullet glyph for a zero-based nesting level.
    pub fn bullet(&self, level: usize) -> char {
        match self.bullets.get(level) {
            Some(&glyph) => glyph,
            None => self.bullets.last().copied().unwrap_or('\u{2022}'),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bullets: vec!['\u{25cf}', '\u{25cb}', '\u{25aa}'], // ● ○ ▪
            quote_bar: '\u{2502}',                             // │
            rule_glyph: '\u{2500}',                            // ─
            rule_width: 24,
            indent: 2,
        }
    }
}

/// Collaborator bundle for one render pass.
#[derive(Clone)]
pub struct RenderConfig {
    pub theme: Theme,
    pub highlighter: Arc<dyn SyntaxHighlight>,
    pub tags: Arc<dyn TagHandler>,
    pub links: Arc<dyn LinkResolver>,
    pub images: Arc<dyn ImageLoader>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            theme: Theme::default(),
            highlighter: Arc::new(MonospacePassthrough),
            tags: Arc::new(BuiltinTagHandler),
            links: Arc::new(NoopLinkResolver),
            images: Arc::new(NoopImageLoader),
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

/// Highlighter that returns the code unstyled; the surrounding code
/// block still gets its monospace range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospacePassthrough;

impl SyntaxHighlight for MonospacePassthrough {
    fn highlight(&self, _lang: Option<&str>, code: &str) -> Result<StyledText, RenderError> {
        Ok(StyledText::from_text(code))
    }
}

/// Built-in tag handler covering the common formatting tags.
///
/// Unknown names fall to tier 2, which wraps the buffered content as a
/// `<name>…</name>` fragment and yields a generic [`Style::Html`]
/// descriptor carrying it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTagHandler;

impl TagHandler for BuiltinTagHandler {
    fn parse_tag(&self, raw: &str) -> Option<TagToken> {
        inline::scan_tag(raw)
    }

    fn resolve_by_name(&self, name: &str) -> Result<Option<Style>, RenderError> {
        let style = match name {
            "b" | "strong" => Some(Style::Strong),
            "i" | "em" | "cite" | "dfn" => Some(Style::Emphasis),
            "s" | "del" | "strike" => Some(Style::Strikethrough),
            "code" | "tt" => Some(Style::InlineCode),
            _ => None,
        };
        Ok(style)
    }

    fn resolve_fragment(&self, fragment: &str) -> Result<Vec<Style>, RenderError> {
        Ok(vec![Style::Html {
            payload: fragment.to_string(),
        }])
    }

    fn pass_through(&self, raw: &str) -> Result<StyledText, RenderError> {
        // <br> is the only void tag with a textual rendering
        match inline::scan_tag(raw) {
            Some(tag) if tag.name == "br" => Ok(StyledText::from_text("\n")),
            _ => Ok(StyledText::new()),
        }
    }
}

/// Link resolver that ignores activation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLinkResolver;

impl LinkResolver for NoopLinkResolver {
    fn open(&self, _destination: &str) {}
}

/// Image loader that never fetches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageLoader;

impl ImageLoader for NoopImageLoader {
    fn request(&self, _destination: &str) {}
    fn cancel(&self, _destination: &str) {}
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
