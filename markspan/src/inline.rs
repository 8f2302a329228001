//! Inline tag token scanner.
//!
//! Lexes the raw tag-like tokens a markup parser leaves uninterpreted
//! (`<b>`, `</em>`, `<br/>`) into [`TagToken`]s. This is a tolerant
//! single-token lexer, not an HTML parser: anything that does not look
//! like a tag is rejected with `None` and renders as ordinary content.

/// A lexed inline tag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Lower-cased tag name.
    pub name: String,
    /// True for `</name>` tokens.
    pub closing: bool,
    /// Void (self-contained) tags have no closing counterpart.
    pub void: bool,
}

/// Tag names that never take a closing counterpart.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `name` (lower-case) is a void tag.
pub fn is_void(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// Lex a single raw tag token.
///
/// Accepts an optional leading `/` (closing), a name, ignored
/// attributes after whitespace, and an optional trailing `/`
/// (explicitly self-closed). Returns `None` for anything else.
pub fn scan_tag(raw: &str) -> Option<TagToken> {
    let inner = raw.trim().strip_prefix('<')?.strip_suffix('>')?;

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (self_closed, inner) = match inner.strip_suffix('/') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, inner),
    };

    // names start with a letter; digits may follow (h1, h2, …)
    if !inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    // anything after the name must be whitespace-separated attributes
    let rest = &inner[name_end..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    // closing tags take neither attributes nor a self-closing slash
    if closing && (self_closed || !rest.trim().is_empty()) {
        return None;
    }

    let void = self_closed || is_void(&name);
    Some(TagToken {
        name,
        closing,
        void,
    })
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
