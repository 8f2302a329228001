//! Styled text buffer.
//!
//! [`StyledText`] is the sole output artifact of a render pass: an
//! append-only text buffer plus an ordered list of formatting ranges.
//! A range is closed with `end` equal to the buffer length observed at
//! creation time and is never mutated afterwards. Ranges nest in
//! creation order (a subtree's range closes before its ancestor's), but
//! the flat list carries no positional ordering guarantee between
//! siblings.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ImageLoader, LinkResolver};

/// Vertical alignment hint for replaced image content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlign {
    Baseline,
    Center,
    Bottom,
}

/// A formatting descriptor attached to a sub-span of the output text.
///
/// Link and image descriptors carry handles to the collaborators that
/// resolve interaction and content loading; the display layer invokes
/// them, the renderer only records them.
#[derive(Clone)]
pub enum Style {
    Strong,
    Emphasis,
    Strikethrough,
    /// `depth` counts enclosing quotes including the one this range
    /// closes; the outermost quote has depth 1.
    BlockQuote { depth: usize },
    InlineCode,
    CodeBlock { lang: Option<String> },
    /// `prefix` is the pre-formatted item number (`"3.\u{a0}"`);
    /// `start` is the byte offset the item began at, kept so a display
    /// layer can place the prefix at the correct position.
    OrderedListItem {
        prefix: String,
        depth: usize,
        start: usize,
    },
    /// Bullet items carry depth and nesting level only; glyph selection
    /// is a display-time decision.
    BulletListItem {
        depth: usize,
        level: usize,
        start: usize,
    },
    ThematicBreak,
    /// `end` is the buffer length right after the heading content.
    Heading { level: u8, end: usize },
    Link {
        destination: String,
        resolver: Arc<dyn LinkResolver>,
    },
    Image {
        destination: String,
        loader: Arc<dyn ImageLoader>,
        align: ImageAlign,
        /// True when the image's immediate parent is a link node, so
        /// hit-testing and alignment can adapt.
        inside_link: bool,
    },
    /// Raw HTML payload for which no structural style exists.
    Html { payload: String },
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Strong => write!(f, "Strong"),
            Style::Emphasis => write!(f, "Emphasis"),
            Style::Strikethrough => write!(f, "Strikethrough"),
            Style::BlockQuote { depth } => write!(f, "BlockQuote {{ depth: {depth} }}"),
            Style::InlineCode => write!(f, "InlineCode"),
            Style::CodeBlock { lang } => write!(f, "CodeBlock {{ lang: {lang:?} }}"),
            Style::OrderedListItem {
                prefix,
                depth,
                start,
            } => write!(
                f,
                "OrderedListItem {{ prefix: {prefix:?}, depth: {depth}, start: {start} }}"
            ),
            Style::BulletListItem {
                depth,
                level,
                start,
            } => write!(
                f,
                "BulletListItem {{ depth: {depth}, level: {level}, start: {start} }}"
            ),
            Style::ThematicBreak => write!(f, "ThematicBreak"),
            Style::Heading { level, end } => {
                write!(f, "Heading {{ level: {level}, end: {end} }}")
            }
            Style::Link { destination, .. } => {
                write!(f, "Link {{ destination: {destination:?} }}")
            }
            Style::Image {
                destination,
                align,
                inside_link,
                ..
            } => write!(
                f,
                "Image {{ destination: {destination:?}, align: {align:?}, inside_link: {inside_link} }}"
            ),
            Style::Html { payload } => write!(f, "Html {{ payload: {payload:?} }}"),
        }
    }
}

/// A formatting range over the output text.
///
/// `start` and `end` are byte offsets into the UTF-8 text. Both always
/// fall on character boundaries because they are buffer lengths
/// snapshotted between appends.
#[derive(Debug, Clone)]
pub struct StyledRange {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

/// Append-only text accumulator plus formatting ranges.
///
/// The buffer only ever grows during a render pass: no deletions, no
/// re-ordering. Ranges are added through [`StyledText::add_range`],
/// which closes them at the current buffer length.
#[derive(Debug, Clone, Default)]
pub struct StyledText {
    text: String,
    ranges: Vec<StyledRange>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// A styled fragment holding plain text and no ranges. Useful for
    /// collaborators that return unstyled content.
    pub fn from_text(text: impl Into<String>) -> Self {
        StyledText {
            text: text.into(),
            ranges: Vec::new(),
        }
    }

    /// Current length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn ranges(&self) -> &[StyledRange] {
        &self.ranges
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Close a range from `start` to the current end of the buffer.
    pub fn add_range(&mut self, start: usize, style: Style) {
        debug_assert!(start <= self.text.len(), "range start beyond buffer");
        self.ranges.push(StyledRange {
            start,
            end: self.text.len(),
            style,
        });
    }

    /// Append another styled fragment, rebasing its range offsets onto
    /// the current buffer length.
    pub fn extend_styled(&mut self, fragment: StyledText) {
        let base = self.text.len();
        self.text.push_str(&fragment.text);
        self.ranges
            .extend(fragment.ranges.into_iter().map(|r| StyledRange {
                start: base + r.start,
                end: base + r.end,
                style: r.style,
            }));
    }

    pub fn into_parts(self) -> (String, Vec<StyledRange>) {
        (self.text, self.ranges)
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
