//! Tree-to-range transducer.
//!
//! A single recursive pass walks the document tree and appends to a
//! [`StyledText`]. Composite nodes snapshot the buffer length before
//! visiting their children and close a range over everything the
//! subtree appended, so ranges nest in creation order. Block-level
//! transitions normalize line breaks instead of unconditionally
//! appending separators, which keeps adjacent blocks from accumulating
//! duplicate blank lines.

use std::sync::Arc;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::styled::{ImageAlign, Style, StyledText};
use crate::types::{Document, NodeId, NodeKind};

/// Non-breaking space used as visual padding around code.
const NBSP: char = '\u{a0}';

/// Render `doc` into styled text using the collaborators in `config`.
///
/// Never fails on input shape; the only error path is a failing
/// collaborator (see [`RenderError`]). All renderer state is created
/// fresh for this call and discarded when it returns.
pub fn render(doc: &Document, config: &RenderConfig) -> Result<StyledText, RenderError> {
    let mut renderer = Renderer {
        doc,
        config,
        out: StyledText::new(),
        quote_depth: 0,
        list_depth: 0,
        tag_stack: Vec::new(),
    };
    renderer.visit(doc.root())?;
    Ok(renderer.out)
}

/// An opening inline tag awaiting its closing counterpart.
struct OpenTag {
    name: String,
    start: usize,
}

struct Renderer<'a> {
    doc: &'a Document,
    config: &'a RenderConfig,
    out: StyledText,
    /// Block-quote nesting depth; list items count as indent containers.
    quote_depth: usize,
    /// List nesting depth.
    list_depth: usize,
    /// Balancer stack for raw inline tags. Scoped to the whole document,
    /// not reset per node: tags may legally close outside their opening
    /// node's visit in malformed input.
    tag_stack: Vec<OpenTag>,
}

impl Renderer<'_> {
    fn visit(&mut self, id: NodeId) -> Result<(), RenderError> {
        let doc = self.doc;
        match doc.kind(id) {
            // unknown and uninterpreted kinds traverse transparently
            NodeKind::Document | NodeKind::Custom { .. } | NodeKind::HtmlBlock { .. } => {
                self.visit_children(id)?;
            }
            NodeKind::Text { literal } => self.out.push_str(literal),
            NodeKind::Strong => self.styled_children(id, Style::Strong)?,
            NodeKind::Emphasis => self.styled_children(id, Style::Emphasis)?,
            NodeKind::Strikethrough => self.styled_children(id, Style::Strikethrough)?,
            NodeKind::SoftBreak | NodeKind::HardBreak => self.ensure_line_break(),
            NodeKind::Paragraph => self.visit_paragraph(id)?,
            NodeKind::Heading { level } => self.visit_heading(id, *level)?,
            NodeKind::BlockQuote => self.visit_block_quote(id)?,
            NodeKind::Code { literal } => self.visit_code(literal),
            NodeKind::FencedCode { literal, info } => {
                self.visit_fenced_code(literal, info.as_deref())?;
            }
            NodeKind::BulletList { .. } | NodeKind::OrderedList { .. } => self.visit_list(id)?,
            NodeKind::ListItem => self.visit_list_item(id)?,
            NodeKind::ThematicBreak => self.visit_thematic_break(),
            NodeKind::Link { destination } => self.visit_link(id, destination)?,
            NodeKind::Image { destination } => self.visit_image(id, destination)?,
            NodeKind::HtmlInline { literal } => self.visit_html_inline(id, literal)?,
        }
        Ok(())
    }

    fn visit_children(&mut self, id: NodeId) -> Result<(), RenderError> {
        for &child in self.doc.children(id) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn styled_children(&mut self, id: NodeId, style: Style) -> Result<(), RenderError> {
        let start = self.out.len();
        self.visit_children(id)?;
        self.out.add_range(start, style);
        Ok(())
    }

    /// Append a line break unless the buffer already ends with one.
    /// Calling this twice is the same as calling it once.
    fn ensure_line_break(&mut self) {
        if !self.out.is_empty() && self.out.last_char() != Some('\n') {
            self.out.push('\n');
        }
    }

    /// A paragraph is tight when its grandparent is a list flagged
    /// tight; its content then flows with no break of its own.
    fn in_tight_list(&self, id: NodeId) -> bool {
        let Some(parent) = self.doc.parent(id) else {
            return false;
        };
        let Some(gramps) = self.doc.parent(parent) else {
            return false;
        };
        matches!(
            self.doc.kind(gramps),
            NodeKind::BulletList { tight: true } | NodeKind::OrderedList { tight: true, .. }
        )
    }

    fn visit_paragraph(&mut self, id: NodeId) -> Result<(), RenderError> {
        let tight = self.in_tight_list(id);
        if !tight {
            self.ensure_line_break();
        }
        self.visit_children(id)?;
        if !tight {
            self.ensure_line_break();
            if self.quote_depth == 0 {
                self.out.push('\n');
            }
        }
        Ok(())
    }

    fn visit_heading(&mut self, id: NodeId, level: u8) -> Result<(), RenderError> {
        self.ensure_line_break();
        let start = self.out.len();
        self.visit_children(id)?;
        let end = self.out.len();
        self.out.add_range(start, Style::Heading { level, end });
        self.ensure_line_break();
        // headings always get a trailing blank line
        self.out.push('\n');
        Ok(())
    }

    fn visit_block_quote(&mut self, id: NodeId) -> Result<(), RenderError> {
        self.ensure_line_break();
        if self.quote_depth != 0 {
            self.out.push('\n');
        }
        let start = self.out.len();
        self.quote_depth += 1;
        self.visit_children(id)?;
        self.out.add_range(
            start,
            Style::BlockQuote {
                depth: self.quote_depth,
            },
        );
        self.quote_depth -= 1;
        self.ensure_line_break();
        // quotes manage their own internal spacing
        if self.quote_depth == 0 {
            self.out.push('\n');
        }
        Ok(())
    }

    fn visit_code(&mut self, literal: &str) {
        let start = self.out.len();
        // padding so a monospace background does not hug the glyphs
        self.out.push(NBSP);
        self.out.push_str(literal);
        self.out.push(NBSP);
        self.out.add_range(start, Style::InlineCode);
    }

    fn visit_fenced_code(&mut self, literal: &str, info: Option<&str>) -> Result<(), RenderError> {
        self.ensure_line_break();
        let start = self.out.len();
        // padding lines above and below the highlighted body
        self.out.push(NBSP);
        self.out.push('\n');
        let highlighted = self.config.highlighter.highlight(info, literal)?;
        self.out.extend_styled(highlighted);
        self.out.push(NBSP);
        self.out.push('\n');
        self.out.add_range(
            start,
            Style::CodeBlock {
                lang: info.map(str::to_owned),
            },
        );
        self.ensure_line_break();
        self.out.push('\n');
        Ok(())
    }

    fn visit_list(&mut self, id: NodeId) -> Result<(), RenderError> {
        self.ensure_line_break();
        self.visit_children(id)?;
        self.ensure_line_break();
        // only the outermost, unquoted list leaves breathing room
        if self.list_depth == 0 && self.quote_depth == 0 {
            self.out.push('\n');
        }
        Ok(())
    }

    fn visit_list_item(&mut self, id: NodeId) -> Result<(), RenderError> {
        let start = self.out.len();
        // items are indent containers
        self.quote_depth += 1;
        self.list_depth += 1;

        let doc = self.doc;
        let counter = doc.parent(id).and_then(|p| match doc.kind(p) {
            NodeKind::OrderedList { start, .. } => Some(start),
            _ => None,
        });

        match counter {
            Some(counter) => {
                let number = counter.get();
                self.visit_children(id)?;
                self.out.add_range(
                    start,
                    Style::OrderedListItem {
                        prefix: format!("{number}.{NBSP}"),
                        depth: self.quote_depth,
                        start,
                    },
                );
                // siblings observe sequential values through the shared cell
                counter.set(number + 1);
            }
            None => {
                self.visit_children(id)?;
                self.out.add_range(
                    start,
                    Style::BulletListItem {
                        depth: self.quote_depth,
                        level: self.list_depth - 1,
                        start,
                    },
                );
            }
        }

        self.quote_depth -= 1;
        self.list_depth -= 1;
        self.ensure_line_break();
        Ok(())
    }

    fn visit_thematic_break(&mut self) {
        self.ensure_line_break();
        let start = self.out.len();
        // a zero-width range cannot anchor the rule glyphs
        self.out.push(' ');
        self.out.add_range(start, Style::ThematicBreak);
        self.ensure_line_break();
        self.out.push('\n');
    }

    fn visit_link(&mut self, id: NodeId, destination: &str) -> Result<(), RenderError> {
        let start = self.out.len();
        self.visit_children(id)?;
        self.out.add_range(
            start,
            Style::Link {
                destination: destination.to_owned(),
                resolver: Arc::clone(&self.config.links),
            },
        );
        Ok(())
    }

    fn visit_image(&mut self, id: NodeId, destination: &str) -> Result<(), RenderError> {
        let start = self.out.len();
        self.visit_children(id)?;
        // at least one character is needed to anchor the replacement
        if self.out.len() == start {
            self.out.push(' ');
        }
        let doc = self.doc;
        let inside_link = doc
            .parent(id)
            .is_some_and(|p| matches!(doc.kind(p), NodeKind::Link { .. }));
        self.out.add_range(
            start,
            Style::Image {
                destination: destination.to_owned(),
                loader: Arc::clone(&self.config.images),
                align: ImageAlign::Bottom,
                inside_link,
            },
        );
        Ok(())
    }

    fn visit_html_inline(&mut self, id: NodeId, literal: &str) -> Result<(), RenderError> {
        let Some(tag) = self.config.tags.parse_tag(literal) else {
            // not tag-shaped: fall back to ordinary content
            return self.visit_children(id);
        };

        if !tag.closing {
            if tag.void {
                let replacement = self.config.tags.pass_through(literal)?;
                self.out.extend_styled(replacement);
            } else {
                self.tag_stack.push(OpenTag {
                    name: tag.name,
                    start: self.out.len(),
                });
                self.visit_children(id)?;
            }
            return Ok(());
        }

        // closing void tokens have no counterpart to balance
        if tag.void {
            return Ok(());
        }

        // tolerant pairing: pop whatever is on top, even on a name
        // mismatch; a stray closer with an empty stack is dropped
        let Some(open) = self.tag_stack.pop() else {
            return Ok(());
        };

        if let Some(style) = self.config.tags.resolve_by_name(&open.name)? {
            self.out.add_range(open.start, style);
            return Ok(());
        }

        // no direct mapping: reinterpret the buffered content as a
        // minimal standalone fragment; only its styles are kept
        let content = &self.out.text()[open.start..];
        let fragment = format!("<{0}>{1}</{0}>", open.name, content);
        for style in self.config.tags.resolve_fragment(&fragment)? {
            self.out.add_range(open.start, style);
        }
        Ok(())
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
