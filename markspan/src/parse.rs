//! Markdown adapter.
//!
//! Builds the [`Document`] tree from CommonMark source by driving
//! `pulldown-cmark`. This crate performs no markup parsing of its own;
//! the adapter only reshapes the parser's event stream into the node
//! taxonomy the renderer consumes. It never fails, and malformed
//! markdown degrades through the parser's own tolerance.

use std::cell::Cell;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::types::{Document, NodeId, NodeKind};

/// Parse CommonMark `input` into a document tree.
pub fn parse(input: &str) -> Document {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(input, options);

    let mut doc = Document::new();
    let root = doc.root();
    // open containers; the implicit bottom of the stack is the root
    let mut stack: Vec<NodeId> = Vec::new();

    for event in parser {
        match event {
            Event::Start(tag) => {
                let parent = top(&stack, root);
                let id = doc.push(parent, start_kind(&tag));
                stack.push(id);
            }
            Event::End(end) => {
                if let Some(finished) = stack.pop() {
                    if matches!(end, TagEnd::List(_)) {
                        normalize_list(&mut doc, finished);
                    }
                }
            }
            Event::Text(text) => {
                let parent = top(&stack, root);
                match doc.kind_mut(parent) {
                    // code blocks and html blocks collect their literal
                    NodeKind::FencedCode { literal, .. } | NodeKind::HtmlBlock { literal } => {
                        literal.push_str(&text);
                    }
                    _ => {
                        doc.push(
                            parent,
                            NodeKind::Text {
                                literal: text.to_string(),
                            },
                        );
                    }
                }
            }
            Event::Code(code) => {
                doc.push(
                    top(&stack, root),
                    NodeKind::Code {
                        literal: code.to_string(),
                    },
                );
            }
            Event::Html(html) => {
                let parent = top(&stack, root);
                match doc.kind_mut(parent) {
                    NodeKind::HtmlBlock { literal } => literal.push_str(&html),
                    _ => {
                        doc.push(
                            parent,
                            NodeKind::HtmlBlock {
                                literal: html.to_string(),
                            },
                        );
                    }
                }
            }
            Event::InlineHtml(html) => {
                doc.push(
                    top(&stack, root),
                    NodeKind::HtmlInline {
                        literal: html.to_string(),
                    },
                );
            }
            Event::SoftBreak => {
                doc.push(top(&stack, root), NodeKind::SoftBreak);
            }
            Event::HardBreak => {
                doc.push(top(&stack, root), NodeKind::HardBreak);
            }
            Event::Rule => {
                doc.push(top(&stack, root), NodeKind::ThematicBreak);
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                doc.push(
                    top(&stack, root),
                    NodeKind::Text {
                        literal: marker.to_string(),
                    },
                );
            }
            Event::FootnoteReference(label) => {
                doc.push(
                    top(&stack, root),
                    NodeKind::Text {
                        literal: format!("[{label}]"),
                    },
                );
            }
            _ => {}
        }
    }

    doc
}

fn top(stack: &[NodeId], root: NodeId) -> NodeId {
    stack.last().copied().unwrap_or(root)
}

fn start_kind(tag: &Tag) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: *level as u8,
        },
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => {
            let info = match kind {
                CodeBlockKind::Fenced(info) if !info.is_empty() => Some(info.to_string()),
                _ => None,
            };
            NodeKind::FencedCode {
                literal: String::new(),
                info,
            }
        }
        Tag::HtmlBlock => NodeKind::HtmlBlock {
            literal: String::new(),
        },
        Tag::List(Some(start)) => NodeKind::OrderedList {
            tight: false,
            start: Cell::new(*start),
        },
        Tag::List(None) => NodeKind::BulletList { tight: false },
        Tag::Item => NodeKind::ListItem,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link { dest_url, .. } => NodeKind::Link {
            destination: dest_url.to_string(),
        },
        Tag::Image { dest_url, .. } => NodeKind::Image {
            destination: dest_url.to_string(),
        },
        Tag::Table(_) => custom("table"),
        Tag::TableHead => custom("table-head"),
        Tag::TableRow => custom("table-row"),
        Tag::TableCell => custom("table-cell"),
        Tag::FootnoteDefinition(_) => custom("footnote-definition"),
        Tag::MetadataBlock(_) => custom("metadata"),
        _ => custom("unknown"),
    }
}

fn custom(name: &str) -> NodeKind {
    NodeKind::Custom {
        name: name.to_string(),
    }
}

/// pulldown-cmark emits tight-list item content without paragraph
/// wrappers. Detect that shape, flag the list, and wrap each item's
/// contiguous inline runs in paragraph nodes, so tightness becomes a
/// structural property the renderer reads through the tree.
fn normalize_list(doc: &mut Document, list: NodeId) {
    let items: Vec<NodeId> = doc.children(list).to_vec();
    let tight = items
        .iter()
        .any(|&item| doc.children(item).iter().any(|&c| is_inline(doc.kind(c))));
    if !tight {
        return;
    }

    match doc.kind_mut(list) {
        NodeKind::BulletList { tight } | NodeKind::OrderedList { tight, .. } => *tight = true,
        _ => return,
    }
    for item in items {
        wrap_inline_runs(doc, item);
    }
}

fn is_inline(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text { .. }
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Strikethrough
            | NodeKind::Code { .. }
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::HtmlInline { .. }
            | NodeKind::SoftBreak
            | NodeKind::HardBreak
    )
}

fn wrap_inline_runs(doc: &mut Document, item: NodeId) {
    let children = doc.children(item).to_vec();
    let mut rebuilt: Vec<NodeId> = Vec::with_capacity(children.len());
    let mut run: Vec<NodeId> = Vec::new();

    for child in children {
        if is_inline(doc.kind(child)) {
            run.push(child);
        } else {
            flush_run(doc, item, &mut run, &mut rebuilt);
            rebuilt.push(child);
        }
    }
    flush_run(doc, item, &mut run, &mut rebuilt);

    doc.replace_children(item, rebuilt);
}

fn flush_run(doc: &mut Document, item: NodeId, run: &mut Vec<NodeId>, rebuilt: &mut Vec<NodeId>) {
    if run.is_empty() {
        return;
    }
    let para = doc.push(item, NodeKind::Paragraph);
    doc.replace_children(para, std::mem::take(run));
    rebuilt.push(para);
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn only_child(doc: &Document, id: NodeId) -> NodeId {
        let children = doc.children(id);
        assert_eq!(children.len(), 1, "expected one child, got {children:?}");
        children[0]
    }

    #[test]
    fn paragraph_with_strong() {
        let doc = parse("Hello **world**\n");
        let para = only_child(&doc, doc.root());
        assert!(matches!(doc.kind(para), NodeKind::Paragraph));

        let children = doc.children(para);
        assert_eq!(children.len(), 2);
        assert!(
            matches!(doc.kind(children[0]), NodeKind::Text { literal } if literal == "Hello ")
        );
        assert!(matches!(doc.kind(children[1]), NodeKind::Strong));
    }

    #[test]
    fn tight_list_is_inferred_and_rewrapped() {
        let doc = parse("- a\n- b\n");
        let list = only_child(&doc, doc.root());
        assert!(matches!(
            doc.kind(list),
            NodeKind::BulletList { tight: true }
        ));

        for &item in doc.children(list) {
            let para = only_child(&doc, item);
            assert!(
                matches!(doc.kind(para), NodeKind::Paragraph),
                "tight item content should be wrapped in a paragraph"
            );
            assert_eq!(doc.parent(para), Some(item));
        }
    }

    #[test]
    fn loose_list_keeps_parser_paragraphs() {
        let doc = parse("- a\n\n- b\n");
        let list = only_child(&doc, doc.root());
        assert!(matches!(
            doc.kind(list),
            NodeKind::BulletList { tight: false }
        ));

        for &item in doc.children(list) {
            let para = only_child(&doc, item);
            assert!(matches!(doc.kind(para), NodeKind::Paragraph));
        }
    }

    #[test]
    fn ordered_list_keeps_declared_start() {
        let doc = parse("3. a\n4. b\n");
        let list = only_child(&doc, doc.root());
        match doc.kind(list) {
            NodeKind::OrderedList { start, .. } => assert_eq!(start.get(), 3),
            other => panic!("expected ordered list, got {other:?}"),
        }
        assert_eq!(doc.children(list).len(), 2);
    }

    #[test]
    fn nested_list_stays_a_block_child() {
        let doc = parse("- a\n  - b\n");
        let outer = only_child(&doc, doc.root());
        let item = doc.children(outer)[0];
        let kinds: Vec<&NodeKind> = doc.children(item).iter().map(|&c| doc.kind(c)).collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], NodeKind::Paragraph));
        assert!(matches!(kinds[1], NodeKind::BulletList { tight: true }));
    }

    #[test]
    fn fenced_code_collects_literal_and_info() {
        let doc = parse("```rust\nlet x = 1;\n```\n");
        let code = only_child(&doc, doc.root());
        match doc.kind(code) {
            NodeKind::FencedCode { literal, info } => {
                assert_eq!(literal, "let x = 1;\n");
                assert_eq!(info.as_deref(), Some("rust"));
            }
            other => panic!("expected fenced code, got {other:?}"),
        }
    }

    #[test]
    fn indented_code_has_no_info() {
        let doc = parse("    indented\n");
        let code = only_child(&doc, doc.root());
        assert!(
            matches!(doc.kind(code), NodeKind::FencedCode { info: None, .. }),
            "got {:?}",
            doc.kind(code)
        );
    }

    #[test]
    fn inline_html_becomes_tag_nodes() {
        let doc = parse("a <b>bold</b> c\n");
        let para = only_child(&doc, doc.root());
        let kinds: Vec<&NodeKind> = doc.children(para).iter().map(|&c| doc.kind(c)).collect();
        assert!(
            kinds
                .iter()
                .any(|k| matches!(k, NodeKind::HtmlInline { literal } if literal == "<b>"))
        );
        assert!(
            kinds
                .iter()
                .any(|k| matches!(k, NodeKind::HtmlInline { literal } if literal == "</b>"))
        );
    }

    #[test]
    fn block_html_collects_into_one_literal() {
        let doc = parse("<div>\nraw\n</div>\n");
        let block = only_child(&doc, doc.root());
        match doc.kind(block) {
            NodeKind::HtmlBlock { literal } => {
                assert!(literal.contains("<div>"));
                assert!(literal.contains("</div>"));
            }
            other => panic!("expected html block, got {other:?}"),
        }
    }

    #[test]
    fn tables_map_to_custom_nodes() {
        let doc = parse("| h |\n| - |\n| c |\n");
        let table = only_child(&doc, doc.root());
        assert!(
            matches!(doc.kind(table), NodeKind::Custom { name } if name == "table"),
            "got {:?}",
            doc.kind(table)
        );
    }

    #[test]
    fn empty_input_yields_bare_root() {
        let doc = parse("");
        assert!(doc.children(doc.root()).is_empty());
    }
}
