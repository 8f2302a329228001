//! Integration tests that parse and render complete fixture files.

use markspan::{RenderConfig, Style, StyledText};

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

fn render_fixture(name: &str) -> StyledText {
    let doc = markspan::parse(&read_fixture(name));
    doc.to_styled(&RenderConfig::default())
        .expect("default collaborators never fail")
}

fn assert_range_invariants(styled: &StyledText) {
    let len = styled.text().len();
    for range in styled.ranges() {
        assert!(range.start <= range.end, "inverted range {range:?}");
        assert!(range.end <= len, "range beyond buffer {range:?}");
        assert!(styled.text().is_char_boundary(range.start));
        assert!(styled.text().is_char_boundary(range.end));
    }
}

#[test]
fn document_fixture_covers_all_descriptors() {
    let styled = render_fixture("document.md");
    assert_range_invariants(&styled);

    let text = styled.text();
    assert!(text.contains("Release notes"));
    assert!(text.contains("Quoted wisdom"));
    assert!(text.contains("fn main() {}"));

    let ranges = styled.ranges();
    assert!(
        ranges
            .iter()
            .any(|r| matches!(r.style, Style::Heading { level: 1, .. }))
    );
    assert!(ranges.iter().any(|r| matches!(r.style, Style::Emphasis)));
    assert!(ranges.iter().any(|r| matches!(r.style, Style::Strong)));
    assert!(
        ranges
            .iter()
            .any(|r| matches!(r.style, Style::Strikethrough))
    );
    assert!(ranges.iter().any(|r| matches!(r.style, Style::InlineCode)));
    assert!(
        ranges
            .iter()
            .any(|r| matches!(&r.style, Style::CodeBlock { lang: Some(lang) } if lang == "rust"))
    );
    assert!(
        ranges
            .iter()
            .any(|r| matches!(r.style, Style::ThematicBreak))
    );
    assert!(
        ranges
            .iter()
            .any(|r| matches!(&r.style, Style::Link { destination, .. }
                if destination == "https://example.com/docs"))
    );
    assert!(
        ranges
            .iter()
            .any(|r| matches!(&r.style, Style::Image { destination, .. } if destination == "icon.png"))
    );
}

#[test]
fn document_fixture_quote_depths_nest() {
    let styled = render_fixture("document.md");
    let depths: Vec<usize> = styled
        .ranges()
        .iter()
        .filter_map(|r| match r.style {
            Style::BlockQuote { depth } => Some(depth),
            _ => None,
        })
        .collect();
    assert!(
        depths.contains(&1) && depths.contains(&2),
        "expected nested quote depths, got {depths:?}"
    );
}

#[test]
fn document_fixture_ordered_prefixes() {
    let styled = render_fixture("document.md");
    let prefixes: Vec<String> = styled
        .ranges()
        .iter()
        .filter_map(|r| match &r.style {
            Style::OrderedListItem { prefix, .. } => Some(prefix.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(prefixes, vec!["3.\u{a0}", "4.\u{a0}"]);

    let bullets = styled
        .ranges()
        .iter()
        .filter(|r| matches!(r.style, Style::BulletListItem { .. }))
        .count();
    assert_eq!(bullets, 2);
}

#[test]
fn document_fixture_balances_inline_tags() {
    let styled = render_fixture("document.md");

    // <b>tags</b> resolves to a direct style over exactly its content
    let strong_spans: Vec<&str> = styled
        .ranges()
        .iter()
        .filter(|r| matches!(r.style, Style::Strong))
        .map(|r| &styled.text()[r.start..r.end])
        .collect();
    assert!(
        strong_spans.contains(&"tags"),
        "expected the balanced <b> span, got {strong_spans:?}"
    );

    // <u>underline</u> has no direct mapping and falls back to the
    // reconstructed fragment
    assert!(
        styled
            .ranges()
            .iter()
            .any(|r| matches!(&r.style, Style::Html { payload } if payload == "<u>underline</u>"))
    );
}

#[test]
fn malformed_fixture_renders_without_error() {
    let styled = render_fixture("malformed.md");
    assert_range_invariants(&styled);
    assert!(styled.text().contains("a stray closer"));
    assert!(styled.text().contains("never closed"));
}

#[test]
fn reparsing_yields_identical_output() {
    let source = read_fixture("document.md");
    let first = markspan::parse(&source)
        .to_styled(&RenderConfig::default())
        .expect("no failure");
    let second = markspan::parse(&source)
        .to_styled(&RenderConfig::default())
        .expect("no failure");
    assert_eq!(first.text(), second.text());
    assert_eq!(first.ranges().len(), second.ranges().len());
}

#[test]
fn rerendering_one_tree_continues_numbering() {
    // The ordered-list counter lives on the tree and stays advanced
    // after a pass; this is the documented contract.
    let doc = markspan::parse("1. a\n2. b\n");
    let config = RenderConfig::default();
    let first = doc.to_styled(&config).expect("no failure");
    let second = doc.to_styled(&config).expect("no failure");

    let prefixes = |styled: &StyledText| -> Vec<String> {
        styled
            .ranges()
            .iter()
            .filter_map(|r| match &r.style {
                Style::OrderedListItem { prefix, .. } => Some(prefix.clone()),
                _ => None,
            })
            .collect()
    };
    assert_eq!(prefixes(&first), vec!["1.\u{a0}", "2.\u{a0}"]);
    assert_eq!(prefixes(&second), vec!["3.\u{a0}", "4.\u{a0}"]);
}
