//! ANSI terminal preview.
//!
//! Applies the formatting ranges of a [`StyledText`] to its flat text
//! using the `colored` crate: character styles per range segment,
//! list-item prefixes and quote bars inserted at their recorded start
//! offsets, thematic-break placeholders drawn as rules. This is a
//! best-effort preview for CLI display and tests, not a layout engine.

use std::collections::{BTreeMap, BTreeSet};

use colored::{ColoredString, Colorize};

use crate::config::Theme;
use crate::styled::{Style, StyledRange, StyledText};

/// Render styled text as ANSI-colored terminal output.
pub fn to_ansi(styled: &StyledText, theme: &Theme) -> String {
    let text = styled.text();
    if text.is_empty() {
        return String::new();
    }

    // segment boundaries at every range edge; all offsets are buffer
    // lengths snapshotted between appends, so they sit on char bounds
    let mut cuts: BTreeSet<usize> = BTreeSet::new();
    cuts.insert(0);
    cuts.insert(text.len());
    for range in styled.ranges() {
        cuts.insert(range.start);
        cuts.insert(range.end);
    }

    // decorations inserted in front of the segment they anchor to
    let mut inserts: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for range in styled.ranges() {
        match &range.style {
            Style::OrderedListItem { prefix, depth, .. } => {
                let pad = " ".repeat(theme.indent * depth.saturating_sub(1));
                inserts
                    .entry(range.start)
                    .or_default()
                    .push(format!("{pad}{prefix}"));
            }
            Style::BulletListItem { depth, level, .. } => {
                let pad = " ".repeat(theme.indent * depth.saturating_sub(1));
                let glyph = theme.bullet(*level);
                inserts
                    .entry(range.start)
                    .or_default()
                    .push(format!("{pad}{glyph}\u{a0}"));
            }
            Style::BlockQuote { .. } => {
                let bar = format!("{} ", theme.quote_bar).dimmed().to_string();
                inserts.entry(range.start).or_default().push(bar);
            }
            _ => {}
        }
    }

    let boundaries: Vec<usize> = cuts.into_iter().collect();
    let mut out = String::new();
    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if let Some(pieces) = inserts.get(&start) {
            for piece in pieces {
                out.push_str(piece);
            }
        }
        out.push_str(&paint(&text[start..end], start, end, styled.ranges(), theme));
    }
    out
}

fn paint(seg: &str, start: usize, end: usize, ranges: &[StyledRange], theme: &Theme) -> String {
    let active: Vec<&StyledRange> = ranges
        .iter()
        .filter(|r| r.start < r.end && r.start <= start && end <= r.end)
        .collect();

    // the thematic-break placeholder paints as a rule
    if active
        .iter()
        .any(|r| matches!(r.style, Style::ThematicBreak))
    {
        let rule = theme.rule_glyph.to_string().repeat(theme.rule_width);
        return rule.dimmed().to_string();
    }

    let mut painted: ColoredString = seg.normal();
    for range in &active {
        painted = match &range.style {
            Style::Strong => painted.bold(),
            Style::Emphasis => painted.italic(),
            Style::Strikethrough => painted.strikethrough(),
            Style::InlineCode | Style::CodeBlock { .. } => painted.yellow(),
            Style::Heading { level, .. } if *level <= 2 => painted.bold().underline(),
            Style::Heading { .. } => painted.bold(),
            Style::Link { .. } => painted.blue().underline(),
            Style::BlockQuote { .. } => painted.italic(),
            Style::Image { .. } => painted.magenta(),
            Style::ThematicBreak
            | Style::Html { .. }
            | Style::OrderedListItem { .. }
            | Style::BulletListItem { .. } => painted,
        };
    }
    painted.to_string()
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::parse::parse;
    use crate::render::render;

    fn preview(markdown: &str) -> String {
        let config = RenderConfig::default();
        let doc = parse(markdown);
        let styled = render(&doc, &config).expect("default collaborators never fail");
        to_ansi(&styled, &config.theme)
    }

    #[test]
    fn headings_emit_ansi_codes() {
        // Force colors on — colored disables them when stdout is not a tty.
        colored::control::set_override(true);

        let output = preview("# Title\n\nbody\n");
        assert!(
            output.contains("\x1b["),
            "terminal output should contain ANSI escape codes, got: {output:?}"
        );
        assert!(output.contains("Title"));

        colored::control::unset_override();
    }

    #[test]
    fn ordered_prefixes_are_inserted() {
        let output = preview("3. a\n4. b\n");
        assert!(
            output.contains("3.\u{a0}a"),
            "expected ordered prefix, got: {output:?}"
        );
        assert!(output.contains("4.\u{a0}b"));
    }

    #[test]
    fn bullet_glyphs_are_inserted() {
        let theme = Theme::default();
        let output = preview("- a\n");
        assert!(
            output.contains(theme.bullet(0)),
            "expected bullet glyph, got: {output:?}"
        );
    }

    #[test]
    fn thematic_break_draws_a_rule() {
        let theme = Theme::default();
        let rule = theme.rule_glyph.to_string().repeat(theme.rule_width);
        let output = preview("a\n\n---\n\nb\n");
        assert!(output.contains(&rule), "expected rule, got: {output:?}");
    }

    #[test]
    fn quote_bar_marks_block_quotes() {
        let theme = Theme::default();
        let output = preview("> quoted\n");
        assert!(
            output.contains(theme.quote_bar),
            "expected quote bar, got: {output:?}"
        );
    }
}
