use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;

use markspan::{Document, NodeId, NodeKind, RenderConfig, Style, StyledRange, StyledText};

#[derive(Parser)]
#[command(name = "markspan", version, about = "Preview markdown as styled rich text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    Terminal,
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file as styled text
    Render {
        /// Path to the .md file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: RenderFormat,
    },

    /// Print the parsed document tree
    Inspect {
        /// Path to the .md file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { file, format } => handle_render(&file, format),
        Commands::Inspect { file } => handle_inspect(&file),
    }
}

fn handle_render(file: &str, format: RenderFormat) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let doc = markspan::parse(&content);
    let config = RenderConfig::default();

    match format {
        RenderFormat::Terminal => {
            println!("{}", doc.to_terminal(&config)?);
        }
        RenderFormat::Text => {
            println!("{}", doc.to_styled(&config)?.text());
        }
        RenderFormat::Json => {
            let styled = doc.to_styled(&config)?;
            let report = RenderReport::new(&styled);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn handle_inspect(file: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let doc = markspan::parse(&content);
    print_node(&doc, doc.root(), 0);
    Ok(())
}

fn print_node(doc: &Document, id: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{}", describe_node(doc.kind(id)));
    for &child in doc.children(id) {
        print_node(doc, child, depth + 1);
    }
}

fn describe_node(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Document => format!("{}", "document".bold()),
        NodeKind::Text { literal } => format!("{} {literal:?}", "text".dimmed()),
        NodeKind::Emphasis => "emphasis".to_string(),
        NodeKind::Strong => "strong".to_string(),
        NodeKind::Strikethrough => "strikethrough".to_string(),
        NodeKind::Paragraph => "paragraph".to_string(),
        NodeKind::Heading { level } => format!("{} level={level}", "heading".bold()),
        NodeKind::BlockQuote => "block-quote".to_string(),
        NodeKind::Code { literal } => format!("{} {literal:?}", "code".yellow()),
        NodeKind::FencedCode { info, .. } => {
            format!("{} info={info:?}", "fenced-code".yellow())
        }
        NodeKind::BulletList { tight } => {
            format!("{} tight={tight}", "bullet-list".cyan())
        }
        NodeKind::OrderedList { tight, start } => format!(
            "{} start={} tight={tight}",
            "ordered-list".cyan(),
            start.get()
        ),
        NodeKind::ListItem => "list-item".to_string(),
        NodeKind::ThematicBreak => "thematic-break".to_string(),
        NodeKind::SoftBreak => format!("{}", "soft-break".dimmed()),
        NodeKind::HardBreak => format!("{}", "hard-break".dimmed()),
        NodeKind::Link { destination } => format!("{} {destination}", "link".blue()),
        NodeKind::Image { destination } => format!("{} {destination}", "image".magenta()),
        NodeKind::HtmlBlock { .. } => format!("{}", "html-block".dimmed()),
        NodeKind::HtmlInline { literal } => {
            format!("{} {literal:?}", "html-inline".dimmed())
        }
        NodeKind::Custom { name } => format!("{} {name}", "custom".dimmed()),
    }
}

/// JSON-serializable view of a render result.
#[derive(Serialize)]
struct RenderReport {
    text: String,
    ranges: Vec<RangeEntry>,
}

#[derive(Serialize)]
struct RangeEntry {
    start: usize,
    end: usize,
    style: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl RenderReport {
    fn new(styled: &StyledText) -> Self {
        RenderReport {
            text: styled.text().to_string(),
            ranges: styled.ranges().iter().map(range_entry).collect(),
        }
    }
}

fn range_entry(range: &StyledRange) -> RangeEntry {
    let (style, detail) = match &range.style {
        Style::Strong => ("strong", None),
        Style::Emphasis => ("emphasis", None),
        Style::Strikethrough => ("strikethrough", None),
        Style::BlockQuote { depth } => ("block-quote", Some(format!("depth {depth}"))),
        Style::InlineCode => ("inline-code", None),
        Style::CodeBlock { lang } => ("block-code", lang.clone()),
        Style::OrderedListItem { prefix, .. } => ("ordered-list-item", Some(prefix.clone())),
        Style::BulletListItem { level, .. } => ("bullet-list-item", Some(format!("level {level}"))),
        Style::ThematicBreak => ("thematic-break", None),
        Style::Heading { level, .. } => ("heading", Some(format!("level {level}"))),
        Style::Link { destination, .. } => ("link", Some(destination.clone())),
        Style::Image { destination, .. } => ("image", Some(destination.clone())),
        Style::Html { payload } => ("generic-html", Some(payload.clone())),
    };
    RangeEntry {
        start: range.start,
        end: range.end,
        style,
        detail,
    }
}
