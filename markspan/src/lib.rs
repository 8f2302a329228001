//! `markspan` — markup-tree renderer producing styled text.
//!
//! Converts a parsed lightweight-markup document (a tree of typed block
//! and inline nodes) into a flat text buffer plus an ordered collection
//! of formatting ranges suitable for rich-text display. Parsing raw
//! markup into a tree and painting the annotated buffer on screen are
//! both external collaborators; this crate is the rendering core
//! between them.
//!
//! # Quick start
//!
//! ```
//! let doc = markspan::parse("Hello **world**\n");
//! let styled = doc.to_styled(&markspan::RenderConfig::default()).unwrap();
//! assert_eq!(styled.text(), "Hello world\n\n");
//! assert_eq!(styled.ranges().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod inline;
pub mod parse;
pub mod render;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod styled;
pub mod types;

pub use config::*;
pub use error::*;
pub use inline::TagToken;
pub use parse::parse;
pub use render::render;
pub use styled::*;
pub use types::*;

impl Document {
    /// Render this document into styled text.
    pub fn to_styled(&self, config: &RenderConfig) -> Result<StyledText, RenderError> {
        render::render(self, config)
    }

    /// Render this document as ANSI-colored terminal text.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self, config: &RenderConfig) -> Result<String, RenderError> {
        let styled = render::render(self, config)?;
        Ok(render_term::to_ansi(&styled, &config.theme))
    }
}
