//! Core slide model, Markdown segmentation and the outline formatter
//! for compiling Markdown documents into template-driven slide decks.

pub mod catalog;
pub mod compile;
pub mod directive;
pub mod error;
pub mod fontsize;
pub mod frontmatter;
pub mod image;
pub mod inline;
pub mod level;
pub mod outline;
pub mod segment;
pub mod table;
pub mod toc;
pub mod types;

pub use catalog::{LayoutCatalog, LayoutInfo, LayoutNames, PlaceholderInfo, PlaceholderKind, StaticCatalog};
pub use compile::{compile, compile_document, CompileOptions};
pub use error::{Error, Result};
pub use fontsize::FontSizeTable;
pub use frontmatter::FrontMatter;
pub use image::{FsImageLocator, ImageLocator};
pub use outline::OutlineFormatter;
pub use types::{
    ContentBlock, ContentEntry, Document, Paragraph, ParagraphKind, SlideDeck, SlideDescriptor,
    TextRun, TocEntry, TocSlide,
};
