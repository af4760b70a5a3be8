//! Domain types for the compiled slide model.

use crate::fontsize::FontSizeTable;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Deepest indentation level a paragraph can carry.
pub const MAX_LEVEL: u8 = 4;

/// Number of indentation levels (0 through `MAX_LEVEL`).
pub const LEVEL_COUNT: usize = MAX_LEVEL as usize + 1;

/// A Markdown source document and the directory relative paths resolve against.
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw document text.
    pub text: String,

    /// Absolute directory of the source file.
    pub base_dir: PathBuf,
}

impl Document {
    /// Create a document from in-memory text.
    pub fn new(text: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Read a UTF-8 document from disk.
    ///
    /// An unreadable source is one of the few fatal conditions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let absolute = std::fs::canonicalize(path)?;
        let base_dir = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { text, base_dir })
    }
}

/// A fragment of text with inline formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextRun {
    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Whether no style flag is set.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

/// Concatenate the text of a run list.
pub fn runs_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// How a paragraph was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphKind {
    /// Plain paragraph text.
    Text,
    /// `-`, `*` or `+` list item.
    Bullet,
    /// `N.` list item; the number stays in the text.
    Numbered,
    /// A depth 4-6 heading inside a slide.
    SubHeading,
    /// Empty separator paragraph.
    Blank,
}

/// A paragraph made of styled runs at an indentation level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub level: u8,
    pub kind: ParagraphKind,
}

impl Paragraph {
    /// Create a paragraph, clipping the level to `MAX_LEVEL`.
    pub fn new(runs: Vec<TextRun>, level: u8, kind: ParagraphKind) -> Self {
        Self {
            runs,
            level: level.min(MAX_LEVEL),
            kind,
        }
    }

    /// The structural empty paragraph.
    pub fn blank() -> Self {
        Self {
            runs: Vec::new(),
            level: 0,
            kind: ParagraphKind::Blank,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == ParagraphKind::Blank
    }

    /// Get the paragraph text without formatting.
    pub fn plain_text(&self) -> String {
        runs_text(&self.runs)
    }
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub runs: Vec<TextRun>,
}

impl TableCell {
    pub fn plain_text(&self) -> String {
        runs_text(&self.runs)
    }
}

/// A pipe table with per-column alignment and width weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header row cells.
    pub header: Vec<TableCell>,

    /// Body rows, each with exactly `column_count()` cells.
    pub rows: Vec<Vec<TableCell>>,

    /// Alignment per column.
    pub alignments: Vec<Alignment>,

    /// Relative width per column, from the separator dash count (at least 1).
    pub widths: Vec<u32>,

    pub level: u8,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Number of body rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An image routed to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Resolved location of the image file.
    pub path: PathBuf,

    /// Caption text; `None` when the alt text was empty.
    pub caption: Option<String>,

    /// Name of the placeholder the image was captured for.
    pub placeholder: String,

    pub level: u8,
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Info string after the opening fence, if any.
    pub info: Option<String>,
    pub code: String,
    pub level: u8,
}

/// One entry of a content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentEntry {
    Paragraph(Paragraph),
    Table(Table),
    Image(ImageRef),
    Code(CodeBlock),
}

impl ContentEntry {
    pub fn level(&self) -> u8 {
        match self {
            ContentEntry::Paragraph(p) => p.level,
            ContentEntry::Table(t) => t.level,
            ContentEntry::Image(i) => i.level,
            ContentEntry::Code(c) => c.level,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, ContentEntry::Paragraph(p) if p.is_blank())
    }
}

/// Ordered content destined for one region of a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub entries: Vec<ContentEntry>,

    /// Resolved font sizes for this region.
    pub font_sizes: FontSizeTable,
}

impl ContentBlock {
    /// Create an empty block with the given font sizes.
    pub fn with_font_sizes(font_sizes: FontSizeTable) -> Self {
        Self {
            entries: Vec::new(),
            font_sizes,
        }
    }

    pub fn push(&mut self, entry: ContentEntry) {
        self.entries.push(entry);
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.entries.push(ContentEntry::Paragraph(paragraph));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the block holds nothing but blank separator paragraphs.
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(ContentEntry::is_blank)
    }

    /// Whether the last entry is a blank separator.
    pub fn ends_with_blank(&self) -> bool {
        self.entries.last().is_some_and(ContentEntry::is_blank)
    }

    /// Remove blank separators from both ends.
    pub fn trim_blank_edges(&mut self) {
        while self.entries.last().is_some_and(ContentEntry::is_blank) {
            self.entries.pop();
        }
        let leading = self
            .entries
            .iter()
            .take_while(|e| e.is_blank())
            .count();
        self.entries.drain(..leading);
    }

    /// Iterate over the paragraphs, skipping other entries.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.entries.iter().filter_map(|e| match e {
            ContentEntry::Paragraph(p) => Some(p),
            _ => None,
        })
    }
}

/// Content captured for a named placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderContent {
    pub name: String,
    pub block: ContentBlock,
}

/// A fully resolved slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    /// 0-based position in the deck.
    pub index: usize,

    /// Resolved layout name (never empty).
    pub layout: String,

    /// Title text from the heading that opened the slide.
    pub title: Option<String>,

    /// Subtitle lines of a title slide.
    pub subtitle: Vec<String>,

    /// Placeholder contents in first-claim order; each name appears once.
    pub placeholders: Vec<PlaceholderContent>,

    /// Content that could not be placed in the body placeholder.
    pub rescue: ContentBlock,

    /// Document and page font sizes merged.
    pub font_sizes: FontSizeTable,
}

impl SlideDescriptor {
    /// Create an empty slide.
    pub fn new(index: usize, layout: impl Into<String>, font_sizes: FontSizeTable) -> Self {
        Self {
            index,
            layout: layout.into(),
            title: None,
            subtitle: Vec::new(),
            placeholders: Vec::new(),
            rescue: ContentBlock::with_font_sizes(font_sizes),
            font_sizes,
        }
    }

    /// Get the content routed to a placeholder.
    pub fn placeholder(&self, name: &str) -> Option<&ContentBlock> {
        self.placeholders
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.block)
    }

    /// Get the block for `name`, creating it at the end of the order if absent.
    pub fn placeholder_entry(&mut self, name: &str) -> &mut ContentBlock {
        let pos = match self.placeholders.iter().position(|p| p.name == name) {
            Some(pos) => pos,
            None => {
                self.placeholders.push(PlaceholderContent {
                    name: name.to_string(),
                    block: ContentBlock::with_font_sizes(self.font_sizes),
                });
                self.placeholders.len() - 1
            }
        };
        &mut self.placeholders[pos].block
    }

    /// Remove a placeholder's content, returning it.
    pub fn take_placeholder(&mut self, name: &str) -> Option<ContentBlock> {
        let pos = self.placeholders.iter().position(|p| p.name == name)?;
        Some(self.placeholders.remove(pos).block)
    }

    /// 1-based number used in log messages.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Which heading tier produced a TOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TocTier {
    /// `##` heading.
    Section,
    /// `###` heading.
    Content,
}

/// A table-of-contents entry pointing at a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub text: String,
    pub slide_index: usize,
    pub tier: TocTier,
}

impl TocEntry {
    /// Paragraph level on the TOC slide.
    pub fn level(&self) -> u8 {
        match self.tier {
            TocTier::Section => 0,
            TocTier::Content => 1,
        }
    }
}

/// The closing table-of-contents slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSlide {
    pub title: String,
    pub layout: String,
    pub entries: Vec<TocEntry>,
}

/// The compiled slide model handed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    /// Content slides in order; `slides[i].index == i`.
    pub slides: Vec<SlideDescriptor>,

    /// Trailing TOC slide, when enabled and non-empty.
    pub toc: Option<TocSlide>,
}

impl SlideDeck {
    /// TOC entries, empty when no TOC slide was produced.
    pub fn toc_entries(&self) -> &[TocEntry] {
        self.toc.as_ref().map(|t| t.entries.as_slice()).unwrap_or(&[])
    }
}
