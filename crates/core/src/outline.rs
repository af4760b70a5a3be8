//! Plain-text outline output.
//!
//! Renders a compiled deck as an indented outline, one block per slide,
//! separated by blank lines. Useful for reviewing where content landed
//! without opening a presentation.

use crate::types::{
    Alignment, CodeBlock, ContentBlock, ContentEntry, ImageRef, Paragraph, ParagraphKind,
    SlideDeck, SlideDescriptor, Table, TableCell, TextRun, TocSlide,
};

/// Formatter for the outline view of a deck.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Spaces per paragraph level.
    indent_width: usize,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

impl OutlineFormatter {
    /// Create a formatter with two spaces per level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom number of spaces per level.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Format a deck into outline text.
    ///
    /// # Example output
    /// ```text
    /// [1] Title Slide: Quarterly Review
    /// <subtitle>
    /// Q3
    ///
    /// [2] Title and Content: Results
    /// <Content Placeholder 2>
    /// - Revenue <b>up</b>
    ///   - Costs flat
    /// ```
    pub fn format(&self, deck: &SlideDeck) -> String {
        let mut blocks: Vec<String> = deck.slides.iter().map(|s| self.slide(s)).collect();
        if let Some(toc) = &deck.toc {
            blocks.push(self.toc(toc, deck.slides.len() + 1));
        }
        blocks.join("\n\n")
    }

    /// Format and add a trailing newline.
    pub fn format_with_newline(&self, deck: &SlideDeck) -> String {
        let formatted = self.format(deck);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }

    fn slide(&self, slide: &SlideDescriptor) -> String {
        let mut lines = vec![heading(slide.number(), &slide.layout, slide.title.as_deref())];

        if !slide.subtitle.is_empty() {
            lines.push("<subtitle>".to_string());
            lines.extend(slide.subtitle.iter().cloned());
        }
        for placeholder in &slide.placeholders {
            self.section(&mut lines, &placeholder.name, &placeholder.block);
        }
        if !slide.rescue.is_empty() {
            self.section(&mut lines, "rescue", &slide.rescue);
        }

        lines.join("\n")
    }

    fn toc(&self, toc: &TocSlide, number: usize) -> String {
        let mut lines = vec![heading(number, &toc.layout, Some(&toc.title))];
        for entry in &toc.entries {
            lines.push(format!(
                "{}- {} (slide {})",
                self.pad(entry.level()),
                entry.text,
                entry.slide_index + 1
            ));
        }
        lines.join("\n")
    }

    fn section(&self, lines: &mut Vec<String>, name: &str, block: &ContentBlock) {
        if block.font_sizes.is_empty() {
            lines.push(format!("<{}>", name));
        } else {
            lines.push(format!("<{}> {}", name, block.font_sizes));
        }
        for entry in &block.entries {
            match entry {
                ContentEntry::Paragraph(p) => lines.push(self.paragraph(p)),
                ContentEntry::Table(t) => self.table(lines, t),
                ContentEntry::Image(i) => lines.push(self.image(i)),
                ContentEntry::Code(c) => self.code(lines, c),
            }
        }
    }

    fn paragraph(&self, paragraph: &Paragraph) -> String {
        let marker = match paragraph.kind {
            ParagraphKind::Blank => return String::new(),
            ParagraphKind::Bullet => "- ",
            ParagraphKind::SubHeading => "### ",
            ParagraphKind::Text | ParagraphKind::Numbered => "",
        };
        format!(
            "{}{}{}",
            self.pad(paragraph.level),
            marker,
            tagged(&paragraph.runs)
        )
    }

    fn table(&self, lines: &mut Vec<String>, table: &Table) {
        let pad = self.pad(table.level);
        lines.push(format!("{}{}", pad, row(&table.header)));

        let separator: Vec<&str> = table
            .alignments
            .iter()
            .map(|a| match a {
                Alignment::Left => "---",
                Alignment::Center => ":---:",
                Alignment::Right => "---:",
            })
            .collect();
        lines.push(format!("{}| {} |", pad, separator.join(" | ")));

        for cells in &table.rows {
            lines.push(format!("{}{}", pad, row(cells)));
        }
    }

    fn image(&self, image: &ImageRef) -> String {
        format!(
            "{}![{}]({})",
            self.pad(image.level),
            image.caption.as_deref().unwrap_or_default(),
            image.path.display()
        )
    }

    fn code(&self, lines: &mut Vec<String>, code: &CodeBlock) {
        let pad = self.pad(code.level);
        lines.push(format!("{}```{}", pad, code.info.as_deref().unwrap_or_default()));
        for line in code.code.lines() {
            lines.push(format!("{}{}", pad, line));
        }
        lines.push(format!("{}```", pad));
    }

    fn pad(&self, level: u8) -> String {
        " ".repeat(self.indent_width * level as usize)
    }
}

fn heading(number: usize, layout: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("[{}] {}: {}", number, layout, title),
        None => format!("[{}] {}", number, layout),
    }
}

fn row(cells: &[TableCell]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| tagged(&c.runs)).collect();
    format!("| {} |", cells.join(" | "))
}

/// Re-emit inline tags around styled runs.
fn tagged(runs: &[TextRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let tags: Vec<char> = [(run.bold, 'b'), (run.italic, 'i'), (run.underline, 'u')]
            .into_iter()
            .filter_map(|(on, tag)| on.then_some(tag))
            .collect();
        for tag in &tags {
            out.push_str(&format!("<{}>", tag));
        }
        out.push_str(&run.text);
        for tag in tags.iter().rev() {
            out.push_str(&format!("</{}>", tag));
        }
    }
    out
}
