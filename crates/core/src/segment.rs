//! Slide segmentation: the line-by-line state machine that opens slides,
//! routes content to placeholders or the rescue block, and finalizes each
//! slide against the layout catalog.

use crate::catalog::{resolve_layout, LayoutCatalog, LayoutNames};
use crate::directive::{parse_directive, Directive, DirectiveKind};
use crate::fontsize::FontSizeTable;
use crate::frontmatter::FrontMatter;
use crate::image::{parse_image_line, ImageLine, ImageLocator};
use crate::inline::{parse_runs, plain_text};
use crate::level::Leveler;
use crate::table::{is_table_line, looks_like_table, parse_table};
use crate::toc::TocCollector;
use crate::types::{
    CodeBlock, ContentBlock, ContentEntry, ImageRef, Paragraph, ParagraphKind,
    PlaceholderContent, SlideDescriptor, MAX_LEVEL,
};
use regex::Regex;
use std::sync::LazyLock;

/// ATX heading, `#` through `######`.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

/// `title:`, `subtitle:` or `author:` line in the body of a title slide.
static TITLE_FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(title|subtitle|author)\s*:\s*(.*?)\s*$").unwrap());

/// Opening and closing line of a fenced code block.
const CODE_FENCE: &str = "```";

/// Deepest heading that opens a new slide.
const SLIDE_HEADING_DEPTH: usize = 3;

/// Heading depth that maps to base level 0.
const BASE_LEVEL_HEADING_DEPTH: usize = 4;

/// Parse a trimmed line as a heading, returning depth and text.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING_REGEX.captures(line.trim())?;
    let depth = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str().trim();
    Some((depth, text))
}

/// Where the segmenter is within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No slide has been opened yet.
    AwaitingFirstSlide,
    /// Inside a slide, nothing being accumulated.
    InSlide,
    /// Lines go to a named placeholder until a blank line.
    InPlaceholderCapture,
    /// Lines are accumulating in the rescue block.
    InRescueCapture,
}

/// An open `placeholder=` capture.
#[derive(Debug)]
struct Capture {
    name: String,
    font_sizes: FontSizeTable,
    /// Whether this capture has written anything yet.
    started: bool,
    has_image: bool,
}

/// A `layout=` directive waiting for its heading.
#[derive(Debug)]
struct PendingLayout {
    name: String,
    font_sizes: FontSizeTable,
}

#[derive(Debug)]
struct CodeFence {
    info: Option<String>,
    lines: Vec<String>,
}

/// The slide currently being built.
#[derive(Debug)]
struct OpenSlide {
    slide: SlideDescriptor,
    /// Placeholder names claimed by directives on this slide.
    targeted: Vec<String>,
    /// Seeded title slide that the first `#` heading folds into.
    foldable: bool,
    /// Subtitle region sources of a title slide.
    subtitle: Option<String>,
    author: Option<String>,
}

impl OpenSlide {
    /// Rebuild the subtitle lines: subtitle, then author.
    fn refresh_subtitle(&mut self) {
        self.slide.subtitle = [&self.subtitle, &self.author]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
    }
}

/// Mutable scan context for one document.
pub struct Segmenter<'a> {
    catalog: &'a dyn LayoutCatalog,
    locator: &'a dyn ImageLocator,
    names: &'a LayoutNames,
    front_matter: Option<&'a FrontMatter>,
    document_sizes: FontSizeTable,
    leveler: Leveler,
    state: ScanState,
    slides: Vec<SlideDescriptor>,
    current: Option<OpenSlide>,
    capture: Option<Capture>,
    pending_layout: Option<PendingLayout>,
    base_level: u8,
    table_lines: Vec<String>,
    fence: Option<CodeFence>,
    toc: TocCollector,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter. A front matter title or subtitle seeds slide 0.
    pub fn new(
        catalog: &'a dyn LayoutCatalog,
        locator: &'a dyn ImageLocator,
        names: &'a LayoutNames,
        front_matter: Option<&'a FrontMatter>,
        default_indent: usize,
    ) -> Self {
        let indent = front_matter
            .and_then(|fm| fm.indent)
            .unwrap_or(default_indent);

        let mut segmenter = Self {
            catalog,
            locator,
            names,
            front_matter,
            document_sizes: front_matter.map(|fm| fm.font_sizes).unwrap_or_default(),
            leveler: Leveler::new(indent),
            state: ScanState::AwaitingFirstSlide,
            slides: Vec::new(),
            current: None,
            capture: None,
            pending_layout: None,
            base_level: 0,
            table_lines: Vec::new(),
            fence: None,
            toc: TocCollector::new(front_matter.is_some_and(|fm| fm.toc)),
        };

        if let Some(fm) = front_matter.filter(|fm| fm.declares_title()) {
            segmenter.open_slide(Some(names.title.as_str()), None, FontSizeTable::new());
            if let Some(open) = segmenter.current.as_mut() {
                open.slide.title = fm.title.clone();
                open.subtitle = fm.subtitle.clone();
                open.author = fm.author.clone();
                open.refresh_subtitle();
                open.foldable = true;
            }
        }

        segmenter
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Number of slides opened so far, including the open one.
    pub fn slide_count(&self) -> usize {
        self.slides.len() + usize::from(self.current.is_some())
    }

    /// Feed every line, with one line of lookahead.
    pub fn run(&mut self, lines: &[&str]) {
        let mut cursor = lines.iter().peekable();
        while let Some(line) = cursor.next() {
            let next = cursor.peek().map(|l| **l);
            self.feed(line, next);
        }
    }

    /// Process one line. `next` is the following line, if any.
    pub fn feed(&mut self, line: &str, next: Option<&str>) {
        if self.fence.is_some() {
            self.feed_fenced(line);
            return;
        }

        let trimmed = line.trim();
        if is_table_line(trimmed) {
            self.table_lines.push(trimmed.to_string());
            return;
        }
        self.flush_table();

        if let Some(info) = trimmed.strip_prefix(CODE_FENCE) {
            let info = info.trim();
            self.fence = Some(CodeFence {
                info: (!info.is_empty()).then(|| info.to_string()),
                lines: Vec::new(),
            });
            return;
        }

        if let Some(directive) = parse_directive(trimmed) {
            if directive.is_directive() {
                self.apply_directive(directive, next);
                return;
            }
        }

        if let Some((depth, text)) = parse_heading(trimmed) {
            self.heading(depth, text);
            return;
        }

        if trimmed.is_empty() {
            self.blank();
            return;
        }

        if let Some(image) = parse_image_line(trimmed) {
            self.image(image);
            return;
        }

        self.text(line);
    }

    /// Close the open slide and return the slides plus the TOC collector.
    pub fn finish(mut self) -> (Vec<SlideDescriptor>, TocCollector) {
        if let Some(fence) = self.fence.take() {
            log::warn!(
                "Slide {}: code block is not closed before the end of the document.",
                self.slide_number()
            );
            self.push_code(fence);
        }
        self.close_slide();
        (self.slides, self.toc)
    }

    fn slide_number(&self) -> usize {
        match &self.current {
            Some(open) => open.slide.number(),
            None => self.slides.len() + 1,
        }
    }

    fn apply_directive(&mut self, directive: Directive, next: Option<&str>) {
        let font_sizes = directive.font_size_table();
        match directive.kind {
            DirectiveKind::Layout(name) => {
                let heading_follows = next
                    .and_then(parse_heading)
                    .is_some_and(|(depth, _)| depth <= SLIDE_HEADING_DEPTH);
                if heading_follows {
                    self.pending_layout = Some(PendingLayout { name, font_sizes });
                } else {
                    log::warn!(
                        "Slide {}: layout '{}' ignored (no heading follows).",
                        self.slide_number(),
                        name
                    );
                }
            }
            DirectiveKind::NewPage(name) => {
                self.pending_layout = None;
                self.open_slide(name.as_deref(), None, font_sizes);
            }
            DirectiveKind::Placeholder(name) => self.open_capture(name, font_sizes),
            DirectiveKind::None => {}
        }
    }

    fn heading(&mut self, depth: usize, raw: &str) {
        if depth <= SLIDE_HEADING_DEPTH {
            let pending = self.pending_layout.take();
            let text = plain_text(raw);

            let fold = depth == 1 && self.current.as_ref().is_some_and(|open| open.foldable);
            if fold {
                self.fold_title(text, pending);
                return;
            }

            let (requested, page_sizes) = match pending {
                Some(p) => (Some(p.name), p.font_sizes),
                None => (None, FontSizeTable::new()),
            };
            let index = self.open_slide(requested.as_deref(), Some(depth), page_sizes);
            if let Some(open) = self.current.as_mut() {
                open.slide.title = Some(text.clone());
            }
            self.toc.record(depth, &text, index);
            return;
        }

        self.ensure_slide();
        self.base_level = ((depth - BASE_LEVEL_HEADING_DEPTH) as u8).min(MAX_LEVEL);
        let runs = parse_runs(raw, self.slide_number());
        let paragraph = Paragraph::new(runs, self.base_level, ParagraphKind::SubHeading);
        self.push_entry(ContentEntry::Paragraph(paragraph));
    }

    /// Put the first `#` heading on the seeded title slide.
    fn fold_title(&mut self, text: String, pending: Option<PendingLayout>) {
        self.flush_table();
        self.capture = None;
        self.base_level = 0;
        self.state = ScanState::InSlide;

        let Some(open) = self.current.as_mut() else {
            return;
        };
        log::debug!("Slide {}: title heading folded into title slide.", open.slide.number());
        open.foldable = false;
        open.slide.title = Some(text);
        if let Some(pending) = pending {
            open.slide.layout = resolve_layout(
                self.catalog,
                self.names,
                &pending.name,
                open.slide.number(),
            );
            open.slide.font_sizes = self.document_sizes.overlay(&pending.font_sizes);
            open.slide.rescue.font_sizes = open.slide.font_sizes;
        }
    }

    fn auto_layout(&self, depth: Option<usize>) -> &'a str {
        let names = self.names;
        match depth {
            Some(1) => &names.title,
            Some(2) => &names.section,
            Some(_) => &names.content,
            None if self.front_matter.is_some() && self.slide_count() == 0 => &names.title,
            None => &names.content,
        }
    }

    /// Finalize the open slide and start a new one. Returns its index.
    fn open_slide(
        &mut self,
        requested: Option<&str>,
        depth: Option<usize>,
        page_sizes: FontSizeTable,
    ) -> usize {
        let wanted = requested.unwrap_or_else(|| self.auto_layout(depth)).to_string();
        self.close_slide();

        let index = self.slides.len();
        let layout = resolve_layout(self.catalog, self.names, &wanted, index + 1);
        log::debug!("Slide {}: opened with layout '{}'.", index + 1, layout);

        let font_sizes = self.document_sizes.overlay(&page_sizes);
        self.current = Some(OpenSlide {
            slide: SlideDescriptor::new(index, layout, font_sizes),
            targeted: Vec::new(),
            foldable: false,
            subtitle: None,
            author: None,
        });
        self.state = ScanState::InSlide;
        index
    }

    /// Open an implicit slide for content that precedes any boundary.
    fn ensure_slide(&mut self) {
        if self.current.is_none() {
            log::info!(
                "Slide {}: content before the first heading opens a slide.",
                self.slides.len() + 1
            );
            self.open_slide(None, None, FontSizeTable::new());
        }
    }

    fn close_slide(&mut self) {
        self.flush_table();
        self.capture = None;
        self.base_level = 0;
        if let Some(open) = self.current.take() {
            let slide = self.finalize(open);
            self.slides.push(slide);
        }
    }

    fn open_capture(&mut self, name: String, font_sizes: FontSizeTable) {
        self.ensure_slide();
        if let Some(open) = self.current.as_mut() {
            if !open.targeted.contains(&name) {
                open.targeted.push(name.clone());
            }
        }
        self.capture = Some(Capture {
            name,
            font_sizes,
            started: false,
            has_image: false,
        });
        self.state = ScanState::InPlaceholderCapture;
    }

    /// Append an entry to the open capture, or to the rescue block.
    fn push_entry(&mut self, entry: ContentEntry) {
        self.ensure_slide();
        let Some(open) = self.current.as_mut() else {
            return;
        };

        match self.capture.as_mut() {
            Some(capture) => {
                let block = open.slide.placeholder_entry(&capture.name);
                if !capture.started {
                    if !block.is_empty() {
                        block.push_paragraph(Paragraph::blank());
                    }
                    block.font_sizes = block.font_sizes.overlay(&capture.font_sizes);
                    capture.started = true;
                }
                block.push(entry);
            }
            None => {
                open.slide.rescue.push(entry);
                self.state = ScanState::InRescueCapture;
            }
        }
    }

    fn blank(&mut self) {
        match self.state {
            ScanState::InPlaceholderCapture => {
                self.capture = None;
                self.state = ScanState::InSlide;
            }
            ScanState::InRescueCapture => {
                if let Some(open) = self.current.as_mut() {
                    open.slide.rescue.push_paragraph(Paragraph::blank());
                }
                self.state = ScanState::InSlide;
            }
            ScanState::AwaitingFirstSlide | ScanState::InSlide => {}
        }
    }

    fn text(&mut self, line: &str) {
        self.ensure_slide();
        if self.title_field(line) {
            return;
        }
        let paragraph = self
            .leveler
            .paragraph(line, self.base_level, self.slide_number());
        self.push_entry(ContentEntry::Paragraph(paragraph));
    }

    /// Fill the title or subtitle region from a `key: value` line on a
    /// title slide. Returns whether the line was consumed.
    fn title_field(&mut self, line: &str) -> bool {
        if self.capture.is_some() {
            return false;
        }
        let Some(open) = self.current.as_mut() else {
            return false;
        };
        if open.slide.layout != self.names.title {
            return false;
        }
        let Some(caps) = TITLE_FIELD_REGEX.captures(line) else {
            return false;
        };

        let value = plain_text(&caps[2]);
        match caps[1].to_ascii_lowercase().as_str() {
            "title" => open.slide.title = Some(value),
            "subtitle" => open.subtitle = Some(value),
            _ => open.author = Some(value),
        }
        open.refresh_subtitle();
        log::debug!("Slide {}: title slide field '{}' set.", open.slide.number(), &caps[1]);
        true
    }

    fn image(&mut self, image: ImageLine) {
        let number = self.slide_number();
        let Some(capture) = self.capture.as_ref() else {
            log::debug!(
                "Slide {}: image '{}' outside a placeholder ignored.",
                number,
                image.path
            );
            return;
        };
        if capture.has_image {
            log::warn!(
                "Slide {}: '{}' image limit reached. Ignoring extra.",
                number,
                capture.name
            );
            return;
        }
        let Some(path) = self.locator.locate(&image.path) else {
            log::warn!("Slide {}: image '{}' not found. Skipping.", number, image.path);
            return;
        };

        let placeholder = capture.name.clone();
        if let Some(capture) = self.capture.as_mut() {
            capture.has_image = true;
        }
        self.push_entry(ContentEntry::Image(ImageRef {
            path,
            caption: image.caption,
            placeholder,
            level: self.base_level,
        }));
    }

    fn flush_table(&mut self) {
        if self.table_lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.table_lines);

        if !looks_like_table(&lines) {
            for line in &lines {
                self.text(line);
            }
            return;
        }

        let number = self.slide_number();
        if self.capture.is_none() {
            log::debug!("Slide {}: table outside a placeholder ignored.", number);
            return;
        }
        match parse_table(&lines, self.base_level, number) {
            Ok(table) => self.push_entry(ContentEntry::Table(table)),
            Err(e) => log::warn!("Slide {}: table dropped: {}.", number, e),
        }
    }

    fn feed_fenced(&mut self, line: &str) {
        if line.trim().starts_with(CODE_FENCE) {
            if let Some(fence) = self.fence.take() {
                self.push_code(fence);
            }
        } else if let Some(fence) = self.fence.as_mut() {
            fence.lines.push(line.to_string());
        }
    }

    fn push_code(&mut self, fence: CodeFence) {
        let entry = ContentEntry::Code(CodeBlock {
            info: fence.info,
            code: fence.lines.join("\n"),
            level: self.base_level,
        });
        self.push_entry(entry);
    }

    /// Reroute unknown placeholders, then reconcile the rescue block.
    fn finalize(&self, open: OpenSlide) -> SlideDescriptor {
        let OpenSlide {
            mut slide,
            targeted,
            ..
        } = open;
        let number = slide.number();

        let missing: Vec<String> = slide
            .placeholders
            .iter()
            .filter(|p| !self.catalog.has_placeholder(&slide.layout, &p.name))
            .map(|p| p.name.clone())
            .collect();
        for name in missing {
            if let Some(block) = slide.take_placeholder(&name) {
                log::warn!(
                    "Slide {}: '{}' not found on layout '{}'. Rescuing content.",
                    number,
                    name,
                    slide.layout
                );
                reroute(&mut slide.rescue, block, number);
            }
        }

        slide.rescue.trim_blank_edges();
        if slide.rescue.is_blank() {
            return slide;
        }

        if slide.layout == self.names.title {
            log::debug!("Slide {}: body content on a title slide discarded.", number);
            slide.rescue.entries.clear();
            return slide;
        }

        match self.catalog.body_placeholder(&slide.layout, &targeted) {
            Some(body) => {
                if targeted.is_empty() {
                    log::debug!("Slide {}: placing body content in '{}'.", number, body);
                } else {
                    log::info!("Slide {}: placing rescued content into '{}'.", number, body);
                }
                let block = std::mem::replace(
                    &mut slide.rescue,
                    ContentBlock::with_font_sizes(slide.font_sizes),
                );
                slide.placeholders.push(PlaceholderContent {
                    name: body.to_string(),
                    block,
                });
            }
            None => log::warn!(
                "Slide {}: layout '{}' has no free body placeholder for unrouted content.",
                number,
                slide.layout
            ),
        }
        slide
    }
}

/// Move a rejected placeholder block into the rescue block.
///
/// Tables and images need an explicit target and are dropped.
fn reroute(rescue: &mut ContentBlock, block: ContentBlock, slide: usize) {
    let kept: Vec<ContentEntry> = block
        .entries
        .into_iter()
        .filter(|entry| match entry {
            ContentEntry::Table(_) | ContentEntry::Image(_) => {
                log::warn!("Slide {}: table or image without a target dropped.", slide);
                false
            }
            _ => true,
        })
        .collect();

    let has_content = kept
        .iter()
        .any(|e| !matches!(e, ContentEntry::Paragraph(p) if p.is_blank()));
    if !has_content {
        return;
    }
    if !rescue.is_empty() && !rescue.ends_with_blank() {
        rescue.push_paragraph(Paragraph::blank());
    }
    rescue.entries.extend(kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use std::path::PathBuf;

    struct AnyImage;

    impl ImageLocator for AnyImage {
        fn locate(&self, path: &str) -> Option<PathBuf> {
            (path != "missing.png").then(|| PathBuf::from("/images").join(path))
        }
    }

    fn segment(front_matter: Option<&FrontMatter>, src: &str) -> Vec<SlideDescriptor> {
        let catalog = StaticCatalog::office_default();
        let names = LayoutNames::default();
        let locator = AnyImage;
        let lines: Vec<&str> = src.lines().collect();
        let mut segmenter = Segmenter::new(&catalog, &locator, &names, front_matter, 2);
        segmenter.run(&lines);
        segmenter.finish().0
    }

    fn texts(block: &ContentBlock) -> Vec<String> {
        block.paragraphs().map(Paragraph::plain_text).collect()
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("## Section"), Some((2, "Section")));
        assert_eq!(parse_heading("  ####   Deep  "), Some((4, "Deep")));
        assert_eq!(parse_heading("#NoSpace"), None);
        assert_eq!(parse_heading("####### seven"), None);
    }

    #[test]
    fn test_state_transitions() {
        let catalog = StaticCatalog::office_default();
        let names = LayoutNames::default();
        let locator = AnyImage;
        let mut segmenter = Segmenter::new(&catalog, &locator, &names, None, 2);
        assert_eq!(segmenter.state(), ScanState::AwaitingFirstSlide);

        segmenter.feed("### Slide", None);
        assert_eq!(segmenter.state(), ScanState::InSlide);

        segmenter.feed(r#"<!-- placeholder="Content Placeholder 2" -->"#, None);
        assert_eq!(segmenter.state(), ScanState::InPlaceholderCapture);

        segmenter.feed("captured", None);
        assert_eq!(segmenter.state(), ScanState::InPlaceholderCapture);

        segmenter.feed("", None);
        assert_eq!(segmenter.state(), ScanState::InSlide);

        segmenter.feed("loose", None);
        assert_eq!(segmenter.state(), ScanState::InRescueCapture);

        segmenter.feed("", None);
        assert_eq!(segmenter.state(), ScanState::InSlide);
        assert_eq!(segmenter.slide_count(), 1);
    }

    #[test]
    fn test_heading_depths_pick_layouts() {
        let slides = segment(None, "# Deck\n## Part\n### Point\n<!-- new_page -->");
        let layouts: Vec<_> = slides.iter().map(|s| s.layout.as_str()).collect();
        assert_eq!(
            layouts,
            vec!["Title Slide", "Section Header", "Title and Content", "Title and Content"]
        );
        assert_eq!(slides[2].title.as_deref(), Some("Point"));
        assert_eq!(slides[3].title, None);
        let indices: Vec<_> = slides.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_layout_directive_needs_heading() {
        let slides = segment(
            None,
            "<!-- layout=\"Two Content\" -->\n### Applied\n<!-- layout=\"Blank\" -->\ntext\n### Auto",
        );
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout, "Two Content");
        assert_eq!(slides[1].layout, "Title and Content");
        // The discarded directive does not become content.
        assert_eq!(
            texts(slides[0].placeholder("Content Placeholder 2").unwrap()),
            vec!["text"]
        );
    }

    #[test]
    fn test_new_page_with_layout() {
        let slides = segment(None, "<!-- new_page=\"Title Only\" -->\n<!-- new_page=\"Nope\" -->");
        assert_eq!(slides[0].layout, "Title Only");
        assert_eq!(slides[1].layout, "Title and Content");
    }

    #[test]
    fn test_sub_headings_set_base_level() {
        let slides = segment(None, "### S\n#### Group\n- a\n  - b\n##### Deeper\n- c\n### Next\n- d");
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        let levels: Vec<_> = body.paragraphs().map(|p| (p.plain_text(), p.level)).collect();
        assert_eq!(
            levels,
            vec![
                ("Group".to_string(), 0),
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("Deeper".to_string(), 1),
                ("c".to_string(), 1),
            ]
        );
        assert_eq!(body.paragraphs().next().map(|p| p.kind), Some(ParagraphKind::SubHeading));

        // Base level resets at the slide boundary.
        let next = slides[1].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(next.paragraphs().next().map(|p| p.level), Some(0));
    }

    #[test]
    fn test_capture_ends_at_blank_line() {
        let slides = segment(
            None,
            "### S\n<!-- placeholder=\"Content Placeholder 3\" -->\none\ntwo\n\nrescued",
        );
        let slide = &slides[0];
        assert_eq!(slide.layout, "Title and Content");
        // Content Placeholder 3 is not on this layout: rerouted into the body.
        let body = slide.placeholder("Content Placeholder 2").unwrap();
        assert_eq!(texts(body), vec!["rescued", "", "one", "two"]);
    }

    #[test]
    fn test_repeated_capture_appends_with_separator() {
        let slides = segment(
            None,
            "<!-- layout=\"Two Content\" -->\n### S\n<!-- placeholder=\"Content Placeholder 3\" -->\nA\n\n<!-- placeholder=\"Content Placeholder 2\" -->\nX\n\n<!-- placeholder=\"Content Placeholder 3\" -->\nB",
        );
        let slide = &slides[0];
        let right = slide.placeholder("Content Placeholder 3").unwrap();
        assert_eq!(texts(right), vec!["A", "", "B"]);
        assert!(right.paragraphs().nth(1).unwrap().is_blank());

        let names: Vec<_> = slide.placeholders.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Content Placeholder 3", "Content Placeholder 2"]);
    }

    #[test]
    fn test_rescue_skips_targeted_body() {
        let slides = segment(
            None,
            "<!-- layout=\"Two Content\" -->\n### S\n<!-- placeholder=\"Content Placeholder 2\" -->\nexplicit\n\nloose",
        );
        let slide = &slides[0];
        assert_eq!(
            texts(slide.placeholder("Content Placeholder 2").unwrap()),
            vec!["explicit"]
        );
        assert_eq!(
            texts(slide.placeholder("Content Placeholder 3").unwrap()),
            vec!["loose"]
        );
        assert!(slide.rescue.is_empty());
    }

    #[test]
    fn test_rescue_without_body_placeholder_stays() {
        let slides = segment(None, "<!-- new_page=\"Title Only\" -->\nstray text");
        assert!(slides[0].placeholders.is_empty());
        assert_eq!(texts(&slides[0].rescue), vec!["stray text"]);
    }

    #[test]
    fn test_tables_need_a_capture() {
        let src = "### S\n| a | b |\n|---|:-:|\n| 1 | 2 |\n\n<!-- placeholder=\"Content Placeholder 2\" -->\n| h |\n|---|\n| v |";
        let slides = segment(None, src);
        let block = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(block.entries.len(), 1);
        match &block.entries[0] {
            ContentEntry::Table(table) => {
                assert_eq!(table.column_count(), 1);
                assert_eq!(table.row_count(), 1);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_table_is_dropped() {
        let src = "### S\n<!-- placeholder=\"Content Placeholder 2\" -->\n| a | b |\n| -- | x |\nafter";
        let slides = segment(None, src);
        let block = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(texts(block), vec!["after"]);
        assert!(!block.entries.iter().any(|e| matches!(e, ContentEntry::Table(_))));
    }

    #[test]
    fn test_lone_pipe_line_is_text() {
        let slides = segment(None, "### S\n| not a table");
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(texts(body), vec!["| not a table"]);
    }

    #[test]
    fn test_images() {
        let src = "<!-- layout=\"Picture with Caption\" -->\n### S\n![](outside.png)\n<!-- placeholder=\"Picture Placeholder 2\" -->\n![Chart](chart.png)\n![Second](second.png)\n\n<!-- placeholder=\"Text Placeholder 3\" -->\n![gone](missing.png)";
        let slides = segment(None, src);
        let slide = &slides[0];

        let picture = slide.placeholder("Picture Placeholder 2").unwrap();
        assert_eq!(picture.entries.len(), 1);
        match &picture.entries[0] {
            ContentEntry::Image(image) => {
                assert_eq!(image.path, PathBuf::from("/images/chart.png"));
                assert_eq!(image.caption.as_deref(), Some("Chart"));
                assert_eq!(image.placeholder, "Picture Placeholder 2");
            }
            other => panic!("expected image, got {:?}", other),
        }
        // Unresolved image leaves its placeholder untouched.
        assert!(slide.placeholder("Text Placeholder 3").is_none());
    }

    #[test]
    fn test_placeholder_font_sizes_cascade() {
        let fm = FrontMatter {
            font_sizes: FontSizeTable::new().with(0, 18).with(1, 16),
            ..FrontMatter::default()
        };
        let src = "<!-- layout=\"Two Content\" font_size_l1=15 -->\n### S\n<!-- placeholder=\"Content Placeholder 3\" font_size_l0=14 -->\nx\n\nloose";
        let slides = segment(Some(&fm), src);
        let slide = &slides[0];

        assert_eq!(slide.font_sizes.get(0), Some(18));
        assert_eq!(slide.font_sizes.get(1), Some(15));

        let right = slide.placeholder("Content Placeholder 3").unwrap();
        assert_eq!(right.font_sizes.get(0), Some(14));
        assert_eq!(right.font_sizes.get(1), Some(15));
        assert_eq!(right.font_sizes.get(2), None);

        let body = slide.placeholder("Content Placeholder 2").unwrap();
        assert_eq!(body.font_sizes.get(0), Some(18));
    }

    #[test]
    fn test_title_seed_and_fold() {
        let fm = FrontMatter {
            title: Some("From FM".to_string()),
            author: Some("Me".to_string()),
            ..FrontMatter::default()
        };
        let slides = segment(Some(&fm), "# From <b>Heading</b>\n## Next");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout, "Title Slide");
        assert_eq!(slides[0].title.as_deref(), Some("From Heading"));
        assert_eq!(slides[0].subtitle, vec!["Me"]);
        assert_eq!(slides[1].layout, "Section Header");
    }

    #[test]
    fn test_second_title_heading_is_not_folded() {
        let fm = FrontMatter {
            title: Some("T".to_string()),
            ..FrontMatter::default()
        };
        let slides = segment(Some(&fm), "# One\n# Two");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1].title.as_deref(), Some("Two"));
        assert_eq!(slides[1].layout, "Title Slide");
    }

    #[test]
    fn test_title_slide_fields_from_body() {
        let slides = segment(None, "# Deck\nsubtitle: Q3 review\nAuthor: Ops\nstray words");
        assert_eq!(slides[0].title.as_deref(), Some("Deck"));
        assert_eq!(slides[0].subtitle, vec!["Q3 review", "Ops"]);
        assert!(slides[0].rescue.is_empty());
    }

    #[test]
    fn test_title_slide_fields_override_front_matter() {
        let fm = FrontMatter {
            title: Some("From FM".to_string()),
            subtitle: Some("Old".to_string()),
            author: Some("Me".to_string()),
            ..FrontMatter::default()
        };
        let slides = segment(Some(&fm), "# Deck\nsubtitle: <b>New</b>\n## Next\nauthor: body text");
        assert_eq!(slides[0].subtitle, vec!["New", "Me"]);
        // Only title slides read these fields.
        let body = slides[1].placeholder("Text Placeholder 2").unwrap();
        assert_eq!(texts(body), vec!["author: body text"]);
    }

    #[test]
    fn test_title_slide_has_no_rescue() {
        let slides = segment(None, "# Deck\nsome words");
        assert!(slides[0].rescue.is_empty());
        assert!(slides[0].placeholders.is_empty());
    }

    #[test]
    fn test_leading_content_opens_slide() {
        let slides = segment(None, "intro line\n### S");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout, "Title and Content");
        assert_eq!(
            texts(slides[0].placeholder("Content Placeholder 2").unwrap()),
            vec!["intro line"]
        );
    }

    #[test]
    fn test_front_matter_without_title_uses_title_layout_first() {
        let fm = FrontMatter::default();
        let slides = segment(Some(&fm), "intro\n### S");
        assert_eq!(slides[0].layout, "Title Slide");
        assert_eq!(slides[1].layout, "Title and Content");
    }

    #[test]
    fn test_code_fence_is_opaque() {
        let src = "### S\n```rust\n# not a heading\n\nfn main() {}\n```\nafter";
        let slides = segment(None, src);
        assert_eq!(slides.len(), 1);
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        match &body.entries[0] {
            ContentEntry::Code(code) => {
                assert_eq!(code.info.as_deref(), Some("rust"));
                assert_eq!(code.code, "# not a heading\n\nfn main() {}");
            }
            other => panic!("expected code, got {:?}", other),
        }
        assert_eq!(texts(body), vec!["after"]);
    }

    #[test]
    fn test_blank_lines_collapse_and_trim() {
        let slides = segment(None, "### S\n\n\na\n\n\n\nb\n\n");
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(texts(body), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unknown_comment_is_content() {
        let slides = segment(None, "### S\n<!-- speaker note -->");
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert_eq!(texts(body), vec!["<!-- speaker note -->"]);
    }

    #[test]
    fn test_reroute_drops_tables_and_images() {
        let src = "### S\n<!-- placeholder=\"Nowhere\" -->\n![c](chart.png)\n\n<!-- placeholder=\"Nowhere\" -->\nkept";
        let slides = segment(None, src);
        let body = slides[0].placeholder("Content Placeholder 2").unwrap();
        assert!(!body.entries.iter().any(|e| matches!(e, ContentEntry::Image(_))));
        assert_eq!(texts(body), vec!["kept"]);
    }
}
