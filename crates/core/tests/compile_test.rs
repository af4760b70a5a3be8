use slidemark_core::catalog::{LayoutInfo, PlaceholderKind};
use slidemark_core::types::{Table, TocTier};
use slidemark_core::{
    compile, compile_document, CompileOptions, ContentEntry, Document, Error, ImageLocator,
    LayoutNames, OutlineFormatter, SlideDeck, StaticCatalog,
};
use std::path::{Path, PathBuf};

struct NoImages;

impl ImageLocator for NoImages {
    fn locate(&self, _path: &str) -> Option<PathBuf> {
        None
    }
}

struct FixedImages;

impl ImageLocator for FixedImages {
    fn locate(&self, path: &str) -> Option<PathBuf> {
        Some(Path::new("/deck/assets").join(path))
    }
}

fn build(src: &str) -> SlideDeck {
    let document = Document::new(src, "/deck");
    compile(
        &document,
        &StaticCatalog::office_default(),
        &NoImages,
        &CompileOptions::default(),
    )
    .unwrap()
}

fn texts(entries: &[ContentEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| match e {
            ContentEntry::Paragraph(p) => Some(p.plain_text()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_front_matter_toc_scenario() {
    let deck = build("---\ntitle: T\ntoc: true\n---\n# T\n## S1\nbody\n### P1\ntext");

    assert_eq!(deck.slides.len(), 3);
    assert_eq!(deck.slides[0].layout, "Title Slide");
    assert_eq!(deck.slides[0].title.as_deref(), Some("T"));
    assert_eq!(deck.slides[1].layout, "Section Header");
    assert_eq!(deck.slides[2].layout, "Title and Content");

    let toc = deck.toc.as_ref().unwrap();
    assert_eq!(toc.title, "Table of Contents");
    assert_eq!(toc.layout, "Title and Content");
    assert_eq!(toc.entries.len(), 2);
    assert_eq!(toc.entries[0].text, "S1");
    assert_eq!(toc.entries[0].slide_index, 1);
    assert_eq!(toc.entries[0].tier, TocTier::Section);
    assert_eq!(toc.entries[1].text, "P1");
    assert_eq!(toc.entries[1].slide_index, 2);
    assert_eq!(toc.entries[1].level(), 1);

    let section_body = deck.slides[1].placeholder("Text Placeholder 2").unwrap();
    assert_eq!(texts(&section_body.entries), vec!["body"]);
    let content_body = deck.slides[2].placeholder("Content Placeholder 2").unwrap();
    assert_eq!(texts(&content_body.entries), vec!["text"]);
}

#[test]
fn test_toc_disabled_or_empty() {
    let deck = build("---\ntitle: T\n---\n## S1");
    assert!(deck.toc.is_none());

    let deck = build("---\ntitle: T\ntoc: true\n---\n# Only a title");
    assert!(deck.toc.is_none());
    assert!(deck.toc_entries().is_empty());
}

#[test]
fn test_custom_toc_title_and_layout() {
    let catalog = StaticCatalog::new(vec![
        LayoutInfo::new("Cover").with_placeholder("Title 1", PlaceholderKind::CenterTitle),
        LayoutInfo::new("Agenda")
            .with_placeholder("Title 1", PlaceholderKind::Title)
            .with_placeholder("List", PlaceholderKind::Body),
    ]);
    let names = LayoutNames {
        title: "Cover".to_string(),
        toc: "Agenda".to_string(),
        ..LayoutNames::default()
    };
    let options = CompileOptions::new().with_layout_names(names);
    let document = Document::new("---\ntoc: yes\ntoc_title: Overview\n---\n## Part", "/deck");

    let deck = compile(&document, &catalog, &NoImages, &options).unwrap();

    // No content layout in this catalog: the section slide falls back to the first layout.
    assert_eq!(deck.slides[0].layout, "Cover");
    let toc = deck.toc.unwrap();
    assert_eq!(toc.title, "Overview");
    assert_eq!(toc.layout, "Agenda");
}

#[test]
fn test_empty_catalog_is_fatal() {
    let document = Document::new("### S\ntext", "/deck");
    let result = compile(
        &document,
        &StaticCatalog::default(),
        &NoImages,
        &CompileOptions::default(),
    );
    assert!(matches!(result, Err(Error::EmptyCatalog)));
}

#[test]
fn test_missing_source_is_fatal() {
    let result = Document::from_path(Path::new("/definitely/not/here.md"));
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_unknown_layout_falls_back() {
    let deck = build("<!-- layout=\"Fancy\" -->\n### S\npoint");
    assert_eq!(deck.slides.len(), 1);
    assert_eq!(deck.slides[0].layout, "Title and Content");
}

#[test]
fn test_slide_indices_are_dense() {
    let deck = build("# A\n## B\n### C\n<!-- new_page -->\nx\n### D");
    let indices: Vec<usize> = deck.slides.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert!(deck.slides.iter().all(|s| !s.layout.is_empty()));
}

#[test]
fn test_placeholder_capture_with_table_and_image() {
    let src = "### Numbers\n\
               <!-- layout=\"Two Content\" -->\n\
               ### Compare\n\
               <!-- placeholder=\"Content Placeholder 2\" font_size_l0=14 -->\n\
               | Name | Value |\n\
               |:-----|------:|\n\
               | a | 1 |\n\
               \n\
               <!-- placeholder=\"Content Placeholder 3\" -->\n\
               ![Growth](chart.png)\n\
               \n\
               - leftover";
    let document = Document::new(src, "/deck");
    let deck = compile(
        &document,
        &StaticCatalog::office_default(),
        &FixedImages,
        &CompileOptions::default(),
    )
    .unwrap();

    let slide = &deck.slides[1];
    assert_eq!(slide.layout, "Two Content");

    let left = slide.placeholder("Content Placeholder 2").unwrap();
    assert_eq!(left.font_sizes.get(0), Some(14));
    match &left.entries[0] {
        ContentEntry::Table(Table { header, rows, .. }) => {
            assert_eq!(header.len(), 2);
            assert_eq!(rows.len(), 1);
        }
        other => panic!("expected table, got {:?}", other),
    }

    let right = slide.placeholder("Content Placeholder 3").unwrap();
    match &right.entries[0] {
        ContentEntry::Image(image) => {
            assert_eq!(image.path, PathBuf::from("/deck/assets/chart.png"));
            assert_eq!(image.caption.as_deref(), Some("Growth"));
        }
        other => panic!("expected image, got {:?}", other),
    }

    // Both body placeholders were targeted, so the bullet stays in the rescue block.
    assert_eq!(texts(&slide.rescue.entries), vec!["leftover"]);
}

#[test]
fn test_deck_serializes_to_json() {
    let deck = build("---\ntitle: <b>Bold</b> deck\ntoc: true\n---\n## Part\n- a\n  - b");
    let json = serde_json::to_string_pretty(&deck).unwrap();
    assert!(json.contains("\"type\": \"paragraph\""));
    assert!(json.contains("\"kind\": \"bullet\""));

    let back: SlideDeck = serde_json::from_str(&json).unwrap();
    assert_eq!(back, deck);
}

#[test]
fn test_outline_of_compiled_deck() {
    let deck = build("### Plan\n- first\n  - <i>second</i>");
    let outline = OutlineFormatter::new().format(&deck);
    assert_eq!(
        outline,
        "[1] Title and Content: Plan\n<Content Placeholder 2>\n- first\n  - <i>second</i>"
    );
}

#[test]
fn test_compile_document_uses_defaults() {
    let document = Document::new("### S\n![x](no-such-image.png)\ntext", "/nonexistent-dir");
    let deck = compile_document(&document, &StaticCatalog::office_default()).unwrap();
    let body = deck.slides[0].placeholder("Content Placeholder 2").unwrap();
    assert!(!body.entries.iter().any(|e| matches!(e, ContentEntry::Image(_))));
    assert!(body
        .entries
        .iter()
        .any(|e| matches!(e, ContentEntry::Paragraph(p) if p.plain_text() == "text")));
}

#[test]
fn test_prose_comments_do_not_break_slides() {
    let deck = build("### S\nintro\n<!-- remember the new_page rule -->\nmore");
    assert_eq!(deck.slides.len(), 1);

    let deck = build("### S\n<!-- TODO: move to placeholder=Notes later -->\ntext");
    let body = deck.slides[0].placeholder("Content Placeholder 2").unwrap();
    assert_eq!(
        texts(&body.entries),
        vec!["<!-- TODO: move to placeholder=Notes later -->", "text"]
    );
}

#[test]
fn test_title_slide_fields_without_front_matter() {
    let deck = build("# Deck\nsubtitle: Q3 review\nauthor: Ops");
    assert_eq!(deck.slides.len(), 1);
    assert_eq!(deck.slides[0].title.as_deref(), Some("Deck"));
    assert_eq!(deck.slides[0].subtitle, vec!["Q3 review", "Ops"]);
}
