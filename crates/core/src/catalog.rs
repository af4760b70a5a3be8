//! Slide layout catalog: which layouts a template offers and which
//! placeholders each layout has.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Role of a placeholder on a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// Generic content placeholder (also an untyped `p:ph`).
    Object,
    Picture,
    Table,
    Chart,
    Date,
    Footer,
    Header,
    SlideNumber,
    Other,
}

impl PlaceholderKind {
    /// Map an OOXML `p:ph/@type` value; a missing type means `Object`.
    pub fn from_ooxml(kind: Option<&str>) -> Self {
        match kind {
            None | Some("obj") => PlaceholderKind::Object,
            Some("title") => PlaceholderKind::Title,
            Some("ctrTitle") => PlaceholderKind::CenterTitle,
            Some("subTitle") => PlaceholderKind::Subtitle,
            Some("body") => PlaceholderKind::Body,
            Some("pic") => PlaceholderKind::Picture,
            Some("tbl") => PlaceholderKind::Table,
            Some("chart") => PlaceholderKind::Chart,
            Some("dt") => PlaceholderKind::Date,
            Some("ftr") => PlaceholderKind::Footer,
            Some("hdr") => PlaceholderKind::Header,
            Some("sldNum") => PlaceholderKind::SlideNumber,
            Some(_) => PlaceholderKind::Other,
        }
    }

    /// Whether unrouted body text may be placed here.
    pub fn accepts_body_text(&self) -> bool {
        matches!(self, PlaceholderKind::Body | PlaceholderKind::Object)
    }

    pub fn is_title(&self) -> bool {
        matches!(self, PlaceholderKind::Title | PlaceholderKind::CenterTitle)
    }
}

/// A named placeholder on a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub name: String,
    pub kind: PlaceholderKind,
}

impl PlaceholderInfo {
    pub fn new(name: impl Into<String>, kind: PlaceholderKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A named layout and its placeholders in shape order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub name: String,
    pub placeholders: Vec<PlaceholderInfo>,
}

impl LayoutInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            placeholders: Vec::new(),
        }
    }

    /// Builder-style placeholder addition.
    pub fn with_placeholder(mut self, name: impl Into<String>, kind: PlaceholderKind) -> Self {
        self.placeholders.push(PlaceholderInfo::new(name, kind));
        self
    }
}

/// Source of layout and placeholder information.
pub trait LayoutCatalog {
    /// All layouts in catalog order.
    fn layouts(&self) -> &[LayoutInfo];

    /// Look up a layout by exact name.
    fn layout(&self, name: &str) -> Option<&LayoutInfo> {
        self.layouts().iter().find(|l| l.name == name)
    }

    fn has_layout(&self, name: &str) -> bool {
        self.layout(name).is_some()
    }

    /// Placeholder names on a layout, in shape order.
    fn placeholder_names(&self, layout: &str) -> Vec<&str> {
        self.layout(layout)
            .map(|l| l.placeholders.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn has_placeholder(&self, layout: &str, placeholder: &str) -> bool {
        self.layout(layout)
            .is_some_and(|l| l.placeholders.iter().any(|p| p.name == placeholder))
    }

    /// First body-capable placeholder not listed in `exclude`.
    fn body_placeholder(&self, layout: &str, exclude: &[String]) -> Option<&str> {
        self.layout(layout)?
            .placeholders
            .iter()
            .filter(|p| p.kind.accepts_body_text())
            .find(|p| !exclude.iter().any(|e| *e == p.name))
            .map(|p| p.name.as_str())
    }
}

/// Layout names the compiler selects automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNames {
    /// Used for `#` headings and the front matter title slide.
    pub title: String,
    /// Used for `##` headings.
    pub section: String,
    /// Used for `###` headings and slides without a heading.
    pub content: String,
    /// Used for the closing TOC slide.
    pub toc: String,
}

impl Default for LayoutNames {
    fn default() -> Self {
        Self {
            title: "Title Slide".to_string(),
            section: "Section Header".to_string(),
            content: "Title and Content".to_string(),
            toc: "Table of Contents".to_string(),
        }
    }
}

/// Resolve `requested` against the catalog.
///
/// Falls back to the content layout, then to the first catalog entry.
/// The catalog must not be empty.
pub fn resolve_layout<C: LayoutCatalog + ?Sized>(
    catalog: &C,
    names: &LayoutNames,
    requested: &str,
    slide: usize,
) -> String {
    if catalog.has_layout(requested) {
        return requested.to_string();
    }
    if catalog.has_layout(&names.content) {
        log::warn!(
            "Slide {}: layout '{}' not found. Falling back to '{}'.",
            slide,
            requested,
            names.content
        );
        return names.content.clone();
    }
    let first = catalog
        .layouts()
        .first()
        .map(|l| l.name.clone())
        .unwrap_or_default();
    log::warn!(
        "Slide {}: layout '{}' not found. Falling back to '{}'.",
        slide,
        requested,
        first
    );
    first
}

/// Fail when a catalog has nothing to offer.
pub fn ensure_not_empty<C: LayoutCatalog + ?Sized>(catalog: &C) -> Result<()> {
    if catalog.layouts().is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok(())
}

/// An in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    layouts: Vec<LayoutInfo>,
}

impl StaticCatalog {
    pub fn new(layouts: Vec<LayoutInfo>) -> Self {
        Self { layouts }
    }

    /// Add a layout at the end of the catalog.
    pub fn push(&mut self, layout: LayoutInfo) {
        self.layouts.push(layout);
    }

    /// The eleven layouts of the default Office template.
    pub fn office_default() -> Self {
        use PlaceholderKind::*;

        let footer = |layout: LayoutInfo, first: usize| {
            layout
                .with_placeholder(format!("Date Placeholder {}", first), Date)
                .with_placeholder(format!("Footer Placeholder {}", first + 1), Footer)
                .with_placeholder(format!("Slide Number Placeholder {}", first + 2), SlideNumber)
        };

        Self::new(vec![
            footer(
                LayoutInfo::new("Title Slide")
                    .with_placeholder("Title 1", CenterTitle)
                    .with_placeholder("Subtitle 2", Subtitle),
                3,
            ),
            footer(
                LayoutInfo::new("Title and Content")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Content Placeholder 2", Object),
                3,
            ),
            footer(
                LayoutInfo::new("Section Header")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Text Placeholder 2", Body),
                3,
            ),
            footer(
                LayoutInfo::new("Two Content")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Content Placeholder 2", Object)
                    .with_placeholder("Content Placeholder 3", Object),
                4,
            ),
            footer(
                LayoutInfo::new("Comparison")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Text Placeholder 2", Body)
                    .with_placeholder("Content Placeholder 3", Object)
                    .with_placeholder("Text Placeholder 4", Body)
                    .with_placeholder("Content Placeholder 5", Object),
                6,
            ),
            footer(LayoutInfo::new("Title Only").with_placeholder("Title 1", Title), 2),
            footer(LayoutInfo::new("Blank"), 1),
            footer(
                LayoutInfo::new("Content with Caption")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Content Placeholder 2", Object)
                    .with_placeholder("Text Placeholder 3", Body),
                4,
            ),
            footer(
                LayoutInfo::new("Picture with Caption")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Picture Placeholder 2", Picture)
                    .with_placeholder("Text Placeholder 3", Body),
                4,
            ),
            footer(
                LayoutInfo::new("Title and Vertical Text")
                    .with_placeholder("Title 1", Title)
                    .with_placeholder("Vertical Text Placeholder 2", Body),
                3,
            ),
            footer(
                LayoutInfo::new("Vertical Title and Text")
                    .with_placeholder("Vertical Title 1", Title)
                    .with_placeholder("Vertical Text Placeholder 2", Body),
                3,
            ),
        ])
    }
}

impl LayoutCatalog for StaticCatalog {
    fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }
}
