//! Document to slide model compilation.

use crate::catalog::{ensure_not_empty, resolve_layout, LayoutCatalog, LayoutNames};
use crate::frontmatter::parse_front_matter;
use crate::image::{FsImageLocator, ImageLocator};
use crate::level::DEFAULT_INDENT;
use crate::segment::Segmenter;
use crate::types::{Document, SlideDeck, TocSlide};
use crate::Result;

/// Compiler settings that do not come from the document itself.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Layouts chosen automatically by heading depth.
    pub layout_names: LayoutNames,

    /// Indent width when the front matter does not set one.
    pub default_indent: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            layout_names: LayoutNames::default(),
            default_indent: DEFAULT_INDENT,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the automatic layout names.
    pub fn with_layout_names(mut self, names: LayoutNames) -> Self {
        self.layout_names = names;
        self
    }

    /// Set the fallback indent width; zero keeps the default.
    pub fn with_default_indent(mut self, indent: usize) -> Self {
        if indent > 0 {
            self.default_indent = indent;
        }
        self
    }
}

/// Compile a document into a slide model.
///
/// Fails only when the catalog has no layouts.
pub fn compile(
    document: &Document,
    catalog: &dyn LayoutCatalog,
    locator: &dyn ImageLocator,
    options: &CompileOptions,
) -> Result<SlideDeck> {
    ensure_not_empty(catalog)?;

    let lines: Vec<&str> = document.text.lines().collect();
    let split = parse_front_matter(&lines);
    let front_matter = split.front_matter.as_ref();
    if let Some(fm) = front_matter {
        log::debug!(
            "Front matter: title={:?} toc={} indent={} font sizes {}",
            fm.title,
            fm.toc,
            fm.indent(),
            fm.font_sizes
        );
    }

    let names = &options.layout_names;
    let mut segmenter = Segmenter::new(
        catalog,
        locator,
        names,
        front_matter,
        options.default_indent,
    );
    segmenter.run(&lines[split.body_start..]);
    let (slides, toc) = segmenter.finish();

    let toc = match front_matter {
        Some(fm) if toc.is_enabled() && !toc.entries().is_empty() => Some(TocSlide {
            title: fm.toc_title().to_string(),
            layout: resolve_layout(catalog, names, &names.toc, slides.len() + 1),
            entries: toc.into_entries(),
        }),
        _ => None,
    };

    log::info!("Compiled {} slides.", slides.len());
    Ok(SlideDeck { slides, toc })
}

/// Compile with default options, probing images next to the document,
/// the application and the working directory.
pub fn compile_document(document: &Document, catalog: &dyn LayoutCatalog) -> Result<SlideDeck> {
    let locator = FsImageLocator::for_document(&document.base_dir);
    compile(document, catalog, &locator, &CompileOptions::default())
}
