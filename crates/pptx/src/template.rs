//! PPTX template reader.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidemark_core::catalog::{LayoutCatalog, LayoutInfo, PlaceholderKind};
use slidemark_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const LAYOUT_DIR: &str = "ppt/slideLayouts/";

/// Layout catalog read from the slide layouts of a `.pptx` template.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    layouts: Vec<LayoutInfo>,
}

impl TemplateCatalog {
    /// Open a template file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        log::debug!("Reading template '{}'", path.display());
        Self::from_reader(BufReader::new(file))
    }

    /// Read a template from any seekable ZIP source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut layouts = Vec::new();
        for path in layout_paths(&archive) {
            let content = read_file_from_archive(&mut archive, &path)?;
            match parse_layout(&content, &path)? {
                Some(layout) => {
                    log::debug!(
                        "Layout '{}' with {} placeholders",
                        layout.name,
                        layout.placeholders.len()
                    );
                    layouts.push(layout);
                }
                None => log::warn!("Layout '{}' has no name. Skipping.", path),
            }
        }

        if layouts.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Self { layouts })
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl LayoutCatalog for TemplateCatalog {
    fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }
}

/// Slide layout parts of the archive in numeric order.
fn layout_paths<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut paths: Vec<(String, usize)> = archive
        .file_names()
        .filter(|name| {
            name.strip_prefix(LAYOUT_DIR)
                .is_some_and(|rest| rest.starts_with("slideLayout") && rest.ends_with(".xml"))
        })
        .filter_map(|name| extract_layout_number(name).map(|n| (name.to_string(), n)))
        .collect();

    paths.sort_by_key(|(_, number)| *number);
    paths.into_iter().map(|(path, _)| path).collect()
}

/// Placeholder being collected inside a `p:sp` element.
#[derive(Debug, Default)]
struct ShapeInfo {
    name: Option<String>,
    kind: Option<String>,
    is_placeholder: bool,
}

/// Parse one slide layout part. Returns `None` for a nameless layout.
fn parse_layout(xml_content: &str, path: &str) -> Result<Option<LayoutInfo>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut layout_name: Option<String> = None;
    let mut placeholders: Vec<(String, PlaceholderKind)> = Vec::new();
    let mut current_shape: Option<ShapeInfo> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"cSld" => layout_name = attribute(e, b"name"),
                b"sp" => current_shape = Some(ShapeInfo::default()),
                _ => read_shape_property(e, current_shape.as_mut()),
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"cSld" => layout_name = attribute(e, b"name"),
                _ => read_shape_property(e, current_shape.as_mut()),
            },
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sp" => {
                if let Some(shape) = current_shape.take() {
                    if let (true, Some(name)) = (shape.is_placeholder, shape.name) {
                        log::trace!(
                            "{}: placeholder '{}' type={:?}",
                            path,
                            name,
                            shape.kind
                        );
                        placeholders.push((name, PlaceholderKind::from_ooxml(shape.kind.as_deref())));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing '{}' at position {}: {}",
                    path,
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    let Some(name) = layout_name.filter(|n| !n.trim().is_empty()) else {
        return Ok(None);
    };
    let layout = placeholders
        .into_iter()
        .fold(LayoutInfo::new(name), |layout, (name, kind)| {
            layout.with_placeholder(name, kind)
        });
    Ok(Some(layout))
}

/// Pick up `p:cNvPr` and `p:ph` attributes for the open shape.
fn read_shape_property(e: &BytesStart, shape: Option<&mut ShapeInfo>) {
    let Some(shape) = shape else {
        return;
    };
    match local_name(e.name().as_ref()) {
        b"cNvPr" => shape.name = attribute(e, b"name"),
        b"ph" => {
            shape.is_placeholder = true;
            shape.kind = attribute(e, b"type");
        }
        _ => {}
    }
}

/// Get an unescaped attribute value by key.
fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| attribute_value(&attr))
}

fn attribute_value(attr: &Attribute) -> String {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string())
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract the layout number from a part name like "slideLayout12.xml".
fn extract_layout_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
