//! Image lines and image file lookup.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// A whole line of the form `![caption](path)`.
static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[(.*?)\]\((.*?)\)$").unwrap());

/// A parsed `![caption](path)` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLine {
    /// `None` when the alt text is empty.
    pub caption: Option<String>,
    pub path: String,
}

/// Parse a trimmed line as an image reference.
pub fn parse_image_line(line: &str) -> Option<ImageLine> {
    let caps = IMAGE_REGEX.captures(line.trim())?;
    let caption = caps[1].trim();
    let path = caps[2].trim();
    let path = path
        .strip_prefix('<')
        .and_then(|p| p.strip_suffix('>'))
        .unwrap_or(path);

    Some(ImageLine {
        caption: (!caption.is_empty()).then(|| caption.to_string()),
        path: path.to_string(),
    })
}

/// Finds image files referenced by the document.
pub trait ImageLocator {
    /// Return the first existing file for `path`, or `None`.
    fn locate(&self, path: &str) -> Option<PathBuf>;
}

/// Probes a fixed, ordered list of directories on the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsImageLocator {
    candidates: Vec<PathBuf>,
}

impl FsImageLocator {
    /// Probe exactly the given directories, in order.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Document directory, then application directory, then working directory.
    pub fn for_document(document_dir: &Path) -> Self {
        let mut candidates = vec![document_dir.to_path_buf()];
        if let Some(app_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(app_dir);
        }
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd);
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl ImageLocator for FsImageLocator {
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return relative.exists().then(|| relative.to_path_buf());
        }

        self.candidates
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.exists())
    }
}
