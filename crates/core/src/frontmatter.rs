//! Document front matter: a `---` delimited block of `key: value` lines.
//!
//! Recognized keys are `title`, `subtitle`, `author`, `toc`, `toc_title`,
//! `indent` and `font_size_l0` through `font_size_l4`. Bad values fall back
//! to defaults with a warning; nothing here is fatal.

use crate::fontsize::{parse_font_size_key, parse_font_size_value, FontSizeTable};
use crate::level::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};

/// Line that opens and closes the front matter block.
pub const DELIMITER: &str = "---";

/// TOC slide title when `toc_title` is not given.
pub const DEFAULT_TOC_TITLE: &str = "Table of Contents";

/// Document-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,

    /// Whether a TOC slide is appended.
    pub toc: bool,

    pub toc_title: Option<String>,

    /// Spaces per indentation level; `None` means the default.
    pub indent: Option<usize>,

    /// Document tier of the font-size cascade.
    pub font_sizes: FontSizeTable,

    /// Unrecognized keys in source order.
    pub extra: Vec<(String, String)>,
}

impl FrontMatter {
    /// Whether a title slide should be seeded.
    pub fn declares_title(&self) -> bool {
        self.title.is_some() || self.subtitle.is_some()
    }

    pub fn indent(&self) -> usize {
        self.indent.unwrap_or(DEFAULT_INDENT)
    }

    pub fn toc_title(&self) -> &str {
        self.toc_title.as_deref().unwrap_or(DEFAULT_TOC_TITLE)
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "title" => self.title = Some(value.to_string()),
            "subtitle" => self.subtitle = Some(value.to_string()),
            "author" => self.author = Some(value.to_string()),
            "toc_title" => self.toc_title = Some(value.to_string()),
            "toc" => self.toc = parse_bool(value).unwrap_or_else(|| {
                log::warn!("Invalid toc value '{}', using false.", value);
                false
            }),
            "indent" => match value.parse::<i64>() {
                Ok(indent) if indent > 0 => self.indent = Some(indent as usize),
                _ => log::warn!(
                    "Invalid indent value '{}', using default {}.",
                    value,
                    DEFAULT_INDENT
                ),
            },
            _ => match parse_font_size_key(key) {
                Some(level) => match parse_font_size_value(value) {
                    Some(size) => self.font_sizes.set(level, size),
                    None => log::warn!(
                        "Invalid {} value '{}', using template default.",
                        key,
                        value
                    ),
                },
                None => {
                    log::warn!("Unknown front matter key '{}' ignored.", key);
                    self.extra.push((key.to_string(), value.to_string()));
                }
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Front matter plus where the body starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatterSplit {
    /// `None` when the document has no (closed) front matter block.
    pub front_matter: Option<FrontMatter>,

    /// Index of the first body line.
    pub body_start: usize,
}

/// Parse the front matter at the head of `lines`.
pub fn parse_front_matter(lines: &[&str]) -> FrontMatterSplit {
    let Some(open) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return FrontMatterSplit::default();
    };
    if lines[open].trim() != DELIMITER {
        return FrontMatterSplit::default();
    }

    let Some(close) = lines[open + 1..]
        .iter()
        .position(|l| l.trim() == DELIMITER)
        .map(|offset| open + 1 + offset)
    else {
        log::warn!("Front matter is not closed; treating it as body text.");
        return FrontMatterSplit::default();
    };

    let mut front_matter = FrontMatter::default();
    for line in &lines[open + 1..close] {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match trimmed.split_once(':') {
            Some((key, value)) => {
                let key = key.trim().to_ascii_lowercase();
                front_matter.apply(&key, unquote(value.trim()));
            }
            None => log::warn!("Front matter line without ':' ignored: {}", trimmed),
        }
    }

    FrontMatterSplit {
        front_matter: Some(front_matter),
        body_start: close + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> FrontMatterSplit {
        let lines: Vec<&str> = text.lines().collect();
        parse_front_matter(&lines)
    }

    #[test]
    fn test_recognized_keys() {
        let split = parse(
            "---\ntitle: Quarterly Review\nsubtitle: \"Q3\"\nauthor: Ops\nTOC: True\ntoc_title: Agenda\nindent: 4\nfont_size_l0: 28\nfont_size_l2: 16pt\n---\n# Body",
        );
        let fm = split.front_matter.unwrap();

        assert_eq!(fm.title.as_deref(), Some("Quarterly Review"));
        assert_eq!(fm.subtitle.as_deref(), Some("Q3"));
        assert_eq!(fm.author.as_deref(), Some("Ops"));
        assert!(fm.toc);
        assert_eq!(fm.toc_title(), "Agenda");
        assert_eq!(fm.indent(), 4);
        assert_eq!(fm.font_sizes.get(0), Some(28));
        assert_eq!(fm.font_sizes.get(1), None);
        assert_eq!(fm.font_sizes.get(2), Some(16));
        assert_eq!(split.body_start, 10);
    }

    #[test]
    fn test_no_front_matter() {
        let split = parse("# Heading\ntext");
        assert!(split.front_matter.is_none());
        assert_eq!(split.body_start, 0);
    }

    #[test]
    fn test_unclosed_front_matter() {
        let split = parse("---\ntitle: T\n# Heading");
        assert!(split.front_matter.is_none());
        assert_eq!(split.body_start, 0);
    }

    #[test]
    fn test_leading_blank_lines() {
        let split = parse("\n\n---\ntitle: T\n---\nbody");
        assert_eq!(split.front_matter.unwrap().title.as_deref(), Some("T"));
        assert_eq!(split.body_start, 5);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let fm = parse("---\nindent: wide\ntoc: maybe\nfont_size_l1: big\n---")
            .front_matter
            .unwrap();
        assert_eq!(fm.indent, None);
        assert_eq!(fm.indent(), DEFAULT_INDENT);
        assert!(!fm.toc);
        assert!(fm.font_sizes.is_empty());
    }

    #[test]
    fn test_zero_indent_falls_back() {
        let fm = parse("---\nindent: 0\n---").front_matter.unwrap();
        assert_eq!(fm.indent(), DEFAULT_INDENT);
    }

    #[test]
    fn test_unknown_keys_kept() {
        let fm = parse("---\ntheme: dark\ntitle: T\nfooter: x\n---")
            .front_matter
            .unwrap();
        assert_eq!(
            fm.extra,
            vec![
                ("theme".to_string(), "dark".to_string()),
                ("footer".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let fm = FrontMatter::default();
        assert!(!fm.declares_title());
        assert!(!fm.toc);
        assert_eq!(fm.toc_title(), DEFAULT_TOC_TITLE);
    }

    #[test]
    fn test_subtitle_and_author() {
        let fm = parse("---\nsubtitle: S\nauthor: A\n---").front_matter.unwrap();
        assert!(fm.declares_title());
        assert_eq!(fm.subtitle.as_deref(), Some("S"));
        assert_eq!(fm.author.as_deref(), Some("A"));
    }

    #[test]
    fn test_value_with_colon() {
        let fm = parse("---\ntitle: Rust: The Talk\n---").front_matter.unwrap();
        assert_eq!(fm.title.as_deref(), Some("Rust: The Talk"));
    }
}
