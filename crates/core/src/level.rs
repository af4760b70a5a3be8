//! Paragraph and list-item indentation levels.

use crate::inline::parse_runs;
use crate::types::{Paragraph, ParagraphKind, MAX_LEVEL};
use regex::Regex;
use std::sync::LazyLock;

/// Indent width used when none (or an unusable one) is configured.
pub const DEFAULT_INDENT: usize = 2;

/// `-`, `*` or `+` list item.
static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").unwrap());

/// `N.` list item.
static NUMBERED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+)\.\s+(.*)$").unwrap());

/// Turns body lines into leveled paragraphs.
#[derive(Debug, Clone, Copy)]
pub struct Leveler {
    indent: usize,
}

impl Default for Leveler {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl Leveler {
    /// Create a leveler with the given indent width; zero selects the default.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: if indent == 0 { DEFAULT_INDENT } else { indent },
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Width of the leading whitespace, with tabs counted as one indent step.
    fn leading_width(&self, whitespace: &str) -> usize {
        whitespace
            .chars()
            .map(|c| if c == '\t' { self.indent } else { 1 })
            .sum()
    }

    /// Level for a given leading whitespace on top of `base_level`.
    pub fn level_for(&self, whitespace: &str, base_level: u8) -> u8 {
        let steps = self.leading_width(whitespace) / self.indent;
        let level = (base_level as usize).saturating_add(steps);
        level.min(MAX_LEVEL as usize) as u8
    }

    /// Classify a non-blank line and build its paragraph.
    ///
    /// Numbered items keep their number as literal text.
    pub fn paragraph(&self, line: &str, base_level: u8, slide: usize) -> Paragraph {
        let line = line.trim_end();

        if let Some(caps) = NUMBERED_REGEX.captures(line) {
            let level = self.level_for(&caps[1], base_level);
            let text = format!("{}. {}", &caps[2], caps[3].trim());
            return Paragraph::new(parse_runs(&text, slide), level, ParagraphKind::Numbered);
        }

        if let Some(caps) = BULLET_REGEX.captures(line) {
            let level = self.level_for(&caps[1], base_level);
            let text = caps[2].trim();
            return Paragraph::new(parse_runs(text, slide), level, ParagraphKind::Bullet);
        }

        let trimmed = line.trim_start();
        let whitespace = &line[..line.len() - trimmed.len()];
        let level = self.level_for(whitespace, base_level);
        Paragraph::new(parse_runs(trimmed, slide), level, ParagraphKind::Text)
    }
}
