//! Inline `<b>`, `<i>` and `<u>` formatting.
//!
//! Tags nest freely. A line whose tags do not balance loses all of its
//! formatting: it is emitted as one unstyled run of the raw text.

use crate::types::TextRun;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Matches an opening or closing inline tag.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)([biu])>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
}

impl Tag {
    fn from_letter(letter: &str) -> Self {
        match letter.to_ascii_lowercase().as_str() {
            "b" => Tag::Bold,
            "i" => Tag::Italic,
            _ => Tag::Underline,
        }
    }
}

/// Why a line's formatting was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMismatch {
    /// A closing tag that does not match the innermost open tag.
    UnexpectedClose { fragment: String },
    /// Tags still open at the end of the line.
    Unclosed { fragment: String },
}

impl TagMismatch {
    /// The offending tag text.
    pub fn fragment(&self) -> &str {
        match self {
            TagMismatch::UnexpectedClose { fragment } | TagMismatch::Unclosed { fragment } => {
                fragment
            }
        }
    }
}

impl fmt::Display for TagMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagMismatch::UnexpectedClose { fragment } => {
                write!(f, "unexpected closing tag '{}'", fragment)
            }
            TagMismatch::Unclosed { fragment } => write!(f, "unclosed tag '{}'", fragment),
        }
    }
}

fn styled(text: &str, stack: &[(Tag, &str)]) -> TextRun {
    let has = |tag: Tag| stack.iter().any(|(t, _)| *t == tag);
    TextRun {
        text: text.to_string(),
        bold: has(Tag::Bold),
        italic: has(Tag::Italic),
        underline: has(Tag::Underline),
    }
}

/// Build the run list for a line, or report why its tags do not balance.
pub fn try_parse_runs(text: &str) -> Result<Vec<TextRun>, TagMismatch> {
    let mut runs = Vec::new();
    let mut stack: Vec<(Tag, &str)> = Vec::new();
    let mut pos = 0;

    for caps in TAG_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let content = &text[pos..whole.start()];
        if !content.is_empty() {
            runs.push(styled(content, &stack));
        }

        let tag = Tag::from_letter(&caps[2]);
        if &caps[1] == "/" {
            match stack.last() {
                Some((open, _)) if *open == tag => {
                    stack.pop();
                }
                _ => {
                    return Err(TagMismatch::UnexpectedClose {
                        fragment: whole.as_str().to_string(),
                    })
                }
            }
        } else {
            stack.push((tag, whole.as_str()));
        }
        pos = whole.end();
    }

    if let Some((_, fragment)) = stack.last() {
        return Err(TagMismatch::Unclosed {
            fragment: fragment.to_string(),
        });
    }

    let remainder = &text[pos..];
    if !remainder.is_empty() {
        runs.push(TextRun::plain(remainder));
    }
    if runs.is_empty() {
        runs.push(TextRun::plain(""));
    }
    Ok(runs)
}

/// Build the run list for a line, falling back to one unstyled run.
///
/// `slide` is the 1-based slide number used in the warning.
pub fn parse_runs(text: &str, slide: usize) -> Vec<TextRun> {
    match try_parse_runs(text) {
        Ok(runs) => runs,
        Err(mismatch) => {
            log::warn!(
                "Slide {}: {} in '{}'. Skipping formatting.",
                slide,
                mismatch,
                text
            );
            vec![TextRun::plain(text)]
        }
    }
}

/// Text with inline tags removed; the raw text when the tags do not balance.
pub fn plain_text(text: &str) -> String {
    match try_parse_runs(text) {
        Ok(runs) => crate::types::runs_text(&runs),
        Err(_) => text.to_string(),
    }
}
