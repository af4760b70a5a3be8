//! Comment directives: `<!-- layout="..." -->`, `<!-- new_page -->`,
//! `<!-- placeholder="..." -->`, each optionally carrying
//! `font_size_lN=V` overrides.

use crate::fontsize::{parse_font_size_key, parse_font_size_value, FontSizeTable};
use regex::Regex;
use std::sync::LazyLock;

/// A whole-line HTML comment.
static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--\s*(.*?)\s*-->$").unwrap());

/// `key`, `key=value`, `key="value"` or `key='value'`.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|(\S+)))?"#).unwrap()
});

/// What a directive asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Layout for the slide opened by the next heading.
    Layout(String),
    /// Unconditional slide break, optionally with a layout.
    NewPage(Option<String>),
    /// Route following lines to a named placeholder.
    Placeholder(String),
    /// A comment with no recognized directive; ordinary content.
    None,
}

/// A single `font_size_lN=V` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizeOverride {
    pub level: u8,
    pub size: u32,
}

/// A parsed directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,

    /// Font-size overrides in source order.
    pub font_sizes: Vec<FontSizeOverride>,
}

impl Directive {
    /// Collapse the overrides into a table; later pairs win.
    pub fn font_size_table(&self) -> FontSizeTable {
        self.font_sizes
            .iter()
            .fold(FontSizeTable::new(), |table, o| table.with(o.level, o.size))
    }

    pub fn is_directive(&self) -> bool {
        self.kind != DirectiveKind::None
    }
}

fn required_name(key: &str, value: Option<&str>, line: &str) -> Option<String> {
    match value.map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => {
            log::warn!("Directive '{}' without a name ignored: {}", key, line);
            None
        }
    }
}

/// One `key` or `key=value` token of a comment body.
struct Token<'a> {
    key: String,
    value: Option<&'a str>,
}

/// Split a comment body into tokens. `None` when anything other than
/// whitespace separates them.
fn tokenize(body: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    for caps in TOKEN_REGEX.captures_iter(body) {
        let whole = caps.get(0)?;
        if !body[pos..whole.start()].trim().is_empty() {
            return None;
        }
        tokens.push(Token {
            key: caps[1].to_ascii_lowercase(),
            value: caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str()),
        });
        pos = whole.end();
    }
    body[pos..].trim().is_empty().then_some(tokens)
}

/// Parse a line as a directive comment.
///
/// The directive key must come first and may only be followed by
/// `key=value` pairs. Any other comment yields `DirectiveKind::None`.
/// Returns `None` when the line is not a comment at all.
pub fn parse_directive(line: &str) -> Option<Directive> {
    let trimmed = line.trim();
    let body = COMMENT_REGEX.captures(trimmed)?.get(1)?.as_str();
    let plain = Directive {
        kind: DirectiveKind::None,
        font_sizes: Vec::new(),
    };

    let Some(tokens) = tokenize(body) else {
        return Some(plain);
    };
    let Some((first, rest)) = tokens.split_first() else {
        return Some(plain);
    };
    if !matches!(first.key.as_str(), "layout" | "new_page" | "placeholder") {
        return Some(plain);
    }
    if rest.iter().any(|token| token.value.is_none()) {
        return Some(plain);
    }

    let kind = match first.key.as_str() {
        "layout" => required_name(&first.key, first.value, trimmed).map(DirectiveKind::Layout),
        "placeholder" => {
            required_name(&first.key, first.value, trimmed).map(DirectiveKind::Placeholder)
        }
        _ => Some(DirectiveKind::NewPage(
            first
                .value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        )),
    };
    let Some(kind) = kind else {
        return Some(plain);
    };

    let mut font_sizes = Vec::new();
    for token in rest {
        let key = token.key.as_str();
        if let Some(level) = parse_font_size_key(key) {
            match token.value.and_then(parse_font_size_value) {
                Some(size) => font_sizes.push(FontSizeOverride { level, size }),
                None => log::warn!("Invalid font size for '{}' ignored: {}", key, trimmed),
            }
        } else if matches!(key, "layout" | "new_page" | "placeholder") {
            log::warn!("Extra directive '{}' ignored: {}", key, trimmed);
        } else {
            log::warn!("Unknown directive key '{}' ignored: {}", key, trimmed);
        }
    }

    Some(Directive { kind, font_sizes })
}
