//! Pipe-table parsing.

use crate::inline::parse_runs;
use crate::types::{Alignment, Table, TableCell};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// A valid separator cell: optional colons around one or more dashes.
static SEPARATOR_CELL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Why a table construct was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("a table needs a header and a separator line")]
    TooShort,

    #[error("invalid separator cell '{0}'")]
    BadSeparator(String),

    #[error("row {row} has {found} columns, header has {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Whether a trimmed line belongs to a pipe-table construct.
pub fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Whether `lines` look like a table (second line is separator-ish).
///
/// Only constructs that pass this check are treated as tables at all;
/// a lone pipe line is ordinary text.
pub fn looks_like_table(lines: &[String]) -> bool {
    lines.len() >= 2 && is_table_line(&lines[1]) && lines[1].contains('-')
}

/// Split a pipe row into trimmed cells. `\|` is a literal pipe.
pub fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = if inner.ends_with('|') && !inner.ends_with("\\|") {
        &inner[..inner.len() - 1]
    } else {
        inner
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn parse_separator(cell: &str) -> Result<(Alignment, u32), TableError> {
    if !SEPARATOR_CELL_REGEX.is_match(cell) {
        return Err(TableError::BadSeparator(cell.to_string()));
    }
    let left = cell.starts_with(':');
    let right = cell.ends_with(':');
    let alignment = match (left, right) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    };
    let dashes = cell.chars().filter(|&c| c == '-').count() as u32;
    Ok((alignment, dashes.max(1)))
}

fn cells(line: &str, slide: usize) -> Vec<TableCell> {
    split_row(line)
        .iter()
        .map(|text| TableCell {
            runs: parse_runs(text, slide),
        })
        .collect()
}

/// Parse a header line, a separator line and zero or more body rows.
///
/// Every row must have the header's column count.
pub fn parse_table(lines: &[String], level: u8, slide: usize) -> Result<Table, TableError> {
    if lines.len() < 2 {
        return Err(TableError::TooShort);
    }

    let header = cells(&lines[0], slide);
    let separator = split_row(&lines[1]);
    if separator.len() != header.len() {
        return Err(TableError::ColumnMismatch {
            row: 1,
            expected: header.len(),
            found: separator.len(),
        });
    }

    let mut alignments = Vec::with_capacity(separator.len());
    let mut widths = Vec::with_capacity(separator.len());
    for cell in &separator {
        let (alignment, width) = parse_separator(cell)?;
        alignments.push(alignment);
        widths.push(width);
    }

    let mut rows = Vec::with_capacity(lines.len() - 2);
    for (offset, line) in lines[2..].iter().enumerate() {
        let row = cells(line, slide);
        if row.len() != header.len() {
            return Err(TableError::ColumnMismatch {
                row: offset + 2,
                expected: header.len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    Ok(Table {
        header,
        rows,
        alignments,
        widths,
        level,
    })
}
