//! Font-size tables and the document < page < placeholder cascade.
//!
//! A level left unset means "use the template's own size"; the compiler
//! never substitutes a numeric default.

use crate::types::{LEVEL_COUNT, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point sizes for paragraph levels 0-4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeTable {
    sizes: [Option<u32>; LEVEL_COUNT],
}

impl FontSizeTable {
    /// A table with every level unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the size for a level; levels above `MAX_LEVEL` read as unset.
    pub fn get(&self, level: u8) -> Option<u32> {
        self.sizes.get(level as usize).copied().flatten()
    }

    /// Set the size for a level. Levels above `MAX_LEVEL` are ignored.
    pub fn set(&mut self, level: u8, size: u32) {
        if let Some(slot) = self.sizes.get_mut(level as usize) {
            *slot = Some(size);
        }
    }

    /// Builder variant of [`FontSizeTable::set`].
    pub fn with(mut self, level: u8, size: u32) -> Self {
        self.set(level, size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.iter().all(Option::is_none)
    }

    /// Lay `over` on top of `self`, level by level.
    pub fn overlay(&self, over: &FontSizeTable) -> FontSizeTable {
        let mut merged = *self;
        for (slot, top) in merged.sizes.iter_mut().zip(over.sizes.iter()) {
            if top.is_some() {
                *slot = *top;
            }
        }
        merged
    }

    /// Resolve the three tiers, lowest precedence first.
    pub fn cascade(
        document: &FontSizeTable,
        page: &FontSizeTable,
        placeholder: &FontSizeTable,
    ) -> FontSizeTable {
        document.overlay(page).overlay(placeholder)
    }

    /// Iterate `(level, size)` over the set levels.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.sizes
            .iter()
            .enumerate()
            .filter_map(|(level, size)| size.map(|s| (level as u8, s)))
    }
}

impl fmt::Display for FontSizeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(level, size)| format!("l{}={}pt", level, size))
            .collect();
        if parts.is_empty() {
            write!(f, "template")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// Parse a `font_size_lN` key into its level.
pub fn parse_font_size_key(key: &str) -> Option<u8> {
    let level = key.strip_prefix("font_size_l")?.parse::<u8>().ok()?;
    (level <= MAX_LEVEL).then_some(level)
}

/// Parse a point-size value. Zero and negative values are rejected.
pub fn parse_font_size_value(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("pt").unwrap_or(trimmed).trim();
    digits.parse::<u32>().ok().filter(|&size| size > 0)
}
