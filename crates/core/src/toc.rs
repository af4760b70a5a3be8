//! Table-of-contents collection.

use crate::types::{TocEntry, TocTier};

/// Gathers `##` and `###` headings while the document is segmented.
#[derive(Debug, Clone, Default)]
pub struct TocCollector {
    enabled: bool,
    entries: Vec<TocEntry>,
}

impl TocCollector {
    /// Create a collector; a disabled collector records nothing.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a slide-opening heading. Only depths 2 and 3 produce entries.
    pub fn record(&mut self, depth: usize, text: &str, slide_index: usize) {
        if !self.enabled {
            return;
        }
        let tier = match depth {
            2 => TocTier::Section,
            3 => TocTier::Content,
            _ => return,
        };
        log::debug!("TOC entry '{}' -> slide {}", text, slide_index + 1);
        self.entries.push(TocEntry {
            text: text.to_string(),
            slide_index,
            tier,
        });
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Hand the entries over to the renderer.
    pub fn into_entries(self) -> Vec<TocEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_section_and_content() {
        let mut toc = TocCollector::new(true);
        toc.record(1, "Title", 0);
        toc.record(2, "Intro", 1);
        toc.record(3, "Detail", 2);

        let entries = toc.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tier, TocTier::Section);
        assert_eq!(entries[0].slide_index, 1);
        assert_eq!(entries[1].tier, TocTier::Content);
        assert_eq!(entries[1].text, "Detail");
    }

    #[test]
    fn test_disabled_collector() {
        let mut toc = TocCollector::new(false);
        toc.record(2, "Intro", 1);
        assert!(toc.entries().is_empty());
        assert!(!toc.is_enabled());
    }
}
