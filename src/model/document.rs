//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// A structured document: the canonical pipeline output.
///
/// Invariants (enforced by the validator, not the type): `page_count`
/// equals the number of pages, and `pages` is a contiguous 1-based
/// ascending run with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document title or source filename
    pub document: String,

    /// Number of pages present
    pub page_count: u32,

    /// Processing timestamp, RFC 3339 / ISO-8601
    pub processed_date: String,

    /// Pages in ascending `page_index` order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(title: impl Into<String>, processed_date: impl Into<String>) -> Self {
        Self {
            document: title.into(),
            page_count: 0,
            processed_date: processed_date.into(),
            pages: Vec::new(),
        }
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
