//! Page-level types.

use super::PageElement;
use serde::{Deserialize, Serialize};

/// A single page in the document.
///
/// Elements preserve the original top-to-bottom, left-to-right reading
/// order. A processed page with no extractable text is still present, with
/// an empty element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page number, 1-based, matching the source document's physical order
    pub page_index: u32,

    /// Typed elements on the page, in reading order
    pub elements: Vec<PageElement>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(page_index: u32) -> Self {
        Self {
            page_index,
            elements: Vec::new(),
        }
    }

    /// Create a page with the given elements.
    pub fn with_elements(page_index: u32, elements: Vec<PageElement>) -> Self {
        Self {
            page_index,
            elements,
        }
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: PageElement) {
        self.elements.push(element);
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Get plain text content of the page, elements joined by newlines.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.content())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
