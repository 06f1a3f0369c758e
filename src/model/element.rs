//! Typed page elements.

use serde::{Deserialize, Serialize};

/// A single semantically typed unit of document structure.
///
/// Serializes as `{ "type": "...", "content": "...", "metadata": {...} }`
/// with `metadata` present only for headers and tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageElement {
    /// A heading with its prominence level (1 = most prominent).
    Header {
        /// Heading text
        content: String,
        /// Heading metadata
        metadata: HeaderMeta,
    },

    /// A paragraph of body text.
    Paragraph {
        /// Paragraph text
        content: String,
    },

    /// A single list item, marker stripped.
    ListItem {
        /// Item text without its bullet or ordinal marker
        content: String,
    },

    /// A table with detected dimensions. `content` holds the serialized
    /// cell grid and may legitimately be a placeholder.
    Table {
        /// Serialized cells (rows joined by newlines, cells by " | ")
        content: String,
        /// Table metadata
        metadata: TableMeta,
    },

    /// A caption associated with an image region.
    ImageCaption {
        /// Caption text
        content: String,
    },
}

/// Metadata carried by header elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMeta {
    /// Heading level, 1-based (1 = most prominent)
    pub level: u32,
}

/// Metadata carried by table elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Number of detected rows
    pub rows: u32,
    /// Number of detected columns
    pub cols: u32,
}

impl PageElement {
    /// Create a header element.
    pub fn header(content: impl Into<String>, level: u32) -> Self {
        PageElement::Header {
            content: content.into(),
            metadata: HeaderMeta {
                level: level.max(1),
            },
        }
    }

    /// Create a paragraph element.
    pub fn paragraph(content: impl Into<String>) -> Self {
        PageElement::Paragraph {
            content: content.into(),
        }
    }

    /// Create a list item element.
    pub fn list_item(content: impl Into<String>) -> Self {
        PageElement::ListItem {
            content: content.into(),
        }
    }

    /// Create a table element.
    pub fn table(content: impl Into<String>, rows: u32, cols: u32) -> Self {
        PageElement::Table {
            content: content.into(),
            metadata: TableMeta { rows, cols },
        }
    }

    /// Create an image caption element.
    pub fn image_caption(content: impl Into<String>) -> Self {
        PageElement::ImageCaption {
            content: content.into(),
        }
    }

    /// Get the element's text content.
    pub fn content(&self) -> &str {
        match self {
            PageElement::Header { content, .. }
            | PageElement::Paragraph { content }
            | PageElement::ListItem { content }
            | PageElement::Table { content, .. }
            | PageElement::ImageCaption { content } => content,
        }
    }

    /// Check if this element is a header.
    pub fn is_header(&self) -> bool {
        matches!(self, PageElement::Header { .. })
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, PageElement::Table { .. })
    }

    /// Get the heading level, if this is a header.
    pub fn heading_level(&self) -> Option<u32> {
        match self {
            PageElement::Header { metadata, .. } => Some(metadata.level),
            _ => None,
        }
    }
}
