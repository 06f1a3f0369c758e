//! Result validation against the canonical schema.
//!
//! Every document — locally assembled or externally supplied — passes
//! through here before reaching a consumer. Checks fail fast, naming the
//! first violated invariant; an untrusted producer's malformed payload is
//! never repaired into something that looks valid.

use chrono::DateTime;

use crate::error::{Error, Result};
use crate::model::{Document, PageElement};

/// Where a candidate document came from. Selects the error kind on
/// failure: a bad external payload is `MalformedPayload`, a bad internal
/// assembly is `SchemaMismatch` (a pipeline defect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Assembled by this pipeline
    Internal,
    /// Supplied by an external producer
    External,
}

/// Parse an untrusted JSON payload and validate it.
///
/// Deserialization rejects missing required fields and unknown element
/// `type` values; the error message names the offender.
pub fn ingest_json(payload: &str) -> Result<Document> {
    let document: Document =
        serde_json::from_str(payload).map_err(|e| Error::MalformedPayload(e.to_string()))?;
    validate(document, Provenance::External)
}

/// Validate a candidate document, returning it on success.
///
/// Empty-content elements (other than tables) in an external payload are
/// dropped, mirroring the clusterer's empty-line rule; in an internally
/// assembled document an empty element is a defect and fails instead.
pub fn validate(mut document: Document, provenance: Provenance) -> Result<Document> {
    let internal = provenance == Provenance::Internal;

    if provenance == Provenance::External {
        for page in &mut document.pages {
            let before = page.elements.len();
            page.elements
                .retain(|element| element.is_table() || !element.content().trim().is_empty());
            let dropped = before - page.elements.len();
            if dropped > 0 {
                log::debug!(
                    "dropped {} empty elements from page {}",
                    dropped,
                    page.page_index
                );
            }
        }
    }

    if DateTime::parse_from_rfc3339(&document.processed_date).is_err() {
        return Err(Error::validation(
            internal,
            format!(
                "processedDate: `{}` is not a valid ISO-8601 timestamp",
                document.processed_date
            ),
        ));
    }

    if document.page_count as usize != document.pages.len() {
        return Err(Error::validation(
            internal,
            format!(
                "pageCount is {} but {} pages are present",
                document.page_count,
                document.pages.len()
            ),
        ));
    }

    for (position, page) in document.pages.iter().enumerate() {
        let expected = position as u32 + 1;
        if page.page_index != expected {
            return Err(Error::validation(
                internal,
                format!(
                    "pages[{}].pageIndex: expected {}, found {}",
                    position, expected, page.page_index
                ),
            ));
        }

        for (slot, element) in page.elements.iter().enumerate() {
            check_element(element, internal, position, slot)?;
        }
    }

    Ok(document)
}

fn check_element(
    element: &PageElement,
    internal: bool,
    page_position: usize,
    slot: usize,
) -> Result<()> {
    if let PageElement::Header { metadata, .. } = element {
        if metadata.level < 1 {
            return Err(Error::validation(
                internal,
                format!(
                    "pages[{}].elements[{}]: header level must be >= 1",
                    page_position, slot
                ),
            ));
        }
    }

    // Content must be non-empty after trimming; tables are exempt because
    // their content may be a serialized-cell placeholder.
    if !element.is_table() && element.content().trim().is_empty() {
        return Err(Error::validation(
            internal,
            format!(
                "pages[{}].elements[{}]: content is empty",
                page_position, slot
            ),
        ));
    }

    Ok(())
}
