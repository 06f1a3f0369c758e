//! Document assembly: per-page element sequences into the canonical model.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};
use crate::model::{Document, Page, PageElement};
use crate::source::SourceInfo;

/// Composes per-page element sequences into a [`Document`].
///
/// Pages may arrive in any order (parallel workers); they are re-sorted
/// by index here. Indices must form the contiguous run `1..=n`, and `n`
/// must equal the source's declared page count — a mismatch is a
/// data-integrity error, never silently corrected.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    timestamp: Option<DateTime<Utc>>,
}

impl DocumentAssembler {
    /// Create an assembler that stamps documents with the current time.
    pub fn new() -> Self {
        Self { timestamp: None }
    }

    /// Create an assembler with a fixed timestamp.
    pub fn with_timestamp(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
        }
    }

    /// Assemble a document from per-page results.
    ///
    /// A source with zero pages assembles to a valid empty document.
    pub fn assemble(
        &self,
        info: &SourceInfo,
        mut pages: Vec<(u32, Vec<PageElement>)>,
    ) -> Result<Document> {
        pages.sort_by_key(|(index, _)| *index);

        for (position, (index, _)) in pages.iter().enumerate() {
            let expected = position as u32 + 1;
            if *index != expected {
                return Err(Error::SchemaMismatch(format!(
                    "page indices must run contiguously from 1: expected {}, found {}",
                    expected, index
                )));
            }
        }

        let actual = pages.len() as u32;
        if actual != info.page_count {
            return Err(Error::SchemaMismatch(format!(
                "source declared {} pages but {} were processed",
                info.page_count, actual
            )));
        }

        // One stamp per document, taken at assembly time.
        let processed_date = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        log::debug!("assembled {} pages for {:?}", actual, info.title);

        Ok(Document {
            document: info.title.clone(),
            page_count: actual,
            processed_date,
            pages: pages
                .into_iter()
                .map(|(index, elements)| Page::with_elements(index, elements))
                .collect(),
        })
    }
}
