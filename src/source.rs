//! Collaborator boundary: suppliers of positioned text runs and of
//! pre-structured documents.
//!
//! The crate never decodes document bytes itself. A decoder implements
//! [`TextRunSource`]; a semantic-extraction service implements
//! [`SemanticSource`]. Either way the result passes the validator before
//! reaching any consumer.

use crate::error::{Error, Result};
use crate::pipeline::TextRun;

/// Metadata declared by a source before page processing starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    /// Document title or source filename
    pub title: String,
    /// Declared number of pages
    pub page_count: u32,
}

impl SourceInfo {
    /// Create source info.
    pub fn new(title: impl Into<String>, page_count: u32) -> Self {
        Self {
            title: title.into(),
            page_count,
        }
    }
}

/// Vertical extent of an image placed on a page, when the decoder
/// reports one. Used only for caption association.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRegion {
    /// Vertical coordinate of the region's bottom edge
    pub y: f32,
    /// Vertical extent of the region
    pub height: f32,
}

impl ImageRegion {
    /// Create an image region.
    pub fn new(y: f32, height: f32) -> Self {
        Self { y, height }
    }

    /// Distance from a vertical coordinate to this region's extent
    /// (zero when the coordinate falls inside it).
    pub fn distance_to(&self, y: f32) -> f32 {
        let top = self.y + self.height;
        if y >= self.y && y <= top {
            0.0
        } else {
            (y - self.y).abs().min((y - top).abs())
        }
    }
}

/// One page's worth of decoder output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRuns {
    /// Text runs, in decoder emission order
    pub runs: Vec<TextRun>,
    /// Image placements on the page, if the decoder reports them
    pub images: Vec<ImageRegion>,
}

impl PageRuns {
    /// Create a page from runs alone.
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            images: Vec::new(),
        }
    }

    /// Attach image regions.
    pub fn with_images(mut self, images: Vec<ImageRegion>) -> Self {
        self.images = images;
        self
    }
}

/// Supplies per-page positioned text runs from an external decoder.
///
/// Pages are addressed 1-based. Implementations own the only blocking
/// call in the pipeline; timeouts are the caller's concern.
pub trait TextRunSource {
    /// Declared document metadata (title, page count).
    fn info(&self) -> Result<SourceInfo>;

    /// The runs for one page. May be empty for a page with no text.
    fn page_runs(&self, page_index: u32) -> Result<PageRuns>;
}

/// Supplies a raw JSON payload purporting to already match the canonical
/// schema, from an external semantic-extraction service.
pub trait SemanticSource {
    /// Fetch the raw payload.
    fn fetch(&self) -> Result<String>;
}

/// In-memory run source for tests and embedders that already hold
/// decoded runs.
#[derive(Debug, Clone)]
pub struct StaticRunSource {
    title: String,
    pages: Vec<PageRuns>,
}

impl StaticRunSource {
    /// Create a source from pre-decoded pages.
    pub fn new(title: impl Into<String>, pages: Vec<PageRuns>) -> Self {
        Self {
            title: title.into(),
            pages,
        }
    }
}

impl TextRunSource for StaticRunSource {
    fn info(&self) -> Result<SourceInfo> {
        Ok(SourceInfo::new(self.title.clone(), self.pages.len() as u32))
    }

    fn page_runs(&self, page_index: u32) -> Result<PageRuns> {
        (page_index as usize)
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .cloned()
            .ok_or_else(|| {
                Error::SourceUnavailable(format!("page {} was not supplied", page_index))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_info() {
        let source = StaticRunSource::new("doc.pdf", vec![PageRuns::default()]);
        let info = source.info().unwrap();
        assert_eq!(info.title, "doc.pdf");
        assert_eq!(info.page_count, 1);
    }

    #[test]
    fn test_static_source_page_bounds() {
        let source = StaticRunSource::new("doc.pdf", vec![PageRuns::default()]);
        assert!(source.page_runs(1).is_ok());
        assert!(matches!(
            source.page_runs(0),
            Err(Error::SourceUnavailable(_))
        ));
        assert!(matches!(
            source.page_runs(2),
            Err(Error::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_image_region_distance() {
        let region = ImageRegion::new(100.0, 50.0);
        assert_eq!(region.distance_to(120.0), 0.0);
        assert_eq!(region.distance_to(90.0), 10.0);
        assert_eq!(region.distance_to(170.0), 20.0);
    }
}
