//! # structex
//!
//! Structured document extraction for Rust.
//!
//! This library takes a document's raw positioned text — character/word
//! runs with coordinates, as emitted by an external decoder — and
//! produces an ordered document model of typed elements: headers with
//! level, paragraphs, list items, tables with dimensions, and image
//! captions.
//!
//! ## Quick Start
//!
//! ```
//! use structex::{PageRuns, Pipeline, StaticRunSource, TextRun};
//!
//! fn main() -> structex::Result<()> {
//!     let page = PageRuns::new(vec![
//!         TextRun::new("Chapter 1", 700.0).with_font_size(24.0),
//!         TextRun::new("This is body text.", 650.0).with_font_size(12.0),
//!     ]);
//!     let source = StaticRunSource::new("book.pdf", vec![page]);
//!
//!     let doc = Pipeline::new().extract(&source)?;
//!     assert_eq!(doc.page_count, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading-order reconstruction**: runs cluster into lines by
//!   vertical position, top of page first
//! - **Typed structure**: an auditable rule table classifies lines into
//!   headers, tables, list items, captions, and paragraphs
//! - **One gate for every producer**: locally assembled and externally
//!   supplied documents pass the same schema validator
//! - **Parallel processing**: pages fan out through Rayon with
//!   deterministic output order

pub mod error;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod validate;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{Document, HeaderMeta, Page, PageElement, TableMeta};
pub use pipeline::{
    ClassifierConfig, DocumentAssembler, FontProfile, Line, LineClusterer, Pipeline,
    PipelineOptions, Strategy, StructuralClassifier, TableConfig, TextRun,
};
pub use source::{
    ImageRegion, PageRuns, SemanticSource, SourceInfo, StaticRunSource, TextRunSource,
};
pub use validate::Provenance;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document to canonical-schema JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Serialize(format!("JSON serialization error: {}", e)))
}

/// Extract a structured document from a run source with default options.
pub fn extract(source: &dyn TextRunSource) -> Result<Document> {
    Pipeline::new().extract(source)
}

/// Extract a structured document with custom options.
pub fn extract_with_options(
    source: &dyn TextRunSource,
    options: PipelineOptions,
) -> Result<Document> {
    Pipeline::with_options(options).extract(source)
}

/// Validate an externally supplied JSON payload into a document.
pub fn ingest_json(payload: &str) -> Result<Document> {
    validate::ingest_json(payload)
}

/// Builder for configuring and running the extraction pipeline.
///
/// # Example
///
/// ```
/// use structex::{PageRuns, StaticRunSource, Structex, TextRun};
///
/// let source = StaticRunSource::new(
///     "notes.pdf",
///     vec![PageRuns::new(vec![TextRun::new("- remember this", 500.0)])],
/// );
///
/// let doc = Structex::new()
///     .with_tolerance(2.0)
///     .sequential()
///     .extract(&source)?;
/// # Ok::<(), structex::Error>(())
/// ```
pub struct Structex {
    options: PipelineOptions,
}

impl Structex {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
        }
    }

    /// Set the vertical clustering tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.with_tolerance(tolerance);
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set the extraction strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.options = self.options.with_strategy(strategy);
        self
    }

    /// Set the classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.options = self.options.with_classifier(classifier);
        self
    }

    /// Build the configured pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline::with_options(self.options)
    }

    /// Extract from a run source.
    pub fn extract(self, source: &dyn TextRunSource) -> Result<Document> {
        self.build().extract(source)
    }

    /// Run the configured strategy over the available collaborators.
    pub fn run(
        self,
        service: Option<&dyn SemanticSource>,
        decoder: Option<&dyn TextRunSource>,
    ) -> Result<Document> {
        self.build().run(service, decoder)
    }
}

impl Default for Structex {
    fn default() -> Self {
        Self::new()
    }
}
