//! The extraction-to-structure pipeline.
//!
//! Local path: runs → [`LineClusterer`] → [`StructuralClassifier`] →
//! [`DocumentAssembler`] → validator. Delegated path: an external
//! service's payload goes straight to the validator, which is the sole
//! gate either way.

mod assemble;
mod classify;
mod cluster;
mod options;

pub use assemble::DocumentAssembler;
pub use classify::{ClassifierConfig, FontProfile, StructuralClassifier, TableConfig};
pub use cluster::{Line, LineClusterer, TextRun, DEFAULT_TOLERANCE};
pub use options::{PipelineOptions, Strategy};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Document, PageElement};
use crate::source::{PageRuns, SemanticSource, SourceInfo, TextRunSource};
use crate::validate::{self, Provenance};

/// The extraction pipeline.
///
/// Stateless across documents: one instance may serve any number of
/// requests, and each document's working state is owned exclusively by
/// the request processing it.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline with default options.
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    /// Create a pipeline with custom options.
    pub fn with_options(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// The pipeline's options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Local path: pull every page from the decoder, cluster, classify,
    /// assemble, validate.
    pub fn extract(&self, source: &dyn TextRunSource) -> Result<Document> {
        let info = source.info()?;

        let mut inputs: Vec<(u32, PageRuns)> = Vec::with_capacity(info.page_count as usize);
        for page_index in 1..=info.page_count {
            inputs.push((page_index, source.page_runs(page_index)?));
        }

        self.process_pages(&info, inputs)
    }

    /// Delegated path: fetch the service payload and validate it.
    pub fn extract_delegated(&self, service: &dyn SemanticSource) -> Result<Document> {
        let payload = service.fetch()?;
        self.ingest(&payload)
    }

    /// Validate an externally supplied payload against the canonical
    /// schema.
    pub fn ingest(&self, payload: &str) -> Result<Document> {
        validate::ingest_json(payload)
    }

    /// Run the configured [`Strategy`] over the available collaborators.
    pub fn run(
        &self,
        service: Option<&dyn SemanticSource>,
        decoder: Option<&dyn TextRunSource>,
    ) -> Result<Document> {
        match self.options.strategy {
            Strategy::Local => match decoder {
                Some(decoder) => self.extract(decoder),
                None => Err(Error::SourceUnavailable(
                    "the local strategy requires a run decoder".to_string(),
                )),
            },
            Strategy::Delegated => match service {
                Some(service) => self.extract_delegated(service),
                None => Err(Error::SourceUnavailable(
                    "the delegated strategy requires a semantic service".to_string(),
                )),
            },
            Strategy::PreferDelegated => {
                if let Some(service) = service {
                    match self.extract_delegated(service) {
                        Ok(document) => return Ok(document),
                        Err(err) if decoder.is_some() => {
                            log::warn!("delegated extraction failed, falling back to local: {}", err);
                        }
                        Err(err) => return Err(err),
                    }
                }
                match decoder {
                    Some(decoder) => self.extract(decoder),
                    None => Err(Error::SourceUnavailable(
                        "no collaborator supplied".to_string(),
                    )),
                }
            }
        }
    }

    /// Cluster and classify pre-fetched pages, then assemble and
    /// validate. Pages fan out in parallel when enabled; the assembler
    /// re-sorts by index, so output never depends on completion order.
    fn process_pages(&self, info: &SourceInfo, inputs: Vec<(u32, PageRuns)>) -> Result<Document> {
        let clusterer = LineClusterer::with_tolerance(self.options.tolerance);
        let classifier = StructuralClassifier::with_config(self.options.classifier.clone());

        let process = |(page_index, page): (u32, PageRuns)| -> (u32, Vec<PageElement>) {
            let lines = clusterer.cluster(page.runs);
            let elements = classifier.classify(&lines, &page.images);
            (page_index, elements)
        };

        let pages: Vec<(u32, Vec<PageElement>)> = if self.options.parallel {
            inputs.into_par_iter().map(process).collect()
        } else {
            inputs.into_iter().map(process).collect()
        };

        let document = DocumentAssembler::new().assemble(info, pages)?;
        validate::validate(document, Provenance::Internal)
    }
}
