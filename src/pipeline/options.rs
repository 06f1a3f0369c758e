//! Pipeline options and configuration.

use super::classify::ClassifierConfig;
use super::cluster::DEFAULT_TOLERANCE;

/// Which extraction path the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Cluster and classify locally from decoder runs
    #[default]
    Local,
    /// Accept the external service's structure, gated by validation
    Delegated,
    /// Try the service first; fall back to the local path on failure
    PreferDelegated,
}

/// Options for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Vertical clustering tolerance in coordinate units
    pub tolerance: f32,

    /// Whether pages are processed in parallel
    pub parallel: bool,

    /// Extraction path selection
    pub strategy: Strategy,

    /// Heuristic classifier tunables
    pub classifier: ClassifierConfig,
}

impl PipelineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical clustering tolerance (bucket width).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the extraction strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            parallel: true,
            strategy: Strategy::Local,
            classifier: ClassifierConfig::default(),
        }
    }
}
