//! Line clustering: spatial grouping of positioned text runs into
//! reading-order lines.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Default vertical clustering tolerance, in source coordinate units.
pub const DEFAULT_TOLERANCE: f32 = 1.0;

/// A positioned fragment of text, as emitted by a document decoder.
///
/// Ephemeral: produced per page by the source and consumed by the
/// clusterer. `y` is the baseline vertical coordinate; `x` and `font_size`
/// are optional hints.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Horizontal coordinate (left edge), when the decoder reports one
    pub x: Option<f32>,
    /// Baseline vertical coordinate
    pub y: f32,
    /// Font size hint in points
    pub font_size: Option<f32>,
}

impl TextRun {
    /// Create a run with only text and a vertical coordinate.
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self {
            text: text.into(),
            x: None,
            y,
            font_size: None,
        }
    }

    /// Set the horizontal coordinate.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    /// Set the font size hint.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }
}

/// Runs grouped by shared vertical position, ordered to reconstruct
/// reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Quantized vertical position of the line
    pub y: f32,
    /// Space-joined, trimmed text of the line's runs
    pub text: String,
    /// The runs in this line, ordered left to right where x is known
    pub runs: Vec<TextRun>,
}

impl Line {
    /// Number of characters in the line's text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Dominant font size, weighted by run text length.
    pub fn dominant_font_size(&self) -> Option<f32> {
        let mut total_chars = 0usize;
        let mut weighted = 0.0f32;
        for run in &self.runs {
            if let Some(size) = run.font_size {
                let chars = run.text.chars().count();
                total_chars += chars;
                weighted += size * chars as f32;
            }
        }
        if total_chars == 0 {
            None
        } else {
            Some(weighted / total_chars as f32)
        }
    }

    /// Check if the line's letters are all uppercase.
    pub fn is_uppercase(&self) -> bool {
        let letters: Vec<char> = self.text.chars().filter(|c| c.is_alphabetic()).collect();
        !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
    }
}

/// Groups text runs sharing (approximately) the same vertical position
/// into ordered lines.
///
/// This stage cannot fail: zero input runs yields zero lines.
#[derive(Debug, Clone)]
pub struct LineClusterer {
    tolerance: f32,
}

impl LineClusterer {
    /// Create a clusterer with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Create a clusterer with a custom tolerance (bucket width).
    /// Non-positive values fall back to the default.
    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            tolerance: if tolerance > 0.0 {
                tolerance
            } else {
                DEFAULT_TOLERANCE
            },
        }
    }

    /// Cluster one page's runs into lines.
    ///
    /// Runs are quantized to integer y buckets, ordered left to right
    /// within a bucket (runs without an x hint keep their source order),
    /// joined with single spaces, and emitted top of page first
    /// (descending y — PDF-style coordinate systems put y=0 at the
    /// bottom). Lines whose trimmed text is empty are dropped.
    pub fn cluster(&self, runs: Vec<TextRun>) -> Vec<Line> {
        if runs.is_empty() {
            return Vec::new();
        }

        let run_count = runs.len();
        let mut buckets: BTreeMap<i64, Vec<TextRun>> = BTreeMap::new();
        for run in runs {
            let key = (run.y / self.tolerance).round() as i64;
            buckets.entry(key).or_default().push(run);
        }

        let mut lines = Vec::with_capacity(buckets.len());
        for (key, mut bucket) in buckets.into_iter().rev() {
            // Stable sort: runs without x compare equal, so ties and
            // hint-less runs keep their source emission order.
            bucket.sort_by(|a, b| match (a.x, b.x) {
                (Some(ax), Some(bx)) => ax.partial_cmp(&bx).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            });

            let text = bucket
                .iter()
                .map(|r| r.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();

            if text.is_empty() {
                continue;
            }

            lines.push(Line {
                y: key as f32 * self.tolerance,
                text,
                runs: bucket,
            });
        }

        log::debug!("clustered {} runs into {} lines", run_count, lines.len());

        lines
    }
}

impl Default for LineClusterer {
    fn default() -> Self {
        Self::new()
    }
}
