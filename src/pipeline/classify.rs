//! Structural classification: reading-order lines to typed elements.
//!
//! Per-line pattern matching runs through a small ordered rule table
//! (`header > table > list_item > image_caption`, paragraph fallback) so
//! the precedence stays auditable and each rule testable on its own.
//! Classification never drops input text: a line no rule claims is merged
//! into a paragraph.

use std::collections::BTreeMap;

use regex::Regex;

use crate::model::PageElement;
use crate::source::ImageRegion;

use super::cluster::Line;

/// Tunables for the heuristic classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Minimum points above the body size for a font-size heading
    pub heading_size_delta: f32,
    /// Maximum line length, relative to the page's median line length,
    /// for lexical headings
    pub short_line_ratio: f32,
    /// Vertical gap, as a multiple of the median line gap, that ends a
    /// paragraph
    pub paragraph_gap_factor: f32,
    /// Maximum caption length in characters
    pub caption_max_chars: usize,
    /// Maximum distance from an image region edge for caption association
    pub caption_proximity: f32,
    /// Table detection knobs
    pub table: TableConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            heading_size_delta: 1.5,
            short_line_ratio: 0.6,
            paragraph_gap_factor: 1.8,
            caption_max_chars: 80,
            caption_proximity: 24.0,
            table: TableConfig::default(),
        }
    }
}

/// Table detection configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_cols: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_cols: usize,
    /// Maximum x drift between rows for a column to count as aligned
    pub col_tolerance: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_cols: 2,
            max_cols: 6,
            col_tolerance: 3.0,
        }
    }
}

/// Font size statistics for heading level inference.
///
/// The most common run size is taken as body text; distinct larger sizes
/// are ranked into levels (largest size = level 1).
#[derive(Debug, Clone, Default)]
pub struct FontProfile {
    body_size: f32,
    heading_sizes: Vec<f32>,
}

impl FontProfile {
    /// Build a profile from one page's lines.
    pub fn from_lines(lines: &[Line], heading_size_delta: f32) -> Self {
        // 0.1pt histogram buckets keyed by integer for exact comparisons
        let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
        for line in lines {
            for run in &line.runs {
                if let Some(size) = run.font_size {
                    *histogram.entry((size * 10.0).round() as i32).or_insert(0) += 1;
                }
            }
        }

        if histogram.is_empty() {
            return Self::default();
        }

        // Most common size is body text; ties break toward the smaller
        // size so identical inputs always profile identically.
        let (body_key, _) = histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .unwrap();
        let body_size = *body_key as f32 / 10.0;

        let mut heading_sizes: Vec<f32> = histogram
            .keys()
            .map(|k| *k as f32 / 10.0)
            .filter(|s| *s >= body_size + heading_size_delta)
            .collect();
        heading_sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            body_size,
            heading_sizes,
        }
    }

    /// The inferred body text size (0.0 when no sizes were observed).
    pub fn body_size(&self) -> f32 {
        self.body_size
    }

    /// Heading level for a font size (1 = most prominent), or None for
    /// body-sized text.
    pub fn level_for(&self, size: f32) -> Option<u32> {
        for (i, &heading_size) in self.heading_sizes.iter().enumerate() {
            if size >= heading_size - 0.25 {
                return Some((i as u32 + 1).min(6));
            }
        }
        None
    }
}

/// A rule match: the produced element and how many lines it consumed.
struct RuleMatch {
    element: PageElement,
    consumed: usize,
}

/// Precomputed per-page signals shared by all rules.
struct ClassifyContext<'a> {
    lines: &'a [Line],
    images: &'a [ImageRegion],
    profile: FontProfile,
    median_len: usize,
    median_gap: f32,
}

impl<'a> ClassifyContext<'a> {
    fn new(lines: &'a [Line], images: &'a [ImageRegion], config: &ClassifierConfig) -> Self {
        let profile = FontProfile::from_lines(lines, config.heading_size_delta);

        let mut lengths: Vec<usize> = lines.iter().map(|l| l.char_count()).collect();
        lengths.sort_unstable();
        let median_len = lengths.get(lengths.len() / 2).copied().unwrap_or(0);

        let mut gaps: Vec<f32> = lines
            .windows(2)
            .map(|w| (w[0].y - w[1].y).abs())
            .filter(|g| *g > 0.1)
            .collect();
        gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median_gap = gaps.get(gaps.len() / 2).copied().unwrap_or(0.0);

        Self {
            lines,
            images,
            profile,
            median_len,
            median_gap,
        }
    }
}

type RuleFn = fn(&StructuralClassifier, &ClassifyContext, usize) -> Option<RuleMatch>;

/// The fixed rule precedence. Paragraph is the fallback, not a rule.
const RULES: &[(&str, RuleFn)] = &[
    ("header", StructuralClassifier::match_header),
    ("table", StructuralClassifier::match_table),
    ("list_item", StructuralClassifier::match_list_item),
    ("image_caption", StructuralClassifier::match_caption),
];

/// Maps lines to typed structural elements.
pub struct StructuralClassifier {
    config: ClassifierConfig,
    bullet_marker: Regex,
    ordinal_marker: Regex,
    caption_marker: Regex,
}

impl StructuralClassifier {
    /// Create a classifier with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    /// Create a classifier with custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            bullet_marker: Regex::new(r"^(?:[\u{2022}\u{2023}\u{25E6}\u{25AA}\u{25B8}\u{25BA}\u{2219}]\s*|[-\u{2013}\u{2014}*]\s+)").unwrap(),
            ordinal_marker: Regex::new(r"^(?:\((?:\d{1,3}|[A-Za-z])\)|(?:\d{1,3}|[A-Za-z])[.)])\s+")
                .unwrap(),
            caption_marker: Regex::new(
                r"(?i)^(?:figure|fig\.?|image|img\.?|chart|photo|illustration)\b",
            )
            .unwrap(),
        }
    }

    /// Classify one page's lines into an ordered element sequence.
    ///
    /// Every input line contributes to exactly one element; ambiguous
    /// lines degrade to paragraphs rather than being dropped.
    pub fn classify(&self, lines: &[Line], images: &[ImageRegion]) -> Vec<PageElement> {
        if lines.is_empty() {
            return Vec::new();
        }

        let cx = ClassifyContext::new(lines, images, &self.config);
        let mut elements: Vec<PageElement> = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut last_y: Option<f32> = None;

        let mut i = 0;
        while i < lines.len() {
            if let Some((rule, matched)) = self.match_rules(&cx, i) {
                log::debug!("line {} matched rule {}", i, rule);
                flush_paragraph(&mut paragraph, &mut elements);
                last_y = None;
                i += matched.consumed;
                elements.push(matched.element);
                continue;
            }

            let line = &lines[i];
            if let Some(prev_y) = last_y {
                let gap = (prev_y - line.y).abs();
                if cx.median_gap > 0.0 && gap > cx.median_gap * self.config.paragraph_gap_factor {
                    flush_paragraph(&mut paragraph, &mut elements);
                }
            }
            paragraph.push(&line.text);
            last_y = Some(line.y);
            i += 1;
        }
        flush_paragraph(&mut paragraph, &mut elements);

        elements
    }

    fn match_rules(&self, cx: &ClassifyContext, index: usize) -> Option<(&'static str, RuleMatch)> {
        for &(name, rule) in RULES {
            if let Some(matched) = rule(self, cx, index) {
                return Some((name, matched));
            }
        }
        None
    }

    /// Header: font-size rank when size hints exist; otherwise a short
    /// all-uppercase line. Marker lines are list items, never headers.
    fn match_header(&self, cx: &ClassifyContext, index: usize) -> Option<RuleMatch> {
        let line = &cx.lines[index];
        if self.strip_list_marker(&line.text).is_some() {
            return None;
        }

        let level = match line.dominant_font_size() {
            Some(size) => cx.profile.level_for(size)?,
            None => {
                let short = cx.median_len > 0
                    && (line.char_count() as f32)
                        <= cx.median_len as f32 * self.config.short_line_ratio;
                if !(short && line.is_uppercase()) {
                    return None;
                }
                1
            }
        };

        Some(RuleMatch {
            element: PageElement::header(line.text.clone(), level),
            consumed: 1,
        })
    }

    /// Table: a run of consecutive lines whose x-positioned cells align
    /// into the same column grid.
    fn match_table(&self, cx: &ClassifyContext, index: usize) -> Option<RuleMatch> {
        let tc = &self.config.table;
        let columns = self.column_positions(&cx.lines[index])?;

        let mut end = index;
        while end + 1 < cx.lines.len() {
            match self.column_positions(&cx.lines[end + 1]) {
                Some(next) if columns_aligned(&columns, &next, tc.col_tolerance) => end += 1,
                _ => break,
            }
        }

        let rows = end - index + 1;
        if rows < tc.min_rows {
            return None;
        }

        let content = cx.lines[index..=end]
            .iter()
            .map(|line| {
                line.runs
                    .iter()
                    .map(|r| r.text.trim())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        Some(RuleMatch {
            element: PageElement::table(content, rows as u32, columns.len() as u32),
            consumed: rows,
        })
    }

    /// List item: a leading bullet or ordinal marker, stripped from the
    /// content. Marker-only lines fall through so no text is lost.
    fn match_list_item(&self, cx: &ClassifyContext, index: usize) -> Option<RuleMatch> {
        let line = &cx.lines[index];
        let rest = self.strip_list_marker(&line.text)?;
        if rest.is_empty() {
            return None;
        }

        Some(RuleMatch {
            element: PageElement::list_item(rest),
            consumed: 1,
        })
    }

    /// Image caption: a short line that carries a figure marker or sits
    /// next to a reported image region.
    fn match_caption(&self, cx: &ClassifyContext, index: usize) -> Option<RuleMatch> {
        let line = &cx.lines[index];
        if line.char_count() > self.config.caption_max_chars {
            return None;
        }

        let marked = self.caption_marker.is_match(&line.text);
        let near_image = cx
            .images
            .iter()
            .any(|region| region.distance_to(line.y) <= self.config.caption_proximity);
        if !(marked || near_image) {
            return None;
        }

        Some(RuleMatch {
            element: PageElement::image_caption(line.text.clone()),
            consumed: 1,
        })
    }

    /// Strip a leading list marker, returning the trimmed remainder.
    fn strip_list_marker<'t>(&self, text: &'t str) -> Option<&'t str> {
        if let Some(m) = self.bullet_marker.find(text) {
            return Some(text[m.end()..].trim());
        }
        if let Some(m) = self.ordinal_marker.find(text) {
            return Some(text[m.end()..].trim());
        }
        None
    }

    /// Sorted cell x positions for a line, when it qualifies as a table
    /// row (every run carries x, column count within bounds).
    fn column_positions(&self, line: &Line) -> Option<Vec<f32>> {
        let tc = &self.config.table;
        if line.runs.len() < tc.min_cols || line.runs.len() > tc.max_cols {
            return None;
        }
        line.runs.iter().map(|r| r.x).collect()
    }
}

impl Default for StructuralClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn columns_aligned(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

fn flush_paragraph(buffer: &mut Vec<&str>, elements: &mut Vec<PageElement>) {
    if buffer.is_empty() {
        return;
    }
    let content = std::mem::take(buffer).join(" ");
    elements.push(PageElement::paragraph(content));
}
