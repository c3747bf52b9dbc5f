//! Archive fidelity verification
//!
//! Checks how much of an article's reference content is present in its
//! archived copy: every heading, a head/tail sample of paragraphs, the first
//! list items, every code block and, when figures are expected, the figure
//! references. The result is a [`VerificationReport`] with a two-tier verdict.

pub mod extract;
pub mod figures;
pub mod matcher;

// Re-export main types
pub use extract::{ContentExtractor, ExtractionProfile, HtmlExtractor, JsonExtractor};
pub use figures::{figure_numbers, image_figure_numbers, FigureCheck};
pub use matcher::{is_present, word_match_rate, ItemKind};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::VerifyConfig;
use crate::content::ReferenceContent;
use crate::normalize::{collapse_whitespace, normalize, normalize_code};

/// Longest excerpt of a missing item shown in text reports
pub const PREVIEW_CHARS: usize = 100;

/// Group of reference items a check belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Title,
    Headings,
    Paragraphs,
    ListItems,
    CodeBlocks,
    Figures,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::Headings => "Headings",
            Category::Paragraphs => "Paragraphs",
            Category::ListItems => "List items",
            Category::CodeBlocks => "Code blocks",
            Category::Figures => "Figures",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Checks run and passed within one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub checked: usize,
    pub passed: usize,
}

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FidelityStatus {
    /// Nothing is missing
    Perfect,
    /// Something is missing but the pass rate meets the threshold
    Acceptable,
    /// Pass rate below the threshold
    Failed,
}

/// Result of verifying one archived article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Number of checks performed
    pub total_checks: usize,
    /// Number of checks that passed
    pub passed_checks: usize,
    /// `passed_checks / total_checks`, 1.0 when nothing was checked
    pub pass_rate: f64,
    /// Failing items by category; categories without failures are absent
    pub missing_items: BTreeMap<Category, Vec<String>>,
    /// Perfect, or pass rate at or above the threshold
    pub success: bool,
    /// Perfect / acceptable / failed
    pub status: FidelityStatus,
    /// Per-category bookkeeping
    pub tallies: BTreeMap<Category, CategoryTally>,
    /// Figure gate outcome, when figures were expected
    pub figures: Option<FigureCheck>,
}

impl VerificationReport {
    /// True when no item of any kind is missing
    pub fn is_perfect(&self) -> bool {
        self.missing_items.is_empty()
    }

    /// Conventional process exit code for this verdict
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }

    /// Number of checks performed for `category`
    pub fn checks_for(&self, category: Category) -> usize {
        self.tallies.get(&category).map(|t| t.checked).unwrap_or(0)
    }

    /// Generate a text report
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Archive Fidelity Report\n");
        output.push_str(&"=".repeat(60));
        output.push_str("\n\n");

        output.push_str(&format!("Status: {:?}\n", self.status));
        output.push_str(&format!(
            "Checks: {}/{} passed ({:.1}%)\n\n",
            self.passed_checks,
            self.total_checks,
            self.pass_rate * 100.0
        ));

        output.push_str("By category:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for (category, tally) in &self.tallies {
            let mark = if tally.passed == tally.checked { "✓" } else { "✗" };
            output.push_str(&format!(
                "{} {:<12} {}/{}\n",
                mark,
                category.label(),
                tally.passed,
                tally.checked
            ));
        }

        if let Some(figures) = &self.figures {
            output.push_str(&format!(
                "\nFigures: {} of {} found\n",
                figures.found, figures.expected
            ));
        }

        if !self.missing_items.is_empty() {
            output.push_str("\nMissing items:\n");
            output.push_str(&"-".repeat(40));
            output.push('\n');
            for (category, items) in &self.missing_items {
                output.push_str(&format!("{} ({}):\n", category.label(), items.len()));
                for item in items {
                    output.push_str(&format!("  - {}\n", preview(item, PREVIEW_CHARS)));
                }
            }
        }

        output
    }
}

/// Single-line excerpt of at most `max_chars` characters
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = collapse_whitespace(text);
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[derive(Default)]
struct ReportBuilder {
    total: usize,
    passed: usize,
    missing: BTreeMap<Category, Vec<String>>,
    tallies: BTreeMap<Category, CategoryTally>,
}

impl ReportBuilder {
    fn record(&mut self, category: Category, passed: bool, item: &str) {
        let tally = self.tallies.entry(category).or_default();
        tally.checked += 1;
        self.total += 1;
        if passed {
            tally.passed += 1;
            self.passed += 1;
        } else {
            tracing::debug!(%category, item = %preview(item, 60), "Missing from archive");
            self.missing
                .entry(category)
                .or_default()
                .push(item.to_string());
        }
    }

    fn record_figures(&mut self, check: &FigureCheck) {
        let tally = self.tallies.entry(Category::Figures).or_default();
        tally.checked += 1;
        self.total += 1;
        if check.passed() {
            tally.passed += 1;
            self.passed += 1;
        } else {
            tracing::debug!(
                expected = check.expected,
                found = check.found,
                "Figure references missing from archive"
            );
            self.missing
                .entry(Category::Figures)
                .or_default()
                .extend(check.missing_entries());
        }
    }

    fn finish(self, pass_threshold: f64, figures: Option<FigureCheck>) -> VerificationReport {
        let pass_rate = if self.total == 0 {
            1.0
        } else {
            self.passed as f64 / self.total as f64
        };
        let perfect = self.missing.is_empty();
        let success = perfect || pass_rate >= pass_threshold;
        let status = if perfect {
            FidelityStatus::Perfect
        } else if success {
            FidelityStatus::Acceptable
        } else {
            FidelityStatus::Failed
        };

        VerificationReport {
            total_checks: self.total,
            passed_checks: self.passed,
            pass_rate,
            missing_items: self.missing,
            success,
            status,
            tallies: self.tallies,
            figures,
        }
    }
}

/// First `n` and last `n` items; every item once when the two windows overlap
fn head_and_tail<T>(items: &[T], n: usize) -> impl Iterator<Item = &T> {
    let len = items.len();
    let (head, tail_start) = if len <= n.saturating_mul(2) {
        (len, len)
    } else {
        (n, len - n)
    };
    items[..head].iter().chain(items[tail_start..].iter())
}

/// Verify an archived `candidate` text against its `reference` content.
///
/// Pure and infallible: missing or empty reference sections skip their checks,
/// and a failed verdict is reported through the returned report.
///
/// # Example
/// ```
/// use fidelity_engine::{verify, Heading, HeadingLevel, ReferenceContent, VerifyConfig};
///
/// let reference = ReferenceContent {
///     title: Some("X".to_string()),
///     headings: vec![Heading::new(HeadingLevel::H2, "Intro")],
///     paragraphs: vec!["The quick brown fox jumps over the lazy dog today".to_string()],
///     ..Default::default()
/// };
/// let candidate = "# X\n## Intro\nQuick brown fox jumped over lazy dog yesterday.";
///
/// let report = verify(&reference, candidate, &VerifyConfig::default());
/// assert!(report.success);
/// assert_eq!(report.pass_rate, 1.0);
/// ```
pub fn verify(
    reference: &ReferenceContent,
    candidate: &str,
    config: &VerifyConfig,
) -> VerificationReport {
    let prose = normalize(candidate);
    let code = normalize_code(candidate);
    let mut builder = ReportBuilder::default();

    // 1. Title
    if let Some(title) = reference.title.as_deref().filter(|t| !t.trim().is_empty()) {
        builder.record(Category::Title, prose.contains(&normalize(title)), title);
    }

    // 2. Every heading
    for heading in &reference.headings {
        let passed = is_present(&heading.text, &prose, ItemKind::Heading);
        builder.record(Category::Headings, passed, &heading.text);
    }

    tracing::debug!(
        paragraphs = reference.paragraphs.len(),
        paragraph_sample = config.samples.paragraphs,
        list_items = reference.list_items.len(),
        list_item_sample = config.samples.list_items,
        "Sampling reference content"
    );

    // 3. Paragraph sample from both ends
    for paragraph in head_and_tail(&reference.paragraphs, config.samples.paragraphs) {
        let passed = is_present(paragraph, &prose, ItemKind::Paragraph);
        builder.record(Category::Paragraphs, passed, paragraph);
    }

    // 4. Leading list items
    for item in reference.list_items.iter().take(config.samples.list_items) {
        let passed = is_present(item, &prose, ItemKind::ListItem);
        builder.record(Category::ListItems, passed, item);
    }

    // 5. Every code block
    for block in &reference.code_blocks {
        let passed = is_present(&block.text, &code, ItemKind::CodeLine);
        builder.record(Category::CodeBlocks, passed, &block.text);
    }

    // 6. Figure count gate
    let figures = match config.figure_target(reference) {
        0 => None,
        expected => {
            let check = FigureCheck::run(candidate, expected, &reference.figure_refs);
            builder.record_figures(&check);
            Some(check)
        }
    };

    let report = builder.finish(config.pass_threshold, figures);
    tracing::info!(
        status = ?report.status,
        passed = report.passed_checks,
        total = report.total_checks,
        "Verification finished"
    );
    report
}
