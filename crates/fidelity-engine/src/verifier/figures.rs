//! Figure reference detection
//!
//! Captions are numbered ("Figure 3", "Fig. 3", "Рисунок 3", "Рис. 3") and
//! archived images are often named after them (`figure_3.png`). Counting the
//! distinct ordinals carried by the candidate's images tells whether every
//! figure survived; a text mention such as "see Figure 3" does not count.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Word for "figure" (English or Russian) followed by its ordinal
    static ref FIGURE_CAPTION_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:figure|fig\.?|рисун(?:ок|ка|ке|ку)|рис\.?)\s*[-_#№]?\s*(\d{1,4})\b"
    )
    .unwrap();

    /// Markdown image: `![alt](src "title")`
    static ref MARKDOWN_IMAGE: Regex = Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap();

    /// HTML image tag with all of its attributes
    static ref HTML_IMAGE: Regex = Regex::new(r"(?i)<img\b[^>]*>").unwrap();
}

/// Distinct figure ordinals referenced anywhere in `text`
pub fn figure_numbers(text: &str) -> BTreeSet<u32> {
    FIGURE_CAPTION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect()
}

/// Distinct figure ordinals named by the alt text or source of an image
pub fn image_figure_numbers(text: &str) -> BTreeSet<u32> {
    let markdown = MARKDOWN_IMAGE.captures_iter(text).flat_map(|caps| {
        let alt = caps.get(1).map_or("", |m| m.as_str());
        let src = caps.get(2).map_or("", |m| m.as_str());
        figure_numbers(&format!("{} {}", alt, src))
    });
    let html = HTML_IMAGE
        .find_iter(text)
        .flat_map(|tag| figure_numbers(tag.as_str()));
    markdown.chain(html).collect()
}

/// Outcome of the figure count gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureCheck {
    /// Figures the archive must reference
    pub expected: usize,
    /// Distinct figure images found in the archive
    pub found: usize,
    /// `expected - found`, never negative
    pub missing: usize,
    /// Declared ordinals absent from the archive
    pub missing_ordinals: Vec<u32>,
}

impl FigureCheck {
    /// Compare the candidate's figure images against the expected count.
    ///
    /// `declared` are the ordinals from the reference captions, used to name
    /// the figures that went missing.
    pub fn run(candidate: &str, expected: usize, declared: &[u32]) -> Self {
        let found_numbers = image_figure_numbers(candidate);
        let found = found_numbers.len();
        let missing_ordinals = declared
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|n| !found_numbers.contains(n))
            .collect();

        Self {
            expected,
            found,
            missing: expected.saturating_sub(found),
            missing_ordinals,
        }
    }

    pub fn passed(&self) -> bool {
        self.found >= self.expected
    }

    /// Entries for the report's missing-items list
    pub fn missing_entries(&self) -> Vec<String> {
        if self.passed() {
            return Vec::new();
        }
        if self.missing_ordinals.is_empty() {
            vec![format!(
                "{} of {} figures not referenced ({} found)",
                self.missing, self.expected, self.found
            )]
        } else {
            self.missing_ordinals
                .iter()
                .map(|n| format!("Figure {}", n))
                .collect()
        }
    }
}
