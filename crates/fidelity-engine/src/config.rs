//! Verification parameters
//!
//! Everything that varies between articles (thresholds, sample sizes, the
//! expected figure count) is passed in explicitly; the engine reads no
//! environment and holds no global state.

use serde::{Deserialize, Serialize};

use crate::content::ReferenceContent;

/// Parameters for one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Minimum pass rate accepted for an imperfect archive (default: 0.85)
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// How many paragraphs and list items are sampled
    #[serde(default)]
    pub samples: SampleSizes,
    /// Figure count the archive must reference; falls back to the reference's
    /// declared figures when unset
    #[serde(default)]
    pub expected_figures: Option<usize>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            samples: SampleSizes::default(),
            expected_figures: None,
        }
    }
}

impl VerifyConfig {
    pub fn with_pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    pub fn with_expected_figures(mut self, count: usize) -> Self {
        self.expected_figures = Some(count);
        self
    }

    /// Figure count to enforce for `reference`; zero disables the figure check
    pub fn figure_target(&self, reference: &ReferenceContent) -> usize {
        self.expected_figures.unwrap_or_else(|| reference.declared_figures())
    }
}

/// Sampling bounds for long sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSizes {
    /// Paragraphs checked from each end of the article (default: 5)
    #[serde(default = "default_paragraph_sample")]
    pub paragraphs: usize,
    /// List items checked from the start (default: 10)
    #[serde(default = "default_list_item_sample")]
    pub list_items: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        Self {
            paragraphs: default_paragraph_sample(),
            list_items: default_list_item_sample(),
        }
    }
}

fn default_pass_threshold() -> f64 {
    0.85
}

fn default_paragraph_sample() -> usize {
    5
}

fn default_list_item_sample() -> usize {
    10
}
