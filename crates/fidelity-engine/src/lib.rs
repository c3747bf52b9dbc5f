//! Archive fidelity engine
//!
//! Verifies that an archived copy of an article (typically markdown) still
//! carries the content of the live page it was captured from:
//! - Text normalization that neutralizes whitespace, quote and formula markup
//!   differences between renderings
//! - Per-kind presence tests (exact headings, fuzzy prose, line-based code)
//! - Figure reference counting
//! - A pass/fail report with a perfect / acceptable distinction
//!
//! Reference content comes from a [`ContentExtractor`]: a static HTML parser
//! and a JSON capture loader are provided.

pub mod config;
pub mod content;
pub mod error;
pub mod normalize;
pub mod verifier;

pub use config::{SampleSizes, VerifyConfig};
pub use content::{CodeBlock, Heading, HeadingLevel, Link, ReferenceContent};
pub use error::FidelityError;
pub use normalize::{normalize, normalize_code};
pub use verifier::{
    verify, Category, CategoryTally, ContentExtractor, ExtractionProfile, FidelityStatus,
    FigureCheck, HtmlExtractor, ItemKind, JsonExtractor, VerificationReport,
};
