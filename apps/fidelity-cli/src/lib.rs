//! Archive fidelity command-line runner
//!
//! Reads reference captures, HTML snapshots and archived markdown from disk,
//! verifies them with `fidelity_engine` and reports per article or per batch.

pub mod manifest;
pub mod run;

pub use manifest::{ArticleConfig, Manifest, ReferenceSource};
pub use run::{
    extract_html, load_reference, run_batch, verify_article, ArticleError, ArticleOutcome,
    BatchSummary,
};
