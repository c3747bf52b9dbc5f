//! Error types for the fidelity engine
//!
//! Verification itself never fails; these cover loading reference content.

use thiserror::Error;

/// Errors that can occur while producing reference content
#[derive(Error, Debug)]
pub enum FidelityError {
    #[error("Content extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid reference JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
