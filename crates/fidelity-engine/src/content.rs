//! Reference content model
//!
//! `ReferenceContent` is the structured ground truth extracted from a live
//! article page. It is produced by a [`ContentExtractor`](crate::verifier::ContentExtractor)
//! and consumed read-only by [`verify`](crate::verifier::verify).
//!
//! Every sequence defaults to empty when absent from a JSON capture, so an
//! under-populated capture simply skips the corresponding checks.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FidelityError;

/// Structured content of a reference article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceContent {
    /// Article title
    pub title: Option<String>,
    /// Headings in document order
    pub headings: Vec<Heading>,
    /// Paragraphs longer than 10 characters, in document order
    pub paragraphs: Vec<String>,
    /// Preformatted code blocks
    pub code_blocks: Vec<CodeBlock>,
    /// List item texts
    pub list_items: Vec<String>,
    /// Figure ordinals parsed from captions
    pub figure_refs: Vec<u32>,
    /// Links in the article body (informational, never scored)
    pub links: Vec<Link>,
}

impl ReferenceContent {
    /// Parse a JSON capture produced by a page-extraction run
    pub fn from_json(json: &str) -> Result<Self, FidelityError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON capture from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FidelityError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of distinct figure ordinals declared by the captions
    pub fn declared_figures(&self) -> usize {
        self.figure_refs.iter().collect::<BTreeSet<_>>().len()
    }
}

/// Heading level `h1`..`h6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Map an HTML tag name (`"h3"`) to its level
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
}

impl Heading {
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// A preformatted code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: Option<String>,
    pub text: String,
}

impl CodeBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            language: None,
            text: text.into(),
        }
    }
}

/// A hyperlink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}
