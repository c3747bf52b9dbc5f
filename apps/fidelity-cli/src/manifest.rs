//! Batch manifest parsing
//!
//! A manifest lists the archived articles to verify, one `[[articles]]` table
//! per article, plus shared verification defaults:
//!
//! ```toml
//! [defaults]
//! pass_threshold = 0.85
//!
//! [[articles]]
//! name = "Associative links theory"
//! url = "https://example.org/links-theory"
//! candidate = "archive/links-theory/article.md"
//! html = "snapshots/links-theory.html"
//! expected_figures = 13
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use anyhow::{bail, Context};
use fidelity_engine::VerifyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Articles to verify and the defaults they share
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Verification parameters applied to every article
    #[serde(default)]
    pub defaults: VerifyConfig,
    /// Articles to verify
    #[serde(default)]
    pub articles: Vec<ArticleConfig>,
}

impl Manifest {
    /// Load a manifest from a TOML file, resolving article paths against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed or
    /// an article is misconfigured.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let mut manifest = Self::from_str(&content)
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for article in &mut manifest.articles {
            article.resolve_paths(base);
        }
        Ok(manifest)
    }

    /// Parse a manifest from a TOML string. Paths are kept as written.
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let manifest: Self = toml::from_str(s).context("Failed to parse TOML manifest")?;
        for article in &manifest.articles {
            article.reference_source()?;
        }
        Ok(manifest)
    }
}

/// One archived article and where its reference content comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleConfig {
    /// Display name used in reports
    pub name: String,
    /// Live page address, informational only
    #[serde(default)]
    pub url: Option<String>,
    /// Archived markdown to verify
    pub candidate: PathBuf,
    /// JSON capture of the live page
    #[serde(default)]
    pub reference: Option<PathBuf>,
    /// HTML snapshot of the live page
    #[serde(default)]
    pub html: Option<PathBuf>,
    /// Article body selector for HTML snapshots
    #[serde(default)]
    pub body_selector: Option<String>,
    /// Overrides the default expected figure count
    #[serde(default)]
    pub expected_figures: Option<usize>,
    /// Overrides the default pass threshold
    #[serde(default)]
    pub pass_threshold: Option<f64>,
}

/// Where an article's reference content is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    Json(PathBuf),
    Html {
        path: PathBuf,
        body_selector: Option<String>,
    },
}

impl ArticleConfig {
    /// The single configured reference source.
    ///
    /// # Errors
    ///
    /// Fails when neither or both of `reference` and `html` are set.
    pub fn reference_source(&self) -> anyhow::Result<ReferenceSource> {
        match (&self.reference, &self.html) {
            (Some(json), None) => Ok(ReferenceSource::Json(json.clone())),
            (None, Some(html)) => Ok(ReferenceSource::Html {
                path: html.clone(),
                body_selector: self.body_selector.clone(),
            }),
            (Some(_), Some(_)) => bail!(
                "Article '{}' sets both `reference` and `html`; choose one",
                self.name
            ),
            (None, None) => bail!(
                "Article '{}' needs a `reference` capture or an `html` snapshot",
                self.name
            ),
        }
    }

    /// Verification parameters for this article: the defaults with this
    /// article's overrides applied
    pub fn verify_config(&self, defaults: &VerifyConfig) -> VerifyConfig {
        let mut config = defaults.clone();
        if let Some(threshold) = self.pass_threshold {
            config.pass_threshold = threshold;
        }
        if let Some(figures) = self.expected_figures {
            config.expected_figures = Some(figures);
        }
        config
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.candidate = base.join(&self.candidate);
        if let Some(reference) = &mut self.reference {
            *reference = base.join(&*reference);
        }
        if let Some(html) = &mut self.html {
            *html = base.join(&*html);
        }
    }
}
