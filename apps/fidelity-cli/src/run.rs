//! Loading article inputs and running verifications
//!
//! All file I/O of the tool lives here; the engine only sees strings.

use anyhow::Context;
use fidelity_engine::{
    verify, ContentExtractor, ExtractionProfile, FidelityStatus, HtmlExtractor, ReferenceContent,
    VerificationReport, VerifyConfig,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::manifest::{ArticleConfig, Manifest, ReferenceSource};

/// Read and extract an article's reference content
pub fn load_reference(source: &ReferenceSource) -> anyhow::Result<ReferenceContent> {
    match source {
        ReferenceSource::Json(path) => ReferenceContent::from_file(path)
            .with_context(|| format!("Failed to load reference capture: {}", path.display())),
        ReferenceSource::Html {
            path,
            body_selector,
        } => {
            let html = read_file(path, "HTML snapshot")?;
            extract_html(&html, body_selector.as_deref())
                .with_context(|| format!("Failed to extract content from {}", path.display()))
        }
    }
}

/// Extract reference content from an HTML page
pub fn extract_html(html: &str, body_selector: Option<&str>) -> anyhow::Result<ReferenceContent> {
    let mut profile = ExtractionProfile::default();
    if let Some(selector) = body_selector {
        profile = profile.with_body_selector(selector);
    }
    Ok(HtmlExtractor::new(profile).extract(html)?)
}

fn read_file(path: &Path, what: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}: {}", what, path.display()))
}

/// Verification result for one named article
#[derive(Debug, Clone, Serialize)]
pub struct ArticleOutcome {
    pub name: String,
    pub url: Option<String>,
    pub report: VerificationReport,
}

/// Load one article's inputs and verify its archive
pub fn verify_article(
    article: &ArticleConfig,
    defaults: &VerifyConfig,
) -> anyhow::Result<ArticleOutcome> {
    let reference = load_reference(&article.reference_source()?)?;
    let candidate = read_file(&article.candidate, "archived article")?;
    let config = article.verify_config(defaults);

    tracing::debug!(
        article = %article.name,
        headings = reference.headings.len(),
        paragraphs = reference.paragraphs.len(),
        "Loaded reference content"
    );

    Ok(ArticleOutcome {
        name: article.name.clone(),
        url: article.url.clone(),
        report: verify(&reference, &candidate, &config),
    })
}

/// Article whose inputs could not be loaded
#[derive(Debug, Clone, Serialize)]
pub struct ArticleError {
    pub name: String,
    pub error: String,
}

/// Results of verifying every article in a manifest
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<ArticleOutcome>,
    pub errors: Vec<ArticleError>,
}

impl BatchSummary {
    /// Every article loaded and passed
    pub fn success(&self) -> bool {
        self.errors.is_empty() && self.outcomes.iter().all(|o| o.report.success)
    }

    /// 0 when every article passed, 1 when one failed verification, 2 when an
    /// article could not be loaded
    pub fn exit_code(&self) -> i32 {
        if !self.errors.is_empty() {
            2
        } else if self.success() {
            0
        } else {
            1
        }
    }

    /// Count of articles with the given verdict
    pub fn count(&self, status: FidelityStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.report.status == status)
            .count()
    }

    /// Generate a text summary followed by the report of every imperfect article
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Archive Fidelity Batch\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for outcome in &self.outcomes {
            let report = &outcome.report;
            output.push_str(&format!(
                "{:<10} {:>6.1}%  {}\n",
                format!("{:?}", report.status),
                report.pass_rate * 100.0,
                outcome.name
            ));
        }
        for error in &self.errors {
            output.push_str(&format!(
                "{:<10} {:>7}  {}: {}\n",
                "Error", "-", error.name, error.error
            ));
        }

        output.push_str(&format!(
            "\n{} perfect, {} acceptable, {} failed, {} errors\n",
            self.count(FidelityStatus::Perfect),
            self.count(FidelityStatus::Acceptable),
            self.count(FidelityStatus::Failed),
            self.errors.len()
        ));

        for outcome in self.outcomes.iter().filter(|o| !o.report.is_perfect()) {
            output.push_str(&format!("\n## {}\n\n", outcome.name));
            output.push_str(&outcome.report.to_text());
        }

        output
    }
}

/// Verify every article in the manifest independently.
///
/// An article whose inputs cannot be loaded is recorded as an error and does
/// not stop the others.
pub fn run_batch(manifest: &Manifest) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for article in &manifest.articles {
        match verify_article(article, &manifest.defaults) {
            Ok(outcome) => {
                tracing::info!(
                    article = %outcome.name,
                    status = ?outcome.report.status,
                    pass_rate = outcome.report.pass_rate,
                    "Article verified"
                );
                summary.outcomes.push(outcome);
            }
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(article = %article.name, %error, "Article skipped");
                summary.errors.push(ArticleError {
                    name: article.name.clone(),
                    error,
                });
            }
        }
    }

    summary
}
