//! Reference content extraction
//!
//! The verifier never talks to a browser. Whatever produces the ground truth
//! (a browser-automation capture, a saved HTML snapshot, a test fixture) sits
//! behind [`ContentExtractor`] and hands over a fully materialized
//! [`ReferenceContent`].
//!
//! # Example
//! ```
//! use fidelity_engine::verifier::{ContentExtractor, HtmlExtractor};
//!
//! let html = r#"<html><body>
//!     <nav><p>Navigation links that are not content</p></nav>
//!     <article>
//!         <h1>Associative Links</h1>
//!         <p>Every element is defined by its links to other elements.</p>
//!     </article>
//! </body></html>"#;
//!
//! let content = HtmlExtractor::default().extract(html).unwrap();
//! assert_eq!(content.title.as_deref(), Some("Associative Links"));
//! assert_eq!(content.paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::content::{CodeBlock, Heading, HeadingLevel, Link, ReferenceContent};
use crate::error::FidelityError;
use crate::normalize::collapse_whitespace;
use crate::verifier::figures::figure_numbers;

/// Source of reference content for one article
pub trait ContentExtractor {
    /// Produce the reference content from a raw source document
    fn extract(&self, source: &str) -> Result<ReferenceContent, FidelityError>;
}

/// Loads a JSON capture written by an external page-extraction run
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl ContentExtractor for JsonExtractor {
    fn extract(&self, source: &str) -> Result<ReferenceContent, FidelityError> {
        ReferenceContent::from_json(source)
    }
}

/// Where the article body lives in a page and what to leave out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionProfile {
    /// CSS selector of the article body; the first match is used
    #[serde(default = "default_body_selector")]
    pub body_selector: String,
    /// Regions inside the body that are not article content
    #[serde(default = "default_excluded")]
    pub excluded: Vec<String>,
    /// Paragraphs must be longer than this many characters
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self {
            body_selector: default_body_selector(),
            excluded: default_excluded(),
            min_paragraph_chars: default_min_paragraph_chars(),
        }
    }
}

impl ExtractionProfile {
    pub fn with_body_selector(mut self, selector: impl Into<String>) -> Self {
        self.body_selector = selector.into();
        self
    }
}

fn default_body_selector() -> String {
    "article".to_string()
}

fn default_excluded() -> Vec<String> {
    [
        "nav",
        "aside",
        "footer",
        "script",
        "style",
        "noscript",
        ".ads",
        ".advertisement",
        ".comments",
        "#comments",
        ".cookie-consent",
        "[role=dialog]",
        "[role=navigation]",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_min_paragraph_chars() -> usize {
    10
}

/// Static HTML parser for saved article pages
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor {
    profile: ExtractionProfile,
}

/// Selectors compiled once per extraction
struct CompiledSelectors {
    body: Selector,
    excluded: Vec<Selector>,
    headings: Selector,
    paragraphs: Selector,
    code: Selector,
    inner_code: Selector,
    list_items: Selector,
    captions: Selector,
    links: Selector,
    page_title: Selector,
}

impl CompiledSelectors {
    fn new(profile: &ExtractionProfile) -> Result<Self, FidelityError> {
        Ok(Self {
            body: parse_selector(&profile.body_selector)?,
            excluded: profile
                .excluded
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_, _>>()?,
            headings: parse_selector("h1, h2, h3, h4, h5, h6")?,
            paragraphs: parse_selector("p")?,
            code: parse_selector("pre")?,
            inner_code: parse_selector("code")?,
            list_items: parse_selector("li")?,
            captions: parse_selector("figcaption")?,
            links: parse_selector("a[href]")?,
            page_title: parse_selector("title")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, FidelityError> {
    Selector::parse(selector).map_err(|e| FidelityError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

impl HtmlExtractor {
    pub fn new(profile: ExtractionProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    fn is_excluded(element: ElementRef<'_>, excluded: &[Selector]) -> bool {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .any(|el| excluded.iter().any(|sel| sel.matches(&el)))
    }

    /// Body elements matching `selector`, minus excluded regions
    fn content_elements<'a>(
        body: ElementRef<'a>,
        selector: &'a Selector,
        excluded: &'a [Selector],
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        body.select(selector)
            .filter(move |el| !Self::is_excluded(*el, excluded))
    }

    fn flat_text(element: ElementRef<'_>) -> String {
        collapse_whitespace(&element.text().collect::<String>())
    }

    fn code_language(pre: ElementRef<'_>, inner_code: &Selector) -> Option<String> {
        std::iter::once(pre)
            .chain(pre.select(inner_code))
            .flat_map(|el| el.value().classes())
            .find_map(|class| {
                class
                    .strip_prefix("language-")
                    .or_else(|| class.strip_prefix("lang-"))
                    .map(str::to_string)
            })
    }
}

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, source: &str) -> Result<ReferenceContent, FidelityError> {
        let selectors = CompiledSelectors::new(&self.profile)?;
        let document = Html::parse_document(source);

        let body = document.select(&selectors.body).next().ok_or_else(|| {
            FidelityError::Extraction(format!(
                "no element matches body selector '{}'",
                self.profile.body_selector
            ))
        })?;
        let excluded = selectors.excluded.as_slice();

        let headings: Vec<Heading> = Self::content_elements(body, &selectors.headings, excluded)
            .filter_map(|el| {
                let level = HeadingLevel::from_tag(el.value().name())?;
                let text = Self::flat_text(el);
                (!text.is_empty()).then(|| Heading::new(level, text))
            })
            .collect();

        let title = headings
            .iter()
            .find(|h| h.level == HeadingLevel::H1)
            .map(|h| h.text.clone())
            .or_else(|| {
                document
                    .select(&selectors.page_title)
                    .next()
                    .map(Self::flat_text)
                    .filter(|t| !t.is_empty())
            });

        let paragraphs: Vec<String> =
            Self::content_elements(body, &selectors.paragraphs, excluded)
                .map(Self::flat_text)
                .filter(|p| p.chars().count() > self.profile.min_paragraph_chars)
                .collect();

        let code_blocks: Vec<CodeBlock> = Self::content_elements(body, &selectors.code, excluded)
            .filter_map(|pre| {
                let text = pre.text().collect::<String>().trim().to_string();
                (!text.is_empty()).then(|| CodeBlock {
                    language: Self::code_language(pre, &selectors.inner_code),
                    text,
                })
            })
            .collect();

        let list_items: Vec<String> = Self::content_elements(body, &selectors.list_items, excluded)
            .map(Self::flat_text)
            .filter(|item| !item.is_empty())
            .collect();

        let mut figure_refs: Vec<u32> = Vec::new();
        for caption in Self::content_elements(body, &selectors.captions, excluded) {
            for n in figure_numbers(&Self::flat_text(caption)) {
                if !figure_refs.contains(&n) {
                    figure_refs.push(n);
                }
            }
        }

        let links: Vec<Link> = Self::content_elements(body, &selectors.links, excluded)
            .filter_map(|a| {
                let href = a.value().attr("href")?.trim().to_string();
                Some(Link {
                    text: Self::flat_text(a),
                    href,
                })
            })
            .collect();

        tracing::debug!(
            headings = headings.len(),
            paragraphs = paragraphs.len(),
            code_blocks = code_blocks.len(),
            list_items = list_items.len(),
            figures = figure_refs.len(),
            links = links.len(),
            "Extracted reference content"
        );

        Ok(ReferenceContent {
            title,
            headings,
            paragraphs,
            code_blocks,
            list_items,
            figure_refs,
            links,
        })
    }
}
