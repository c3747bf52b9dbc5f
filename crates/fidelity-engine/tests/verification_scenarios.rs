//! End-to-end verification scenarios
//!
//! Each test builds a reference and an archived candidate the way a capture
//! run would, then checks the verdict and the bookkeeping of the report.

use fidelity_engine::verifier::matcher::{is_present, word_match_rate, ItemKind};
use fidelity_engine::{
    normalize, normalize_code, verify, Category, CodeBlock, ContentExtractor, FidelityStatus,
    Heading, HeadingLevel, HtmlExtractor, JsonExtractor, ReferenceContent, VerifyConfig,
};
use pretty_assertions::assert_eq;

// ============================================================
// Headings
// ============================================================

#[test]
fn heading_matches_only_verbatim() {
    let present = normalize("# Article\n## Associative Links\ntext");
    let altered = normalize("# Article\n## Associative Linka\ntext");

    assert!(is_present("Associative Links", &present, ItemKind::Heading));
    assert!(!is_present("Associative Links", &altered, ItemKind::Heading));
}

#[test]
fn heading_with_prices_survives_normalization() {
    let candidate = normalize("## Price $5\n\nLater it costs $7.");
    assert!(is_present("Price $5", &candidate, ItemKind::Heading));
}

// ============================================================
// Paragraph word overlap
// ============================================================

const TEN_WORDS: &str = "alpha bravo charlie delta echo foxtrot golf hotel india juliet";

#[test]
fn paragraph_at_threshold_is_present() {
    let candidate =
        normalize("foxtrot went with juliet, then golf by hotel; india and echo remained.");

    assert_eq!(word_match_rate(TEN_WORDS, &candidate), Some(0.6));
    assert!(is_present(TEN_WORDS, &candidate, ItemKind::Paragraph));
}

#[test]
fn paragraph_below_threshold_is_missing() {
    let candidate = normalize("foxtrot went with juliet, then golf by hotel; india remained.");

    assert_eq!(word_match_rate(TEN_WORDS, &candidate), Some(0.5));
    assert!(!is_present(TEN_WORDS, &candidate, ItemKind::Paragraph));
}

// ============================================================
// Code blocks
// ============================================================

const CODE_BLOCK: &str = "let doublet = Link::new(source, target);
let triplet = Link::with_type(source, kind, target);
store.insert(doublet);
store.insert(triplet);
store.commit()?;";

#[test]
fn code_block_with_three_of_five_lines_is_present() {
    let candidate = "```rust
let doublet = Link::new(source, target);
let triplet = Link::with_type(source, kind, target);
store.insert(doublet);
print_all(store);
```";
    assert!(is_present(
        CODE_BLOCK,
        &normalize_code(candidate),
        ItemKind::CodeLine
    ));

    let reference = ReferenceContent {
        code_blocks: vec![CodeBlock::new(CODE_BLOCK)],
        ..Default::default()
    };
    let report = verify(&reference, candidate, &VerifyConfig::default());
    assert_eq!(report.status, FidelityStatus::Perfect);
}

#[test]
fn code_block_with_two_of_five_lines_is_missing() {
    let candidate = "```rust
let doublet = Link::new(source, target);
let triplet = Link::with_type(source, kind, target);
print_all(store);
```";
    assert!(!is_present(
        CODE_BLOCK,
        &normalize_code(candidate),
        ItemKind::CodeLine
    ));
}

// ============================================================
// Figures
// ============================================================

fn figure_candidate(count: u32) -> String {
    (1..=count)
        .map(|n| format!("![Figure {n}](images/figure_{n}.png)\n\nFigure {n}. Caption text.\n"))
        .collect()
}

#[test]
fn figure_gate_passes_with_all_figures() {
    let config = VerifyConfig::default().with_expected_figures(13);
    let report = verify(&ReferenceContent::default(), &figure_candidate(13), &config);

    let figures = report.figures.clone().expect("figure check should run");
    assert_eq!(figures.found, 13);
    assert_eq!(figures.missing, 0);
    assert!(report.success);
    assert_eq!(report.checks_for(Category::Figures), 1);
}

#[test]
fn figure_gate_reports_exactly_one_missing() {
    let config = VerifyConfig::default().with_expected_figures(13);
    let report = verify(&ReferenceContent::default(), &figure_candidate(12), &config);

    let figures = report.figures.clone().expect("figure check should run");
    assert_eq!(figures.found, 12);
    assert_eq!(figures.missing, 1);
    assert_eq!(report.missing_items[&Category::Figures].len(), 1);
    assert!(!report.success);
}

#[test]
fn figure_gate_ignores_text_only_mentions() {
    let candidate: String = (1..=3)
        .map(|n| format!("As discussed in Figure {n}, links compose.\n\n"))
        .collect();
    let config = VerifyConfig::default().with_expected_figures(3);
    let report = verify(&ReferenceContent::default(), &candidate, &config);

    let figures = report.figures.clone().expect("figure check should run");
    assert_eq!(figures.found, 0);
    assert_eq!(figures.missing, 3);
    assert!(!report.success);
}

#[test]
fn figure_gate_names_declared_ordinals() {
    let reference = ReferenceContent {
        figure_refs: vec![1, 2, 3],
        ..Default::default()
    };
    let report = verify(&reference, &figure_candidate(2), &VerifyConfig::default());

    assert_eq!(
        report.missing_items[&Category::Figures],
        vec!["Figure 3".to_string()]
    );
}

#[test]
fn figure_gate_disabled_without_expectation() {
    let report = verify(
        &ReferenceContent::default(),
        &figure_candidate(3),
        &VerifyConfig::default(),
    );
    assert!(report.figures.is_none());
    assert_eq!(report.total_checks, 0);
}

// ============================================================
// Verdict tiers
// ============================================================

fn reference_with_headings(count: usize) -> ReferenceContent {
    ReferenceContent {
        title: Some("Associative Links".to_string()),
        headings: (1..=count)
            .map(|n| Heading::new(HeadingLevel::H2, format!("Section {n:02}")))
            .collect(),
        ..Default::default()
    }
}

fn candidate_with_sections(sections: impl Iterator<Item = usize>) -> String {
    let mut out = String::from("# Associative Links\n\n");
    for n in sections {
        out.push_str(&format!("## Section {n:02}\n\nBody.\n\n"));
    }
    out
}

#[test]
fn perfect_and_acceptable_are_distinguishable() {
    let reference = reference_with_headings(9);

    let perfect = verify(
        &reference,
        &candidate_with_sections(1..=9),
        &VerifyConfig::default(),
    );
    assert!(perfect.success);
    assert!(perfect.is_perfect());
    assert_eq!(perfect.status, FidelityStatus::Perfect);
    assert!(perfect.missing_items.is_empty());

    let acceptable = verify(
        &reference,
        &candidate_with_sections(1..=8),
        &VerifyConfig::default(),
    );
    assert_eq!(acceptable.total_checks, 10);
    assert_eq!(acceptable.passed_checks, 9);
    assert_eq!(acceptable.pass_rate, 0.9);
    assert!(acceptable.success);
    assert!(!acceptable.is_perfect());
    assert_eq!(acceptable.status, FidelityStatus::Acceptable);
    assert_eq!(
        acceptable.missing_items[&Category::Headings],
        vec!["Section 09".to_string()]
    );
}

#[test]
fn pass_rate_below_threshold_fails() {
    let reference = reference_with_headings(9);
    let report = verify(
        &reference,
        &candidate_with_sections(1..=7),
        &VerifyConfig::default(),
    );
    assert_eq!(report.pass_rate, 0.8);
    assert!(!report.success);
    assert_eq!(report.status, FidelityStatus::Failed);
    assert_eq!(report.exit_code(), 1);

    let lenient = verify(
        &reference,
        &candidate_with_sections(1..=7),
        &VerifyConfig::default().with_pass_threshold(0.75),
    );
    assert!(lenient.success);
}

// ============================================================
// Sampling
// ============================================================

#[test]
fn paragraph_sample_is_bounded() {
    let reference = ReferenceContent {
        paragraphs: (0..200)
            .map(|n| format!("Paragraph number {n} discusses associative links in depth"))
            .collect(),
        ..Default::default()
    };
    let report = verify(&reference, "", &VerifyConfig::default());

    assert_eq!(report.checks_for(Category::Paragraphs), 10);
    assert_eq!(report.total_checks, 10);
}

#[test]
fn list_item_sample_takes_the_first_entries() {
    let reference = ReferenceContent {
        list_items: (0..30).map(|n| format!("list entry {n}")).collect(),
        ..Default::default()
    };
    let report = verify(&reference, "", &VerifyConfig::default());

    assert_eq!(report.checks_for(Category::ListItems), 10);
    assert_eq!(
        report.missing_items[&Category::ListItems].first().map(String::as_str),
        Some("list entry 0")
    );
    assert_eq!(
        report.missing_items[&Category::ListItems].last().map(String::as_str),
        Some("list entry 9")
    );
}

// ============================================================
// End to end
// ============================================================

#[test]
fn quick_brown_fox_scenario() {
    let reference = ReferenceContent {
        title: Some("X".to_string()),
        headings: vec![Heading::new(HeadingLevel::H2, "Intro")],
        paragraphs: vec!["The quick brown fox jumps over the lazy dog today".to_string()],
        ..Default::default()
    };
    let candidate = "# X\n## Intro\nQuick brown fox jumped over lazy dog yesterday.";

    let report = verify(&reference, candidate, &VerifyConfig::default());

    assert_eq!(report.checks_for(Category::Title), 1);
    assert_eq!(report.checks_for(Category::Headings), 1);
    assert_eq!(report.checks_for(Category::Paragraphs), 1);
    assert_eq!(report.total_checks, 3);
    assert_eq!(report.passed_checks, 3);
    assert_eq!(report.pass_rate, 1.0);
    assert!(report.success);
}

const LIVE_PAGE: &str = r#"<html>
<head><title>Associative Links Theory | Blog</title></head>
<body>
<nav><a href="/">Home</a><p>Subscribe to our newsletter for updates</p></nav>
<article>
  <h1>Associative Links Theory</h1>
  <p>A link is defined as an ordered pair of references to other links, written L × L.</p>
  <h2>Doublets</h2>
  <p>The set of all doublets forms the Cartesian square L² of the link space.</p>
  <ul><li>Source reference</li><li>Target reference</li></ul>
  <figure><img src="a.png"><figcaption>Figure 1. Doublet structure</figcaption></figure>
</article>
</body>
</html>"#;

const ARCHIVED_MARKDOWN: &str = r#"# Associative Links Theory

A link is defined as an *ordered pair* of references to other links, written $L \times L$.

## Doublets

The set of all doublets forms the Cartesian square $L^2$ of the link space.

- Source reference
- Target reference

![Figure 1. Doublet structure](images/figure_1.png)
"#;

#[test]
fn html_page_against_markdown_archive() {
    let reference = HtmlExtractor::default().extract(LIVE_PAGE).unwrap();
    assert_eq!(reference.figure_refs, vec![1]);

    let report = verify(&reference, ARCHIVED_MARKDOWN, &VerifyConfig::default());

    assert_eq!(report.status, FidelityStatus::Perfect, "{}", report.to_text());
    assert_eq!(report.checks_for(Category::Paragraphs), 2);
    assert_eq!(report.checks_for(Category::ListItems), 2);
    assert_eq!(report.checks_for(Category::Figures), 1);
}

#[test]
fn truncated_archive_is_caught() {
    let reference = HtmlExtractor::default().extract(LIVE_PAGE).unwrap();
    let truncated = ARCHIVED_MARKDOWN
        .split("## Doublets")
        .next()
        .unwrap_or_default();

    let report = verify(&reference, truncated, &VerifyConfig::default());

    assert!(!report.success);
    assert!(report.missing_items.contains_key(&Category::Headings));
    assert!(report.missing_items.contains_key(&Category::Figures));
    assert!(report.to_text().contains("Missing items:"));
}

#[test]
fn json_capture_with_missing_sections() {
    let capture = r#"{"title": "Associative Links Theory", "headings": [{"level": "h2", "text": "Doublets"}]}"#;
    let reference = JsonExtractor.extract(capture).unwrap();

    let report = verify(&reference, ARCHIVED_MARKDOWN, &VerifyConfig::default());

    assert_eq!(report.total_checks, 2);
    assert!(report.is_perfect());
}
