//! Presence tests for single reference items
//!
//! Each kind of item has its own policy:
//! - Headings must appear verbatim after normalization.
//! - Paragraphs and list items use word overlap, with a literal prefix fallback.
//! - Code blocks are matched line by line.
//!
//! The thresholds below are shared with the existing archive corpus and must
//! not be tuned independently.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, normalize_code};

/// Minimum share of significant words a prose item needs in the candidate
pub const WORD_MATCH_THRESHOLD: f64 = 0.6;

/// Minimum share of significant code lines a code block needs in the candidate
pub const CODE_LINE_MATCH_THRESHOLD: f64 = 0.6;

/// Words must be longer than two characters to count
pub const MIN_WORD_CHARS: usize = 3;

/// Items at least this long may match through their literal prefix
pub const FALLBACK_MIN_CHARS: usize = 40;

/// Length of the literal prefix used by the fallback
pub const FALLBACK_PREFIX_CHARS: usize = 50;

/// Code lines shorter than this carry no signal
pub const MIN_CODE_LINE_CHARS: usize = 4;

/// Kind of reference item, selecting the presence policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Heading,
    Paragraph,
    ListItem,
    CodeLine,
}

/// Decide whether `item` is present in an already-normalized candidate.
///
/// `candidate` must be normalized with [`normalize_code`] for
/// [`ItemKind::CodeLine`] and with [`normalize`] for every other kind.
pub fn is_present(item: &str, candidate: &str, kind: ItemKind) -> bool {
    match kind {
        ItemKind::Heading => candidate.contains(&normalize(item)),
        ItemKind::Paragraph | ItemKind::ListItem => prose_present(item, candidate),
        ItemKind::CodeLine => code_present(item, candidate),
    }
}

/// Fraction of the item's significant words found in the candidate.
///
/// Returns `None` when the item has no word longer than two characters.
pub fn word_match_rate(item: &str, candidate: &str) -> Option<f64> {
    rate_for_normalized(&normalize(item), candidate)
}

fn rate_for_normalized(normalized: &str, candidate: &str) -> Option<f64> {
    let words = significant_words(normalized);
    if words.is_empty() {
        return None;
    }
    let matched = words.iter().filter(|w| candidate.contains(**w)).count();
    Some(matched as f64 / words.len() as f64)
}

fn significant_words(normalized: &str) -> Vec<&str> {
    normalized
        .split(' ')
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect()
}

fn prose_present(item: &str, candidate: &str) -> bool {
    let normalized = normalize(item);
    if let Some(rate) = rate_for_normalized(&normalized, candidate) {
        if rate >= WORD_MATCH_THRESHOLD {
            return true;
        }
    }
    prefix_present(&normalized, candidate)
}

/// Literal fallback: a long item's opening text is distinctive enough on its
/// own; a short item must appear whole.
fn prefix_present(normalized: &str, candidate: &str) -> bool {
    if normalized.chars().count() >= FALLBACK_MIN_CHARS {
        let prefix: String = normalized.chars().take(FALLBACK_PREFIX_CHARS).collect();
        candidate.contains(prefix.trim_end())
    } else {
        candidate.contains(normalized)
    }
}

fn code_present(block: &str, candidate: &str) -> bool {
    if candidate.contains(&normalize_code(block)) {
        return true;
    }
    let lines = significant_code_lines(block);
    if lines.is_empty() {
        return false;
    }
    let matched = lines
        .iter()
        .filter(|line| candidate.contains(&normalize_code(line)))
        .count();
    matched as f64 / lines.len() as f64 >= CODE_LINE_MATCH_THRESHOLD
}

/// Lines that can discriminate one code block from another.
///
/// Drops short lines and lines made only of brackets or punctuation.
pub fn significant_code_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_CODE_LINE_CHARS)
        .filter(|line| {
            !line
                .chars()
                .all(|c| c.is_whitespace() || c.is_ascii_punctuation())
        })
        .collect()
}
