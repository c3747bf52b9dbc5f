//! Text normalization for fidelity comparisons
//!
//! A live article page and its archived markdown copy render the same content
//! with different whitespace, quote styles and formula markup. Both sides of
//! every comparison go through the same normalizer so those differences do not
//! register as missing content.
//!
//! Stages, in order:
//! 1. Case folding
//! 2. Curly quotes to straight quotes (`normalize` only)
//! 3. Math delimiter stripping (`$...$`, `$$...$$`, `\(...\)`, `\[...\]`)
//! 4. Symbol equivalences (glyph and HTML entity forms, then LaTeX escapes)
//! 5. Whitespace collapsing and trimming
//!
//! Normalization is idempotent and never fails; unknown symbols pass through.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `$$ formula $$`
    static ref DISPLAY_DOLLARS: Regex = Regex::new(r"\$\$([^$]*)\$\$").unwrap();

    /// `$formula$`, no whitespace just inside the delimiters so that prices
    /// like `$5 ... $7` are left alone
    static ref INLINE_DOLLARS: Regex =
        Regex::new(r"\$([^\s$](?:[^$]*[^\s$])?)\$").unwrap();

    /// `\( formula \)`
    static ref INLINE_PARENS: Regex = Regex::new(r"(?s)\\\((.*?)\\\)").unwrap();

    /// `\[ formula \]`
    static ref DISPLAY_BRACKETS: Regex = Regex::new(r"(?s)\\\[(.*?)\\\]").unwrap();

    /// LaTeX macros, matched on whole macro names only (`\in` must not hit `\int`)
    static ref LATEX_SYMBOLS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\\times\b").unwrap(), MULTIPLY),
        (Regex::new(r"\\(?:rightarrow|to)\b").unwrap(), ARROW),
        (Regex::new(r"\\subseteq\b").unwrap(), SUBSET_EQ),
        (Regex::new(r"\\in\b").unwrap(), ELEMENT_OF),
        (Regex::new(r"\\(?:emptyset|varnothing)\b").unwrap(), EMPTY_SET),
        (Regex::new(r"\^\{\s*2\s*\}").unwrap(), SQUARED),
        (Regex::new(r"\^\{\s*n\s*\}").unwrap(), TO_THE_N),
    ];
}

const MULTIPLY: &str = " x ";
const ARROW: &str = " -> ";
const SUBSET_EQ: &str = " ⊆ ";
const ELEMENT_OF: &str = " ∈ ";
const EMPTY_SET: &str = " ∅ ";
const SQUARED: &str = "^2";
const TO_THE_N: &str = "^n";

/// Glyphs and HTML entities with their canonical token.
///
/// Entities are listed lowercase because case folding runs first.
const GLYPH_SYMBOLS: &[(&str, &str)] = &[
    ("×", MULTIPLY),
    ("&times;", MULTIPLY),
    ("→", ARROW),
    ("&rarr;", ARROW),
    ("⊆", SUBSET_EQ),
    ("&sube;", SUBSET_EQ),
    ("∈", ELEMENT_OF),
    ("&isin;", ELEMENT_OF),
    ("∅", EMPTY_SET),
    ("&empty;", EMPTY_SET),
    ("²", SQUARED),
    ("&sup2;", SQUARED),
    ("ⁿ", TO_THE_N),
];

const QUOTES: &[(char, char)] = &[('‘', '\''), ('’', '\''), ('“', '"'), ('”', '"')];

/// Canonical form of prose text (headings, paragraphs, list items, titles).
///
/// # Example
/// ```
/// use fidelity_engine::normalize::normalize;
///
/// assert_eq!(normalize("L \\times L"), normalize("L × L"));
/// assert_eq!(normalize("  “Quoted”\u{00A0}text "), "\"quoted\" text");
/// ```
pub fn normalize(text: &str) -> String {
    let folded = text.to_lowercase();
    let quoted = straighten_quotes(&folded);
    let unwrapped = strip_math_delimiters(&quoted);
    let symbols = apply_symbol_equivalences(&unwrapped);
    collapse_whitespace(&symbols)
}

/// Canonical form of code content.
///
/// Same as [`normalize`] except that quote characters are left alone, since
/// they can be significant inside code.
pub fn normalize_code(text: &str) -> String {
    let folded = text.to_lowercase();
    let unwrapped = strip_math_delimiters(&folded);
    let symbols = apply_symbol_equivalences(&unwrapped);
    collapse_whitespace(&symbols)
}

/// Trim and collapse every run of Unicode whitespace to a single ASCII space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn straighten_quotes(text: &str) -> String {
    text.chars()
        .map(|c| {
            QUOTES
                .iter()
                .find(|(curly, _)| *curly == c)
                .map(|(_, straight)| *straight)
                .unwrap_or(c)
        })
        .collect()
}

/// Remove paired formula delimiters, keeping the formula.
///
/// Runs to a fixed point: unwrapping one pair can expose another.
fn strip_math_delimiters(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = {
            let display = DISPLAY_DOLLARS.replace_all(&current, "$1");
            let inline = INLINE_DOLLARS.replace_all(&display, "$1");
            let parens = INLINE_PARENS.replace_all(&inline, "$1");
            DISPLAY_BRACKETS.replace_all(&parens, "$1").into_owned()
        };
        if next == current {
            return current;
        }
        current = next;
    }
}

fn apply_symbol_equivalences(text: &str) -> String {
    let mut out = text.to_string();
    // Glyphs first: `\timesⁿ` only ends the macro name once `ⁿ` is `^n`
    for (glyph, token) in GLYPH_SYMBOLS {
        if out.contains(glyph) {
            out = out.replace(glyph, token);
        }
    }
    for (pattern, token) in LATEX_SYMBOLS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *token).into_owned();
        }
    }
    out
}
