//! Line-oriented parsing of `left;right` / `left,right` term pairs.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Sample input matching the format accepted by [`parse_pairs`].
pub const DEFAULT_PAIRS_TEXT: &str = "hond;dog\nkat;cat\nhuis;house";

const DELIMITERS: [char; 2] = [';', ','];

/// One left/right pair of labels. Identity is its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermPair {
    pub left: String,
    pub right: String,
}

impl TermPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Feedback text shown when the two cards are matched.
    pub fn description(&self) -> String {
        format!("{} ↔ {}", self.left, self.right)
    }
}

/// A non-fatal problem found while parsing input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// 1-based line number in the raw input.
    pub line: usize,
    pub content: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: skipped (no ';' or ',' found): {}",
            self.line, self.content
        )
    }
}

/// Pairs found in the input together with the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub pairs: Vec<TermPair>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parse free-form text into term pairs.
///
/// Blank lines are ignored. Each remaining line is split once, at the first
/// `;` if the line has one, otherwise at the first `,`. Lines with neither
/// are reported in [`ParseOutcome::warnings`] and left out.
pub fn parse_pairs(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some(delimiter) = DELIMITERS.into_iter().find(|d| line.contains(*d)) else {
            warn!(line = idx + 1, content = line, "skipping line without delimiter");
            outcome.warnings.push(ParseWarning {
                line: idx + 1,
                content: line.to_string(),
            });
            continue;
        };
        if let Some((left, right)) = line.split_once(delimiter) {
            outcome.pairs.push(TermPair::new(left.trim(), right.trim()));
        }
    }
    outcome
}
