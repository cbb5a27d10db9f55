//! Generated card images and their package-relative names.

use std::fmt;

use crate::error::GenerateResult;
use crate::pairs::TermPair;
use crate::render::CardRenderer;

/// Directory under the content root that holds card images, as written in the manifest.
pub const IMAGES_DIR: &str = "images";
pub const PNG_MIME: &str = "image/png";

const MAX_LABEL_CHARS: usize = 40;

/// Which half of a pair a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn marker(self) -> &'static str {
        match self {
            Side::Left => "a",
            Side::Right => "b",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A rendered PNG plus where it lives inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardAsset {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CardAsset {
    /// Path relative to the content root, e.g. `images/pair01_a_hond.png`.
    pub fn path(&self) -> String {
        format!("{}/{}", IMAGES_DIR, self.file_name)
    }
}

/// Both cards generated for one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairAssets {
    pub image: CardAsset,
    pub matched: CardAsset,
    pub description: String,
}

/// `pair<NN>_<a|b>_<label>.png` for the 1-based pair `index`.
pub fn card_file_name(index: usize, side: Side, label: &str) -> String {
    format!("pair{:02}_{}_{}.png", index, side, sanitize_label(label))
}

/// Reduce a label to characters that are safe inside a single path segment.
///
/// Alphanumerics (any script) are kept; every run of other characters becomes
/// one `_`. Leading/trailing `_` are dropped and the result is capped at
/// 40 characters. An empty result becomes `card`.
pub fn sanitize_label(label: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    let out: String = out.chars().take(MAX_LABEL_CHARS).collect();
    let out = out.trim_end_matches('_');
    if out.is_empty() {
        "card".to_string()
    } else {
        out.to_string()
    }
}

/// Render both cards for every pair, numbering pairs from 1.
pub fn render_pairs(renderer: &CardRenderer, pairs: &[TermPair]) -> GenerateResult<Vec<PairAssets>> {
    pairs
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            let index = idx + 1;
            Ok(PairAssets {
                image: render_card(renderer, index, Side::Left, &pair.left)?,
                matched: render_card(renderer, index, Side::Right, &pair.right)?,
                description: pair.description(),
            })
        })
        .collect()
}

fn render_card(
    renderer: &CardRenderer,
    index: usize,
    side: Side,
    label: &str,
) -> GenerateResult<CardAsset> {
    let file_name = card_file_name(index, side, label);
    tracing::debug!(%file_name, "rendering card");
    Ok(CardAsset {
        bytes: renderer.render_png(label)?,
        file_name,
    })
}
