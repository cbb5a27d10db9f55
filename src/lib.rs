//! Turn lists of term pairs into H5P image-pairing memory games.
//!
//! A template package is unpacked, one labelled PNG card is drawn per term,
//! `content/content.json` gets a fresh card list and everything is zipped
//! back into a single package.

mod assets;
mod error;
mod manifest;
mod package;
mod pairs;
mod pipeline;
mod render;

pub use assets::{
    CardAsset, IMAGES_DIR, PNG_MIME, PairAssets, Side, card_file_name, render_pairs,
    sanitize_label,
};
pub use error::{GenerateError, GenerateResult};
pub use manifest::{
    CARDS_KEY, CardEntry, Copyright, ImageRef, LICENSE_UNKNOWN, MANIFEST_PATH, Manifest,
};
pub use package::ScratchTree;
pub use pairs::{DEFAULT_PAIRS_TEXT, ParseOutcome, ParseWarning, TermPair, parse_pairs};
pub use pipeline::{DEFAULT_OUTPUT_NAME, GenerateOptions, Package, build_package, generate_package};
pub use render::{
    BACKGROUND, CARD_HEIGHT, CARD_WIDTH, CardImage, CardRenderer, FontChoice, INK, WRAP_WIDTH,
    wrap_label,
};
