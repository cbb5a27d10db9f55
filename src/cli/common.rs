//! Shared clap argument groups.

use std::path::PathBuf;

use clap::Args;
use memorycards::FontChoice;

/// Font selection flags accepted by every command that draws cards.
#[derive(Args, Debug, Clone, Default)]
pub struct FontArgs {
    /// TrueType/OpenType font used for card labels.
    #[arg(long, value_name = "FONT", conflicts_with = "bitmap_font")]
    pub font: Option<PathBuf>,
    /// Use the built-in bitmap font instead of a scalable one.
    #[arg(long)]
    pub bitmap_font: bool,
}

impl From<FontArgs> for FontChoice {
    fn from(value: FontArgs) -> FontChoice {
        match (value.font, value.bitmap_font) {
            (_, true) => FontChoice::Bitmap,
            (Some(path), false) => FontChoice::Path(path),
            (None, false) => FontChoice::Auto,
        }
    }
}

/// Where pair text comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct PairsInputArgs {
    /// Pairs given inline, one `left;right` per line.
    #[arg(long, conflicts_with = "pairs")]
    pub text: Option<String>,
    /// Read pairs from a file (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    pub pairs: Option<PathBuf>,
}
