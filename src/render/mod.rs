//! Rasterising term labels into PNG card images.

mod glyphs;
mod paint;
mod wrap;

pub use paint::{
    BACKGROUND, CARD_HEIGHT, CARD_WIDTH, CardImage, CardRenderer, FontChoice, INK, WRAP_WIDTH,
};
pub use wrap::wrap_label;
