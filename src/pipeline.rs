use tracing::info;

use crate::assets::render_pairs;
use crate::error::{GenerateError, GenerateResult};
use crate::manifest::CardEntry;
use crate::package::ScratchTree;
use crate::pairs::{ParseWarning, TermPair, parse_pairs};
use crate::render::{CardRenderer, FontChoice};

/// Suggested file name for generated packages.
pub const DEFAULT_OUTPUT_NAME: &str = "memory_from_text.h5p";

/// Knobs for a package build.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_name: String,
    pub font: FontChoice,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            font: FontChoice::Auto,
        }
    }
}

/// A finished package, ready for the caller to store or send.
#[derive(Debug, Clone)]
pub struct Package {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pair_count: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Parse `pairs_text` and build a package from `template`.
///
/// Fails with [`GenerateError::NoPairs`] before touching the template when
/// no line yields a pair.
pub fn generate_package(
    template: &[u8],
    pairs_text: &str,
    options: &GenerateOptions,
) -> GenerateResult<Package> {
    let outcome = parse_pairs(pairs_text);
    if outcome.is_empty() {
        return Err(GenerateError::NoPairs);
    }
    let renderer = CardRenderer::select(&options.font);
    let mut package = build_package(template, &outcome.pairs, &renderer, &options.output_name)?;
    package.warnings = outcome.warnings;
    Ok(package)
}

/// Extract, render, rewrite the manifest and re-archive in a single pass.
/// The scratch tree is removed whether or not the build succeeds.
#[tracing::instrument(skip(template, pairs, renderer), fields(pair_count = pairs.len()))]
pub fn build_package(
    template: &[u8],
    pairs: &[TermPair],
    renderer: &CardRenderer,
    output_name: &str,
) -> GenerateResult<Package> {
    if pairs.is_empty() {
        return Err(GenerateError::NoPairs);
    }
    let tree = ScratchTree::extract(template)?;
    let mut manifest = tree.read_manifest()?;

    let assets = render_pairs(renderer, pairs)?;
    tree.write_assets(assets.iter().flat_map(|a| [&a.image, &a.matched]))?;

    let entries: Vec<CardEntry> = assets.iter().map(CardEntry::from).collect();
    manifest.replace_cards(&entries)?;
    tree.write_manifest(&manifest)?;

    let bytes = tree.archive()?;
    info!(
        pairs = pairs.len(),
        size = bytes.len(),
        output = output_name,
        "package built"
    );
    Ok(Package {
        file_name: output_name.to_string(),
        bytes,
        pair_count: pairs.len(),
        warnings: Vec::new(),
    })
}
