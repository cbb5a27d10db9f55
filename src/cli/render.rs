//! Single-card rendering (`memorycards render`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use memorycards::CardRenderer;

use crate::cli::common::FontArgs;
use crate::cli::utils::write_output;

/// Arguments for `memorycards render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Label drawn on the card.
    pub label: String,
    /// Output PNG path (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    #[command(flatten)]
    pub font: FontArgs,
}

pub fn handle(args: RenderArgs) -> Result<()> {
    let renderer = CardRenderer::select(&args.font.into());
    let bytes = renderer
        .render_png(&args.label)
        .with_context(|| format!("failed to render '{}'", args.label))?;
    write_output(&args.output, &bytes)?;
    if args.output.as_os_str() != "-" {
        println!(
            "Rendered '{}' to {} ({} font)",
            args.label,
            args.output.display(),
            if renderer.is_scalable() { "scalable" } else { "bitmap" }
        );
    }
    Ok(())
}
