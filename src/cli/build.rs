//! Package generation (`memorycards build`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use memorycards::{DEFAULT_OUTPUT_NAME, GenerateOptions, generate_package};

use crate::cli::common::{FontArgs, PairsInputArgs};
use crate::cli::utils::{package_output_path, read_pairs_text, write_output};

/// Arguments for `memorycards build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Template package (an H5P image-pairing export).
    #[arg(long, short = 't')]
    pub template: PathBuf,
    #[command(flatten)]
    pub input: PairsInputArgs,
    /// Output package path (`-` for stdout). Defaults to the suggested name.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// File name suggested for the package.
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    pub name: String,
    #[command(flatten)]
    pub font: FontArgs,
}

pub fn handle(args: BuildArgs) -> Result<()> {
    let template = fs::read(&args.template)
        .with_context(|| format!("failed to read template {}", args.template.display()))?;
    let text = read_pairs_text(args.input)?;
    let options = GenerateOptions {
        output_name: args.name,
        font: args.font.into(),
    };

    let package = generate_package(&template, &text, &options)
        .with_context(|| format!("failed to build package from {}", args.template.display()))?;

    for warning in &package.warnings {
        eprintln!("warning: {warning}");
    }
    let target = package_output_path(args.output, &package.file_name);
    write_output(&target, &package.bytes)?;
    if target.as_os_str() != "-" {
        println!(
            "Built {} with {} pair(s) ({} bytes)",
            target.display(),
            package.pair_count,
            package.bytes.len()
        );
    }
    Ok(())
}
