//! Command-line interface wiring for the `memorycards` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod build;
pub mod common;
pub mod parse;
pub mod render;
pub mod utils;

/// Parsed CLI entrypoint for the `memorycards` binary.
#[derive(Parser, Debug)]
#[command(
    name = "memorycards",
    version,
    about = "Generate H5P image-pairing memory games from term pairs"
)]
pub struct Cli {
    /// Show debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a package from a template and a list of pairs.
    Build(build::BuildArgs),
    /// Preview how pair text is parsed.
    Parse(parse::ParseArgs),
    /// Render a single card image.
    Render(render::RenderArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => build::handle(args),
        Command::Parse(args) => parse::handle(args),
        Command::Render(args) => render::handle(args),
    }
}
