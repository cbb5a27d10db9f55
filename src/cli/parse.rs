//! Pair preview (`memorycards parse`).

use anyhow::Result;
use clap::Args;
use memorycards::{DEFAULT_PAIRS_TEXT, Side, card_file_name, parse_pairs};

use crate::cli::common::PairsInputArgs;
use crate::cli::utils::read_pairs_text;

/// Arguments for `memorycards parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: PairsInputArgs,
    /// Parse the built-in example instead of reading input.
    #[arg(long, conflicts_with_all = ["text", "pairs"])]
    pub example: bool,
    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: ParseArgs) -> Result<()> {
    let text = if args.example {
        DEFAULT_PAIRS_TEXT.to_string()
    } else {
        read_pairs_text(args.input)?
    };
    let outcome = parse_pairs(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{} pair(s) found", outcome.pairs.len());
    for (idx, pair) in outcome.pairs.iter().enumerate() {
        println!(
            "  {:>3}. {}  [{} | {}]",
            idx + 1,
            pair.description(),
            card_file_name(idx + 1, Side::Left, &pair.left),
            card_file_name(idx + 1, Side::Right, &pair.right)
        );
    }
    Ok(())
}
