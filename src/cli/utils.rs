//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::common::PairsInputArgs;

/// Resolve pair text from an inline string, a file, or stdin.
pub fn read_pairs_text(input: PairsInputArgs) -> Result<String> {
    if let Some(text) = input.text {
        return Ok(text);
    }
    match input.pairs {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
            .with_context(|| format!("failed to read pairs from {}", path.display())),
        _ => read_stdin(),
    }
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Write bytes to a file, creating parent directories, or to stdout for `-`.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(bytes)?;
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Output path for a package: the explicit one, else the suggested name in the cwd.
pub fn package_output_path(explicit: Option<PathBuf>, suggested: &str) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(suggested))
}
