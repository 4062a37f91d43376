use std::{env, fs, path::Path};

use anyhow::{Result, anyhow};
use clap::Parser;
use stitch::{align, tree};

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // The manifest directory is this crate, so the repository root is its parent.
    env::set_current_dir(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or(anyhow!("No parent directory"))?,
    )?;

    if args.starts_with("align ") {
        let args = align::Cli::parse_from(args.split_whitespace());
        align::cli(args)?;
    } else if args.starts_with("tree ") {
        let args = tree::Cli::parse_from(args.split_whitespace());
        tree::cli(args)?;
    } else {
        return Err(anyhow!("Unknown subcommand in '{args}'"));
    }

    Ok(())
}

/// Runs the command with `--output` pointing to a fresh file and returns the written toml.
pub fn run_with_output(name: &str, args: &str) -> Result<String> {
    let output = env::temp_dir().join(format!("stitch-test-{name}-{}.toml", std::process::id()));
    run_in_repo_root(&format!("{args} --output {}", output.display()))?;
    let result = fs::read_to_string(&output)?;
    fs::remove_file(&output)?;
    Ok(result)
}
