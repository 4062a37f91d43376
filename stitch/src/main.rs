use anyhow::Result;
use clap::{Parser, Subcommand};
use stitch::{align, tree};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align reads against templates and report the best local alignment of each read.
    Align(align::Cli),

    /// Build a neighbor-joining tree of templates, optionally annotated with read matches.
    Tree(tree::Cli),
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Align(cli) => align::cli(cli),
        Command::Tree(cli) => tree::cli(cli),
    }
}
