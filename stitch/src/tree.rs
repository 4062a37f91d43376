use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use lib_stitch::{
    alignment_matrix::AlignmentMatrix,
    hierarchy::{BranchStatistics, HierarchyTree, MatchSummary},
    phylogeny::{Outgroup, build_tree},
    tree::Tree,
};
use log::{LevelFilter, info, warn};
use serde::Serialize;

use crate::{
    align::{Templates, best_alignments, load_reads},
    config::AlphabetArgs,
    init_logging,
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The fasta file with the templates to build the tree of.
    #[clap(long, short = 't')]
    templates: PathBuf,

    /// Reads to align against the templates.
    ///
    /// Each read is attributed to the branches covering all templates it aligns best to.
    #[clap(long, short = 'r')]
    reads: Option<PathBuf>,

    #[command(flatten)]
    alphabet: AlphabetArgs,

    /// Root the tree at the template with this id.
    #[clap(long, conflicts_with = "most_distant_outgroup")]
    outgroup: Option<String>,

    /// Root the tree at the template with the greatest total distance to all others.
    #[clap(long)]
    most_distant_outgroup: bool,

    /// Show the branch lengths in the rendered tree.
    #[clap(long)]
    show_lengths: bool,

    /// The file to store the tree in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TreeOutput {
    brackets: String,
    tree: Tree<String>,
    statistics: Option<Tree<BranchStatistics>>,
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let alphabet = cli.alphabet.load_alphabet()?;
    let templates = Templates::load(&cli.templates, &alphabet)?;

    let outgroup = if let Some(name) = &cli.outgroup {
        let index = templates
            .names
            .iter()
            .position(|template| template == name)
            .ok_or_else(|| anyhow!("Outgroup {name} is not among the templates"))?;
        Outgroup::Leaf(index)
    } else if cli.most_distant_outgroup {
        Outgroup::MostDistant
    } else {
        Outgroup::None
    };

    let tree = build_tree(&templates.named_sequences(), &alphabet, outgroup)?;
    println!("{}", tree.brackets_notation());
    println!("{}", tree.render(false, cli.show_lengths));

    let statistics = if let Some(reads) = &cli.reads {
        let reads = load_reads(reads)?;
        let mut matrix = AlignmentMatrix::new(0, 0);
        let mut summaries = Vec::new();

        for read in &reads {
            let sequence = match read.encode(&alphabet) {
                Ok(sequence) => sequence,
                Err(error) => {
                    warn!("Skipping read: {error}");
                    continue;
                }
            };

            if let Some((indices, result)) =
                best_alignments(&mut matrix, &templates, &sequence, &alphabet)?
            {
                // Fasta input has no intensities, so every read weighs the same.
                summaries.push(MatchSummary::from_alignment(
                    read.id.clone(),
                    indices,
                    &result,
                    1.0,
                ));
            }
        }
        info!(
            "{} of {} reads align to the templates",
            summaries.len(),
            reads.len()
        );

        let hierarchy = HierarchyTree::new(tree.clone(), &summaries);
        println!("{}", hierarchy.statistics().render(true, cli.show_lengths));
        Some(hierarchy.statistics().clone())
    } else {
        None
    };

    if let Some(output) = cli.output {
        let mut output = std::io::BufWriter::new(
            std::fs::File::create(&output)
                .with_context(|| format!("Unable to create output file {output:?}"))?,
        );
        let tree_output = TreeOutput {
            brackets: tree.brackets_notation(),
            tree,
            statistics,
        };
        write!(output, "{}", toml::to_string(&tree_output)?)?;
    }

    Ok(())
}
