use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use lib_stitch::{
    alignment_matrix::AlignmentMatrix, alignment_result::AlignmentResult, alphabet::Alphabet,
    symbol::Symbol,
};
use log::{LevelFilter, debug, info, warn};
use serde::Serialize;

use crate::{
    config::AlphabetArgs,
    fasta_parser::{FastaRecord, parse_fasta_file},
    init_logging,
};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The fasta file with the templates.
    #[clap(long, short = 't')]
    templates: PathBuf,

    /// The fasta file with the reads to align against the templates.
    #[clap(long, short = 'r')]
    reads: PathBuf,

    #[command(flatten)]
    alphabet: AlphabetArgs,

    /// Print the aligned sequences above each other.
    #[clap(long)]
    visualise: bool,

    /// The file to store the alignments in toml format.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

/// The best alignment of one read.
#[derive(Debug, Serialize)]
pub struct ReadAlignment {
    pub read: String,
    /// All templates sharing the best score, in input order.
    pub templates: Vec<String>,
    pub cigar: String,
    pub identity: f64,
    pub result: AlignmentResult,
}

#[derive(Debug, Serialize)]
struct AlignmentOutput {
    alignments: Vec<ReadAlignment>,
}

/// Encoded templates with their names.
pub(crate) struct Templates {
    pub names: Vec<String>,
    pub sequences: Vec<Vec<Symbol>>,
}

impl Templates {
    pub fn load(path: &Path, alphabet: &Alphabet) -> Result<Self> {
        info!("Loading templates from {path:?}");
        let records = parse_fasta_file(path)?;
        let sequences = records
            .iter()
            .map(|record| record.encode(alphabet))
            .collect::<Result<_>>()?;

        Ok(Self {
            names: records.into_iter().map(|record| record.id).collect(),
            sequences,
        })
    }

    pub fn named_sequences(&self) -> Vec<(String, Vec<Symbol>)> {
        self.names
            .iter()
            .cloned()
            .zip(self.sequences.iter().cloned())
            .collect()
    }
}

/// Aligns `read` against all templates.
///
/// Returns the indices of all templates that reach the best score together with the first of their alignments.
/// Returns `None` if no template aligns with a positive score.
pub(crate) fn best_alignments(
    matrix: &mut AlignmentMatrix,
    templates: &Templates,
    read: &[Symbol],
    alphabet: &Alphabet,
) -> Result<Option<(Vec<usize>, AlignmentResult)>> {
    let mut best: Option<(Vec<usize>, AlignmentResult)> = None;

    for (index, template) in templates.sequences.iter().enumerate() {
        let alignment = matrix.align(template, read, alphabet)?;
        if alignment.is_empty() {
            continue;
        }

        let improves = best
            .as_ref()
            .is_none_or(|(_, best)| alignment.score > best.score);
        if improves {
            best = Some((vec![index], alignment));
        } else if let Some((indices, best)) = &mut best {
            if alignment.score == best.score {
                indices.push(index);
            }
        }
    }

    Ok(best)
}

pub(crate) fn load_reads(path: &Path) -> Result<Vec<FastaRecord>> {
    info!("Loading reads from {path:?}");
    parse_fasta_file(path)
}

pub fn cli(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let alphabet = cli.alphabet.load_alphabet()?;
    let templates = Templates::load(&cli.templates, &alphabet)?;
    let reads = load_reads(&cli.reads)?;

    let mut matrix = AlignmentMatrix::new(0, 0);
    let mut alignments = Vec::new();
    for read in &reads {
        // A read that cannot be aligned is skipped, the others are still reported.
        let sequence = match read.encode(&alphabet) {
            Ok(sequence) => sequence,
            Err(error) => {
                warn!("Skipping read: {error}");
                continue;
            }
        };

        let Some((indices, result)) = best_alignments(&mut matrix, &templates, &sequence, &alphabet)?
        else {
            debug!("Read {} does not align to any template", read.id);
            continue;
        };
        let first = indices[0];

        println!(
            "{} -> {}: {}",
            read.id,
            indices
                .iter()
                .map(|&index| templates.names[index].as_str())
                .collect::<Vec<_>>()
                .join(", "),
            result,
        );
        if cli.visualise {
            println!(
                "{}",
                result.visualise(&alphabet, &templates.sequences[first], &sequence)?
            );
        }

        alignments.push(ReadAlignment {
            read: read.id.clone(),
            templates: indices
                .iter()
                .map(|&index| templates.names[index].clone())
                .collect(),
            cigar: result.cigar(),
            identity: result.identity(),
            result,
        });
    }

    info!(
        "Aligned {} of {} reads against {} templates",
        alignments.len(),
        reads.len(),
        templates.names.len()
    );

    if let Some(output) = cli.output {
        let mut output = std::io::BufWriter::new(
            std::fs::File::create(&output)
                .with_context(|| format!("Unable to create output file {output:?}"))?,
        );
        write!(output, "{}", toml::to_string(&AlignmentOutput { alignments })?)?;
    }

    Ok(())
}
