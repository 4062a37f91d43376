use std::fmt::Display;

use crate::{
    alphabet::{Alphabet, Score},
    error::{Error, Result},
    symbol::{Symbol, sequence_to_string},
};

pub use alignment::{Alignment, AlignmentType};

pub mod alignment;

/// Width of one block in [`AlignmentResult::visualise`].
const VISUALISATION_BLOCK_WIDTH: usize = 80;

/// A local alignment of a query against a template.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentResult {
    pub start_on_template: usize,
    pub start_on_query: usize,
    pub score: Score,
    total_matches: usize,
    length_on_template: usize,
    length_on_query: usize,
    alignment: Alignment,
    detailed_scores: DetailedScores,
}

/// Position-wise breakdown of an alignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedScores {
    /// Match columns with equal symbols.
    pub matches: usize,
    /// Match columns with different symbols.
    pub mismatches: usize,
    /// Query symbols opposite a gap in the template.
    pub gap_in_query: usize,
    /// Template symbols opposite a gap in the query.
    pub gap_in_template: usize,
}

impl AlignmentResult {
    /// Creates a result from an alignment of `query` starting at `start_on_query` against `template` starting at `start_on_template`.
    ///
    /// Fails if the alignment runs past the end of either sequence.
    pub fn new(
        start_on_template: usize,
        start_on_query: usize,
        score: Score,
        alignment: Alignment,
        template: &[Symbol],
        query: &[Symbol],
    ) -> Result<Self> {
        let total_matches = alignment.count(|alignment_type| alignment_type == AlignmentType::Match);
        let length_on_template = alignment.count(|alignment_type| alignment_type.consumes_template());
        let length_on_query = alignment.count(|alignment_type| alignment_type.consumes_query());

        let template = checked_range(template, start_on_template, length_on_template)?;
        let query = checked_range(query, start_on_query, length_on_query)?;
        let detailed_scores = DetailedScores::compute(&alignment, template, query);

        Ok(Self {
            start_on_template,
            start_on_query,
            score,
            alignment,
            total_matches,
            length_on_template,
            length_on_query,
            detailed_scores,
        })
    }

    /// An alignment without any columns and score zero.
    pub fn empty() -> Self {
        Self {
            start_on_template: 0,
            start_on_query: 0,
            score: 0,
            alignment: Alignment::new(),
            total_matches: 0,
            length_on_template: 0,
            length_on_query: 0,
            detailed_scores: DetailedScores::default(),
        }
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn is_empty(&self) -> bool {
        self.alignment.is_empty()
    }

    pub fn cigar(&self) -> String {
        self.alignment.cigar()
    }

    /// The amount of match columns, including mismatches.
    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// The amount of template symbols covered, i.e. matches plus gaps in template.
    pub fn length_on_template(&self) -> usize {
        self.length_on_template
    }

    /// The amount of query symbols covered, i.e. matches plus gaps in query.
    pub fn length_on_query(&self) -> usize {
        self.length_on_query
    }

    pub fn detailed_scores(&self) -> DetailedScores {
        self.detailed_scores
    }

    /// The fraction of alignment columns that hold equal symbols.
    pub fn identity(&self) -> f64 {
        let columns = self.alignment.count(|_| true);
        if columns == 0 {
            0.0
        } else {
            self.detailed_scores.matches as f64 / columns as f64
        }
    }

    /// Maps a position on the template to the aligned position on the query.
    ///
    /// Positions opposite a gap in the query map to the query position following the gap.
    /// Returns `None` for positions outside of the aligned region.
    pub fn query_position(&self, template_position: usize) -> Option<usize> {
        if template_position < self.start_on_template {
            return None;
        }

        let mut template_index = self.start_on_template;
        let mut query_index = self.start_on_query;
        for (length, alignment_type) in self.alignment.iter_compact() {
            match alignment_type {
                AlignmentType::Match => {
                    if template_position < template_index + length {
                        return Some(query_index + template_position - template_index);
                    }
                    template_index += length;
                    query_index += length;
                }
                AlignmentType::GapInTemplate => {
                    if template_position < template_index + length {
                        return Some(query_index);
                    }
                    template_index += length;
                }
                AlignmentType::GapInQuery => query_index += length,
            }
        }

        None
    }

    /// Renders the aligned region of both sequences above each other.
    ///
    /// Unaligned flanks are abbreviated with `...` and gaps are shown as `-`.
    /// Long alignments are wrapped into blocks separated by an empty line.
    pub fn visualise(
        &self,
        alphabet: &Alphabet,
        template: &[Symbol],
        query: &[Symbol],
    ) -> Result<String> {
        let template_text = sequence_to_string(alphabet, template)?;
        let query_text = sequence_to_string(alphabet, query)?;
        let template_text: Vec<_> = template_text.chars().collect();
        let query_text: Vec<_> = query_text.chars().collect();
        checked_range(&template_text, self.start_on_template, self.length_on_template)?;
        checked_range(&query_text, self.start_on_query, self.length_on_query)?;

        let mut template_line = String::new();
        let mut query_line = String::new();
        let flank = |line: &mut String, unaligned: bool, marker: &str| {
            line.push_str(if unaligned { marker } else { "    " })
        };

        if self.start_on_template != 0 || self.start_on_query != 0 {
            flank(&mut template_line, self.start_on_template != 0, "... ");
            flank(&mut query_line, self.start_on_query != 0, "... ");
        }

        let mut template_index = self.start_on_template;
        let mut query_index = self.start_on_query;
        for (length, alignment_type) in self.alignment.iter_compact() {
            if alignment_type.consumes_template() {
                template_line.extend(&template_text[template_index..template_index + length]);
                template_index += length;
            } else {
                template_line.extend(std::iter::repeat_n('-', length));
            }

            if alignment_type.consumes_query() {
                query_line.extend(&query_text[query_index..query_index + length]);
                query_index += length;
            } else {
                query_line.extend(std::iter::repeat_n('-', length));
            }
        }

        if template_index != template_text.len() || query_index != query_text.len() {
            flank(&mut template_line, template_index != template_text.len(), " ...");
            flank(&mut query_line, query_index != query_text.len(), " ...");
        }

        let template_line: Vec<_> = template_line.chars().collect();
        let query_line: Vec<_> = query_line.chars().collect();
        let blocks: Vec<_> = template_line
            .chunks(VISUALISATION_BLOCK_WIDTH)
            .zip(query_line.chunks(VISUALISATION_BLOCK_WIDTH))
            .map(|(template_block, query_block)| {
                format!(
                    "{}\n{}\n",
                    template_block.iter().collect::<String>(),
                    query_block.iter().collect::<String>()
                )
            })
            .collect();

        Ok(blocks.join("\n"))
    }
}

impl DetailedScores {
    /// Counts the columns of `alignment` over the aligned parts of template and query.
    fn compute(alignment: &Alignment, template: &[Symbol], query: &[Symbol]) -> Self {
        let mut result = Self::default();
        let mut template = template.iter();
        let mut query = query.iter();

        for alignment_type in alignment.iter_flat() {
            match alignment_type {
                AlignmentType::Match => {
                    if template.next() == query.next() {
                        result.matches += 1;
                    } else {
                        result.mismatches += 1;
                    }
                }
                AlignmentType::GapInTemplate => {
                    template.next();
                    result.gap_in_template += 1;
                }
                AlignmentType::GapInQuery => {
                    query.next();
                    result.gap_in_query += 1;
                }
            }
        }

        result
    }

    /// The amount of gap positions on either side.
    pub fn gaps(&self) -> usize {
        self.gap_in_query + self.gap_in_template
    }
}

fn checked_range<T>(sequence: &[T], start: usize, length: usize) -> Result<&[T]> {
    sequence
        .get(start..start + length)
        .ok_or(Error::AlignmentOutOfBounds {
            start,
            length,
            sequence_length: sequence.len(),
        })
}

impl Display for AlignmentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Score {} starting at template {} and query {}: {}",
            self.score, self.start_on_template, self.start_on_query, self.alignment
        )
    }
}
