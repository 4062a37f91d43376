//! Local alignment with affine gap penalties.
//!
//! The dynamic programming table has one row per template prefix and one column per query prefix.
//! Filling it and tracing back takes O(M·N) time and memory for a template of length M and a query of length N.

use index::AlignmentMatrixIndex;
use log::{debug, trace};
use ndarray::Array2;

use crate::{
    alignment_result::{Alignment, AlignmentResult, AlignmentType},
    alphabet::{Alphabet, Score},
    error::Result,
    symbol::Symbol,
};

pub mod index;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    matrix: Array2<AlignmentMatrixEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentMatrixEntry {
    pub score: Score,
    pub direction: Direction,
}

/// The step that led into a cell of the alignment matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The score was reset to zero, so no alignment continues through this cell.
    #[default]
    NoMatch,
    Match,
    GapInQuery,
    GapInTemplate,
}

/// Computes the best local alignment of `query` against `template`.
///
/// Returns an empty alignment if no cell scores above zero, including when either sequence is empty.
pub fn align(template: &[Symbol], query: &[Symbol], alphabet: &Alphabet) -> Result<AlignmentResult> {
    AlignmentMatrix::new(template.len(), query.len()).align(template, query, alphabet)
}

impl AlignmentMatrix {
    pub fn new(template_length: usize, query_length: usize) -> Self {
        Self {
            matrix: Array2::default((template_length + 1, query_length + 1)),
        }
    }

    /// Aligns the sequences, reusing the allocation of this matrix if the dimensions match.
    pub fn align(
        &mut self,
        template: &[Symbol],
        query: &[Symbol],
        alphabet: &Alphabet,
    ) -> Result<AlignmentResult> {
        let dimensions = (template.len() + 1, query.len() + 1);
        if self.matrix.dim() != dimensions {
            self.matrix = Array2::default(dimensions);
        } else {
            self.matrix.fill(AlignmentMatrixEntry::default());
        }

        debug!(
            "Aligning query of length {} against template of length {}",
            query.len(),
            template.len()
        );

        let maximum = self.fill(template, query, alphabet)?;
        let score = self.matrix[maximum].score;
        if score == 0 {
            debug!("No cell scores above zero");
            return Ok(AlignmentResult::empty());
        }

        let (start, alignment) = self.traceback(maximum);
        debug!(
            "Found local alignment with score {score} ending at {maximum:?}: {}",
            alignment
        );

        AlignmentResult::new(
            start.template_index,
            start.query_index,
            score,
            alignment,
            template,
            query,
        )
    }

    /// Fills all inner cells and returns the index of the first cell with the maximum score.
    fn fill(
        &mut self,
        template: &[Symbol],
        query: &[Symbol],
        alphabet: &Alphabet,
    ) -> Result<AlignmentMatrixIndex> {
        let mut maximum = AlignmentMatrixIndex::new(0, 0);

        for template_index in 1..=template.len() {
            for query_index in 1..=query.len() {
                let index = AlignmentMatrixIndex::new(template_index, query_index);
                let entry = self.compute_entry(index, template, query, alphabet)?;
                self.matrix[index] = entry;

                if entry.score > self.matrix[maximum].score {
                    maximum = index;
                }
            }
        }

        Ok(maximum)
    }

    fn compute_entry(
        &self,
        index: AlignmentMatrixIndex,
        template: &[Symbol],
        query: &[Symbol],
        alphabet: &Alphabet,
    ) -> Result<AlignmentMatrixEntry> {
        let homology = template[index.template_index - 1]
            .homology(query[index.query_index - 1], alphabet)?;

        // Ties are resolved in favour of the earlier candidate.
        let mut entry = AlignmentMatrixEntry {
            score: self.matrix[index.match_predecessor()].score + homology,
            direction: Direction::Match,
        };

        for candidate in [
            self.compute_gap_entry(index.gap_in_query_predecessor(), Direction::GapInQuery, alphabet),
            self.compute_gap_entry(
                index.gap_in_template_predecessor(),
                Direction::GapInTemplate,
                alphabet,
            ),
        ] {
            if candidate.score > entry.score {
                entry = candidate;
            }
        }

        if entry.score <= 0 {
            entry = AlignmentMatrixEntry::default();
        }

        Ok(entry)
    }

    fn compute_gap_entry(
        &self,
        predecessor: AlignmentMatrixIndex,
        direction: Direction,
        alphabet: &Alphabet,
    ) -> AlignmentMatrixEntry {
        let predecessor = self.matrix[predecessor];
        let penalty = if predecessor.direction == direction {
            alphabet.gap_extend_penalty()
        } else {
            alphabet.gap_start_penalty()
        };

        AlignmentMatrixEntry {
            score: predecessor.score - penalty,
            direction,
        }
    }

    /// Follows the stored directions from `end` back to a cell without match.
    ///
    /// Returns the index where the alignment starts together with the alignment in forward direction.
    fn traceback(&self, end: AlignmentMatrixIndex) -> (AlignmentMatrixIndex, Alignment) {
        let mut index = end;
        let mut steps = Vec::new();

        while let Some(alignment_type) = self.matrix[index].direction.alignment_type() {
            trace!("Tracing back {alignment_type:?} at {index:?}");
            steps.push(alignment_type);
            index = match alignment_type {
                AlignmentType::Match => index.match_predecessor(),
                AlignmentType::GapInQuery => index.gap_in_query_predecessor(),
                AlignmentType::GapInTemplate => index.gap_in_template_predecessor(),
            };
        }

        (index, steps.into_iter().rev().collect())
    }

    #[cfg(test)]
    fn entry(&self, template_index: usize, query_index: usize) -> AlignmentMatrixEntry {
        self.matrix[[template_index, query_index]]
    }
}

impl Direction {
    /// The alignment column this step produces, or `None` where a local alignment starts.
    pub fn alignment_type(self) -> Option<AlignmentType> {
        match self {
            Self::NoMatch => None,
            Self::Match => Some(AlignmentType::Match),
            Self::GapInQuery => Some(AlignmentType::GapInQuery),
            Self::GapInTemplate => Some(AlignmentType::GapInTemplate),
        }
    }
}

impl core::fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let score_column_width = self
            .matrix
            .iter()
            .map(|entry| entry.score.to_string().len())
            .max()
            .unwrap_or(1);

        for row in self.matrix.rows() {
            write!(f, "[ ")?;
            for entry in row {
                write!(
                    f,
                    "{: >score_column_width$}{} ",
                    entry.score,
                    match entry.direction {
                        Direction::NoMatch => "N",
                        Direction::Match => "M",
                        Direction::GapInQuery => "I",
                        Direction::GapInTemplate => "D",
                    }
                )?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
