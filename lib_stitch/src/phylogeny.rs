//! Phylogenetic trees of sequences via neighbor joining.
//!
//! The distance between two sequences is derived from their local alignment.
//! Joining takes O(n³) time for n sequences, on top of the n² pairwise alignments.

use itertools::Itertools;
use log::{debug, info, trace};
use ndarray::Array2;
use rayon::prelude::*;

use crate::{
    alignment_matrix::AlignmentMatrix,
    alphabet::Alphabet,
    error::{Error, Result},
    symbol::Symbol,
    tree::{Edge, NodeIndex, Tree, TreeBuilder},
};

#[cfg(test)]
mod tests;

/// Each gap position in an alignment counts as this many mismatches.
pub const GAP_DISTANCE: f64 = 12.0;

/// Where the tree gets rooted after joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outgroup {
    /// Keep the root created by the last join.
    #[default]
    None,
    /// Root at the leaf of the sequence with this index.
    Leaf(usize),
    /// Root at the sequence with the greatest sum of distances to all others.
    /// On ties, the first such sequence is used.
    MostDistant,
}

/// Builds a tree over the named sequences, rooting it at the outgroup if one is given.
pub fn build_phylogenetic_tree(
    sequences: &[(String, Vec<Symbol>)],
    alphabet: &Alphabet,
    outgroup: bool,
) -> Result<Tree<String>> {
    build_tree(
        sequences,
        alphabet,
        if outgroup {
            Outgroup::MostDistant
        } else {
            Outgroup::None
        },
    )
}

pub fn build_tree(
    sequences: &[(String, Vec<Symbol>)],
    alphabet: &Alphabet,
    outgroup: Outgroup,
) -> Result<Tree<String>> {
    if sequences.is_empty() {
        return Err(Error::NoSequences);
    }
    if let Outgroup::Leaf(index) = outgroup {
        if index >= sequences.len() {
            return Err(Error::OutgroupOutOfRange {
                index,
                leaves: sequences.len(),
            });
        }
    }

    let distances = distance_matrix(sequences, alphabet)?;
    let names: Vec<_> = sequences.iter().map(|(name, _)| name.clone()).collect();
    let tree = neighbor_joining(&distances, &names)?;

    let tree = match outgroup {
        Outgroup::None => tree,
        Outgroup::Leaf(index) => tree.reroot(index)?,
        Outgroup::MostDistant => tree.reroot(most_distant(&distances))?,
    };

    info!(
        "Built tree over {} sequences: {}",
        sequences.len(),
        tree.brackets_notation()
    );
    Ok(tree)
}

/// The distance of `query` to `template`: mismatches plus [`GAP_DISTANCE`] per gap position of their local alignment.
pub fn sequence_distance(template: &[Symbol], query: &[Symbol], alphabet: &Alphabet) -> Result<f64> {
    distance_with(&mut AlignmentMatrix::new(template.len(), query.len()), template, query, alphabet)
}

fn distance_with(
    matrix: &mut AlignmentMatrix,
    template: &[Symbol],
    query: &[Symbol],
    alphabet: &Alphabet,
) -> Result<f64> {
    let detailed_scores = matrix.align(template, query, alphabet)?.detailed_scores();
    Ok(detailed_scores.mismatches as f64 + detailed_scores.gaps() as f64 * GAP_DISTANCE)
}

/// Computes the distances between all pairs of sequences, with the row sequence as template.
///
/// The diagonal is zero. Rows are computed in parallel.
pub fn distance_matrix(
    sequences: &[(String, Vec<Symbol>)],
    alphabet: &Alphabet,
) -> Result<Array2<f64>> {
    let size = sequences.len();
    let rows = (0..size)
        .into_par_iter()
        .map(|row| {
            let mut matrix = AlignmentMatrix::new(0, 0);
            (0..size)
                .map(|column| {
                    if row == column {
                        Ok(0.0)
                    } else {
                        distance_with(&mut matrix, &sequences[row].1, &sequences[column].1, alphabet)
                    }
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let distances = Array2::from_shape_fn((size, size), |(row, column)| rows[row][column]);
    debug!("Distance matrix:\n{distances}");
    Ok(distances)
}

/// Joins the items of a distance matrix into a tree with the given leaf names.
///
/// Negative branch lengths are removed afterwards, see [`Tree::remove_negative_distances`].
/// All branches have an empty name.
pub fn neighbor_joining(distances: &Array2<f64>, names: &[String]) -> Result<Tree<String>> {
    let (rows, columns) = distances.dim();
    if rows != columns || rows != names.len() {
        return Err(Error::DistanceMatrixShape {
            rows,
            columns,
            names: names.len(),
        });
    }
    if names.is_empty() {
        return Err(Error::NoSequences);
    }

    let mut builder = TreeBuilder::with_leaf_capacity(names.len());
    let mut nodes: Vec<NodeIndex> = names
        .iter()
        .enumerate()
        .map(|(index, name)| builder.add_leaf(index, name.clone()))
        .collect();
    if nodes.len() == 1 {
        return Ok(builder.build(nodes[0]));
    }

    let mut distances = distances.clone();
    while nodes.len() > 2 {
        let (first, second) = closest_pair(&distances);
        let joined = join(&mut builder, &nodes, &distances, first, second);
        trace!(
            "Joined {first} and {second} of {} as node {joined}",
            nodes.len()
        );

        distances = merge_distances(&distances, first, second);
        nodes[first] = joined;
        nodes.remove(second);
    }

    let half = distances[[0, 1]] / 2.0;
    let root = builder.add_branch(
        String::new(),
        Edge::new(half, nodes[0]),
        Edge::new(half, nodes[1]),
    );

    let mut tree = builder.build(root);
    tree.remove_negative_distances();
    Ok(tree)
}

/// The sums of all rows.
fn row_sums(distances: &Array2<f64>) -> Vec<f64> {
    distances.rows().into_iter().map(|row| row.sum()).collect()
}

/// Returns the pair with the minimum Q value, the lower index first.
///
/// The first pair in row-major order wins on ties.
fn closest_pair(distances: &Array2<f64>) -> (usize, usize) {
    let size = distances.nrows();
    let rows = row_sums(distances);
    let factor = (size - 2) as f64;

    let mut best = None;
    for (i, j) in (0..size).cartesian_product(0..size) {
        if i == j {
            continue;
        }

        let q = factor * distances[[i, j]] - rows[i] - rows[j];
        if best.is_none_or(|(minimum, _, _)| q < minimum) {
            best = Some((q, i.min(j), i.max(j)));
        }
    }

    best.map(|(_, first, second)| (first, second))
        .unwrap_or((0, 1))
}

/// Adds a branch joining `first` and `second` to `builder`.
fn join(
    builder: &mut TreeBuilder<String>,
    nodes: &[NodeIndex],
    distances: &Array2<f64>,
    first: usize,
    second: usize,
) -> NodeIndex {
    let rows = row_sums(distances);
    let distance = distances[[first, second]];
    let first_length =
        distance / 2.0 + (rows[first] - rows[second]) / (2.0 * (nodes.len() - 2) as f64);

    builder.add_branch(
        String::new(),
        Edge::new(first_length, nodes[first]),
        Edge::new(distance - first_length, nodes[second]),
    )
}

/// Removes `second` from the matrix and replaces `first` with the node joining both.
fn merge_distances(distances: &Array2<f64>, first: usize, second: usize) -> Array2<f64> {
    let remaining: Vec<_> = (0..distances.nrows()).filter(|&k| k != second).collect();
    let to_joined = |k: usize| {
        (distances[[first, k]] + distances[[second, k]] - distances[[first, second]]) / 2.0
    };

    Array2::from_shape_fn((remaining.len(), remaining.len()), |(row, column)| {
        let (k, l) = (remaining[row], remaining[column]);
        if k == l {
            0.0
        } else if k == first {
            to_joined(l)
        } else if l == first {
            to_joined(k)
        } else {
            distances[[k, l]]
        }
    })
}

/// The index of the row with the greatest sum, the first one on ties.
fn most_distant(distances: &Array2<f64>) -> usize {
    row_sums(distances)
        .into_iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, maximum), (index, sum)| {
            if sum > maximum {
                (index, sum)
            } else {
                (best, maximum)
            }
        })
        .0
}
