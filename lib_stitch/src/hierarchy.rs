//! Aggregation of match statistics onto the branches of a template tree.
//!
//! A match summary names the set of templates a group of reads matched to.
//! Each summary is attributed top-down to the branches whose leaves it covers completely.
//! The leaves of a branch that received a summary are removed from that summary,
//! so a summary covering exactly the leaves of one branch counts only there and not again for its descendants.

use std::{collections::HashSet, fmt::Display};

use log::debug;

use crate::{alignment_result::AlignmentResult, alphabet::Score, tree::Tree};


/// The combined matches of a group of reads.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSummary {
    pub identifier: String,
    /// The leaf indices of the templates this group matched to.
    pub template_indices: Vec<usize>,
    /// True if the group matched a single template only.
    pub unique: bool,
    pub score: Score,
    pub matches: usize,
    pub area: f64,
}

/// The statistics attributed to one node of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchStatistics {
    pub name: String,
    pub score: Score,
    pub unique_score: Score,
    pub matches: usize,
    pub unique_matches: usize,
    pub area: f64,
    pub unique_area: f64,
}

/// A tree together with a tree of the same shape holding the aggregated statistics.
#[derive(Debug, Clone)]
pub struct HierarchyTree {
    original: Tree<String>,
    statistics: Tree<BranchStatistics>,
}

impl MatchSummary {
    /// Summarises a group by the score and match count of its best alignment.
    ///
    /// The group is unique if it lists exactly one template.
    pub fn from_alignment(
        identifier: impl Into<String>,
        template_indices: Vec<usize>,
        alignment: &AlignmentResult,
        area: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            unique: template_indices.len() == 1,
            template_indices,
            score: alignment.score,
            matches: alignment.total_matches(),
            area,
        }
    }
}

impl BranchStatistics {
    fn add(&mut self, summary: &MatchSummary) {
        if summary.unique {
            self.unique_score += summary.score;
            self.unique_matches += summary.matches;
            self.unique_area += summary.area;
        } else {
            self.score += summary.score;
            self.matches += summary.matches;
            self.area += summary.area;
        }
    }

    pub fn total_score(&self) -> Score {
        self.score + self.unique_score
    }

    pub fn total_matches(&self) -> usize {
        self.matches + self.unique_matches
    }
}

impl HierarchyTree {
    pub fn new(tree: Tree<String>, summaries: &[MatchSummary]) -> Self {
        let mut remaining: Vec<_> = summaries
            .iter()
            .map(|summary| {
                (
                    summary.template_indices.iter().copied().collect::<HashSet<_>>(),
                    summary,
                )
            })
            .collect();

        let statistics = tree.remodel(|subtree| {
            let leaves = subtree.fold_combine(
                |mut left: Vec<usize>, right| {
                    left.extend(right);
                    left
                },
                |index, _| vec![index],
            );
            let mut statistics = BranchStatistics {
                name: subtree.value().clone(),
                ..Default::default()
            };

            remaining.retain_mut(|(templates, summary)| {
                if !leaves.iter().all(|leaf| templates.contains(leaf)) {
                    return true;
                }

                statistics.add(summary);
                for leaf in &leaves {
                    templates.remove(leaf);
                }
                !templates.is_empty()
            });

            statistics
        });

        debug!(
            "{} of {} match summaries could not be attributed completely",
            remaining.len(),
            summaries.len()
        );

        Self {
            original: tree,
            statistics,
        }
    }

    pub fn original(&self) -> &Tree<String> {
        &self.original
    }

    pub fn statistics(&self) -> &Tree<BranchStatistics> {
        &self.statistics
    }
}

impl Display for BranchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{} ", self.name)?;
        }
        write!(
            f,
            "[score {} unique {}, matches {} unique {}]",
            self.score, self.unique_score, self.matches, self.unique_matches
        )
    }
}
