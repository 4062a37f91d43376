use std::ops::{Index, IndexMut};

use ndarray::Array2;

/// A cell of the alignment matrix.
///
/// Row `template_index` holds the prefix of the template with that length, column `query_index` that of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMatrixIndex {
    pub template_index: usize,
    pub query_index: usize,
}

impl AlignmentMatrixIndex {
    pub fn new(template_index: usize, query_index: usize) -> Self {
        Self {
            template_index,
            query_index,
        }
    }

    pub fn gap_in_query_predecessor(&self) -> Self {
        debug_assert!(self.query_index > 0);

        Self {
            template_index: self.template_index,
            query_index: self.query_index - 1,
        }
    }

    pub fn gap_in_template_predecessor(&self) -> Self {
        debug_assert!(self.template_index > 0);

        Self {
            template_index: self.template_index - 1,
            query_index: self.query_index,
        }
    }

    pub fn match_predecessor(&self) -> Self {
        debug_assert!(self.template_index > 0);
        debug_assert!(self.query_index > 0);

        Self {
            template_index: self.template_index - 1,
            query_index: self.query_index - 1,
        }
    }
}

impl<T> Index<AlignmentMatrixIndex> for Array2<T> {
    type Output = <Array2<T> as Index<[usize; 2]>>::Output;

    fn index(&self, index: AlignmentMatrixIndex) -> &Self::Output {
        &self[[index.template_index, index.query_index]]
    }
}

impl<T> IndexMut<AlignmentMatrixIndex> for Array2<T> {
    fn index_mut(&mut self, index: AlignmentMatrixIndex) -> &mut Self::Output {
        &mut self[[index.template_index, index.query_index]]
    }
}
