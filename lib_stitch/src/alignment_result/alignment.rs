use std::fmt::Display;

/// One column kind of a local alignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentType {
    /// A match or mismatch, consuming one symbol of both sequences.
    Match,

    /// A template symbol opposite a gap in the query.
    /// This is a deletion relative to the query, written as `D` in CIGAR strings.
    ///
    /// ```text
    /// TEMPLATETEMPLATE
    /// QUERY------QUERY
    /// ```
    GapInTemplate,

    /// A query symbol opposite a gap in the template.
    /// This is an insertion relative to the template, written as `I` in CIGAR strings.
    ///
    /// ```text
    /// TEM----TEMPLATE
    /// QUERYQUERYQUERY
    /// ```
    GapInQuery,
}

/// A run-length encoded alignment.
///
/// Adjacent runs never share their alignment type and no run is empty.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    alignment: Vec<(usize, AlignmentType)>,
}

impl AlignmentType {
    pub fn cigar_code(&self) -> char {
        match self {
            Self::Match => 'M',
            Self::GapInTemplate => 'D',
            Self::GapInQuery => 'I',
        }
    }

    pub fn consumes_template(&self) -> bool {
        matches!(self, Self::Match | Self::GapInTemplate)
    }

    pub fn consumes_query(&self) -> bool {
        matches!(self, Self::Match | Self::GapInQuery)
    }
}

impl Alignment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, alignment_type: AlignmentType) {
        self.push_run(1, alignment_type);
    }

    pub fn push_run(&mut self, length: usize, alignment_type: AlignmentType) {
        if length == 0 {
            return;
        }

        if let Some((multiplicity, last_alignment_type)) = self.alignment.last_mut() {
            if *last_alignment_type == alignment_type {
                *multiplicity += length;
                return;
            }
        }

        self.alignment.push((length, alignment_type));
    }

    pub fn is_empty(&self) -> bool {
        self.alignment.is_empty()
    }

    /// The amount of runs.
    pub fn len(&self) -> usize {
        self.alignment.len()
    }

    pub fn iter_compact(&self) -> impl Iterator<Item = (usize, AlignmentType)> + '_ {
        self.alignment.iter().copied()
    }

    pub fn iter_flat(&self) -> impl Iterator<Item = AlignmentType> + '_ {
        self.alignment
            .iter()
            .flat_map(|&(multiplicity, alignment_type)| {
                std::iter::repeat_n(alignment_type, multiplicity)
            })
    }

    /// Sums the lengths of all runs of the selected alignment types.
    pub fn count(&self, mut filter: impl FnMut(AlignmentType) -> bool) -> usize {
        self.alignment
            .iter()
            .filter(|(_, alignment_type)| filter(*alignment_type))
            .map(|(multiplicity, _)| multiplicity)
            .sum()
    }

    pub fn cigar(&self) -> String {
        self.to_string()
    }

    pub fn write_cigar(&self, writer: &mut impl std::fmt::Write) -> std::fmt::Result {
        for (amount, alignment_type) in &self.alignment {
            write!(writer, "{amount}{alignment_type}")?;
        }

        Ok(())
    }

    pub fn reverse(&self) -> Self {
        Self {
            alignment: self.alignment.iter().copied().rev().collect(),
        }
    }
}

impl From<Vec<(usize, AlignmentType)>> for Alignment {
    fn from(value: Vec<(usize, AlignmentType)>) -> Self {
        let mut result = Self::new();
        for (length, alignment_type) in value {
            result.push_run(length, alignment_type);
        }
        result
    }
}

impl FromIterator<AlignmentType> for Alignment {
    fn from_iter<T: IntoIterator<Item = AlignmentType>>(iter: T) -> Self {
        let mut result = Self::new();
        for alignment_type in iter {
            result.push(alignment_type);
        }
        result
    }
}

impl Display for AlignmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cigar_code())
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_cigar(f)
    }
}
