//! Character alphabets with their pairwise scoring matrix and gap penalties.
//!
//! An alphabet is loaded once from a scoring matrix in plain text (see [`io`]) and then shared by reference.
//! The gap character is always stored at code zero, followed by the characters in header order.

use std::{
    collections::HashMap,
    fmt::Display,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use log::{debug, info};
use ndarray::Array2;

use crate::{
    error::{Error, Result},
    symbol::Symbol,
};

pub mod io;
#[cfg(test)]
mod tests;

/// The score type used by alphabets and alignments.
pub type Score = i32;

/// The BLOSUM62 substitution matrix with `.` as gap character.
pub const BLOSUM62: &str = include_str!("alphabet/blosum62.csv");

/// Symbols are stored as a single byte, so an alphabet including the gap can hold at most this many characters.
pub const MAX_ALPHABET_SIZE: usize = u8::MAX as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapPenalties {
    /// The penalty for opening a gap.
    pub start: Score,
    /// The penalty for each further position of an already open gap.
    pub extend: Score,
}

/// Where the scoring matrix text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetSource {
    Text(String),
    Path(PathBuf),
}

/// The delimiters accepted between the cells of a scoring matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixFormat {
    pub delimiters: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    name: String,
    characters: Vec<char>,
    scoring_matrix: Array2<Score>,
    gap_penalties: GapPenalties,
    character_indices: HashMap<char, Symbol>,
}

impl Alphabet {
    pub fn load(source: &AlphabetSource, gap_penalties: GapPenalties) -> Result<Self> {
        Self::load_with_format(source, gap_penalties, &MatrixFormat::default())
    }

    pub fn load_with_format(
        source: &AlphabetSource,
        gap_penalties: GapPenalties,
        format: &MatrixFormat,
    ) -> Result<Self> {
        let alphabet = match source {
            AlphabetSource::Text(text) => Self::parse_plain(text, gap_penalties, format)?,
            AlphabetSource::Path(path) => Self::from_path(path, gap_penalties, format)?,
        };

        info!(
            "Loaded alphabet '{}' with {} characters and gap character '{}'",
            alphabet.name,
            alphabet.size(),
            alphabet.gap_character(),
        );
        Ok(alphabet)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        gap_penalties: GapPenalties,
        format: &MatrixFormat,
    ) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading scoring matrix from {path:?}");
        Self::read_plain(BufReader::new(File::open(path)?), gap_penalties, format)
    }

    pub fn blosum62(gap_penalties: GapPenalties) -> Result<Self> {
        Self::parse_plain(BLOSUM62, gap_penalties, &MatrixFormat::default())
    }

    /// Builds an alphabet from its parts.
    ///
    /// `scores` is indexed by the position of the characters in `characters` and must be square.
    /// The row and column of the gap character are filled with the negated gap extend penalty.
    pub fn from_parts(
        name: impl Into<String>,
        gap_character: char,
        characters: &[char],
        scores: &Array2<Score>,
        gap_penalties: GapPenalties,
    ) -> Result<Self> {
        if gap_penalties.start < 0 || gap_penalties.extend < 0 {
            return Err(Error::NegativeGapPenalty {
                start: gap_penalties.start,
                extend: gap_penalties.extend,
            });
        }

        let size = characters.len() + 1;
        if size > MAX_ALPHABET_SIZE {
            return Err(Error::AlphabetTooLarge {
                size,
                limit: MAX_ALPHABET_SIZE,
            });
        }

        let (rows, columns) = scores.dim();
        if rows != characters.len() || columns != characters.len() {
            return Err(Error::ScoringMatrixShape {
                rows,
                columns,
                size: characters.len(),
            });
        }

        let mut all_characters = Vec::with_capacity(size);
        all_characters.push(gap_character);
        let mut character_indices = HashMap::with_capacity(size);
        character_indices.insert(gap_character, Symbol::GAP);

        for &character in characters {
            if character == gap_character {
                return Err(Error::GapCharacterInHeader(character));
            }

            let symbol = Symbol::from_index(all_characters.len()).ok_or(Error::AlphabetTooLarge {
                size,
                limit: MAX_ALPHABET_SIZE,
            })?;
            if character_indices.insert(character, symbol).is_some() {
                return Err(Error::DuplicateCharacter(character));
            }
            all_characters.push(character);
        }

        let scoring_matrix = Array2::from_shape_fn((size, size), |(row, column)| {
            if row == 0 || column == 0 {
                -gap_penalties.extend
            } else {
                scores[[row - 1, column - 1]]
            }
        });

        Ok(Self {
            name: name.into(),
            characters: all_characters,
            scoring_matrix,
            gap_penalties,
            character_indices,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The amount of characters in this alphabet, including the gap character.
    pub fn size(&self) -> usize {
        self.characters.len()
    }

    /// All characters of this alphabet, ordered by their symbol code.
    pub fn characters(&self) -> &[char] {
        &self.characters
    }

    pub fn gap_character(&self) -> char {
        self.characters[Symbol::GAP.code()]
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        symbol.code() < self.size()
    }

    /// Returns the symbol of the given character.
    ///
    /// Fails with [`Error::UnknownCharacter`] if the character is not part of this alphabet.
    pub fn index_of(&self, character: char) -> Result<Symbol> {
        self.character_indices
            .get(&character)
            .copied()
            .ok_or(Error::UnknownCharacter(character))
    }

    pub fn character(&self, symbol: Symbol) -> Result<char> {
        self.characters
            .get(symbol.code())
            .copied()
            .ok_or(Error::SymbolOutOfRange {
                code: symbol.code(),
                size: self.size(),
            })
    }

    /// The score of aligning `left` against `right`.
    ///
    /// The matrix may be asymmetric, so the order of the arguments matters.
    pub fn score(&self, left: Symbol, right: Symbol) -> Result<Score> {
        for symbol in [left, right] {
            if !self.contains(symbol) {
                return Err(Error::SymbolOutOfRange {
                    code: symbol.code(),
                    size: self.size(),
                });
            }
        }

        Ok(self.scoring_matrix[[left.code(), right.code()]])
    }

    pub fn scoring_matrix(&self) -> &Array2<Score> {
        &self.scoring_matrix
    }

    pub fn gap_penalties(&self) -> GapPenalties {
        self.gap_penalties
    }

    pub fn gap_start_penalty(&self) -> Score {
        self.gap_penalties.start
    }

    pub fn gap_extend_penalty(&self) -> Score {
        self.gap_penalties.extend
    }

    pub fn is_symmetric(&self) -> bool {
        self.scoring_matrix == self.scoring_matrix.t()
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self {
            start: 12,
            extend: 1,
        }
    }
}

impl Default for MatrixFormat {
    fn default() -> Self {
        Self {
            delimiters: vec![';', ','],
        }
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            writeln!(f, "Alphabet")?;
        } else {
            writeln!(f, "Alphabet {}", self.name)?;
        }
        for character in self.characters.iter().skip(1) {
            write!(f, "{character}")?;
        }
        writeln!(f)?;
        writeln!(f, "With gap {}", self.gap_character())?;

        for row in self.scoring_matrix.rows() {
            for score in row {
                write!(f, "{score: >4}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
