//! Symbols and symbol sequences.
//!
//! A [`Symbol`] is only a code into an [`Alphabet`].
//! Every operation that needs to know the character or the score of a symbol takes the alphabet explicitly,
//! and it is the caller's responsibility to use the alphabet the symbols were encoded with.

use crate::{
    alphabet::{Alphabet, Score},
    error::Result,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol(u8);

impl Symbol {
    /// The gap symbol, which has the same code in every alphabet.
    pub const GAP: Self = Self(0);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().map(Self)
    }

    pub fn code(self) -> usize {
        self.0.into()
    }

    pub fn encode(alphabet: &Alphabet, character: char) -> Result<Self> {
        alphabet.index_of(character)
    }

    pub fn decode(self, alphabet: &Alphabet) -> Result<char> {
        alphabet.character(self)
    }

    /// The score of this symbol against `other` in the given alphabet.
    pub fn homology(self, other: Self, alphabet: &Alphabet) -> Result<Score> {
        alphabet.score(self, other)
    }
}

pub fn string_to_sequence(alphabet: &Alphabet, text: &str) -> Result<Vec<Symbol>> {
    text.chars()
        .map(|character| Symbol::encode(alphabet, character))
        .collect()
}

pub fn sequence_to_string(alphabet: &Alphabet, sequence: &[Symbol]) -> Result<String> {
    sequence
        .iter()
        .map(|symbol| symbol.decode(alphabet))
        .collect()
}

/// Compares two sequences by their symbol codes.
///
/// Both sequences must stem from the same alphabet, which is not checked.
pub fn sequences_equal(left: &[Symbol], right: &[Symbol]) -> bool {
    left == right
}

/// Sums the position-wise homology of two sequences.
///
/// Sequences of different lengths are not an error but score zero.
/// Callers rely on this to skip unequal pairs without special casing them.
pub fn sequence_homology(alphabet: &Alphabet, left: &[Symbol], right: &[Symbol]) -> Result<Score> {
    if left.len() != right.len() {
        return Ok(0);
    }

    left.iter()
        .zip(right)
        .map(|(&left, &right)| left.homology(right, alphabet))
        .sum()
}
