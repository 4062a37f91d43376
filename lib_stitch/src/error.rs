use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("A parsing error of kind '{kind:?}' occurred when the remaining input was '{input}'.")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}.")]
    ParserIncomplete(nom::Needed),

    #[error("The scoring matrix contains no rows.")]
    EmptyScoringMatrix,

    #[error("The header cell '{0}' of the scoring matrix is not a single character.")]
    InvalidHeaderCell(String),

    #[error("The character '{0}' occurs twice in the alphabet definition.")]
    DuplicateCharacter(char),

    #[error("The gap character '{0}' is listed again in the header of the scoring matrix.")]
    GapCharacterInHeader(char),

    #[error("The scoring matrix has {actual} score rows, but its header lists {expected} characters.")]
    WrongRowCount { expected: usize, actual: usize },

    #[error("Row {row} of the scoring matrix has {actual} cells, but {expected} were expected.")]
    WrongColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Row {row} of the scoring matrix starts with '{actual}', but the header order requires '{expected}'."
    )]
    RowCharacterMismatch {
        row: usize,
        expected: char,
        actual: String,
    },

    #[error("The cell '{value}' in row {row} and column {column} of the scoring matrix is not an integer.")]
    InvalidScore {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("The gap penalties must not be negative, but got start {start} and extend {extend}.")]
    NegativeGapPenalty { start: i32, extend: i32 },

    #[error("An alphabet can hold at most {limit} characters including the gap, but got {size}.")]
    AlphabetTooLarge { size: usize, limit: usize },

    #[error("The scoring matrix has shape {rows}x{columns}, but the alphabet has {size} characters.")]
    ScoringMatrixShape {
        rows: usize,
        columns: usize,
        size: usize,
    },

    #[error("The character '{0}' could not be found in this alphabet.")]
    UnknownCharacter(char),

    #[error("The symbol code {code} is out of range for an alphabet with {size} characters.")]
    SymbolOutOfRange { code: usize, size: usize },

    #[error(
        "An alignment of length {length} starting at {start} exceeds a sequence of length {sequence_length}."
    )]
    AlignmentOutOfBounds {
        start: usize,
        length: usize,
        sequence_length: usize,
    },

    #[error("A phylogenetic tree needs at least one sequence.")]
    NoSequences,

    #[error("The distance matrix has shape {rows}x{columns}, but {names} names were given.")]
    DistanceMatrixShape {
        rows: usize,
        columns: usize,
        names: usize,
    },

    #[error("The outgroup {index} does not exist in a tree with {leaves} leaves.")]
    OutgroupOutOfRange { index: usize, leaves: usize },

    #[error("The tree has no leaf with index {0}.")]
    NoSuchLeaf(usize),
}
