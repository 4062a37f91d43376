use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Result, anyhow, ensure};
use lib_stitch::{
    alphabet::Alphabet,
    symbol::{Symbol, string_to_sequence},
};
use log::debug;
use utf8_chars::BufReadCharsExt;

/// One record of a fasta file.
///
/// The sequence is upper case and contains no whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub comment: String,
    pub sequence: String,
}

impl FastaRecord {
    fn new() -> Self {
        Self {
            id: String::new(),
            comment: String::new(),
            sequence: String::new(),
        }
    }

    pub fn encode(&self, alphabet: &Alphabet) -> Result<Vec<Symbol>> {
        string_to_sequence(alphabet, &self.sequence)
            .map_err(|error| anyhow!("Record {} cannot be encoded: {error}", self.id))
    }
}

/// Parses all records of a fasta file. The file must contain at least one record.
pub fn parse_fasta_file(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let path = path.as_ref();
    debug!("Parsing fasta file {path:?}");

    let file =
        File::open(path).map_err(|error| anyhow!("Unable to open input file {path:?}: {error}"))?;
    let records = parse_fasta(BufReader::new(file))?;
    ensure!(
        !records.is_empty(),
        "Input file {path:?} contains no fasta record"
    );
    debug!("Found {} records in {path:?}", records.len());
    Ok(records)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    FileStart,
    Id,
    Comment,
    Sequence,
}

fn parse_fasta(mut reader: impl BufRead) -> Result<Vec<FastaRecord>> {
    let mut state = State::FileStart;
    let mut line_start = true;
    let mut current = FastaRecord::new();
    let mut records = Vec::new();

    for character in reader.chars_raw() {
        let character = character
            .map_err(|error| anyhow!("Error reading character from fasta input file: {error}"))?;
        let newline = character == '\n' || character == '\r';

        match state {
            State::FileStart => {
                if character == '>' && line_start {
                    state = State::Id;
                } else if !character.is_whitespace() {
                    return Err(anyhow!(
                        "Found non-whitespace character before first fasta record: {character}"
                    ));
                }
            }
            State::Id => {
                if newline {
                    state = State::Sequence;
                } else if character.is_whitespace() {
                    state = State::Comment;
                } else {
                    current.id.push(character);
                }
            }
            State::Comment => {
                if newline {
                    state = State::Sequence;
                } else {
                    current.comment.push(character);
                }
            }
            State::Sequence => {
                if character == '>' && line_start {
                    records.push(std::mem::replace(&mut current, FastaRecord::new()));
                    state = State::Id;
                } else if !character.is_whitespace() {
                    current.sequence.push(character.to_ascii_uppercase());
                }
            }
        }

        line_start = newline;
    }

    if state != State::FileStart {
        records.push(current);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{FastaRecord, parse_fasta};

    #[test]
    fn multiple_records() {
        let records =
            parse_fasta("\n>first some comment\nVKAF\nealq\n>second\r\nVKAW\n".as_bytes()).unwrap();
        assert_eq!(
            records,
            [
                FastaRecord {
                    id: "first".to_string(),
                    comment: "some comment".to_string(),
                    sequence: "VKAFEALQ".to_string(),
                },
                FastaRecord {
                    id: "second".to_string(),
                    comment: String::new(),
                    sequence: "VKAW".to_string(),
                },
            ]
        );
    }

    #[test]
    fn invalid_input() {
        assert!(parse_fasta("".as_bytes()).unwrap().is_empty());
        assert!(parse_fasta("VKAF\n>id\nVKAF".as_bytes()).is_err());
    }
}
