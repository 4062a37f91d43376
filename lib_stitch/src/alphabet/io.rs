//! Plain text format of scoring matrices.
//!
//! ```text
//! # Optional name
//! *;A;B
//! A;1;0
//! B;0;1
//! ```
//!
//! The first cell of the header row is the gap character, the remaining header cells list the characters.
//! Each following row starts with its character, in header order, followed by one integer score per column.

use std::io::{Read, Write};

use itertools::Itertools;
use log::trace;
use ndarray::Array2;
use nom::combinator::opt;

use super::{Alphabet, GapPenalties, MatrixFormat, Score};
use crate::{
    error::{Error, Result},
    io::{parse_delimited_row, parse_title, skip_any_whitespace, translate_nom_error},
};

#[cfg(test)]
mod tests;

impl Alphabet {
    pub fn read_plain(
        mut reader: impl Read,
        gap_penalties: GapPenalties,
        format: &MatrixFormat,
    ) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse_plain(&input, gap_penalties, format)
    }

    pub fn parse_plain(
        input: &str,
        gap_penalties: GapPenalties,
        format: &MatrixFormat,
    ) -> Result<Self> {
        let (input, name) = opt(parse_title)(input).map_err(translate_nom_error)?;
        let mut rows = parse_rows(input, &format.delimiters)?.into_iter();

        let header = rows
            .next()
            .ok_or(Error::EmptyScoringMatrix)?
            .into_iter()
            .map(parse_character_cell)
            .collect::<Result<Vec<_>>>()?;
        let (&gap_character, characters) =
            header.split_first().ok_or(Error::EmptyScoringMatrix)?;

        let score_rows: Vec<_> = rows.collect();
        if score_rows.len() != characters.len() {
            return Err(Error::WrongRowCount {
                expected: characters.len(),
                actual: score_rows.len(),
            });
        }

        let mut scores = Array2::zeros((characters.len(), characters.len()));
        for (row_index, (row, &expected_character)) in score_rows.iter().zip(characters).enumerate()
        {
            // The header is row zero.
            let row_number = row_index + 1;
            if row.len() != characters.len() + 1 {
                return Err(Error::WrongColumnCount {
                    row: row_number,
                    expected: characters.len() + 1,
                    actual: row.len(),
                });
            }

            let mut label = row[0].chars();
            if label.next() != Some(expected_character) || label.next().is_some() {
                return Err(Error::RowCharacterMismatch {
                    row: row_number,
                    expected: expected_character,
                    actual: row[0].to_string(),
                });
            }

            for (column_index, cell) in row.iter().enumerate().skip(1) {
                scores[[row_index, column_index - 1]] =
                    cell.parse::<Score>()
                        .map_err(|_| Error::InvalidScore {
                            row: row_number,
                            column: column_index,
                            value: cell.to_string(),
                        })?;
            }
        }

        Self::from_parts(
            name.unwrap_or_default(),
            gap_character,
            characters,
            &scores,
            gap_penalties,
        )
    }

    pub fn write_plain(&self, mut writer: impl Write, delimiter: char) -> Result<()> {
        if !self.name.is_empty() {
            writeln!(writer, "# {}", self.name)?;
        }

        writeln!(writer, "{}", self.characters.iter().join(&delimiter.to_string()))?;
        for (row, character) in self
            .scoring_matrix
            .rows()
            .into_iter()
            .zip(&self.characters)
            .skip(1)
        {
            write!(writer, "{character}")?;
            for score in row.iter().skip(1) {
                write!(writer, "{delimiter}{score}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

fn parse_rows<'input>(
    mut input: &'input str,
    delimiters: &[char],
) -> Result<Vec<Vec<&'input str>>> {
    let mut rows = Vec::new();

    loop {
        input = skip_any_whitespace(input).map_err(translate_nom_error)?;
        if input.is_empty() {
            break;
        }

        let (remaining_input, row) =
            parse_delimited_row(input, delimiters).map_err(translate_nom_error)?;
        trace!("Parsed scoring matrix row {row:?}");
        rows.push(row);
        input = remaining_input;
    }

    Ok(rows)
}

fn parse_character_cell(cell: &str) -> Result<char> {
    let mut characters = cell.chars();
    match (characters.next(), characters.next()) {
        (Some(character), None) => Ok(character),
        _ => Err(Error::InvalidHeaderCell(cell.to_string())),
    }
}
