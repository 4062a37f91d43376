use nom::{
    IResult, Parser,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, satisfy},
    multi::{many0, separated_list1},
};

use crate::error::Error;

pub fn parse_title(input: &str) -> IResult<&str, &str> {
    let input = skip_any_whitespace(input)?;
    let input = char('#')(input)?.0;
    let input = many0(satisfy(is_whitespace)).parse(input)?.0;
    let (input, result) = take_till1(is_any_line_break)(input)?;
    Ok((input, result.trim()))
}

/// Parses one line of cells separated by any of the given delimiters.
///
/// Cells are trimmed, and empty cells are kept so that the caller can report them.
pub fn parse_delimited_row<'input>(
    input: &'input str,
    delimiters: &[char],
) -> IResult<&'input str, Vec<&'input str>> {
    let (input, cells) = separated_list1(
        satisfy(|c| delimiters.contains(&c)),
        take_till(|c| delimiters.contains(&c) || is_any_line_break(c)),
    )(input)?;
    Ok((input, cells.into_iter().map(str::trim).collect()))
}

pub fn skip_any_whitespace(
    input: &str,
) -> std::result::Result<&str, nom::Err<nom::error::Error<&str>>> {
    many0(satisfy(is_any_whitespace))
        .parse(input)
        .map(|(input, _)| input)
}

pub fn is_any_whitespace(c: char) -> bool {
    is_whitespace(c) || is_any_line_break(c)
}

pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_any_line_break(c)
}

pub fn is_any_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub fn translate_nom_error(error: nom::Err<nom::error::Error<&str>>) -> Error {
    match error {
        nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
        nom::Err::Error(error) | nom::Err::Failure(error) => Error::Parser {
            input: error.input.to_string(),
            kind: error.code,
        },
    }
}
