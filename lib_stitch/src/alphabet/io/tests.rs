use ndarray::array;

use crate::{
    alphabet::{Alphabet, GapPenalties, MatrixFormat},
    error::Error,
};

fn parse(input: &str) -> crate::error::Result<Alphabet> {
    Alphabet::parse_plain(input, GapPenalties::default(), &MatrixFormat::default())
}

#[test]
fn simple_example() {
    let input = "# Simple Example\n*;A;B\nA;1;0\nB;-1;2\n";
    let expected_parsing_result = Alphabet::from_parts(
        "Simple Example",
        '*',
        &['A', 'B'],
        &array![[1, 0], [-1, 2]],
        GapPenalties::default(),
    )
    .unwrap();

    let actual_parsing_result = parse(input).unwrap();
    let mut writer = Vec::new();
    actual_parsing_result.write_plain(&mut writer, ';').unwrap();
    let output = String::from_utf8(writer).unwrap();

    assert_eq!(expected_parsing_result, actual_parsing_result);
    assert_eq!(input, output);
}

#[test]
fn mixed_delimiters_and_whitespace() {
    let alphabet = parse("\n  * , A ; B\n A ; 1 , 0\n\n B,0;1  \n").unwrap();
    assert_eq!(alphabet.characters(), &['*', 'A', 'B']);
    assert_eq!(alphabet.name(), "");
    assert_eq!(
        alphabet
            .score(alphabet.index_of('A').unwrap(), alphabet.index_of('A').unwrap())
            .unwrap(),
        1
    );
}

#[test]
fn custom_delimiter() {
    let format = MatrixFormat {
        delimiters: vec!['|'],
    };
    let alphabet =
        Alphabet::parse_plain("*|A|B\nA|1|-1\nB|-1|1", GapPenalties::default(), &format).unwrap();
    let a = alphabet.index_of('A').unwrap();
    let b = alphabet.index_of('B').unwrap();
    assert_eq!(alphabet.score(a, b).unwrap(), -1);

    assert!(matches!(
        parse("*|A|B\nA|1|-1\nB|-1|1"),
        Err(Error::InvalidHeaderCell(_))
    ));
}

#[test]
fn missing_row() {
    assert!(matches!(
        parse("*;A;B\nA;1;0"),
        Err(Error::WrongRowCount {
            expected: 2,
            actual: 1
        })
    ));
}

#[test]
fn extra_row() {
    assert!(matches!(
        parse("*;A;B\nA;1;0\nB;0;1\nC;0;0"),
        Err(Error::WrongRowCount {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn missing_column() {
    assert!(matches!(
        parse("*;A;B\nA;1;0;0\nB;0;1;0"),
        Err(Error::WrongColumnCount {
            row: 1,
            expected: 3,
            actual: 4
        })
    ));
    assert!(matches!(
        parse("*;A;B\nA;1\nB;0;1"),
        Err(Error::WrongColumnCount {
            row: 1,
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn wrong_separator() {
    assert!(matches!(
        parse("*;A;B\nA:1;0\nB;0;1"),
        Err(Error::WrongColumnCount { row: 1, .. })
    ));
    assert!(matches!(
        parse("*;A;B\nA;1;0\nB;0:1"),
        Err(Error::WrongColumnCount { row: 2, .. })
    ));
}

#[test]
fn invalid_scores() {
    match parse("*;A;B\nA;1;0\nB;o;1") {
        Err(Error::InvalidScore { row, column, value }) => {
            assert_eq!((row, column, value.as_str()), (2, 1, "o"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        parse("*;A;B\nA;1;0\nB;0;"),
        Err(Error::InvalidScore { row: 2, column: 2, .. })
    ));
    assert!(matches!(
        parse("*;A;B\nA;1;0\nB;;1"),
        Err(Error::InvalidScore { row: 2, column: 1, .. })
    ));
}

#[test]
fn invalid_header() {
    assert!(matches!(parse(""), Err(Error::EmptyScoringMatrix)));
    assert!(matches!(parse("# Only a title\n"), Err(Error::EmptyScoringMatrix)));
    assert!(matches!(
        parse(";A;B\nA;1;0\nB;0;1"),
        Err(Error::InvalidHeaderCell(cell)) if cell.is_empty()
    ));
    assert!(matches!(
        parse("*;A;BC\nA;1;0\nBC;0;1"),
        Err(Error::InvalidHeaderCell(cell)) if cell == "BC"
    ));
    assert!(matches!(
        parse("*;A;A\nA;1;0\nA;0;1"),
        Err(Error::DuplicateCharacter('A'))
    ));
    assert!(matches!(
        parse("*;A;*\nA;1;0\n*;0;1"),
        Err(Error::GapCharacterInHeader('*'))
    ));
    assert!(matches!(
        parse("*;A;B\nB;1;0\nA;0;1"),
        Err(Error::RowCharacterMismatch { row: 1, expected: 'A', .. })
    ));
}
