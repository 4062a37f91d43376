use std::path::PathBuf;

use ndarray::array;

use crate::{error::Error, symbol::Symbol};

use super::{Alphabet, AlphabetSource, GapPenalties};

fn simple_alphabet() -> Alphabet {
    Alphabet::load(
        &AlphabetSource::Text("*;A;B\nA;1;0\nB;0;1".to_string()),
        GapPenalties {
            start: 12,
            extend: 1,
        },
    )
    .unwrap()
}

#[test]
fn distinct_characters_have_distinct_indices() {
    let alphabet = simple_alphabet();
    assert_ne!(alphabet.index_of('A').unwrap(), alphabet.index_of('B').unwrap());
    assert_eq!(alphabet.index_of('A').unwrap(), alphabet.index_of('A').unwrap());
    assert_eq!(alphabet.index_of('*').unwrap(), Symbol::GAP);
    assert_eq!(alphabet.gap_character(), '*');
    assert_eq!(alphabet.size(), 3);
}

#[test]
fn unknown_characters_are_rejected() {
    let alphabet = simple_alphabet();
    for character in "abcdefghijklmnopqrstuvwxyzCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".chars() {
        assert!(matches!(
            alphabet.index_of(character),
            Err(Error::UnknownCharacter(c)) if c == character
        ));
    }
}

#[test]
fn negative_scores() {
    let alphabet = Alphabet::load(
        &AlphabetSource::Text("*;A;B\nA;1;-1\nB;-1;1".to_string()),
        GapPenalties::default(),
    )
    .unwrap();
    let a = alphabet.index_of('A').unwrap();
    let b = alphabet.index_of('B').unwrap();
    assert_eq!(alphabet.score(a, b).unwrap(), -1);
    assert_eq!(alphabet.scoring_matrix()[[a.code(), b.code()]], -1);
}

#[test]
fn gap_row_and_column_score_the_extend_penalty() {
    let alphabet = Alphabet::from_parts(
        "",
        '.',
        &['A', 'B'],
        &array![[5, 1], [2, 5]],
        GapPenalties {
            start: 6,
            extend: 2,
        },
    )
    .unwrap();

    assert_eq!(
        alphabet.scoring_matrix(),
        &array![[-2, -2, -2], [-2, 5, 1], [-2, 2, 5]]
    );
    assert!(!alphabet.is_symmetric());
    assert_eq!(alphabet.gap_start_penalty(), 6);
    assert_eq!(alphabet.gap_extend_penalty(), 2);
}

#[test]
fn out_of_range_symbols_are_reported() {
    let alphabet = simple_alphabet();
    let a = alphabet.index_of('A').unwrap();
    assert!(matches!(
        alphabet.score(a, Symbol::new(7)),
        Err(Error::SymbolOutOfRange { code: 7, size: 3 })
    ));
    assert!(matches!(
        alphabet.score(Symbol::new(3), a),
        Err(Error::SymbolOutOfRange { code: 3, size: 3 })
    ));
    assert!(matches!(
        alphabet.character(Symbol::new(3)),
        Err(Error::SymbolOutOfRange { code: 3, size: 3 })
    ));
}

#[test]
fn negative_gap_penalties_are_rejected() {
    assert!(matches!(
        Alphabet::load(
            &AlphabetSource::Text("*;A\nA;1".to_string()),
            GapPenalties {
                start: -1,
                extend: 1,
            },
        ),
        Err(Error::NegativeGapPenalty {
            start: -1,
            extend: 1
        })
    ));
}

#[test]
fn mismatching_scores_shape_is_rejected() {
    assert!(matches!(
        Alphabet::from_parts(
            "",
            '*',
            &['A', 'B'],
            &array![[1, 0, 0], [0, 1, 0]],
            GapPenalties::default(),
        ),
        Err(Error::ScoringMatrixShape {
            rows: 2,
            columns: 3,
            size: 2
        })
    ));
}

#[test]
fn builtin_blosum62() {
    let alphabet = Alphabet::blosum62(GapPenalties {
        start: 6,
        extend: 2,
    })
    .unwrap();
    assert_eq!(alphabet.name(), "BLOSUM62");
    assert_eq!(alphabet.size(), 24);
    assert_eq!(alphabet.gap_character(), '.');
    assert!(alphabet.is_symmetric());

    let score = |left, right| {
        alphabet
            .score(
                alphabet.index_of(left).unwrap(),
                alphabet.index_of(right).unwrap(),
            )
            .unwrap()
    };
    assert_eq!(score('W', 'W'), 11);
    assert_eq!(score('A', 'R'), -1);
    assert_eq!(score('F', 'W'), 1);
    assert_eq!(score('.', 'A'), -2);
}

#[test]
fn load_from_path() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "src", "alphabet", "blosum62.csv"]
        .iter()
        .collect();
    let from_path = Alphabet::load(&AlphabetSource::Path(path), GapPenalties::default()).unwrap();
    let builtin = Alphabet::blosum62(GapPenalties::default()).unwrap();
    assert_eq!(from_path, builtin);

    assert!(matches!(
        Alphabet::load(
            &AlphabetSource::Path("does/not/exist.csv".into()),
            GapPenalties::default()
        ),
        Err(Error::Io(_))
    ));
}

#[test]
fn display_lists_characters_and_matrix() {
    let alphabet = simple_alphabet();
    assert_eq!(
        alphabet.to_string(),
        "Alphabet\nAB\nWith gap *\n  -1  -1  -1\n  -1   1   0\n  -1   0   1\n"
    );
}
