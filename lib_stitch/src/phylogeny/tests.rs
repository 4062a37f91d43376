use ndarray::array;

use crate::{
    alphabet::{Alphabet, AlphabetSource, GapPenalties},
    error::Error,
    symbol::{Symbol, string_to_sequence},
    tree::Tree,
};

use super::{
    Outgroup, build_phylogenetic_tree, build_tree, distance_matrix, neighbor_joining,
    sequence_distance,
};

fn alphabet() -> Alphabet {
    Alphabet::blosum62(GapPenalties {
        start: 6,
        extend: 2,
    })
    .unwrap()
}

fn sequences(alphabet: &Alphabet, sequences: &[(&str, &str)]) -> Vec<(String, Vec<Symbol>)> {
    sequences
        .iter()
        .map(|(name, sequence)| {
            (
                name.to_string(),
                string_to_sequence(alphabet, sequence).unwrap(),
            )
        })
        .collect()
}

fn trio(alphabet: &Alphabet) -> Vec<(String, Vec<Symbol>)> {
    sequences(
        alphabet,
        &[("A", "VKAFEALQ"), ("B", "VKAWWALQ"), ("C", "VKAWVALQ")],
    )
}

fn lengths<Value>(tree: &Tree<Value>) -> Vec<f64> {
    tree.fold(Vec::new(), |mut lengths, subtree| {
        if let Some([(left, _), (right, _)]) = subtree.children() {
            lengths.push(left);
            lengths.push(right);
        }
        lengths
    })
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn distances() {
    let alphabet = alphabet();
    let trio = trio(&alphabet);

    assert_eq!(sequence_distance(&trio[0].1, &trio[1].1, &alphabet).unwrap(), 2.0);
    assert_eq!(
        distance_matrix(&trio, &alphabet).unwrap(),
        array![[0.0, 2.0, 2.0], [2.0, 0.0, 1.0], [2.0, 1.0, 0.0]]
    );

    let identity = Alphabet::load(
        &AlphabetSource::Text(
            "*;A;B;C;D\nA;1;0;0;0\nB;0;1;0;0\nC;0;0;1;0\nD;0;0;0;1".to_string(),
        ),
        GapPenalties {
            start: 2,
            extend: 1,
        },
    )
    .unwrap();
    let template = string_to_sequence(&identity, "CAAAACCCABBC").unwrap();
    let query = string_to_sequence(&identity, "CAAAACDCCABBC").unwrap();
    assert_eq!(sequence_distance(&template, &query, &identity).unwrap(), 12.0);
}

#[test]
fn unrooted_tree() {
    let alphabet = alphabet();
    let tree = build_phylogenetic_tree(&trio(&alphabet), &alphabet, false).unwrap();

    assert_eq!(tree.brackets_notation(), "((A, B), C)");
    assert_eq!(lengths(&tree), vec![0.25, 0.25, 1.5, 0.5]);
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.branch_count(), 2);
}

#[test]
fn outgroup_rooted_tree() {
    let alphabet = alphabet();
    let tree = build_phylogenetic_tree(&trio(&alphabet), &alphabet, true).unwrap();

    assert_eq!(tree.brackets_notation(), "((C, B), A)");
    assert_eq!(lengths(&tree), vec![0.75, 0.75, 0.5, 0.5]);
    assert_eq!(tree.leaf_count(), 3);

    let explicit = build_tree(&trio(&alphabet), &alphabet, Outgroup::Leaf(0)).unwrap();
    assert_eq!(explicit, tree);

    let at_c = build_tree(&trio(&alphabet), &alphabet, Outgroup::Leaf(2)).unwrap();
    assert_eq!(at_c.brackets_notation(), "((A, B), C)");
}

#[test]
fn degenerate_inputs() {
    let alphabet = alphabet();

    assert!(matches!(
        build_phylogenetic_tree(&[], &alphabet, false),
        Err(Error::NoSequences)
    ));

    let single = sequences(&alphabet, &[("only", "VKAFEALQ")]);
    for outgroup in [false, true] {
        let tree = build_phylogenetic_tree(&single, &alphabet, outgroup).unwrap();
        assert_eq!(tree.brackets_notation(), "only");
        assert_eq!(tree.branch_count(), 0);
    }

    let pair = sequences(&alphabet, &[("A", "VKAFEALQ"), ("B", "VKAWWALQ")]);
    let tree = build_phylogenetic_tree(&pair, &alphabet, false).unwrap();
    assert_eq!(tree.brackets_notation(), "(A, B)");
    assert_eq!(lengths(&tree), vec![1.0, 1.0]);

    assert!(matches!(
        build_tree(&pair, &alphabet, Outgroup::Leaf(2)),
        Err(Error::OutgroupOutOfRange {
            index: 2,
            leaves: 2
        })
    ));
}

#[test]
fn neighbor_joining_checks_the_shape() {
    assert!(matches!(
        neighbor_joining(&array![[0.0, 1.0], [1.0, 0.0]], &names(&["A"])),
        Err(Error::DistanceMatrixShape {
            rows: 2,
            columns: 2,
            names: 1
        })
    ));
    assert!(matches!(
        neighbor_joining(&ndarray::Array2::zeros((0, 0)), &[]),
        Err(Error::NoSequences)
    ));
}

fn assert_lengths(tree: &Tree<String>, expected: &[f64]) {
    let actual = lengths(tree);
    assert_eq!(actual.len(), expected.len());
    for (actual, expected) in actual.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }
}

#[test]
fn neighbor_joining_on_an_additive_matrix() {
    let distances = array![
        [0.0, 5.0, 8.0, 5.0],
        [5.0, 0.0, 9.0, 6.0],
        [8.0, 9.0, 0.0, 5.0],
        [5.0, 6.0, 5.0, 0.0],
    ];
    let tree = neighbor_joining(&distances, &names(&["A", "B", "C", "D"])).unwrap();

    assert_eq!(tree.brackets_notation(), "(((A, B), C), D)");
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.branch_count(), 3);
    assert_lengths(&tree, &[0.5, 0.5, 2.0, 4.0, 2.0, 3.0]);
}

#[test]
fn branch_lengths_are_never_negative() {
    let distances = array![
        [0.0, 1.0, 9.0, 9.0, 1.0],
        [1.0, 0.0, 1.0, 9.0, 9.0],
        [9.0, 1.0, 0.0, 1.0, 9.0],
        [9.0, 9.0, 1.0, 0.0, 1.0],
        [1.0, 9.0, 9.0, 1.0, 0.0],
    ];
    let tree = neighbor_joining(&distances, &names(&["A", "B", "C", "D", "E"])).unwrap();

    assert_eq!(tree.brackets_notation(), "((((A, B), C), D), E)");
    assert_eq!(tree.leaf_count(), 5);
    assert_eq!(tree.branch_count(), 4);
    // Joining yields -0.5 for the edge into D.
    assert_lengths(&tree, &[1.25, 0.75, 3.5, 0.0, 3.0, 1.5, 0.5, 0.5]);
    assert!(lengths(&tree).iter().all(|&length| length >= 0.0));
}
