use anyhow::Result;
use util::{run_in_repo_root, run_with_output};

mod util;

#[test]
fn test_align_identity_alphabet() -> Result<()> {
    let output = run_with_output(
        "align-identity",
        "align -t test_files/identity_template.fa -r test_files/identity_reads.fa -a test_files/identity.csv --gap-start-penalty 2 --gap-extend-penalty 1 --visualise",
    )?;

    assert!(output.contains("read = \"insertion\""));
    assert!(output.contains("cigar = \"6M1I6M\""));
    assert!(output.contains("score = 10"));
    // Shares no character with the template.
    assert!(!output.contains("unrelated"));
    Ok(())
}

#[test]
fn test_align_with_config_file() -> Result<()> {
    let output = run_with_output(
        "align-config",
        "align -t test_files/identity_template.fa -r test_files/identity_reads.fa -c test_files/stitch.toml",
    )?;

    assert!(output.contains("cigar = \"6M1I6M\""));
    Ok(())
}

#[test]
fn test_align_default_blosum62() -> Result<()> {
    let output = run_with_output(
        "align-blosum",
        "align -t test_files/trio.fa -r test_files/trio_reads.fa",
    )?;

    assert!(output.contains("read = \"exact_a\""));
    assert!(output.contains("templates = [\"A\"]"));
    assert!(output.contains("templates = [\"B\", \"C\"]"));
    assert!(output.contains("cigar = \"8M\""));
    assert!(!output.contains("unknown_character"));
    Ok(())
}

#[test]
fn test_tree_unrooted() -> Result<()> {
    let output = run_with_output("tree-unrooted", "tree -t test_files/trio.fa")?;
    assert!(output.contains("brackets = \"((A, B), C)\""));
    assert!(!output.contains("statistics"));
    Ok(())
}

#[test]
fn test_tree_outgroups() -> Result<()> {
    let output = run_with_output(
        "tree-most-distant",
        "tree -t test_files/trio.fa --most-distant-outgroup --show-lengths",
    )?;
    assert!(output.contains("brackets = \"((C, B), A)\""));

    let output = run_with_output("tree-named", "tree -t test_files/trio.fa --outgroup C")?;
    assert!(output.contains("brackets = \"((A, B), C)\""));

    assert!(run_in_repo_root("tree -t test_files/trio.fa --outgroup D").is_err());
    Ok(())
}

#[test]
fn test_tree_with_reads() -> Result<()> {
    let output = run_with_output(
        "tree-reads",
        "tree -t test_files/trio.fa -r test_files/trio_reads.fa --most-distant-outgroup",
    )?;

    assert!(output.contains("brackets = \"((C, B), A)\""));
    // The exact copy of A counts uniquely for A, the prefix shared by B and C for their branch.
    assert!(output.contains("unique_matches = 8"));
    assert!(output.contains("unique_score = 37"));
    assert!(output.contains("score = 24"));
    Ok(())
}

#[test]
fn test_missing_input() {
    assert!(run_in_repo_root("align -t test_files/missing.fa -r test_files/trio_reads.fa").is_err());
}
