use cs_core::diff::{apply_diff, calc_diff, Diff, Operation};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn calc_then_apply_round_trips() {
    let cases: Vec<(Vec<String>, Vec<String>)> = vec![
        (lines(&[]), lines(&[])),
        (lines(&[]), lines(&["a"])),
        (lines(&["a"]), lines(&[])),
        (lines(&["a", "b"]), lines(&["a", "b"])),
        (lines(&["x", "y"]), lines(&["p"])),
        (lines(&["one", "two", "three"]), lines(&["three", "two", "one"])),
    ];
    for (base, new) in cases {
        let diff = calc_diff(&base, &new);
        let applied = apply_diff(&base, &diff).expect("apply");
        assert_eq!(applied, new, "base {:?} -> new {:?}", base, new);
    }
}

#[test]
fn equal_inputs_produce_the_empty_diff() {
    assert_eq!(calc_diff(&[], &[]), Diff::empty());
    let same = lines(&["a", "b"]);
    assert!(calc_diff(&same, &same).is_empty());
}

#[test]
fn empty_diff_is_identity() {
    let base = lines(&["a", "b", "c"]);
    let applied = apply_diff(&base, &Diff::empty()).expect("apply");
    assert_eq!(applied, base);
}

#[test]
fn insert_at_front_of_empty_base_yields_new() {
    let diff = Diff::new(vec![Operation::Insert {
        line: 0,
        content: lines(&["x", "y"]),
    }]);
    let applied = apply_diff(&[], &diff).expect("apply");
    assert_eq!(applied, lines(&["x", "y"]));
}

#[test]
fn delete_only_diff_empties_the_base() {
    let base = lines(&["a", "b"]);
    let diff = calc_diff(&base, &[]);
    assert_eq!(
        diff.operations(),
        &[Operation::Delete { line: 1 }, Operation::Delete { line: 2 }]
    );
    assert_eq!(apply_diff(&base, &diff).expect("apply"), Vec::<String>::new());
}

#[test]
fn insert_after_a_middle_line() {
    let base = lines(&["a", "b"]);
    let diff = Diff::new(vec![Operation::Insert {
        line: 1,
        content: lines(&["x"]),
    }]);
    assert_eq!(apply_diff(&base, &diff).expect("apply"), lines(&["a", "x", "b"]));
}

#[test]
fn insert_past_the_base_is_appended() {
    let base = lines(&["a"]);
    let diff = Diff::new(vec![Operation::Insert {
        line: 3,
        content: lines(&["z"]),
    }]);
    assert_eq!(apply_diff(&base, &diff).expect("apply"), lines(&["a", "z"]));
}

#[test]
fn delete_past_the_base_is_malformed() {
    let base = lines(&["a"]);
    let diff = Diff::new(vec![Operation::Delete { line: 3 }]);
    let err = apply_diff(&base, &diff).expect_err("must fail");
    assert_eq!(err.code, "CS_MALFORMED_DIFF");
}

#[test]
fn descending_indices_are_malformed() {
    let base = lines(&["a", "b", "c"]);
    let diff = Diff::new(vec![
        Operation::Delete { line: 3 },
        Operation::Delete { line: 1 },
    ]);
    let err = apply_diff(&base, &diff).expect_err("must fail");
    assert_eq!(err.code, "CS_MALFORMED_DIFF");
}

#[test]
fn delete_and_insert_at_the_same_index_replace_the_line() {
    let base = lines(&["a", "b"]);
    let diff = Diff::new(vec![
        Operation::Delete { line: 2 },
        Operation::Insert {
            line: 2,
            content: lines(&["B"]),
        },
    ]);
    assert_eq!(apply_diff(&base, &diff).expect("apply"), lines(&["a", "B"]));
}
