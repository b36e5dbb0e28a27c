mod common;
use common::*;

#[test]
fn test_quiz() {
    let source = "\
*start
T:Capital of France?
A:CITY$
M:Paris
TY:Right, $CITY.
JY:*done
T:No, try again.
J:*start
*done
E:";
    assert_eq!(
        exec_with_input(source, &["Lyon", "Paris"]),
        "Capital of France?\nNo, try again.\nCapital of France?\nRight, Paris.\n"
    );
}

#[test]
fn test_use_returns_after_end() {
    let source = "\
U:*hello
T:after
E:
*hello
T:inside
E:";
    assert_eq!(exec(source), "inside\nafter\n");
}

#[test]
fn test_compute_and_interpolate() {
    assert_eq!(exec("C:N = 4 * 5\nT:N is *N* and $N"), "N is 20 and 20\n");
}

#[test]
fn test_matched_and_status() {
    let source = "A:\nM:cat,dog\nT:$MATCHED *STATUS*";
    assert_eq!(exec_with_input(source, &["dog"]), "dog 1\n");
    assert_eq!(exec_with_input(source, &["hotdog"]), "$MATCHED 0\n");
}

#[test]
fn test_y_and_n_gates() {
    let source = "A:\nM:a\nY:T:yes\nN:T:no";
    assert_eq!(exec_with_input(source, &["b"]), "no\n");
}

#[test]
fn test_undefined_label_continues() {
    let out = exec("J:*nowhere\nT:here");
    assert!(out.starts_with("?UNDEFINED LABEL"));
    assert!(out.ends_with("here\n"));
}

#[test]
fn test_remark_and_graphics() {
    let mut r = runtime();
    let result = r.execute("R:drawing\nG:FORWARD 15");
    assert!(result.output.is_empty());
    assert!((r.turtle().y - 15.0).abs() < 1e-9);
}

#[test]
fn test_string_commands() {
    assert_eq!(exec("W$ = \"hello\"\nS:REVERSE W$\nT:$W$"), "olleh\n");
}
