mod common;
use common::*;
use templecode::lang::Category;
use templecode::mach::{Status, TurtleEvent, Val};

#[test]
fn test_goto_skips_a_line() {
    assert_eq!(exec("10 PRINT \"A\"\n20 GOTO 40\n30 PRINT \"B\"\n40 PRINT \"C\""), "A\nC\n");
}

#[test]
fn test_for_body_runs_inclusive_count() {
    assert_eq!(exec("C = 0\nFOR I = 1 TO 5\nC = C + 1\nNEXT I\nPRINT C"), "5\n");
    assert_eq!(exec("C = 0\nFOR I = 10 TO 0 STEP -2\nC = C + 1\nNEXT I\nPRINT C"), "6\n");
}

#[test]
fn test_int_is_floor() {
    assert_eq!(exec("PRINT INT(-3.5); \" \"; INT(3.5); \" \"; FIX(-3.5)"), "-4 3 -3\n");
}

#[test]
fn test_division_by_zero_is_reported_and_run_continues() {
    let mut r = runtime();
    let result = r.execute("PRINT 1 / 0\nPRINT \"next\"");
    assert_eq!(result.status, Status::Completed);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 1);
    assert_eq!(result.errors[0].category, Category::Runtime);
    assert_eq!(result.output[1], "next");
}

#[test]
fn test_list_push_foreach() {
    let source = "\
LIST L = 1, 2
PUSH L, 3
T = 0
FOREACH V IN L
T = T + V
NEXT
PRINT T; \" \"; LEN(L)";
    assert_eq!(exec(source), "6 3\n");
}

#[test]
fn test_to_square_is_a_closed_path() {
    let mut r = runtime();
    let result = r.execute("TO SQ :s\nREPEAT 4 [FORWARD :s RIGHT 90]\nEND\nSQ 50");
    assert!(result.is_ok(), "{:?}", result.errors);
    let lines: Vec<_> = result
        .events
        .iter()
        .filter_map(|e| match e {
            TurtleEvent::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 4);
    let (start, _) = lines[0];
    let (_, end) = lines[3];
    assert!((start.0 - end.0).abs() < 1e-9 && (start.1 - end.1).abs() < 1e-9);
    assert!(r.turtle().heading.abs() < 1e-9);
}

#[test]
fn test_repeat_matches_step_by_step_moves() {
    let mut a = runtime();
    a.execute("REPEAT 7 [FORWARD 13 RIGHT 37]");
    let mut b = runtime();
    b.execute(&"FORWARD 13\nRIGHT 37\n".repeat(7));
    let (ta, tb) = (a.turtle(), b.turtle());
    assert!((ta.x - tb.x).abs() < 1e-9);
    assert!((ta.y - tb.y).abs() < 1e-9);
    assert!((ta.heading - tb.heading).abs() < 1e-9);
}

#[test]
fn test_pilot_match_branches() {
    let source = "\
A:
M:yes
TY:Great
TN:Too bad";
    assert_eq!(exec_with_input(source, &["yes"]), "Great\n");
    assert_eq!(exec_with_input(source, &["yes please"]), "Too bad\n");
    assert_eq!(exec_with_input(source, &["no"]), "Too bad\n");
}

#[test]
fn test_pilot_match_is_case_sensitive() {
    let source = "A:\nM:Yes\nTY:matched\nTN:missed";
    assert_eq!(exec_with_input(source, &["yes"]), "missed\n");
}

#[test]
fn test_runaway_recursion_is_a_resource_error() {
    let mut r = runtime();
    let result = r.execute("10 GOSUB 10");
    assert_eq!(result.status, Status::Errored);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].category, Category::Resource);
}

#[test]
fn test_turtle_pose_is_mirrored_into_variables() {
    let mut r = runtime();
    r.execute("SETXY 30, 40\nSETHEADING 45");
    assert_eq!(r.variable("TURTLE_X"), Some(Val::Float(30.0)));
    assert_eq!(r.variable("TURTLE_Y"), Some(Val::Float(40.0)));
    assert_eq!(r.variable("TURTLE_HEADING"), Some(Val::Float(45.0)));
}

#[test]
fn test_reset_between_runs() {
    let mut r = runtime();
    r.execute("X = 5\nFORWARD 10");
    let result = r.execute("PRINT X");
    assert_eq!(result.output, vec!["0"]);
    assert_eq!(r.turtle().y, 0.0);
}
