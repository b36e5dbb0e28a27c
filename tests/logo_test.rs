mod common;
use common::*;
use templecode::lang::ast::Edge;
use templecode::mach::TurtleEvent;

fn lines(events: &[TurtleEvent]) -> Vec<((f64, f64), (f64, f64))> {
    events
        .iter()
        .filter_map(|e| match e {
            TurtleEvent::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_heading_zero_is_up_and_clockwise() {
    let mut r = runtime();
    r.execute("FORWARD 10\nRIGHT 90\nFORWARD 10");
    assert!((r.turtle().x - 10.0).abs() < 1e-9);
    assert!((r.turtle().y - 10.0).abs() < 1e-9);
}

#[test]
fn test_fence_clamps_at_the_edge() {
    let mut r = runtime();
    r.execute("FENCE\nFORWARD 1000");
    assert_eq!(r.turtle().edge, Edge::Fence);
    assert!((r.turtle().y - 200.0).abs() < 1e-9);
}

#[test]
fn test_wrap_comes_back_around() {
    let mut r = runtime();
    r.execute("WRAP\nFORWARD 250");
    assert!((r.turtle().y + 150.0).abs() < 1e-9);
}

#[test]
fn test_window_allows_off_canvas() {
    let mut r = runtime();
    r.execute("FORWARD 1000");
    assert!((r.turtle().y - 1000.0).abs() < 1e-9);
}

#[test]
fn test_procedure_with_two_parameters() {
    let mut r = runtime();
    let result = r.execute("TO SIDE :n :len\nREPEAT :n [FD :len RT 360 / :n]\nEND\nSIDE 3, 20");
    assert!(result.is_ok(), "{:?}", result.errors);
    assert_eq!(lines(&result.events).len(), 3);
}

#[test]
fn test_unknown_procedure_arity() {
    let result = runtime().execute("TO ONE :a\nFD :a\nEND\nONE 1, 2");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("WRONG NUMBER OF ARGUMENTS"));
}

#[test]
fn test_pen_up_moves_without_lines() {
    let result = runtime().execute("PU\nFD 10\nPD\nBK 10");
    let drawn = lines(&result.events);
    assert_eq!(drawn.len(), 1);
}

#[test]
fn test_shapes_and_events() {
    let result = runtime().execute("CIRCLE 10\nARC 90, 20\nDOT 4\nRECT 10, 5\nLABEL \"hi\"\nCS");
    let kinds: Vec<&str> = result
        .events
        .iter()
        .filter_map(|e| match e {
            TurtleEvent::Circle { .. } => Some("circle"),
            TurtleEvent::Arc { .. } => Some("arc"),
            TurtleEvent::Dot { .. } => Some("dot"),
            TurtleEvent::Rect { .. } => Some("rect"),
            TurtleEvent::Label { .. } => Some("label"),
            TurtleEvent::Clear => Some("clear"),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec!["circle", "arc", "dot", "rect", "label", "clear"]);
}

#[test]
fn test_repcount_nests() {
    assert_eq!(
        exec("REPEAT 2 [REPEAT 2 [PRINT REPCOUNT] PRINT REPCOUNT]"),
        "1\n2\n1\n1\n2\n2\n"
    );
}

#[test]
fn test_towards() {
    let mut r = runtime();
    r.execute("TOWARDS 10, 0");
    assert!((r.turtle().heading - 90.0).abs() < 1e-9);
}
