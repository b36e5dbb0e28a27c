mod common;
use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use templecode::mach::{Config, Runtime, Status, TurtleEvent};

#[test]
fn test_output_callback_sees_every_line() {
    let lines = Rc::new(RefCell::new(vec![]));
    let seen = lines.clone();
    let mut r = runtime();
    r.on_output(move |line| seen.borrow_mut().push(line.to_string()));
    let result = r.execute("PRINT 1\nT:two\nPRINT 1 / 0");
    assert_eq!(*lines.borrow(), result.output);
    assert_eq!(lines.borrow().len(), 3);
}

#[test]
fn test_turtle_callback() {
    let count = Rc::new(RefCell::new(0));
    let seen = count.clone();
    let mut r = runtime();
    r.on_turtle_event(move |event| {
        if let TurtleEvent::Line { .. } = event {
            *seen.borrow_mut() += 1;
        }
    });
    r.execute("FD 10\nRT 90\nFD 10");
    assert_eq!(*count.borrow(), 2);
}

#[test]
fn test_cancel_from_callback() {
    let mut r = runtime();
    let cancel = r.cancel_handle();
    r.on_output(move |line| {
        if line == "3" {
            cancel.store(true, Ordering::SeqCst);
        }
    });
    let result = r.execute("I = 0\nDO\nI = I + 1\nPRINT I\nLOOP");
    assert_eq!(result.status, Status::Stopped);
    assert_eq!(result.output, vec!["1", "2", "3"]);
    assert!(result.errors.is_empty());
}

#[test]
fn test_execute_line_keeps_state() {
    let mut r = runtime();
    assert!(r.execute_line("X = 20").output.is_empty());
    assert_eq!(r.execute_line("PRINT X + 1").output, vec!["21"]);
    assert_eq!(r.execute_line("FD X").events.len(), 2);
    let result = r.execute_line("PRINT 1 / 0");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(r.execute_line("PRINT \"ok\"").output, vec!["ok"]);
}

#[test]
fn test_loop_depth_limit() {
    let mut r = Runtime::new(Config {
        max_loop_depth: 3,
        ..Config::default()
    });
    let source = "\
FOR A = 1 TO 2
FOR B = 1 TO 2
FOR C = 1 TO 2
FOR D = 1 TO 2
NEXT D
NEXT C
NEXT B
NEXT A";
    let result = r.execute(source);
    assert_eq!(result.status, Status::Errored);
    assert_eq!(r.errors().len(), 1);
}

#[test]
fn test_parse_errors_report_when_reached() {
    let result = runtime().execute("PRINT \"a\"\nPRINT (\nPRINT \"b\"");
    assert_eq!(result.output.len(), 3);
    assert!(result.output[1].starts_with('?'));
    assert_eq!(result.errors[0].line, 2);
    assert_eq!(result.output[2], "b");
}

#[test]
fn test_oversized_arrays_are_resource_errors() {
    let result = runtime().execute("DIM A(65535, 65535, 65535, 65535, 65535)\nPRINT \"next\"");
    assert_eq!(result.status, Status::Errored);
    assert!(result.output[0].starts_with("?"));
    assert_eq!(result.errors[0].line, 1);

    let result = runtime().execute("B(1, 1, 1, 1, 1, 1, 1, 1, 1, 1) = 1");
    assert_eq!(result.status, Status::Errored);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_heritage_tag_is_upper_case() {
    let result = runtime().execute("FORWARD");
    assert!(result.output[0].ends_with("[LOGO]") || result.output[0].contains("[LOGO];"));
}
