mod common;
use common::*;
use std::cell::RefCell;
use std::rc::Rc;
use templecode::mach::{Status, Val};

#[test]
fn test_input_numbers_and_strings() {
    let source = "INPUT \"Name\"; N$\nINPUT A\nPRINT N$; A + 1";
    assert_eq!(exec_with_input(source, &["Ada", "41"]), "Ada42\n");
}

#[test]
fn test_input_several_variables() {
    assert_eq!(exec_with_input("INPUT A, B$\nPRINT B$; A", &["3, x"]), "x3\n");
}

#[test]
fn test_input_with_empty_queue() {
    let mut r = runtime();
    let result = r.execute("INPUT A$\nPRINT \"[\"; A$; \"]\"");
    assert_eq!(result.output, vec!["[]"]);
    assert_eq!(r.variable("A$"), Some(Val::from("")));
}

#[test]
fn test_provider_sees_prompts() {
    let prompts = Rc::new(RefCell::new(vec![]));
    let seen = prompts.clone();
    let mut r = runtime();
    r.set_input_provider(Box::new(move |prompt: &str| {
        seen.borrow_mut().push(prompt.to_string());
        Some("7".to_string())
    }));
    let result = r.execute("INPUT \"How many\"; N\nA:\nPRINT N * ANSWER");
    assert_eq!(result.output, vec!["49"]);
    assert_eq!(*prompts.borrow(), vec!["How many".to_string(), String::new()]);
}

#[test]
fn test_provider_cancel_stops_the_run() {
    let mut r = runtime();
    r.set_input_provider(Box::new(|_: &str| -> Option<String> { None }));
    let result = r.execute("PRINT \"before\"\nINPUT X\nPRINT \"after\"");
    assert_eq!(result.status, Status::Stopped);
    assert_eq!(result.output, vec!["before"]);
}

#[test]
fn test_partial_line_is_flushed_before_input() {
    let result = {
        let mut r = runtime();
        r.push_input("5");
        r.execute("PRINT \"Value: \";\nINPUT V\nPRINT V")
    };
    assert_eq!(result.output, vec!["Value: ", "5"]);
}
