use super::*;
use crate::lang::Category;
use crate::mach::Status;

#[test]
fn test_goto_skips_lines() {
    assert_eq!(run("10 PRINT \"A\"\n20 GOTO 40\n30 PRINT \"B\"\n40 PRINT \"C\""), "A\nC\n");
}

#[test]
fn test_gosub_nesting() {
    let source = "\
10 GOSUB 100
20 PRINT \"end\"
30 END
100 PRINT \"one\"
110 GOSUB 200
120 RETURN
200 PRINT \"two\"
210 RETURN";
    assert_eq!(run(source), "one\ntwo\nend\n");
}

#[test]
fn test_runaway_gosub_is_a_resource_error() {
    let mut rt = Runtime::new(Config {
        max_call_depth: 50,
        ..config()
    });
    let r = rt.execute("10 GOSUB 10");
    assert_eq!(r.status, Status::Errored);
    assert_eq!(r.errors.len(), 1);
    assert_eq!(r.errors[0].category, Category::Resource);
}

#[test]
fn test_step_limit_stops_infinite_loop() {
    let mut rt = Runtime::new(Config {
        max_steps: 500,
        ..config()
    });
    let r = rt.execute("10 GOTO 10");
    assert_eq!(r.status, Status::Stopped);
    assert_eq!(r.errors.len(), 1);
}

#[test]
fn test_errors_do_not_stop_the_run() {
    let r = exec("PRINT 1 / 0\nPRINT \"after\"");
    assert_eq!(r.status, Status::Completed);
    assert_eq!(r.output, vec!["?DIVISION BY ZERO IN 1 [BASIC]", "after"]);
}

#[test]
fn test_return_without_gosub() {
    let r = exec("RETURN");
    assert_eq!(r.errors.len(), 1);
    assert!(r.errors[0].message.starts_with("RETURN WITHOUT GOSUB"));
}

#[test]
fn test_stop_and_end() {
    assert_eq!(exec("PRINT 1\nSTOP\nPRINT 2").status, Status::Stopped);
    let r = exec("PRINT 1\nEND\nPRINT 2");
    assert_eq!(r.status, Status::Completed);
    assert_eq!(r.output, vec!["1"]);
}

#[test]
fn test_breakpoint_pauses_and_resumes() {
    let mut rt = Runtime::new(config());
    rt.set_debug_mode(true);
    rt.set_breakpoints(vec![2]);
    rt.load("PRINT \"a\"\nPRINT \"b\"");
    let r = rt.run();
    assert_eq!(r.status, Status::Paused { line: 2 });
    assert_eq!(r.output, vec!["a"]);
    let r = rt.resume();
    assert_eq!(r.status, Status::Completed);
    assert_eq!(r.output, vec!["a", "b"]);
}
