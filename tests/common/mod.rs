#![allow(dead_code)]
use templecode::mach::{Config, ExecutionResult, Runtime};

pub fn runtime() -> Runtime {
    Runtime::new(Config {
        seed: Some(42),
        max_steps: 200_000,
        ..Config::default()
    })
}

/// Output lines, each followed by a newline.
pub fn exec(source: &str) -> String {
    join(&runtime().execute(source))
}

/// Runs with `input` queued for INPUT and `A:`.
pub fn exec_with_input(source: &str, input: &[&str]) -> String {
    let mut r = runtime();
    for line in input {
        r.push_input(*line);
    }
    join(&r.execute(source))
}

pub fn join(result: &ExecutionResult) -> String {
    let mut s = String::new();
    for line in result.output.iter() {
        s.push_str(line);
        s.push('\n');
    }
    s
}
