use crate::mach::{Config, ExecutionResult, Runtime};

mod flow_test;
mod mixed_test;

fn config() -> Config {
    Config {
        seed: Some(1),
        max_steps: 100_000,
        ..Config::default()
    }
}

fn exec(source: &str) -> ExecutionResult {
    Runtime::new(config()).execute(source)
}

/// Output joined the way a terminal shows it.
fn run(source: &str) -> String {
    let mut s = String::new();
    for line in exec(source).output {
        s.push_str(&line);
        s.push('\n');
    }
    s
}
