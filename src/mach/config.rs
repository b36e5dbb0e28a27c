use std::time::Duration;

/// Limits and host preferences for one runtime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instructions executed before the run stops.
    pub max_steps: u64,
    pub max_duration: Option<Duration>,
    /// GOSUB, U:, procedure, SUB and FUNCTION frames.
    pub max_call_depth: usize,
    pub max_loop_depth: usize,
    /// FUNCTION calls nested inside expressions.
    pub max_function_depth: usize,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub seed: Option<u64>,
    /// Whether DELAY, SLEEP, P: and BEEP really wait.
    pub real_time: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_steps: 1_000_000,
            max_duration: None,
            max_call_depth: 2_000,
            max_loop_depth: 1_000,
            max_function_depth: 200,
            canvas_width: 600.0,
            canvas_height: 400.0,
            seed: None,
            real_time: false,
        }
    }
}
