use super::TurtleEvent;
use crate::lang::{Category, Error, Heritage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Stopped,
    Errored,
    /// Halted at a breakpoint; `resume` continues.
    Paused { line: usize },
}

/// One entry of the error history.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub line: usize,
    pub message: String,
    pub category: Category,
    pub heritage: Option<Heritage>,
}

impl From<&Error> for ErrorRecord {
    fn from(error: &Error) -> ErrorRecord {
        ErrorRecord {
            line: error.line_number().unwrap_or(0),
            message: error.to_string(),
            category: error.category(),
            heritage: error.heritage(),
        }
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub output: Vec<String>,
    pub events: Vec<TurtleEvent>,
    pub errors: Vec<ErrorRecord>,
    pub status: Status,
}

impl ExecutionResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.status == Status::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error;

    #[test]
    fn test_record_from_error() {
        let e = error!(DivisionByZero, 4).in_heritage(Heritage::Basic);
        let r = ErrorRecord::from(&e);
        assert_eq!(r.line, 4);
        assert_eq!(r.category, Category::Runtime);
        assert_eq!(r.heritage, Some(Heritage::Basic));
        assert_eq!(r.to_string(), "RuntimeError: DIVISION BY ZERO IN 4 [BASIC]");
    }
}
