/*!
## Rust Machine Module

This Rust module executes TempleCode. A loaded `Program` is walked one
instruction at a time by the `Runtime`, which dispatches each command to
the BASIC, PILOT or Logo executor and collects output lines, turtle events
and the error history.

*/

mod basic;
mod config;
mod eval;
mod files;
mod function;
mod logo;
mod operation;
mod pilot;
mod program;
mod report;
mod runtime;
mod stack;
mod turtle;
mod val;
mod var;

pub use config::Config;
pub use files::Files;
pub use function::Function;
pub use operation::Operation;
pub use program::{ProcKind, Procedure, Program};
pub use report::{ErrorRecord, ExecutionResult, Status};
pub use runtime::{InputProvider, Runtime};
pub use stack::Stack;
pub use turtle::{palette, Turtle, TurtleEvent};
pub use val::{Dict, Val};
pub use var::Var;

#[cfg(test)]
mod tests;
