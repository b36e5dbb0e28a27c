//! # TempleCode
//!
//! Line-numbered BASIC, PILOT colon commands and Logo turtle graphics in one
//! language. The three share variables, labels and a single turtle.
//!
//! ```
//! use templecode::mach::Runtime;
//!
//! let mut runtime = Runtime::default();
//! let result = runtime.execute("10 PRINT \"Hello\"\nT:World\nFORWARD 10");
//! assert_eq!(result.output, vec!["Hello", "World"]);
//! ```
//!
//! Hosts supply input through [`mach::InputProvider`] and receive output
//! lines and [`mach::TurtleEvent`]s through callbacks or the returned
//! [`mach::ExecutionResult`].

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/appendix_a.rs"]
#[allow(non_snake_case)]
pub mod ___Appendix_A;

pub mod lang;
pub mod mach;
pub mod term;
