/*!
# Rust Language Module

This Rust module provides lexical analysis, line classification and parsing
for the three TempleCode heritages: BASIC statements, PILOT colon commands
and Logo turtle commands.

*/

pub type Column = std::ops::Range<usize>;

/// 1-based line of the source text.
pub type LineNumber = Option<usize>;

#[macro_use]
mod error;
mod classify;
mod ident;
mod lex;
mod line;
mod link;
mod logo;
mod parse;
mod pilot;
mod token;

pub use classify::{classify, is_logo_keyword, Heritage, Route, Vocabulary};
pub use error::Category;
pub use error::Error;
pub use error::ErrorCode;
pub use ident::Ident;
pub use lex::lex;
pub use line::{command, Line, Source};
pub use link::link;
pub use parse::{parse_expression, parse_statement};
pub use token::{Literal, Operator, Token, Word};

pub mod ast;
