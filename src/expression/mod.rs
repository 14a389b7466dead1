//! Parser for the expressions embedded in `{{ }}` tokens

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse_expression;
