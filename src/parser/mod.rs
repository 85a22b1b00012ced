//! Recursive-descent parser for OData query URLs
//!
//! ## Architecture
//!
//! ```text
//! Request text
//!     ↓
//! URL scanner → service root, path segments, `name=value` options
//!     ↓
//! Lexer (logos) → option value / key predicate tokens with SyntaxKind
//!     ↓
//! Value parser → typed AST with Span on every node
//! ```
//!
//! Parsing is all-or-nothing: the first malformed or unsupported construct
//! yields a [`SyntaxError`] and no tree.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod cache;
mod error;
pub mod functions;
pub mod keywords;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use cache::ParseCache;
pub use error::SyntaxError;
pub use functions::{FunctionSignature, Parameter};
pub use keywords::SystemQueryOption;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{ParseOptions, ParseResult, parse, parse_with};
pub use syntax_kind::SyntaxKind;
