//! Parser for Go declarations
//!
//! Converts a token stream into a [`SourceFile`]: package clause, imports, and every top-level declaration with its
//! full type structure. Function bodies and initializer expressions are not parsed; they are brace-matched (or
//! delimited at depth 0) and kept as spans.
//!
//! ## Examples
//!
//! ```rust
//! use gojava_syntax::{lexer, parser};
//!
//! let source = "package demo\n\ntype Person struct {\n\tname string\n}\n";
//! let lexed = lexer::lex(source);
//! let file = parser::parse(&lexed.tokens).unwrap();
//! assert_eq!(file.package.unwrap().node, "demo");
//! assert_eq!(file.declarations.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Comment, Token, TokenKind};
use gojava_core::lang::keywords::KeywordId;
use gojava_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
