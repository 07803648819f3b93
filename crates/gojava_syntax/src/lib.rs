//! Declaration-level syntax frontend for Go source: lexer, syntax tree, parser, diagnostics.
//!
//! This crate is dependency-light and reused by the translator's grammar-tree strategy, the workspace oracle, and
//! the fuzz target.
//!
//! ## Notes
//! - The parser is intentionally “declaration-only”: it builds a spanned tree for packages, imports, types,
//!   variables, constants and function signatures. Function bodies are brace-matched and skipped.
//! - Vocabulary identity (keywords/punctuation) comes from `gojava_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use gojava_syntax::{lexer, parser};
//!
//! let lexed = lexer::lex("package demo\n\nfunc add(a, b int) int { return a + b }\n");
//! let (file, errors) = parser::parse_with_comments(&lexed.tokens, &lexed.comments);
//! assert!(errors.is_empty());
//! assert_eq!(file.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
