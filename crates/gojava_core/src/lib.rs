//! Provide the shared, pure vocabulary used by every stage of the Go → Java translator.
//!
//! This crate is intentionally small and dependency-free. It holds the deterministic tables that both the parsers
//! and the code generator consult:
//! - Go keywords and punctuation (lexer/parser vocabulary),
//! - the Go primitive table with Java primitive and boxed counterparts,
//! - the standard-library cross-reference table,
//! - Java naming conventions (identifier escaping, camelCase, UPPER_SNAKE).
//!
//! ## Notes
//!
//! - This is a “vocabulary core” crate: **no IO**, no global mutable state, and no model/AST types.

pub mod lang;
