#![forbid(unsafe_code)]
//! gojava: a structural Go to Java translator
//!
//! gojava reads Go declarations (structs, interfaces, functions, methods, named types, variables and constants) and
//! produces a Java skeleton with the same shape: classes, interfaces, fields, accessors and method signatures with
//! stub bodies. Types referenced from other files can be pulled in through a semantic oracle.
//!
//! ## Pipeline
//!
//! 1. [`frontend`] parses text into a [`model::SourceUnit`] with either [`ParserStrategy`].
//! 2. [`resolve`] optionally walks the unit's type references and returns an [`model::Enrichment`].
//! 3. [`mapping`] maps each Go type to its Java counterpart.
//! 4. [`backend`] renders the Java file.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Recovered failures**: Unparsable declarations, oracle timeouts and unmapped types never panic and never abort
//!   a translation; they surface as skip markers, debug logs and inline comments in the output.
//!
//! - **True invariants**: If a panic represents a translator bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod frontend;
pub mod mapping;
pub mod model;
pub mod resolve;

pub use backend::{GenerateError, GeneratorOptions, generate_function, generate_unit};
pub use config::{Settings, SettingsError};
pub use frontend::{ParserStrategy, parse_declaration, parse_unit};
pub use mapping::{JavaType, TypeMapper};
pub use model::{Enrichment, SourceUnit};
pub use resolve::{DependencyResolver, DocumentSource, ResolutionCache, ResolverOptions, SemanticOracle};
