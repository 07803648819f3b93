//! gojava backend
//!
//! This module turns a Source Model (plus any resolved enrichment) into Java source text.
//!
//! The pipeline is:
//! 1. [`SourceUnit`](crate::model::SourceUnit) from the frontend → [`TypeMapper`](crate::mapping::TypeMapper) for
//!    every type reference
//! 2. `JavaCodegen` walks the declarations and writes through a [`JavaEmitter`]
//! 3. The outer class, imports and header comment are assembled last
//!
//! ## Module Organization
//!
//! - `codegen/` - Code generation from the Source Model to Java
//!   - `mod.rs` - Main `JavaCodegen` struct and entry points
//!   - `declarations.rs` - Struct, interface, named type, variable and constant emission
//!   - `functions.rs` - Function and method emission, result wrappers
//!   - `helpers.rs` - Naming and literal conversion
//! - `java_emitter.rs` - Low-level Java code string builder
//! - `options.rs` - Generator options

pub mod codegen;
pub mod java_emitter;
pub mod options;

pub use codegen::{GenerateError, generate_function, generate_unit};
pub use java_emitter::{JavaEmitter, LEARNING_NOTE_PREFIX};
pub use options::GeneratorOptions;
