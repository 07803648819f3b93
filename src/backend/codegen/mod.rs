//! Java code generation from the Source Model.
//!
//! A unit becomes one Java file: an outer class named after the Go package, holding constants and variables as
//! static fields, package functions as static methods, and every type as a nested class or interface. Method bodies
//! are stubs returning a default value for their type.
//!
//! ## Module Organization
//!
//! - `declarations` - structs, interfaces, named types, variables, external types, skip markers
//! - `functions` - functions and methods, stub bodies, result wrappers
//! - `helpers` - naming, literal conversion, comments
//!
//! ## Notes
//! - Nothing in a unit aborts generation: failed declarations become `// gojava: skipped` markers and unmapped
//!   types are flagged inline. Only a unit with no declarations at all is an error ([`GenerateError`]).

mod declarations;
mod functions;
mod helpers;

use std::collections::BTreeSet;

use super::java_emitter::JavaEmitter;
use super::options::GeneratorOptions;
use crate::mapping::{JavaType, TypeMapper};
use crate::model::{Enrichment, Function, SourceUnit, TypeRef};

use functions::{Placement, ResultWrapper};

/// The unit could not produce any Java.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum GenerateError {
    #[error("no translatable Go declarations found")]
    #[diagnostic(
        code(gojava::no_declarations),
        help("the input needs at least one `type`, `func`, `var` or `const` declaration")
    )]
    NoDeclarations {
        /// Marked stub text to present in place of generated code.
        stub: String,
        /// Number of declarations that failed to parse.
        failures: usize,
    },
}

/// Generate a Java file for `unit`.
///
/// `enrichment` holds declarations the resolver found in other files; they are rendered when
/// [`GeneratorOptions::emit_external_types`] is set and always make their names known to the type mapper.
///
/// ## Errors
/// - [`GenerateError::NoDeclarations`] if the unit has no declarations (see [`SourceUnit::is_empty`]).
#[tracing::instrument(skip_all, fields(package = %unit.package, external = enrichment.map_or(0, Enrichment::len)))]
pub fn generate_unit(
    unit: &SourceUnit,
    enrichment: Option<&Enrichment>,
    options: &GeneratorOptions,
) -> Result<String, GenerateError> {
    if unit.is_empty() {
        tracing::warn!(failures = unit.failures.len(), "generator: nothing to translate");
        return Err(GenerateError::NoDeclarations {
            stub: helpers::error_stub(unit),
            failures: unit.failures.len(),
        });
    }
    let codegen = JavaCodegen::new(unit, enrichment, *options, TypeMapper::for_unit(unit, enrichment));
    Ok(codegen.generate())
}

/// Render a single function or method as a standalone Java snippet (plus its result wrapper, if any).
///
/// Methods render as instance methods of their receiver type; no surrounding class or imports are produced.
pub fn generate_function(function: &Function, options: &GeneratorOptions) -> String {
    let unit = SourceUnit::default();
    let mut codegen = JavaCodegen::new(&unit, None, *options, TypeMapper::new());
    match function.receiver_type_name() {
        Some(owner) if function.is_method => codegen.emit_function(function, Placement::Instance { owner }),
        _ => codegen.emit_function(function, Placement::Free),
    }
    for wrapper in std::mem::take(&mut codegen.wrappers) {
        codegen.emit_wrapper(&wrapper);
    }
    codegen.emitter.finish()
}

/// Java code generator for one unit
pub struct JavaCodegen<'a> {
    unit: &'a SourceUnit,
    enrichment: Option<&'a Enrichment>,
    options: GeneratorOptions,
    mapper: TypeMapper,
    emitter: JavaEmitter,
    imports: BTreeSet<&'static str>,
    wrappers: Vec<ResultWrapper>,
    /// Learning notes already emitted; each appears once per file.
    noted: BTreeSet<String>,
}

impl<'a> JavaCodegen<'a> {
    fn new(
        unit: &'a SourceUnit,
        enrichment: Option<&'a Enrichment>,
        options: GeneratorOptions,
        mapper: TypeMapper,
    ) -> Self {
        Self {
            unit,
            enrichment,
            options,
            mapper,
            emitter: JavaEmitter::new(),
            imports: BTreeSet::new(),
            wrappers: Vec::new(),
            noted: BTreeSet::new(),
        }
    }

    fn generate(mut self) -> String {
        let unit = self.unit;
        let class_name = helpers::outer_class_name(unit);
        self.emitter.indent();

        self.emit_values();
        for typedef in &unit.typedefs {
            self.emit_typedef(typedef);
        }
        for interface in &unit.interfaces {
            self.emit_interface(interface, None);
        }
        for s in &unit.structs {
            self.emit_struct(s, None);
        }
        let declared = unit.declared_type_names();
        for function in &unit.functions {
            self.emitter.blank_line();
            match function.receiver_type_name() {
                Some(owner) if function.is_method && !declared.contains(owner) => {
                    self.emit_function(function, Placement::Detached { owner })
                }
                _ => self.emit_function(function, Placement::Free),
            }
        }
        self.emit_externals();
        // Wrapper classes are appended as they are discovered; emitting one never adds another.
        for wrapper in std::mem::take(&mut self.wrappers) {
            self.emit_wrapper(&wrapper);
        }
        self.emit_skip_markers();

        let body = self.emitter.finish();
        let mut out = JavaEmitter::new();
        let origin = if unit.package.is_empty() {
            "Go source".to_string()
        } else {
            format!("Go package `{}`", unit.package)
        };
        out.comment(&format!("Translated from {origin} by gojava. Method bodies are stubs."));
        if !self.imports.is_empty() {
            out.line("");
            for import in &self.imports {
                out.import(import);
            }
        }
        out.line("");
        out.block(&format!("public class {class_name}"), |out| out.writef(format_args!("{body}")));
        out.finish()
    }

    // ========================================================================
    // Mapping helpers
    // ========================================================================

    /// Map a type with the caller-level boxing option, recording its imports.
    fn map(&mut self, ty: &TypeRef) -> JavaType {
        self.map_with(ty, self.options.box_scalars)
    }

    fn map_with(&mut self, ty: &TypeRef, needs_boxing: bool) -> JavaType {
        let mapped = self.mapper.map_type(ty, needs_boxing);
        self.imports.extend(mapped.imports.iter().copied());
        mapped
    }

    /// Emit a learning note unless disabled or already emitted in this file.
    fn note(&mut self, text: &str) {
        if self.options.emit_learning_notes && self.noted.insert(text.to_string()) {
            self.emitter.learning_note(text);
        }
    }
}
