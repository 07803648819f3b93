//! Function and method emission, stub bodies, and result wrappers.

use gojava_core::lang::conventions::{is_exported, to_pascal_case};
use gojava_core::lang::primitives::PrimitiveId;

use super::helpers::{accessor_suffix, doc_lines, member_name, param_name, type_name, visibility};
use super::JavaCodegen;
use crate::backend::java_emitter::JavaEmitter;
use crate::mapping::{JavaType, NoteSource};
use crate::model::{Function, TypeRef};

const ERROR_NOTE: &str =
    "A Go `error` result becomes `throws Exception`; returning a nil error corresponds to returning normally.";
const DROPPED_ERROR_NOTE: &str =
    "With errors kept out of the signature, the Go `error` result is dropped; Java reports failure by throwing.";
const STRINGER_NOTE: &str = "Go's `String() string` method plays the role of Java's `toString()`.";

/// Where a function is rendered.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Placement<'o> {
    /// A package-level function: a static method of the outer class.
    Free,
    /// A method inside the class generated for its receiver type.
    Instance { owner: &'o str },
    /// An interface method.
    Abstract { owner: &'o str },
    /// A method whose receiver type is not declared in the unit: static, receiver first.
    Detached { owner: &'o str },
}

impl<'o> Placement<'o> {
    fn owner(self) -> Option<&'o str> {
        match self {
            Placement::Free => None,
            Placement::Instance { owner } | Placement::Abstract { owner } | Placement::Detached { owner } => {
                Some(owner)
            }
        }
    }
}

/// A synthesized class bundling several return values.
#[derive(Debug, Clone)]
pub(crate) struct ResultWrapper {
    pub name: String,
    /// `(java field name, type)`
    pub fields: Vec<(String, JavaType)>,
    /// Go name of the function it was synthesized for.
    pub origin: String,
}

enum Returns {
    Void,
    Single(JavaType),
    Wrapper(String),
}

/// Java method name: `String() string` on a type becomes `toString`.
pub(crate) fn method_java_name(function: &Function, placement: Placement<'_>) -> String {
    let is_stringer = function.name == "String"
        && function.params.is_empty()
        && matches!(function.results.as_slice(), [r] if r.ty == TypeRef::Primitive(PrimitiveId::String));
    if is_stringer && matches!(placement, Placement::Instance { .. }) {
        "toString".to_string()
    } else {
        member_name(&function.name)
    }
}

impl JavaCodegen<'_> {
    /// Emit a function, method, or interface method with its notes, doc comment and stub body.
    pub(crate) fn emit_function(&mut self, function: &Function, placement: Placement<'_>) {
        let name = method_java_name(function, placement);
        let mut mapped: Vec<JavaType> = Vec::new();

        // Parameters
        let mut params = Vec::new();
        if let Placement::Detached { owner } = placement {
            if let Some(receiver) = &function.receiver {
                let ty = self.map(&receiver.ty);
                let receiver_name = if receiver.name.is_empty() || receiver.name == "_" {
                    "receiver".to_string()
                } else {
                    param_name(&receiver.name, 0)
                };
                params.push(format!("{ty} {receiver_name}"));
                mapped.push(ty);
            }
            self.note(&format!(
                "`{}` is a method on `{owner}`, which is not declared here, so it becomes a static method taking the receiver explicitly.",
                function.name
            ));
        }
        let offset = params.len();
        let last = function.params.len().saturating_sub(1);
        for (i, param) in function.params.iter().enumerate() {
            let pname = param_name(&param.name, i + offset);
            match &param.ty {
                TypeRef::Variadic(elem) if i == last => {
                    let ty = self.map_with(elem, false);
                    params.push(format!("{ty}... {pname}"));
                    mapped.push(ty);
                }
                other => {
                    let ty = self.map(other);
                    params.push(format!("{ty} {pname}"));
                    mapped.push(ty);
                }
            }
        }

        // Results
        // `error` results never become return values or wrapper fields.
        let throws = self.options.errors_as_exceptions && function.has_error_return();
        let values = function.value_results();
        let returns = match values.as_slice() {
            [] => Returns::Void,
            [single] => {
                let ty = self.map(&single.ty);
                mapped.push(ty.clone());
                Returns::Single(ty)
            }
            many => {
                let wrapper = self.wrapper_name(format!(
                    "{}{}Result",
                    placement.owner().map(to_pascal_case).unwrap_or_default(),
                    to_pascal_case(&function.name)
                ));
                let fields: Vec<(String, JavaType)> = many
                    .iter()
                    .enumerate()
                    .map(|(i, r)| {
                        let field = if r.name.is_empty() || r.name == "_" {
                            format!("value{}", i + 1)
                        } else {
                            member_name(&r.name)
                        };
                        (field, self.map(&r.ty))
                    })
                    .collect();
                mapped.extend(fields.iter().map(|(_, t)| t.clone()));
                self.note(&format!(
                    "`{}` returns {} values; Java returns one, so they are bundled in `{wrapper}`.",
                    function.name,
                    many.len()
                ));
                self.add_wrapper(ResultWrapper {
                    name: wrapper.clone(),
                    fields,
                    origin: function.name.clone(),
                });
                Returns::Wrapper(wrapper)
            }
        };

        // Notes and doc comment
        let doc_notes = self.type_notes(&mapped);
        if throws {
            self.note(ERROR_NOTE);
        } else if function.has_error_return() {
            self.note(DROPPED_ERROR_NOTE);
        }
        if name == "toString" {
            self.note(STRINGER_NOTE);
        }
        if self.options.emit_doc_comments {
            let mut lines = doc_lines(function.doc.as_deref());
            if !lines.is_empty() || !doc_notes.is_empty() {
                if !lines.is_empty() && !doc_notes.is_empty() {
                    lines.push(String::new());
                }
                lines.extend(doc_notes);
                if throws {
                    lines.push("@throws Exception if the Go function returns a non-nil error".to_string());
                }
            }
            self.emitter.doc_comment(&lines);
        }

        // Signature and body
        let exported = is_exported(&function.name);
        let modifiers = match placement {
            Placement::Free | Placement::Detached { .. } => format!("{}static ", visibility(exported)),
            Placement::Instance { .. } => visibility(exported).to_string(),
            Placement::Abstract { .. } => String::new(),
        };
        let return_type = match &returns {
            Returns::Void => "void".to_string(),
            Returns::Single(ty) => ty.name.clone(),
            Returns::Wrapper(wrapper) => wrapper.clone(),
        };
        let throws_clause = if throws { " throws Exception" } else { "" };
        let header = format!("{modifiers}{return_type} {name}({}){throws_clause}", params.join(", "));

        if name == "toString" {
            self.emitter.line("@Override");
        }
        if let Placement::Abstract { .. } = placement {
            self.emitter.line(&format!("{header};"));
            return;
        }

        let only_error = throws && values.is_empty();
        let body = match &returns {
            Returns::Void if only_error => Some("throw new UnsupportedOperationException(\"not implemented\");".to_string()),
            Returns::Void => None,
            Returns::Single(ty) => {
                if let Some(import) = ty.default_import() {
                    self.imports.insert(import);
                }
                Some(format!("return {};", ty.default_value()))
            }
            Returns::Wrapper(wrapper) => Some(format!("return new {wrapper}();")),
        };
        self.emitter.block(&header, |e| {
            if let Some(body) = &body {
                e.line(body);
            }
        });
    }

    /// Learning notes for lossy primitive mappings; returns cross-reference notes for the doc comment.
    pub(crate) fn type_notes(&mut self, mapped: &[JavaType]) -> Vec<String> {
        let mut doc_notes: Vec<String> = Vec::new();
        for note in mapped.iter().flat_map(|t| t.notes.iter()) {
            match note.source {
                NoteSource::Primitive => self.note(note.text),
                NoteSource::CrossReference => {
                    let line = format!("{} → {}: {}", note.go, note.java, note.text);
                    if !doc_notes.contains(&line) {
                        doc_notes.push(line);
                    }
                }
            }
        }
        doc_notes
    }

    /// `base`, or `base` with a numeric suffix when a declared or resolved type already uses that name.
    fn wrapper_name(&self, base: String) -> String {
        let declared = self.unit.declared_type_names();
        let taken = |name: &str| {
            declared.contains(name) || self.enrichment.is_some_and(|e| e.resolved_kind(name).is_some())
        };
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{n}");
            if !taken(&candidate) {
                tracing::debug!(name = %candidate, "generator: result wrapper renamed to avoid a declared type");
                return candidate;
            }
            n += 1;
        }
    }

    fn add_wrapper(&mut self, wrapper: ResultWrapper) {
        if self.wrappers.iter().any(|w| w.name == wrapper.name) {
            tracing::debug!(name = %wrapper.name, "generator: result wrapper already synthesized");
            return;
        }
        self.wrappers.push(wrapper);
    }

    /// Emit one result wrapper class: fields, constructors, and an accessor pair per field.
    pub(crate) fn emit_wrapper(&mut self, wrapper: &ResultWrapper) {
        let options = self.options;
        self.emitter.blank_line();
        if options.emit_doc_comments {
            self.emitter
                .doc_comment(&[format!("Results of `{}`, bundled because Java returns a single value.", wrapper.origin)]);
        }
        let name = type_name(&wrapper.name);
        self.emitter.block(&format!("public static class {name}"), |e| {
            for (field, ty) in &wrapper.fields {
                e.line(&format!("private {ty} {field};"));
            }
            if options.emit_constructors {
                e.blank_line();
                e.block(&format!("public {name}()"), |_| {});
                e.blank_line();
                let params: Vec<String> = wrapper.fields.iter().map(|(f, ty)| format!("{ty} {f}")).collect();
                e.block(&format!("public {name}({})", params.join(", ")), |e| {
                    for (field, _) in &wrapper.fields {
                        e.line(&format!("this.{field} = {field};"));
                    }
                });
            }
            for (field, ty) in &wrapper.fields {
                emit_accessors(e, field, ty);
            }
        });
    }
}

/// A getter/setter pair for a private field.
pub(crate) fn emit_accessors(e: &mut JavaEmitter, field: &str, ty: &JavaType) {
    emit_getter(e, field, ty);
    emit_setter(e, field, ty);
}

pub(crate) fn emit_getter(e: &mut JavaEmitter, field: &str, ty: &JavaType) {
    e.blank_line();
    e.block(&format!("public {ty} get{}()", accessor_suffix(field)), |e| {
        e.line(&format!("return {field};"));
    });
}

pub(crate) fn emit_setter(e: &mut JavaEmitter, field: &str, ty: &JavaType) {
    e.blank_line();
    e.block(&format!("public void set{}({ty} {field})", accessor_suffix(field)), |e| {
        e.line(&format!("this.{field} = {field};"));
    });
}
