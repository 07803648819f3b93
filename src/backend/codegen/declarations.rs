//! Declaration emission: variables and constants, named types, interfaces, structs, resolved external types, and
//! skip markers for declarations that failed to parse.

use std::collections::BTreeSet;

use gojava_core::lang::conventions::is_exported;

use super::JavaCodegen;
use super::functions::{Placement, emit_getter, emit_setter, method_java_name};
use super::helpers::{accessor_suffix, collapse_whitespace, constant_name, doc_lines, java_literal, member_name, type_name, visibility};
use crate::mapping::{JavaKind, JavaType, NoteSource};
use crate::model::{DeclSource, Function, Interface, ParseFailure, Struct, TypeDef, TypeRef, Variable};

const EMBEDDING_NOTE: &str =
    "Go embedding is composition, not inheritance: embedded types become private fields and are never extended.";
const NAMED_TYPE_NOTE: &str =
    "Java has no named types over primitives or other types, so a Go named type becomes a class wrapping its value.";

impl JavaCodegen<'_> {
    // ========================================================================
    // Variables and constants
    // ========================================================================

    /// Constants first, then variables, as static fields of the outer class.
    pub(super) fn emit_values(&mut self) {
        let unit = self.unit;
        for constant in &unit.constants {
            self.emit_value(constant);
        }
        if !unit.constants.is_empty() && !unit.variables.is_empty() {
            self.emitter.blank_line();
        }
        for variable in &unit.variables {
            self.emit_value(variable);
        }
    }

    fn emit_value(&mut self, value: &Variable) {
        let name = if value.is_const {
            constant_name(&value.name)
        } else {
            member_name(&value.name)
        };
        let mapped = match &value.ty {
            Some(ty) => self.map(ty),
            None => JavaType::new("Object", JavaKind::Reference),
        };
        let initializer = value.value.as_deref().and_then(|text| self.initializer(value.ty.as_ref(), text, &mapped));

        let doc_notes = self.type_notes(std::slice::from_ref(&mapped));
        if self.options.emit_doc_comments {
            let mut lines = doc_lines(value.doc.as_deref());
            lines.extend(doc_notes);
            self.emitter.doc_comment(&lines);
        }

        let modifiers = format!("{}static ", visibility(value.exported));
        match initializer {
            Some(init) => {
                let fin = if value.is_const { "final " } else { "" };
                self.emitter.line(&format!("{modifiers}{fin}{mapped} {name} = {init};"));
            }
            None => {
                let placeholder = match value.value.as_deref() {
                    Some(expr) => format!("// needs initialization: {}", collapse_whitespace(expr)),
                    None => "// needs initialization".to_string(),
                };
                self.emitter.line(&format!("{modifiers}{mapped} {name}; {placeholder}"));
            }
        }
    }

    /// A Java initializer for a Go literal; literals of a local named type are wrapped in its class.
    fn initializer(&mut self, ty: Option<&TypeRef>, text: &str, mapped: &JavaType) -> Option<String> {
        let unit = self.unit;
        let named = match ty {
            Some(TypeRef::Named { name, package: None }) => unit.find_typedef(name).filter(|t| !t.alias),
            _ => None,
        };
        match named {
            Some(typedef) => {
                let underlying = self.map(&typedef.underlying);
                let literal = java_literal(text, &underlying)?;
                Some(format!("new {}({literal})", type_name(&typedef.name)))
            }
            None => java_literal(text, mapped),
        }
    }

    // ========================================================================
    // Named types
    // ========================================================================

    pub(super) fn emit_typedef(&mut self, typedef: &TypeDef) {
        self.emitter.blank_line();
        let underlying = self.map(&typedef.underlying);

        if typedef.alias {
            self.note(&format!(
                "`{}` is an alias; Java has no type aliases, so it is written as `{underlying}` wherever it is used.",
                typedef.name
            ));
            self.emitter.comment(&format!("type {} = {}", typedef.name, typedef.underlying));
            for method in &typedef.methods {
                self.emitter.blank_line();
                self.emit_function(method, Placement::Detached { owner: &typedef.name });
            }
            return;
        }

        self.note(NAMED_TYPE_NOTE);
        let doc_notes = self.type_notes(std::slice::from_ref(&underlying));
        if self.options.emit_doc_comments {
            let mut lines = doc_lines(typedef.doc.as_deref());
            if lines.is_empty() {
                lines.push(format!("Go named type `{}` over `{}`.", typedef.name, typedef.underlying));
            }
            lines.extend(doc_notes);
            self.emitter.doc_comment(&lines);
        }

        let name = type_name(&typedef.name);
        let taken = method_names(&typedef.methods, &typedef.name);
        let with_no_arg = self.options.emit_constructors;
        self.emitter.line(&format!("{}static class {name} {{", visibility(is_exported(&typedef.name))));
        self.emitter.indent();
        self.emitter.line(&format!("private {underlying} value;"));
        if with_no_arg {
            self.emitter.blank_line();
            self.emitter.block(&format!("public {name}()"), |_| {});
        }
        self.emitter.blank_line();
        self.emitter.block(&format!("public {name}({underlying} value)"), |e| e.line("this.value = value;"));
        if !taken.contains(&("getValue".to_string(), 0)) {
            emit_getter(&mut self.emitter, "value", &underlying);
        }
        for method in &typedef.methods {
            self.emitter.blank_line();
            self.emit_function(method, Placement::Instance { owner: &typedef.name });
        }
        self.emitter.dedent();
        self.emitter.line("}");
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    /// Emit an interface; `provenance` describes where an external declaration came from.
    pub(super) fn emit_interface(&mut self, interface: &Interface, provenance: Option<String>) {
        self.emitter.blank_line();
        if let Some(provenance) = &provenance {
            self.emitter.comment(provenance);
        }

        let mut extends = Vec::new();
        for embedded in &interface.embedded {
            let mapped = self.map(embedded);
            match mapped.notes.iter().find(|n| n.source == NoteSource::CrossReference) {
                Some(xref) => {
                    let text = format!("`{}` embeds `{}`. {}", interface.name, xref.go, xref.text);
                    self.note(&text);
                }
                None => extends.push(mapped.name),
            }
        }

        if self.options.emit_doc_comments {
            self.emitter.doc_comment(&doc_lines(interface.doc.as_deref()));
        }
        let extends = if extends.is_empty() {
            String::new()
        } else {
            format!(" extends {}", extends.join(", "))
        };
        let header = format!(
            "{}interface {}{extends}",
            visibility(is_exported(&interface.name)),
            type_name(&interface.name)
        );
        self.emitter.line(&format!("{header} {{"));
        self.emitter.indent();
        for method in &interface.methods {
            self.emitter.blank_line();
            self.emit_function(method, Placement::Abstract { owner: &interface.name });
        }
        self.emitter.dedent();
        self.emitter.line("}");
    }

    // ========================================================================
    // Structs
    // ========================================================================

    /// Emit a struct as a nested class: embedded fields, fields, constructor, accessors, methods.
    pub(super) fn emit_struct(&mut self, s: &Struct, provenance: Option<String>) {
        self.emitter.blank_line();
        if let Some(provenance) = &provenance {
            self.emitter.comment(provenance);
        }
        if s.fields.iter().any(|f| f.embedded) {
            self.note(EMBEDDING_NOTE);
        }
        if self.options.emit_doc_comments {
            self.emitter.doc_comment(&doc_lines(s.doc.as_deref()));
        }

        let name = type_name(&s.name);
        self.emitter.line(&format!("{}static class {name} {{", visibility(is_exported(&s.name))));
        self.emitter.indent();

        let mut accessors = Vec::new();
        let ordered = s.fields.iter().filter(|f| f.embedded).chain(s.fields.iter().filter(|f| !f.embedded));
        for field in ordered {
            let ty = self.map(&field.ty);
            let doc_notes = self.type_notes(std::slice::from_ref(&ty));
            if self.options.emit_doc_comments {
                let mut lines = doc_lines(field.doc.as_deref());
                lines.extend(doc_notes);
                self.emitter.doc_comment(&lines);
            }
            let java = member_name(&field.name);
            match &field.tag {
                Some(tag) => self.emitter.line(&format!("private {ty} {java}; // {tag}")),
                None => self.emitter.line(&format!("private {ty} {java};")),
            }
            if !field.embedded {
                accessors.push((java, ty));
            }
        }

        if self.options.emit_constructors {
            self.emitter.blank_line();
            self.emitter.block(&format!("public {name}()"), |_| {});
        }

        if self.options.emit_getters_setters {
            let taken = method_names(&s.methods, &s.name);
            for (field, ty) in &accessors {
                let suffix = accessor_suffix(field);
                if taken.contains(&(format!("get{suffix}"), 0)) {
                    tracing::debug!(field = %field, "generator: getter collides with a method");
                } else {
                    emit_getter(&mut self.emitter, field, ty);
                }
                if taken.contains(&(format!("set{suffix}"), 1)) {
                    tracing::debug!(field = %field, "generator: setter collides with a method");
                } else {
                    emit_setter(&mut self.emitter, field, ty);
                }
            }
        }

        for method in &s.methods {
            self.emitter.blank_line();
            self.emit_function(method, Placement::Instance { owner: &s.name });
        }
        self.emitter.dedent();
        self.emitter.line("}");
    }

    // ========================================================================
    // External declarations and skip markers
    // ========================================================================

    /// Render resolved external declarations not already declared in the unit.
    pub(super) fn emit_externals(&mut self) {
        if !self.options.emit_external_types {
            return;
        }
        let Some(enrichment) = self.enrichment else {
            return;
        };
        let declared = self.unit.declared_type_names();
        for external in &enrichment.structs {
            if declared.contains(external.decl.name.as_str()) {
                continue;
            }
            let provenance = provenance(&external.source, external.package.as_deref());
            self.emit_struct(&external.decl, Some(provenance));
        }
        for external in &enrichment.interfaces {
            if declared.contains(external.decl.name.as_str()) {
                continue;
            }
            let provenance = provenance(&external.source, external.package.as_deref());
            self.emit_interface(&external.decl, Some(provenance));
        }
    }

    /// One visible marker per declaration that could not be parsed, in source order.
    pub(super) fn emit_skip_markers(&mut self) {
        let mut failures: Vec<&ParseFailure> = self.unit.failures.iter().collect();
        if failures.is_empty() {
            return;
        }
        failures.sort_by_key(|f| f.line);
        self.emitter.blank_line();
        for failure in failures {
            let what = match &failure.name {
                Some(name) => format!("`{name}`"),
                None => "declaration".to_string(),
            };
            self.emitter.line(&format!(
                "// gojava: skipped {what} at line {}: {}",
                failure.line + 1,
                collapse_whitespace(&failure.message)
            ));
        }
    }
}

/// Java names and arities of a type's translated methods.
fn method_names(methods: &[Function], owner: &str) -> BTreeSet<(String, usize)> {
    methods
        .iter()
        .map(|m| (method_java_name(m, Placement::Instance { owner }), m.params.len()))
        .collect()
}

fn provenance(source: &DeclSource, package: Option<&str>) -> String {
    match package {
        Some(package) => format!("Resolved from {source} (package {package})"),
        None => format!("Resolved from {source}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::GeneratorOptions;
    use crate::backend::codegen::generate_unit;
    use crate::frontend::{ParserStrategy, parse_unit};
    use crate::model::{DeclSource, Enrichment, External};

    fn translate_with(src: &str, options: GeneratorOptions) -> String {
        let unit = parse_unit(src, ParserStrategy::Grammar);
        generate_unit(&unit, None, &options).expect("declarations")
    }

    #[test]
    fn constants_and_variables_become_static_fields() {
        let src = "package p\n\nconst (\n\tRed = iota\n\tGreen\n)\n\nconst MaxRetries int64 = 5\n\nvar Timeout = time.Second * 5\n\nvar name string\n";
        let java = translate_with(src, GeneratorOptions::minimal());
        assert!(java.contains("    public static final int RED = 0;\n"));
        assert!(java.contains("    public static final int GREEN = 1;\n"));
        assert!(java.contains("    public static final long MAX_RETRIES = 5L;\n"));
        assert!(java.contains("    public static Object timeout; // needs initialization: time.Second * 5\n"));
        assert!(java.contains("    static String name; // needs initialization\n"));
    }

    #[test]
    fn named_types_wrap_their_value() {
        let src = "package temp\n\ntype Celsius float64\n\nconst Freezing Celsius = 0\n\nfunc (c Celsius) String() string { return \"\" }\n";
        let java = translate_with(src, GeneratorOptions::default());
        assert!(java.contains("public static final Celsius FREEZING = new Celsius(0.0);"));
        assert!(java.contains("public static class Celsius {"));
        assert!(java.contains("private double value;"));
        assert!(java.contains("public Celsius(double value) {"));
        assert!(java.contains("public double getValue() {"));
        assert!(java.contains("@Override\n        public String toString() {"));
        assert!(java.contains("// Go → Java: Go's `String() string` method plays the role of Java's `toString()`."));
    }

    #[test]
    fn aliases_render_as_a_note_only() {
        let src = "package p\n\ntype ID = int64\n\ntype User struct {\n\tID ID\n}\n";
        let java = translate_with(src, GeneratorOptions::default());
        assert!(java.contains("// type ID = int64"));
        assert!(!java.contains("class ID"));
        assert!(java.contains("private long id;"));
    }

    #[test]
    fn embedded_pointer_is_composed_not_inherited() {
        let src = "package stream\n\nimport \"io\"\n\ntype Buffered struct {\n\t*io.Reader\n\tName string\n}\n";
        let java = translate_with(src, GeneratorOptions::default());
        assert!(java.contains("import java.io.InputStream;"));
        assert!(java.contains("public static class Buffered {"));
        assert!(java.contains("private InputStream reader;"));
        assert!(java.contains("private String name;"));
        assert!(java.contains("public String getName() {"));
        assert!(java.contains("public void setName(String name) {"));
        assert!(!java.contains("getReader"));
        assert!(!java.contains("extends"));
        assert!(java.contains(super::EMBEDDING_NOTE));
        let reader = java.find("private InputStream reader;").expect("reader field");
        let name = java.find("private String name;").expect("name field");
        assert!(reader < name);
    }

    #[test]
    fn tags_trail_and_accessors_avoid_collisions() {
        let src = "package p\n\ntype User struct {\n\tName string `json:\"name\"`\n\tAge int\n}\n\nfunc (u *User) GetName() string { return u.Name }\n";
        let java = translate_with(src, GeneratorOptions::minimal().with_getters_setters(true));
        assert!(java.contains("private String name; // `json:\"name\"`"));
        assert_eq!(java.matches("public String getName()").count(), 1);
        assert!(java.contains("public void setName(String name) {"));
        assert!(java.contains("public int getAge() {"));
    }

    #[test]
    fn interfaces_extend_local_embeds_and_note_standard_ones() {
        let src = "package shapes\n\nimport \"fmt\"\n\ntype Base interface {\n\tID() string\n}\n\ntype Shape interface {\n\tBase\n\tfmt.Stringer\n\tArea() (float64, error)\n}\n";
        let java = translate_with(src, GeneratorOptions::default());
        assert!(java.contains("public interface Shape extends Base {"));
        assert!(java.contains("double area() throws Exception;"));
        assert!(java.contains("String id();"));
        assert!(java.contains("`Shape` embeds `fmt.Stringer`."));
    }

    #[test]
    fn external_declarations_carry_their_provenance() {
        let unit = parse_unit("package app\n\ntype Order struct {\n\tBuyer Customer\n}\n", ParserStrategy::Scan);
        let external = parse_unit("type Customer struct {\n\tName string\n}\n", ParserStrategy::Scan);
        let enrichment = Enrichment {
            structs: vec![External {
                decl: external.structs[0].clone(),
                source: DeclSource::Document("file:///src/models/customer.go".into()),
                package: None,
            }],
            interfaces: Vec::new(),
        };
        let java = generate_unit(&unit, Some(&enrichment), &GeneratorOptions::default()).expect("declarations");
        assert!(java.contains("// Resolved from file:///src/models/customer.go\n"));
        assert!(java.contains("public static class Customer {"));
        assert!(java.contains("private Customer buyer;"));

        let hidden = generate_unit(&unit, Some(&enrichment), &GeneratorOptions::default().with_external_types(false))
            .expect("declarations");
        assert!(!hidden.contains("class Customer"));
        assert!(hidden.contains("private Customer buyer;"));
    }

    #[test]
    fn failed_declarations_leave_markers() {
        let src = "package p\n\ntype List[T any] struct {\n\titems []T\n}\n\nfunc Ok() {}\n";
        let java = translate_with(src, GeneratorOptions::minimal());
        assert!(java.contains("public static void ok() {"));
        assert!(java.contains("// gojava: skipped `List` at line 3:"));
    }
}
