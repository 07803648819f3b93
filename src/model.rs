//! Source Model: the structural representation of parsed Go declarations.
//!
//! Both parser strategies produce these values and every later stage consumes them. The model mirrors source text
//! and is therefore acyclic; cycles only appear in the resolver's dependency walk.
//!
//! ## Notes
//! - Values are built once by a parser and not mutated afterwards. The resolver never writes into a [`SourceUnit`]:
//!   it returns an [`Enrichment`] that travels alongside the unit.
//! - Positions are 0-based (line, character), the convention used by the oracle boundary.

use std::collections::BTreeSet;
use std::fmt;

use gojava_core::lang::primitives::{self, ERROR_TYPE, PrimitiveId};

// ============================================================================
// Positions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl SourcePosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceRange {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }
}

// ============================================================================
// Type references
// ============================================================================

/// A recursive Go type expression.
///
/// ## Notes
/// - Arrays are modelled as slices; their length has no Java counterpart.
/// - `Variadic(T)` is the trailing `...T` parameter form and behaves as a slice of `T` everywhere except parameter
///   rendering.
/// - `Opaque` keeps the Go spelling of types with no structural mapping (func, chan, anonymous struct).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveId),
    Named { name: String, package: Option<String> },
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Map(Box<TypeRef>, Box<TypeRef>),
    Variadic(Box<TypeRef>),
    Opaque(String),
}

impl TypeRef {
    /// Build a named (or primitive) reference from a bare or qualified name.
    pub fn named(name: &str) -> TypeRef {
        if let Some(id) = primitives::from_str(name) {
            return TypeRef::Primitive(id);
        }
        match name.split_once('.') {
            Some((pkg, base)) => TypeRef::Named {
                name: base.to_string(),
                package: Some(pkg.to_string()),
            },
            None => TypeRef::Named {
                name: name.to_string(),
                package: None,
            },
        }
    }

    /// Return `true` for Go's canonical `error` type.
    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Named { name, package: None } if name == ERROR_TYPE)
    }

    /// Return `true` for slice, variadic and map references (the container shapes).
    pub fn is_container(&self) -> bool {
        matches!(self, TypeRef::Slice(_) | TypeRef::Variadic(_) | TypeRef::Map(..))
    }

    /// Strip pointer, slice and variadic markers, returning the innermost reference.
    pub fn base(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(inner) | TypeRef::Slice(inner) | TypeRef::Variadic(inner) => inner.base(),
            other => other,
        }
    }

    /// Levels of type constructors, counting the leaf: `int` is 1, `*[]int` is 3.
    pub fn depth(&self) -> usize {
        match self {
            TypeRef::Pointer(inner) | TypeRef::Slice(inner) | TypeRef::Variadic(inner) => 1 + inner.depth(),
            TypeRef::Map(key, value) => 1 + key.depth().max(value.depth()),
            TypeRef::Primitive(_) | TypeRef::Named { .. } | TypeRef::Opaque(_) => 1,
        }
    }

    /// Collect every named (non-primitive) reference, descending into map keys and values.
    pub fn named_refs(&self) -> Vec<&TypeRef> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a TypeRef>) {
        match self {
            TypeRef::Named { .. } => out.push(self),
            TypeRef::Pointer(inner) | TypeRef::Slice(inner) | TypeRef::Variadic(inner) => inner.collect_named(out),
            TypeRef::Map(key, value) => {
                key.collect_named(out);
                value.collect_named(out);
            }
            TypeRef::Primitive(_) | TypeRef::Opaque(_) => {}
        }
    }
}

impl fmt::Display for TypeRef {
    /// Render the reference back in Go syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(id) => write!(f, "{}", primitives::info(*id).go),
            TypeRef::Named {
                name,
                package: Some(pkg),
            } => write!(f, "{pkg}.{name}"),
            TypeRef::Named { name, package: None } => write!(f, "{name}"),
            TypeRef::Pointer(inner) => write!(f, "*{inner}"),
            TypeRef::Slice(inner) => write!(f, "[]{inner}"),
            TypeRef::Map(key, value) => write!(f, "map[{key}]{value}"),
            TypeRef::Variadic(inner) => write!(f, "...{inner}"),
            TypeRef::Opaque(text) => write!(f, "{text}"),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub alias: Option<String>,
    pub path: String,
    pub line: Option<u32>,
}

impl Import {
    /// The name the import is referred to by in source: the alias, or the last path element.
    pub fn package_name(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if alias != "_" && alias != "." => alias,
            _ => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Empty for unnamed parameters and results.
    pub name: String,
    pub ty: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A free function, a method, or an interface method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    pub is_method: bool,
    pub receiver: Option<Parameter>,
    pub doc: Option<String>,
    pub range: Option<SourceRange>,
}

/// Interface methods share the function shape.
pub type MethodSignature = Function;

impl Function {
    /// Return `true` if any result is the canonical `error` type.
    pub fn has_error_return(&self) -> bool {
        self.results.iter().any(|r| r.ty.is_error())
    }

    /// Results with the error type removed.
    pub fn value_results(&self) -> Vec<&Parameter> {
        self.results.iter().filter(|r| !r.ty.is_error()).collect()
    }

    /// The receiver's base type name with any pointer stripped.
    pub fn receiver_type_name(&self) -> Option<&str> {
        match self.receiver.as_ref()?.ty.base() {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// For embedded fields, the base type name.
    pub name: String,
    pub ty: TypeRef,
    pub tag: Option<String>,
    pub exported: bool,
    pub embedded: bool,
    pub doc: Option<String>,
    pub position: Option<SourcePosition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
    pub methods: Vec<Function>,
    pub doc: Option<String>,
    pub range: Option<SourceRange>,
}

impl Struct {
    /// Types of the embedded (composition) fields, in declaration order.
    pub fn embedded_types(&self) -> Vec<&TypeRef> {
        self.fields.iter().filter(|f| f.embedded).map(|f| &f.ty).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<MethodSignature>,
    /// Embedded interfaces, rendered as an `extends` list.
    pub embedded: Vec<TypeRef>,
    pub doc: Option<String>,
    pub range: Option<SourceRange>,
}

/// A package-level `var` or `const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Option<TypeRef>,
    pub is_const: bool,
    pub exported: bool,
    /// Initializer expression text, or the evaluated literal for `iota` constants.
    pub value: Option<String>,
    pub doc: Option<String>,
    pub position: Option<SourcePosition>,
}

/// A named non-struct, non-interface type (`type Celsius float64`) or an alias (`type A = B`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub underlying: TypeRef,
    pub alias: bool,
    pub methods: Vec<Function>,
    pub doc: Option<String>,
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The text matched no recognized declaration shape.
    Syntax,
    /// Valid Go that is deliberately not translated (type parameters).
    Unsupported,
}

/// A declaration that could not be parsed. Recorded per declaration, never fatal to the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub name: Option<String>,
    pub kind: FailureKind,
    pub message: String,
    pub line: u32,
}

/// One parsed Go file (or fragment).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceUnit {
    pub package: String,
    pub imports: Vec<Import>,
    pub structs: Vec<Struct>,
    pub interfaces: Vec<Interface>,
    pub functions: Vec<Function>,
    pub variables: Vec<Variable>,
    pub constants: Vec<Variable>,
    pub typedefs: Vec<TypeDef>,
    pub failures: Vec<ParseFailure>,
}

impl SourceUnit {
    /// Return `true` if no declaration of any kind was recognized (failures do not count).
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
            && self.interfaces.is_empty()
            && self.functions.is_empty()
            && self.variables.is_empty()
            && self.constants.is_empty()
            && self.typedefs.is_empty()
    }

    /// Names of every type declared in this unit.
    pub fn declared_type_names(&self) -> BTreeSet<&str> {
        self.structs
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.interfaces.iter().map(|i| i.name.as_str()))
            .chain(self.typedefs.iter().map(|t| t.name.as_str()))
            .collect()
    }

    pub fn find_struct(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn find_typedef(&self, name: &str) -> Option<&TypeDef> {
        self.typedefs.iter().find(|t| t.name == name)
    }

    /// Look up the import a package qualifier refers to.
    pub fn import_for(&self, qualifier: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.package_name() == qualifier)
    }

    /// Every method across structs, typedefs and free functions, with the functions themselves.
    pub fn all_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions
            .iter()
            .chain(self.structs.iter().flat_map(|s| s.methods.iter()))
            .chain(self.typedefs.iter().flat_map(|t| t.methods.iter()))
    }

    /// A copy with every source position and range cleared.
    ///
    /// The two parser strategies agree on structure but not on exact positions; this is the comparison form.
    pub fn without_positions(&self) -> SourceUnit {
        let mut unit = self.clone();
        for import in &mut unit.imports {
            import.line = None;
        }
        for s in &mut unit.structs {
            s.range = None;
            s.fields.iter_mut().for_each(|f| f.position = None);
            s.methods.iter_mut().for_each(|m| m.range = None);
        }
        for i in &mut unit.interfaces {
            i.range = None;
            i.methods.iter_mut().for_each(|m| m.range = None);
        }
        for t in &mut unit.typedefs {
            t.range = None;
            t.methods.iter_mut().for_each(|m| m.range = None);
        }
        unit.functions.iter_mut().for_each(|f| f.range = None);
        unit.variables.iter_mut().for_each(|v| v.position = None);
        unit.constants.iter_mut().for_each(|v| v.position = None);
        unit.failures.iter_mut().for_each(|f| f.line = 0);
        unit
    }
}

// ============================================================================
// Enrichment
// ============================================================================

/// Where an external declaration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclSource {
    /// Parsed from another document (its URI).
    Document(String),
    /// Reconstructed from oracle hover text at a position in the referencing document.
    Hover(String),
}

impl fmt::Display for DeclSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclSource::Document(uri) => write!(f, "{uri}"),
            DeclSource::Hover(uri) => write!(f, "hover in {uri}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External<T> {
    pub decl: T,
    pub source: DeclSource,
    /// Package qualifier the declaration was referenced through, if any.
    pub package: Option<String>,
}

/// Externally-resolved declarations produced by the dependency resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Enrichment {
    pub structs: Vec<External<Struct>>,
    pub interfaces: Vec<External<Interface>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    Struct,
    Interface,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty() && self.interfaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.structs.len() + self.interfaces.len()
    }

    /// Semantic flag for a referenced type name, if the resolver found its declaration.
    pub fn resolved_kind(&self, name: &str) -> Option<ResolvedKind> {
        if self.structs.iter().any(|s| s.decl.name == name) {
            Some(ResolvedKind::Struct)
        } else if self.interfaces.iter().any(|i| i.decl.name == name) {
            Some(ResolvedKind::Interface)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(results: Vec<TypeRef>) -> Function {
        Function {
            name: "f".into(),
            params: Vec::new(),
            results: results.into_iter().map(|t| Parameter::new("", t)).collect(),
            is_method: false,
            receiver: None,
            doc: None,
            range: None,
        }
    }

    #[test]
    fn error_return_is_derived() {
        let f = func(vec![TypeRef::named("int"), TypeRef::named("error")]);
        assert!(f.has_error_return());
        assert_eq!(f.value_results().len(), 1);
        assert!(!func(vec![TypeRef::named("errors.Error")]).has_error_return());
    }

    #[test]
    fn named_constructor_recognizes_primitives_and_qualifiers() {
        assert_eq!(TypeRef::named("int64"), TypeRef::Primitive(PrimitiveId::Int64));
        assert_eq!(
            TypeRef::named("io.Reader"),
            TypeRef::Named {
                name: "Reader".into(),
                package: Some("io".into())
            }
        );
    }

    #[test]
    fn display_round_trips_go_syntax() {
        let t = TypeRef::Pointer(Box::new(TypeRef::Map(
            Box::new(TypeRef::named("string")),
            Box::new(TypeRef::Slice(Box::new(TypeRef::named("models.User")))),
        )));
        assert_eq!(t.to_string(), "*map[string][]models.User");
    }

    #[test]
    fn named_refs_descend_into_maps() {
        let value = TypeRef::Pointer(Box::new(TypeRef::named("Value")));
        let t = TypeRef::Map(Box::new(TypeRef::named("Key")), Box::new(value));
        let names: Vec<String> = t.named_refs().iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["Key", "Value"]);
    }

    #[test]
    fn import_package_name() {
        let plain = Import {
            alias: None,
            path: "net/http".into(),
            line: None,
        };
        assert_eq!(plain.package_name(), "http");
        let aliased = Import {
            alias: Some("m".into()),
            ..plain.clone()
        };
        assert_eq!(aliased.package_name(), "m");
        let blank = Import {
            alias: Some("_".into()),
            ..plain
        };
        assert_eq!(blank.package_name(), "http");
    }

    #[test]
    fn empty_unit_ignores_failures() {
        let mut unit = SourceUnit::default();
        unit.failures.push(ParseFailure {
            name: None,
            kind: FailureKind::Syntax,
            message: "x".into(),
            line: 0,
        });
        assert!(unit.is_empty());
    }
}
