//! Type Mapper: Go [`TypeRef`]s to Java types.
//!
//! Rules, first match wins:
//! 1. A package-qualified name found in the standard-library cross-reference table maps to its documented Java
//!    equivalent, carrying the table's note.
//! 2. `map[K]V` maps to `Map<K, V>` with key and value boxed.
//! 3. Slices (and variadic parameters) map to `List<E>` with the element boxed.
//! 4. Pointers map to their base type, boxed if the base is a Java primitive.
//! 5. `needs_boxing` boxes a primitive.
//! 6. Primitives come from the primitive table; other names pass through.
//!
//! `error` maps to `Exception` and is flagged so the generator can move it into a `throws` clause.
//!
//! ## Notes
//! - A mapper built with [`TypeMapper::for_unit`] knows the unit's declarations and the resolver's enrichment. It
//!   resolves aliases to their underlying type and flags qualified names it cannot account for with a
//!   `/* unresolved: pkg.Name */` comment. A plain [`TypeMapper::new`] passes unknown names through silently.
//! - Gap comments (unresolved names, the Go spelling of an unmappable type) follow the outermost type, never a
//!   type argument: `[]chan int` renders as `List<Object> /* chan int */`.
//! - Mapping is pure and deterministic.
//!
//! ## Examples
//! ```rust
//! use gojava::frontend::typeref::parse_type_ref;
//! use gojava::mapping::TypeMapper;
//!
//! let mapper = TypeMapper::new();
//! assert_eq!(mapper.map_type(&parse_type_ref("map[string][]int"), false).name, "Map<String, List<Integer>>");
//! assert_eq!(mapper.map_type(&parse_type_ref("*int64"), false).name, "Long");
//! assert_eq!(mapper.map_type(&parse_type_ref("time.Duration"), false).name, "Duration");
//! ```

mod types;

pub use types::{JAVA_ARRAY_LIST, JAVA_HASH_MAP, JAVA_LIST, JAVA_MAP, JavaKind, JavaType, MappingNote, NoteSource};

use std::collections::{BTreeSet, HashMap};

use gojava_core::lang::conventions::to_java_ident;
use gojava_core::lang::primitives::{self, JAVA_EXCEPTION};
use gojava_core::lang::stdlib;

use crate::model::{Enrichment, SourceUnit, TypeRef};

/// Alias chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    /// Declared and resolved type names; `None` disables gap flagging.
    known: Option<BTreeSet<String>>,
    aliases: HashMap<String, TypeRef>,
    /// Import qualifier (alias or last path element) to package name.
    qualifiers: HashMap<String, String>,
}

impl TypeMapper {
    /// A context-free mapper: no aliases, no gap flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper aware of `unit`'s declarations, aliases and imports, and of any resolved external declarations.
    pub fn for_unit(unit: &SourceUnit, enrichment: Option<&Enrichment>) -> Self {
        let mut known: BTreeSet<String> = unit.declared_type_names().into_iter().map(str::to_string).collect();
        if let Some(enrichment) = enrichment {
            known.extend(enrichment.structs.iter().map(|s| s.decl.name.clone()));
            known.extend(enrichment.interfaces.iter().map(|i| i.decl.name.clone()));
        }
        let aliases = unit
            .typedefs
            .iter()
            .filter(|t| t.alias)
            .map(|t| (t.name.clone(), t.underlying.clone()))
            .collect();
        let qualifiers = unit
            .imports
            .iter()
            .map(|i| {
                let package = i.path.rsplit('/').next().unwrap_or(&i.path).to_string();
                (i.package_name().to_string(), package)
            })
            .collect();
        Self {
            known: Some(known),
            aliases,
            qualifiers,
        }
    }

    /// Map a Go type reference to a Java type.
    ///
    /// `needs_boxing` requests a reference type where a Java primitive would otherwise be produced; container
    /// element, key and value types are always boxed regardless.
    pub fn map_type(&self, ty: &TypeRef, needs_boxing: bool) -> JavaType {
        self.map_at(ty, needs_boxing, 0)
    }

    fn map_at(&self, ty: &TypeRef, needs_boxing: bool, alias_depth: usize) -> JavaType {
        let mapped = match ty {
            TypeRef::Named {
                name,
                package: Some(package),
            } => self.map_qualified(package, name),
            TypeRef::Named { name, package: None } => {
                if ty.is_error() {
                    JavaType::new(JAVA_EXCEPTION, JavaKind::Exception)
                } else if let Some(underlying) = self.aliases.get(name).filter(|_| alias_depth < MAX_ALIAS_DEPTH) {
                    self.map_at(underlying, needs_boxing, alias_depth + 1)
                } else {
                    self.pass_through(name, name)
                }
            }
            TypeRef::Map(key, value) => {
                let key = self.map_at(key, true, alias_depth);
                let value = self.map_at(value, true, alias_depth);
                let mut out = JavaType::new(format!("Map<{}, {}>", key.bare, value.bare), JavaKind::Map);
                out.imports.insert(JAVA_MAP);
                out.absorb(&key);
                out.absorb(&value);
                out
            }
            TypeRef::Slice(elem) | TypeRef::Variadic(elem) => {
                let elem = self.map_at(elem, true, alias_depth);
                let mut out = JavaType::new(format!("List<{}>", elem.bare), JavaKind::List);
                out.imports.insert(JAVA_LIST);
                out.absorb(&elem);
                out
            }
            TypeRef::Pointer(inner) => self.map_at(inner, needs_boxing, alias_depth).boxed(),
            TypeRef::Primitive(id) => {
                let info = primitives::info(*id);
                let kind = match (info.is_java_primitive, info.java) {
                    (true, _) => JavaKind::Primitive,
                    (false, "String") => JavaKind::String,
                    (false, _) => JavaKind::Reference,
                };
                let mut out = JavaType::new(info.java, kind);
                if let Some(text) = info.note {
                    out.notes.push(MappingNote {
                        go: info.go.to_string(),
                        java: info.java.to_string(),
                        text,
                        source: NoteSource::Primitive,
                    });
                }
                out
            }
            TypeRef::Opaque(text) => {
                let spelled = text.split_whitespace().collect::<Vec<_>>().join(" ");
                JavaType::with_gap("Object", JavaKind::Opaque, spelled.replace("*/", "* /"))
            }
        };
        if needs_boxing { mapped.boxed() } else { mapped }
    }

    fn map_qualified(&self, qualifier: &str, name: &str) -> JavaType {
        let package = self.qualifiers.get(qualifier).map_or(qualifier, String::as_str);
        let go = format!("{package}.{name}");
        match stdlib::cross_reference(&go) {
            Some(xref) => {
                let kind = match xref.java {
                    "String" => JavaKind::String,
                    "Exception" => JavaKind::Exception,
                    _ => JavaKind::Reference,
                };
                let mut out = JavaType::new(xref.java, kind);
                out.imports.extend(xref.import);
                out.notes.push(MappingNote {
                    go,
                    java: xref.java.to_string(),
                    text: xref.note,
                    source: NoteSource::CrossReference,
                });
                out
            }
            None => self.pass_through(name, &format!("{qualifier}.{name}")),
        }
    }

    /// A declared, resolved or unknown type name, rendered as its Java identifier.
    fn pass_through(&self, name: &str, qualified: &str) -> JavaType {
        let ident = to_java_ident(name);
        match &self.known {
            Some(known) if !known.contains(name) => {
                let mut out = JavaType::with_gap(ident, JavaKind::Reference, format!("unresolved: {qualified}"));
                out.unresolved.push(qualified.to_string());
                tracing::debug!(name = qualified, "type mapper: unresolved type");
                out
            }
            _ => JavaType::new(ident, JavaKind::Reference),
        }
    }
}
