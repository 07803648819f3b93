//! Go predeclared types and their Java counterparts.
//!
//! Each entry records the Java primitive (or base reference type) a Go predeclared type maps to, the boxed
//! counterpart used inside containers and for pointers, and the “unimplemented” default literal the generator puts
//! into stub bodies.
//!
//! ## Notes
//! - `error` is deliberately **not** in this table: it is the canonical error type and is handled by the type
//!   mapper's error rule (see [`ERROR_TYPE`]).
//! - `any` / `interface{}` map to `Object`, which is already a reference type.
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::primitives::{self, PrimitiveId};
//!
//! let int = primitives::info(PrimitiveId::Int);
//! assert_eq!((int.java, int.boxed), ("int", "Integer"));
//! assert_eq!(primitives::from_str("float64"), Some(PrimitiveId::Float64));
//! assert_eq!(primitives::boxed_counterpart("long"), Some("Long"));
//! ```

/// Name of Go's canonical error interface.
pub const ERROR_TYPE: &str = "error";

/// Java type the canonical error type maps to.
pub const JAVA_EXCEPTION: &str = "Exception";

/// Stable identifier for Go predeclared types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Byte,
    Rune,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Any,
}

/// Mapping metadata for one predeclared type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveInfo {
    pub id: PrimitiveId,
    /// Go spelling.
    pub go: &'static str,
    /// Java spelling when no boxing is required.
    pub java: &'static str,
    /// Java reference type used inside containers, for pointers, and when boxing is requested.
    pub boxed: &'static str,
    /// Literal returned by a stub body when the unboxed type is the return type.
    pub default_literal: &'static str,
    /// Literal returned by a stub body when the boxed type is the return type.
    pub boxed_default_literal: &'static str,
    /// Whether `java` is a Java primitive (as opposed to a reference type such as `String`).
    pub is_java_primitive: bool,
    /// Explanation shown as a learning note when the mapping is lossy or surprising.
    pub note: Option<&'static str>,
}

const fn prim(
    id: PrimitiveId,
    go: &'static str,
    java: &'static str,
    boxed: &'static str,
    default_literal: &'static str,
    boxed_default_literal: &'static str,
    note: Option<&'static str>,
) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        go,
        java,
        boxed,
        default_literal,
        boxed_default_literal,
        is_java_primitive: true,
        note,
    }
}

const fn reference(id: PrimitiveId, go: &'static str, java: &'static str, default_literal: &'static str) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        go,
        java,
        boxed: java,
        default_literal,
        boxed_default_literal: default_literal,
        is_java_primitive: false,
        note: None,
    }
}

const UNSIGNED_NOTE: &str = "Java has no unsigned integer types; the value is widened to the next signed type.";

/// Registry of Go predeclared types.
pub const PRIMITIVES: &[PrimitiveInfo] = &[
    prim(PrimitiveId::Bool, "bool", "boolean", "Boolean", "false", "false", None),
    reference(PrimitiveId::String, "string", "String", "\"\""),
    prim(
        PrimitiveId::Int,
        "int",
        "int",
        "Integer",
        "0",
        "0",
        Some("Go int is 32 or 64 bits depending on the platform; Java int is always 32 bits."),
    ),
    prim(PrimitiveId::Int8, "int8", "byte", "Byte", "0", "0", None),
    prim(PrimitiveId::Int16, "int16", "short", "Short", "0", "0", None),
    prim(PrimitiveId::Int32, "int32", "int", "Integer", "0", "0", None),
    prim(PrimitiveId::Int64, "int64", "long", "Long", "0L", "0L", None),
    prim(PrimitiveId::Uint, "uint", "long", "Long", "0L", "0L", Some(UNSIGNED_NOTE)),
    prim(
        PrimitiveId::Uint8,
        "uint8",
        "byte",
        "Byte",
        "0",
        "0",
        Some("Go uint8 ranges 0..255 while Java byte is signed (-128..127)."),
    ),
    prim(PrimitiveId::Uint16, "uint16", "int", "Integer", "0", "0", Some(UNSIGNED_NOTE)),
    prim(PrimitiveId::Uint32, "uint32", "long", "Long", "0L", "0L", Some(UNSIGNED_NOTE)),
    prim(
        PrimitiveId::Uint64,
        "uint64",
        "long",
        "Long",
        "0L",
        "0L",
        Some("Java has no unsigned 64-bit type; values above Long.MAX_VALUE need java.math.BigInteger."),
    ),
    prim(PrimitiveId::Uintptr, "uintptr", "long", "Long", "0L", "0L", Some(UNSIGNED_NOTE)),
    prim(
        PrimitiveId::Byte,
        "byte",
        "byte",
        "Byte",
        "0",
        "0",
        Some("Go byte is an alias for uint8 (0..255) while Java byte is signed (-128..127)."),
    ),
    prim(
        PrimitiveId::Rune,
        "rune",
        "int",
        "Integer",
        "0",
        "0",
        Some("A Go rune is a Unicode code point (int32); Java char is only 16 bits, so int is used."),
    ),
    prim(PrimitiveId::Float32, "float32", "float", "Float", "0.0f", "0.0f", None),
    prim(PrimitiveId::Float64, "float64", "double", "Double", "0.0", "0.0", None),
    PrimitiveInfo {
        note: Some("Java has no complex number type."),
        ..reference(PrimitiveId::Complex64, "complex64", "Object", "null")
    },
    PrimitiveInfo {
        note: Some("Java has no complex number type."),
        ..reference(PrimitiveId::Complex128, "complex128", "Object", "null")
    },
    PrimitiveInfo {
        note: Some("The empty interface accepts any value, like java.lang.Object."),
        ..reference(PrimitiveId::Any, "any", "Object", "null")
    },
];

/// Resolve a Go type spelling to a [`PrimitiveId`].
///
/// ## Notes
/// - `interface{}` is accepted as a spelling of `any`.
pub fn from_str(name: &str) -> Option<PrimitiveId> {
    if name == "interface{}" {
        return Some(PrimitiveId::Any);
    }
    PRIMITIVES.iter().find(|p| p.go == name).map(|p| p.id)
}

/// Return the mapping metadata for a predeclared type.
pub fn info(id: PrimitiveId) -> &'static PrimitiveInfo {
    PRIMITIVES
        .iter()
        .find(|p| p.id == id)
        .expect("INVARIANT: every PrimitiveId has a registry entry")
}

/// Return `true` for any predeclared type name the resolver must never look up (primitives and `error`).
pub fn is_builtin_type_name(name: &str) -> bool {
    name == ERROR_TYPE || from_str(name).is_some()
}

/// Return the boxed counterpart of a Java primitive spelling (`int` → `Integer`).
///
/// ## Returns
/// - `Some(boxed)` if `java` is a Java primitive type, `None` for reference types.
pub fn boxed_counterpart(java: &str) -> Option<&'static str> {
    match java {
        "boolean" => Some("Boolean"),
        "byte" => Some("Byte"),
        "short" => Some("Short"),
        "char" => Some("Character"),
        "int" => Some("Integer"),
        "long" => Some("Long"),
        "float" => Some("Float"),
        "double" => Some("Double"),
        _ => None,
    }
}

/// Return `true` if `java` names a Java primitive type.
pub fn is_java_primitive(java: &str) -> bool {
    boxed_counterpart(java).is_some()
}

/// Return the stub-body default literal for a Java type spelling.
///
/// Priority follows the generator's contract: numeric zero, `false`, empty string, and `null` for everything else
/// (containers are handled by the generator because they need an allocation expression).
pub fn default_literal_for_java(java: &str) -> &'static str {
    match java {
        "int" | "short" | "byte" | "Integer" | "Short" | "Byte" => "0",
        "long" | "Long" => "0L",
        "float" | "Float" => "0.0f",
        "double" | "Double" => "0.0",
        "char" => "'\\0'",
        "boolean" | "Boolean" => "false",
        "String" => "\"\"",
        _ => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_boxed_spelling_is_a_reference_type() {
        for p in PRIMITIVES {
            assert!(!is_java_primitive(p.boxed), "{} boxes to a primitive", p.go);
        }
    }

    #[test]
    fn primitive_entries_agree_with_boxed_counterpart() {
        for p in PRIMITIVES.iter().filter(|p| p.is_java_primitive) {
            assert_eq!(boxed_counterpart(p.java), Some(p.boxed), "{}", p.go);
        }
    }

    #[test]
    fn interface_literal_is_any() {
        assert_eq!(from_str("interface{}"), Some(PrimitiveId::Any));
        assert_eq!(info(PrimitiveId::Any).java, "Object");
    }

    #[test]
    fn error_is_builtin_but_not_primitive() {
        assert!(is_builtin_type_name("error"));
        assert_eq!(from_str("error"), None);
        assert!(!is_builtin_type_name("Person"));
    }

    #[test]
    fn default_literals_follow_priority() {
        assert_eq!(default_literal_for_java("int"), "0");
        assert_eq!(default_literal_for_java("double"), "0.0");
        assert_eq!(default_literal_for_java("boolean"), "false");
        assert_eq!(default_literal_for_java("String"), "\"\"");
        assert_eq!(default_literal_for_java("Person"), "null");
    }

    #[test]
    fn table_defaults_match_java_defaults() {
        for p in PRIMITIVES {
            assert_eq!(p.default_literal, default_literal_for_java(p.java), "{}", p.go);
            assert_eq!(p.boxed_default_literal, default_literal_for_java(p.boxed), "{}", p.go);
        }
    }
}
