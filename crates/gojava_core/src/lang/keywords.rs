//! Define the reserved keyword vocabulary of the Go source language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) recording canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (Go keywords are all lowercase).
//! - Predeclared identifiers such as `int`, `error` or `iota` are *not* keywords; see
//!   [`crate::lang::primitives`].
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("struct"), Some(KeywordId::Struct));
//! assert_eq!(keywords::info(KeywordId::Struct).category, KeywordCategory::Type);
//! assert_eq!(keywords::from_str("Struct"), None);
//! ```

/// Stable identifier for every Go keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Package,
    Import,
    Const,
    Var,
    Type,
    Func,

    // Type constructors
    Struct,
    Interface,
    Map,
    Chan,

    // Control flow
    Break,
    Case,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Go,
    Goto,
    If,
    Range,
    Return,
    Select,
    Switch,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Starts a top-level declaration (`package`, `import`, `const`, `var`, `type`, `func`).
    Declaration,
    /// Builds a composite type (`struct`, `interface`, `map`, `chan`).
    Type,
    /// Statement-level keyword; only ever seen inside bodies, which are skipped.
    ControlFlow,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// Whether a newline directly after this keyword triggers automatic semicolon insertion.
    pub terminates_line: bool,
}

const fn kw(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        terminates_line: false,
    }
}

const fn terminating(id: KeywordId, canonical: &'static str) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category: KeywordCategory::ControlFlow,
        terminates_line: true,
    }
}

/// Registry of all Go keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    kw(KeywordId::Package, "package", KeywordCategory::Declaration),
    kw(KeywordId::Import, "import", KeywordCategory::Declaration),
    kw(KeywordId::Const, "const", KeywordCategory::Declaration),
    kw(KeywordId::Var, "var", KeywordCategory::Declaration),
    kw(KeywordId::Type, "type", KeywordCategory::Declaration),
    kw(KeywordId::Func, "func", KeywordCategory::Declaration),
    kw(KeywordId::Struct, "struct", KeywordCategory::Type),
    kw(KeywordId::Interface, "interface", KeywordCategory::Type),
    kw(KeywordId::Map, "map", KeywordCategory::Type),
    kw(KeywordId::Chan, "chan", KeywordCategory::Type),
    terminating(KeywordId::Break, "break"),
    kw(KeywordId::Case, "case", KeywordCategory::ControlFlow),
    terminating(KeywordId::Continue, "continue"),
    kw(KeywordId::Default, "default", KeywordCategory::ControlFlow),
    kw(KeywordId::Defer, "defer", KeywordCategory::ControlFlow),
    kw(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    terminating(KeywordId::Fallthrough, "fallthrough"),
    kw(KeywordId::For, "for", KeywordCategory::ControlFlow),
    kw(KeywordId::Go, "go", KeywordCategory::ControlFlow),
    kw(KeywordId::Goto, "goto", KeywordCategory::ControlFlow),
    kw(KeywordId::If, "if", KeywordCategory::ControlFlow),
    kw(KeywordId::Range, "range", KeywordCategory::ControlFlow),
    terminating(KeywordId::Return, "return"),
    kw(KeywordId::Select, "select", KeywordCategory::ControlFlow),
    kw(KeywordId::Switch, "switch", KeywordCategory::ControlFlow),
];

/// Resolve a spelling to a [`KeywordId`].
///
/// ## Returns
/// - `Some(KeywordId)` if `name` is a reserved Go keyword, `None` otherwise.
pub fn from_str(name: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == name).map(|k| k.id)
}

/// Return the canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info(id).canonical
}

/// Return the metadata entry for a keyword.
pub fn info(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Return `true` if the keyword starts a top-level declaration.
pub fn is_declaration_keyword(id: KeywordId) -> bool {
    info(id).category == KeywordCategory::Declaration
}
