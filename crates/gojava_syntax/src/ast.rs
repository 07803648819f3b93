//! Syntax tree definitions for Go declarations.
//!
//! The tree covers everything above statement level: the package clause, imports, `const`/`var`/`type` specs,
//! function and method signatures, and the full type-expression grammar. Expressions (initializers, array lengths)
//! are kept as source spans, and function bodies only as the span of their braces.

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the spanned text out of `source`, or `""` if the span is out of bounds.
    pub fn text(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A parsed Go source file (or fragment: the package clause is optional).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub package: Option<Spanned<Ident>>,
    pub imports: Vec<Spanned<ImportSpec>>,
    pub declarations: Vec<Spanned<Declaration>>,
}

// ============================================================================
// Imports
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Explicit package name, `.` or `_`.
    pub alias: Option<Ident>,
    /// Unquoted import path.
    pub path: String,
}

// ============================================================================
// Declarations
// ============================================================================

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Const(GenDecl<ValueSpec>),
    Var(GenDecl<ValueSpec>),
    Type(GenDecl<TypeSpec>),
    Func(FuncDecl),
}

/// A `const`/`var`/`type` declaration, either a single spec or a parenthesized group.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl<T> {
    pub specs: Vec<Spanned<T>>,
    pub grouped: bool,
}

/// `names [Type] [= values]`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Spanned<TypeExpr>>,
    /// Initializer expressions, as spans into the source text.
    pub values: Vec<Span>,
    pub doc: Option<String>,
}

/// `Name Type` or `Name = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub alias: bool,
    pub ty: Spanned<TypeExpr>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub receiver: Option<Spanned<ParamDecl>>,
    pub signature: Signature,
    /// Span of the `{ ... }` body, if present.
    pub body: Option<Span>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Spanned<ParamDecl>>,
    pub results: Vec<Spanned<ParamDecl>>,
}

/// One parameter or result. Grouped names (`a, b int`) are already expanded to one entry per name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: Option<Ident>,
    pub ty: Spanned<TypeExpr>,
    pub variadic: bool,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `Name` or `pkg.Name`
    Named { package: Option<Ident>, name: Ident },
    Pointer(Box<Spanned<TypeExpr>>),
    Slice(Box<Spanned<TypeExpr>>),
    /// `[N]T`; the length expression is kept as a span.
    Array { len: Span, elem: Box<Spanned<TypeExpr>> },
    Map { key: Box<Spanned<TypeExpr>>, value: Box<Spanned<TypeExpr>> },
    Chan { dir: ChanDir, elem: Box<Spanned<TypeExpr>> },
    Func(Box<Signature>),
    Struct(Vec<Spanned<FieldDecl>>),
    Interface(Vec<Spanned<InterfaceElem>>),
    /// Instantiated generic type `Name[Args]`.
    Generic { base: Box<Spanned<TypeExpr>>, args: Vec<Spanned<TypeExpr>> },
}

impl TypeExpr {
    /// Return the bare type name if this is a (possibly pointer-wrapped) named type.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            TypeExpr::Pointer(inner) => inner.node.base_name(),
            _ => None,
        }
    }
}

/// A struct field. `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub names: Vec<Ident>,
    pub ty: Spanned<TypeExpr>,
    /// Raw tag literal including its quotes.
    pub tag: Option<String>,
    pub doc: Option<String>,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: Ident, signature: Signature, doc: Option<String> },
    Embedded(Spanned<TypeExpr>),
    /// A type-set constraint (`~int | ~string`); only meaningful for generics.
    Constraint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_and_text() {
        let a = Span::new(2, 4);
        let b = Span::new(6, 9);
        assert_eq!(a.merge(b), Span::new(2, 9));
        assert_eq!(Span::new(0, 4).text("func main"), "func");
        assert_eq!(Span::new(5, 50).text("short"), "");
    }

    #[test]
    fn base_name_sees_through_pointers() {
        let named = Spanned::new(
            TypeExpr::Named {
                package: None,
                name: "Person".into(),
            },
            Span::default(),
        );
        let ptr = TypeExpr::Pointer(Box::new(named));
        assert_eq!(ptr.base_name(), Some("Person"));
        let slice = TypeExpr::Slice(Box::new(Spanned::new(ptr, Span::default())));
        assert_eq!(slice.base_name(), None);
    }
}
