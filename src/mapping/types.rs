//! Java-side type values produced by the type mapper.

use std::collections::BTreeSet;
use std::fmt;

use gojava_core::lang::primitives;

pub const JAVA_LIST: &str = "java.util.List";
pub const JAVA_MAP: &str = "java.util.Map";
pub const JAVA_ARRAY_LIST: &str = "java.util.ArrayList";
pub const JAVA_HASH_MAP: &str = "java.util.HashMap";

/// Shape of a mapped Java type; decides stub defaults and boxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JavaKind {
    /// `int`, `double`, `boolean`, ...
    Primitive,
    /// `Integer`, `Double`, `Boolean`, ...
    Boxed,
    String,
    List,
    Map,
    /// The mapping of Go's `error`.
    Exception,
    /// Declared, resolved, cross-referenced or pass-through class names.
    Reference,
    /// `Object` standing in for a Go type with no structural mapping.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    /// From the standard-library cross-reference table; belongs in doc comments.
    CrossReference,
    /// A lossy primitive mapping; belongs in learning notes.
    Primitive,
}

/// An explanation attached to a mapping decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingNote {
    pub go: String,
    pub java: String,
    pub text: &'static str,
    pub source: NoteSource,
}

/// A mapped Java type together with everything the generator needs to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaType {
    /// Rendered Java type, including any trailing gap comment.
    pub name: String,
    /// `name` without the gap comment. Container type arguments are built from this.
    pub bare: String,
    pub kind: JavaKind,
    /// Fully-qualified imports the rendering needs.
    pub imports: BTreeSet<&'static str>,
    pub notes: Vec<MappingNote>,
    /// Qualified Go names with no mapping and no known declaration.
    pub unresolved: Vec<String>,
    /// Gap comments for this type and its components, rendered once after the outermost type.
    pub gaps: Vec<String>,
}

impl JavaType {
    pub(crate) fn new(name: impl Into<String>, kind: JavaKind) -> Self {
        let name = name.into();
        Self {
            bare: name.clone(),
            name,
            kind,
            imports: BTreeSet::new(),
            notes: Vec::new(),
            unresolved: Vec::new(),
            gaps: Vec::new(),
        }
    }

    /// A type rendered as `bare /* gap */`.
    pub(crate) fn with_gap(bare: impl Into<String>, kind: JavaKind, gap: String) -> Self {
        let mut out = Self::new(bare, kind);
        out.gaps.push(gap);
        out.render();
        out
    }

    /// Merge the imports, notes and gaps of a component type.
    pub(crate) fn absorb(&mut self, component: &JavaType) {
        self.imports.extend(component.imports.iter().copied());
        self.notes.extend(component.notes.iter().cloned());
        self.unresolved.extend(component.unresolved.iter().cloned());
        self.gaps.extend(component.gaps.iter().cloned());
        self.render();
    }

    fn render(&mut self) {
        self.name = if self.gaps.is_empty() {
            self.bare.clone()
        } else {
            format!("{} /* {} */", self.bare, self.gaps.join("; "))
        };
    }

    /// Replace a primitive with its boxed counterpart; any other type is returned unchanged.
    pub fn boxed(mut self) -> Self {
        if self.kind == JavaKind::Primitive {
            if let Some(boxed) = primitives::boxed_counterpart(&self.name) {
                self.name = boxed.to_string();
                self.bare = boxed.to_string();
                self.kind = JavaKind::Boxed;
            }
        }
        self
    }

    /// Return `true` if this is the mapping of Go's `error`, which the generator turns into a `throws` clause.
    pub fn signals_error(&self) -> bool {
        self.kind == JavaKind::Exception
    }

    /// The value a stub body returns for this type.
    ///
    /// ## Notes
    /// - Priority: numeric zero, `false`, empty string, empty container, `null`.
    pub fn default_value(&self) -> String {
        match self.kind {
            JavaKind::Primitive | JavaKind::Boxed => primitives::default_literal_for_java(&self.name).to_string(),
            JavaKind::String => "\"\"".to_string(),
            JavaKind::List => "new ArrayList<>()".to_string(),
            JavaKind::Map => "new HashMap<>()".to_string(),
            JavaKind::Exception | JavaKind::Reference | JavaKind::Opaque => "null".to_string(),
        }
    }

    /// Import needed by [`JavaType::default_value`], if any.
    pub fn default_import(&self) -> Option<&'static str> {
        match self.kind {
            JavaKind::List => Some(JAVA_ARRAY_LIST),
            JavaKind::Map => Some(JAVA_HASH_MAP),
            _ => None,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
