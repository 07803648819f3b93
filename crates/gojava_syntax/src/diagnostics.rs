//! Diagnostics produced by the lexer and parser.

use crate::ast::Span;

/// A syntax-level error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
    /// Name of the declaration being parsed when the error occurred, if known.
    pub declaration: Option<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
            declaration: None,
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn lexical(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            ..Self::new(message, span)
        }
    }

    /// A construct that is valid Go but deliberately not translated (e.g. generics).
    pub fn unsupported(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Attribute the error to a declaration, unless an inner declaration already claimed it.
    pub fn in_declaration(mut self, name: &str) -> Self {
        if self.declaration.is_none() {
            self.declaration = Some(name.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Lexical,
    Syntax,
    Unsupported,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Convert a byte offset to a 0-based `(line, column)` pair, counting columns in characters.
pub fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let mut line = 0u32;
    let mut col = 0u32;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        let err = CompileError::syntax("expected ')'".into(), Span::new(1, 2));
        assert_eq!(err.to_string(), "syntax error: expected ')'");
    }

    #[test]
    fn builders_accumulate() {
        let err = CompileError::unsupported("generic type `List`".into(), Span::default())
            .with_note("type parameters are not translated")
            .with_hint("instantiate the type by hand");
        assert_eq!(err.kind, ErrorKind::Unsupported);
        assert_eq!(err.notes.len(), 1);
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn innermost_declaration_wins() {
        let err = CompileError::syntax("bad".into(), Span::default())
            .in_declaration("inner")
            .in_declaration("outer");
        assert_eq!(err.declaration.as_deref(), Some("inner"));
    }

    #[test]
    fn line_col_counts_chars() {
        let src = "package a\nfunc é() {}\n";
        assert_eq!(line_col(src, 0), (0, 0));
        assert_eq!(line_col(src, 10), (1, 0));
        assert_eq!(line_col(src, 15), (1, 5));
    }
}
