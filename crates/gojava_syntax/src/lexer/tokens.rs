//! Token types for the Go lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for operators and delimiters
//!
//! ## Notes
//! - Literal tokens keep their source spelling; the translator never evaluates them beyond `iota` arithmetic and
//!   type inference, both of which work on text.
//! - `Newline` is an *inserted* semicolon (Go's automatic semicolon rule); explicit `;` is
//!   `Punctuation(Semicolon)`. The parser treats both as statement terminators.

use crate::ast::Span;
use gojava_core::lang::keywords::{self, KeywordId};
use gojava_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(String),
    Float(String),
    Imag(String),
    /// Rune literal including its quotes.
    Rune(String),
    /// Interpreted string literal including its quotes.
    String(String),
    /// Raw (backquoted) string literal including its backquotes.
    RawString(String),

    // ========== Special ==========
    Newline,
    Eof,
}

impl TokenKind {
    /// Return `true` if a line break after this token inserts a semicolon.
    pub fn ends_statement(&self) -> bool {
        match self {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Imag(_)
            | TokenKind::Rune(_)
            | TokenKind::String(_)
            | TokenKind::RawString(_) => true,
            TokenKind::Keyword(id) => keywords::info(*id).terminates_line,
            TokenKind::Punctuation(id) => punctuation::terminates_line(*id),
            TokenKind::Newline | TokenKind::Eof => false,
        }
    }

    /// Return the literal spelling for literal tokens.
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            TokenKind::Int(s)
            | TokenKind::Float(s)
            | TokenKind::Imag(s)
            | TokenKind::Rune(s)
            | TokenKind::String(s)
            | TokenKind::RawString(s) => Some(s),
            _ => None,
        }
    }
}

/// A token with its kind, source span and 0-based starting line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }
}

/// A comment retained in the side table for doc-comment attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Full comment text including the `//` or `/* */` markers.
    pub text: String,
    pub span: Span,
    pub line_start: u32,
    pub line_end: u32,
    /// `true` if no token precedes the comment on its first line.
    pub own_line: bool,
    pub is_block: bool,
}

impl Comment {
    /// Comment text with markers and one leading space stripped.
    pub fn body(&self) -> String {
        if self.is_block {
            let inner = self
                .text
                .strip_prefix("/*")
                .and_then(|s| s.strip_suffix("*/"))
                .unwrap_or(&self.text);
            inner
                .lines()
                .map(|l| l.trim().trim_start_matches('*').trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            let inner = self.text.strip_prefix("//").unwrap_or(&self.text);
            inner.strip_prefix(' ').unwrap_or(inner).trim_end().to_string()
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
