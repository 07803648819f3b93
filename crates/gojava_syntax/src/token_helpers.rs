//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers reduce repetitive `matches!(...)` at call sites and make ID-based tokens easy to test.

use crate::lexer::{Token, TokenKind};
use gojava_core::lang::keywords::KeywordId;
use gojava_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for statement terminators: inserted semicolons and explicit `;`.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Punctuation(PunctuationId::Semicolon)
        )
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.is_keyword(id)`.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    /// Convenience wrapper for `self.kind.is_punctuation(id)`.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }
}
