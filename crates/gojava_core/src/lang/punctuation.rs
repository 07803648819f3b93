//! Define the operator and punctuation vocabulary of the Go source language.
//!
//! The lexer resolves operators by longest match against [`PUNCTUATION`]; the parser only cares about a handful of
//! them (brackets, `*`, `.`, `...`, `,`, `;`, `=`), but every Go operator has an entry so function bodies and
//! initializer expressions tokenize cleanly before they are skipped.
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::longest_match("...T"), Some((PunctuationId::Ellipsis, 3)));
//! assert_eq!(punctuation::longest_match(":= 1"), Some((PunctuationId::Define, 2)));
//! assert_eq!(punctuation::as_str(PunctuationId::LBrace), "{");
//! ```

/// Stable identifier for Go operators and delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Dot,
    Ellipsis,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AndNot,
    Tilde,
    Assign,
    Define,
    Arrow,
    Not,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Inc,
    Dec,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
}

/// Metadata for an operator or delimiter.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub spelling: &'static str,
}

const fn p(id: PunctuationId, spelling: &'static str) -> PunctuationInfo {
    PunctuationInfo { id, spelling }
}

/// Registry of Go operators and delimiters, longest spellings first so a linear scan yields the longest match.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    p(PunctuationId::Ellipsis, "..."),
    p(PunctuationId::ShlAssign, "<<="),
    p(PunctuationId::ShrAssign, ">>="),
    p(PunctuationId::AndNotAssign, "&^="),
    p(PunctuationId::Define, ":="),
    p(PunctuationId::Arrow, "<-"),
    p(PunctuationId::Shl, "<<"),
    p(PunctuationId::Shr, ">>"),
    p(PunctuationId::AndNot, "&^"),
    p(PunctuationId::Eq, "=="),
    p(PunctuationId::NotEq, "!="),
    p(PunctuationId::LtEq, "<="),
    p(PunctuationId::GtEq, ">="),
    p(PunctuationId::AndAnd, "&&"),
    p(PunctuationId::OrOr, "||"),
    p(PunctuationId::Inc, "++"),
    p(PunctuationId::Dec, "--"),
    p(PunctuationId::PlusAssign, "+="),
    p(PunctuationId::MinusAssign, "-="),
    p(PunctuationId::StarAssign, "*="),
    p(PunctuationId::SlashAssign, "/="),
    p(PunctuationId::PercentAssign, "%="),
    p(PunctuationId::AmpAssign, "&="),
    p(PunctuationId::PipeAssign, "|="),
    p(PunctuationId::CaretAssign, "^="),
    p(PunctuationId::LParen, "("),
    p(PunctuationId::RParen, ")"),
    p(PunctuationId::LBracket, "["),
    p(PunctuationId::RBracket, "]"),
    p(PunctuationId::LBrace, "{"),
    p(PunctuationId::RBrace, "}"),
    p(PunctuationId::Comma, ","),
    p(PunctuationId::Semicolon, ";"),
    p(PunctuationId::Dot, "."),
    p(PunctuationId::Colon, ":"),
    p(PunctuationId::Plus, "+"),
    p(PunctuationId::Minus, "-"),
    p(PunctuationId::Star, "*"),
    p(PunctuationId::Slash, "/"),
    p(PunctuationId::Percent, "%"),
    p(PunctuationId::Amp, "&"),
    p(PunctuationId::Pipe, "|"),
    p(PunctuationId::Caret, "^"),
    p(PunctuationId::Tilde, "~"),
    p(PunctuationId::Assign, "="),
    p(PunctuationId::Not, "!"),
    p(PunctuationId::Lt, "<"),
    p(PunctuationId::Gt, ">"),
];

/// Find the longest operator/delimiter at the start of `input`.
///
/// ## Returns
/// - `Some((id, byte_len))` for the longest spelling that prefixes `input`.
/// - `None` if `input` does not start with any known operator.
pub fn longest_match(input: &str) -> Option<(PunctuationId, usize)> {
    PUNCTUATION
        .iter()
        .find(|p| input.starts_with(p.spelling))
        .map(|p| (p.id, p.spelling.len()))
}

/// Return the spelling of an operator or delimiter.
pub fn as_str(id: PunctuationId) -> &'static str {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.spelling)
        .unwrap_or("")
}

/// Return `true` if a newline after this token triggers automatic semicolon insertion.
///
/// Per the Go spec this holds for `++`, `--`, `)`, `]` and `}`.
pub fn terminates_line(id: PunctuationId) -> bool {
    matches!(
        id,
        PunctuationId::Inc | PunctuationId::Dec | PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_prefers_longer_spellings() {
        assert_eq!(longest_match("<<= 2"), Some((PunctuationId::ShlAssign, 3)));
        assert_eq!(longest_match("<- ch"), Some((PunctuationId::Arrow, 2)));
        assert_eq!(longest_match("< b"), Some((PunctuationId::Lt, 1)));
        assert_eq!(longest_match("&^x"), Some((PunctuationId::AndNot, 2)));
    }

    #[test]
    fn no_match_for_identifiers() {
        assert_eq!(longest_match("abc"), None);
        assert_eq!(longest_match(""), None);
    }

    #[test]
    fn table_is_ordered_longest_first() {
        let lens: Vec<usize> = PUNCTUATION.iter().map(|p| p.spelling.len()).collect();
        let mut sorted = lens.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lens, sorted);
    }

    #[test]
    fn closing_delimiters_terminate_lines() {
        assert!(terminates_line(PunctuationId::RParen));
        assert!(terminates_line(PunctuationId::RBrace));
        assert!(!terminates_line(PunctuationId::LBrace));
        assert!(!terminates_line(PunctuationId::Comma));
    }
}
