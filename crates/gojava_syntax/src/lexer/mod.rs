//! Lexer for Go source text
//!
//! Handles tokenization including:
//! - Keywords and identifiers (Unicode letters allowed, as in Go)
//! - Numeric, rune, interpreted-string and raw-string literals
//! - Operators and delimiters (longest match against the punctuation registry)
//! - Automatic semicolon insertion (emitted as `Newline` tokens)
//! - A comment side table used to attach doc comments to declarations
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Comment)
//! - `literals` - String/rune/number scanning

mod literals;
pub mod tokens;

pub use tokens::{Comment, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use gojava_core::lang::punctuation;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Semicolon insertion (simplified):
//
// [token] → see '\n' → last token ends a statement? → emit Newline
//                                                  ↘ otherwise skip
// A block comment spanning lines counts as a line break; EOF counts as one too.
// ============================================================================

/// Output of a lexing pass. Lexing never aborts: errors are collected and the token stream is always usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub errors: Vec<CompileError>,
}

/// Lexer for Go source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// 0-based line of `current_pos`.
    line: u32,
    /// Line of the most recent non-`Newline` token.
    last_token_line: Option<u32>,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 0,
            last_token_line: None,
            tokens: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Lexed {
        loop {
            self.skip_blanks();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        self.insert_semicolon(self.current_pos);
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
            self.line,
        ));

        Lexed {
            tokens: self.tokens,
            comments: self.comments,
            errors: self.errors,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ========================================================================
    // Token emission
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, start: usize, line: u32) {
        self.last_token_line = Some(line);
        self.tokens
            .push(Token::new(kind, Span::new(start, self.current_pos), line));
    }

    /// Emit an inserted semicolon if the previous token ends a statement.
    fn insert_semicolon(&mut self, at: usize) {
        if self.tokens.last().is_some_and(|t| t.kind.ends_statement()) {
            let line = self.tokens.last().map_or(self.line, |t| t.line);
            self.tokens.push(Token::new(TokenKind::Newline, Span::new(at, at), line));
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors.push(CompileError::lexical(
            message.into(),
            Span::new(start, self.current_pos.max(start + 1)),
        ));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;
        let line = self.line;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => self.insert_semicolon(start),
            '/' if self.peek() == Some('/') => self.scan_line_comment(start, line),
            '/' if self.peek() == Some('*') => self.scan_block_comment(start, line),
            '"' => self.scan_string(start, line),
            '`' => self.scan_raw_string(start, line),
            '\'' => self.scan_rune(start, line),
            c if c.is_ascii_digit() => self.scan_number(start, line, c),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start, line, c),
            c if is_ident_start(c) => self.scan_identifier(start, line),
            _ => self.scan_punctuation(start, line, c),
        }
    }

    fn scan_punctuation(&mut self, start: usize, line: u32, c: char) {
        match punctuation::longest_match(&self.source[start..]) {
            Some((id, len)) => {
                // Every registry spelling is ASCII, so byte length equals char count.
                for _ in 1..len {
                    self.advance();
                }
                self.add_token(TokenKind::Punctuation(id), start, line);
            }
            None => self.error(format!("unexpected character '{c}'"), start),
        }
    }

    fn scan_line_comment(&mut self, start: usize, line: u32) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        let text = self.source[start..self.current_pos].trim_end_matches('\r');
        self.comments.push(Comment {
            text: text.to_string(),
            span: Span::new(start, self.current_pos),
            line_start: line,
            line_end: line,
            own_line: self.last_token_line != Some(line),
            is_block: false,
        });
    }

    fn scan_block_comment(&mut self, start: usize, line: u32) {
        self.advance(); // '*'
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '*' && self.match_char('/') {
                terminated = true;
                break;
            }
        }
        if !terminated {
            self.error("unterminated block comment", start);
        }
        let end_line = self.line;
        self.comments.push(Comment {
            text: self.source[start..self.current_pos].to_string(),
            span: Span::new(start, self.current_pos),
            line_start: line,
            line_end: end_line,
            own_line: self.last_token_line != Some(line),
            is_block: true,
        });
        if end_line > line {
            self.insert_semicolon(start);
        }
    }

    fn scan_identifier(&mut self, start: usize, line: u32) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start, line);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start, line);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Lexed {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gojava_core::lang::keywords::KeywordId;
    use gojava_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let lexed = lex(p.spelling);
            assert!(lexed.errors.is_empty(), "{} produced errors", p.spelling);
            assert_eq!(
                lexed.tokens[0].kind,
                TokenKind::Punctuation(p.id),
                "{} lexed as something else",
                p.spelling
            );
        }
    }

    #[test]
    fn test_semicolon_after_identifier() {
        assert_eq!(
            kinds("package demo\n"),
            vec![
                TokenKind::Keyword(KeywordId::Package),
                ident("demo"),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_brace_or_comma() {
        let toks = kinds("type P struct {\n\tName string\n}\n");
        assert_eq!(
            toks,
            vec![
                TokenKind::Keyword(KeywordId::Type),
                ident("P"),
                TokenKind::Keyword(KeywordId::Struct),
                TokenKind::Punctuation(PunctuationId::LBrace),
                ident("Name"),
                ident("string"),
                TokenKind::Newline,
                TokenKind::Punctuation(PunctuationId::RBrace),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_semicolon_at_eof_without_newline() {
        let toks = kinds("var x int");
        assert_eq!(toks[toks.len() - 2], TokenKind::Newline);
    }

    #[test]
    fn test_return_keyword_terminates() {
        let toks = kinds("return\n");
        assert_eq!(
            toks,
            vec![TokenKind::Keyword(KeywordId::Return), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_literals() {
        let toks = kinds(r#"42 0x1F 3.14 1e9 .5 2i 'a' "hi\"x" `raw`"#);
        assert_eq!(
            &toks[..9],
            &[
                TokenKind::Int("42".into()),
                TokenKind::Int("0x1F".into()),
                TokenKind::Float("3.14".into()),
                TokenKind::Float("1e9".into()),
                TokenKind::Float(".5".into()),
                TokenKind::Imag("2i".into()),
                TokenKind::Rune("'a'".into()),
                TokenKind::String(r#""hi\"x""#.into()),
                TokenKind::RawString("`raw`".into()),
            ]
        );
    }

    #[test]
    fn test_ellipsis_is_not_a_number() {
        let toks = kinds("...int");
        assert_eq!(toks[0], TokenKind::Punctuation(PunctuationId::Ellipsis));
        assert_eq!(toks[1], ident("int"));
    }

    #[test]
    fn test_comments_are_side_tabled() {
        let lexed = lex("// Add sums.\nfunc Add() {} // trailing\n");
        assert_eq!(lexed.comments.len(), 2);
        assert!(lexed.comments[0].own_line);
        assert_eq!(lexed.comments[0].body(), "Add sums.");
        assert_eq!(lexed.comments[0].line_end, 0);
        assert!(!lexed.comments[1].own_line);
        assert!(!lexed.tokens.iter().any(|t| matches!(&t.kind, TokenKind::Ident(s) if s.contains("//"))));
    }

    #[test]
    fn test_multiline_block_comment_acts_as_newline() {
        let toks = kinds("x /* a\nb */ y");
        assert_eq!(toks, vec![ident("x"), TokenKind::Newline, ident("y"), TokenKind::Newline, TokenKind::Eof]);
    }

    #[test]
    fn test_unterminated_string_is_recovered() {
        let lexed = lex("var s = \"oops\nvar t int\n");
        assert_eq!(lexed.errors.len(), 1);
        assert!(lexed.errors[0].message.contains("unterminated"));
        assert!(lexed.tokens.iter().any(|t| t.kind == ident("t")));
    }

    #[test]
    fn test_unexpected_character() {
        let lexed = lex("a $ b");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.tokens[0].kind, ident("a"));
        assert_eq!(lexed.tokens[1].kind, ident("b"));
    }

    #[test]
    fn test_token_lines() {
        let lexed = lex("package a\n\nfunc F() {}\n");
        let func = lexed
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Keyword(KeywordId::Func))
            .expect("func token");
        assert_eq!(func.line, 2);
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(kinds("名前")[0], ident("名前"));
    }
}
