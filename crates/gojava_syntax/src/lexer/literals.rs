//! String, rune and numeric literal scanning.

use super::Lexer;
use super::tokens::TokenKind;

impl Lexer<'_> {
    /// Scan an interpreted string literal; the opening `"` has been consumed.
    pub(super) fn scan_string(&mut self, start: usize, line: u32) {
        if self.scan_quoted('"') {
            let text = self.source[start..self.current_pos].to_string();
            self.add_token(TokenKind::String(text), start, line);
        } else {
            self.error("unterminated string literal", start);
            let text = format!("{}\"", &self.source[start..self.current_pos]);
            self.add_token(TokenKind::String(text), start, line);
        }
    }

    /// Scan a rune literal; the opening `'` has been consumed.
    pub(super) fn scan_rune(&mut self, start: usize, line: u32) {
        if !self.scan_quoted('\'') {
            self.error("unterminated rune literal", start);
        }
        let text = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::Rune(text), start, line);
    }

    /// Consume up to and including `quote`, honoring backslash escapes. Stops before a newline.
    fn scan_quoted(&mut self, quote: char) -> bool {
        while let Some(c) = self.peek() {
            match c {
                '\n' => return false,
                '\\' => {
                    self.advance();
                    if self.peek().is_some_and(|n| n != '\n') {
                        self.advance();
                    }
                }
                c if c == quote => {
                    self.advance();
                    return true;
                }
                _ => {
                    self.advance();
                }
            }
        }
        false
    }

    /// Scan a raw string literal; the opening backquote has been consumed. Raw strings may span lines.
    pub(super) fn scan_raw_string(&mut self, start: usize, line: u32) {
        let mut terminated = false;
        while let Some(c) = self.advance() {
            if c == '`' {
                terminated = true;
                break;
            }
        }
        if !terminated {
            self.error("unterminated raw string literal", start);
        }
        let text = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::RawString(text), start, line);
    }

    /// Scan a numeric literal. `first` (a digit or `.`) has been consumed.
    ///
    /// ## Notes
    /// - Accepts decimal, hex (including hex floats), octal (`0o`/legacy `0`) and binary forms with `_` separators.
    /// - A trailing `i` makes the literal imaginary.
    pub(super) fn scan_number(&mut self, start: usize, line: u32, first: char) {
        let mut is_float = first == '.';

        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
            if self.match_char('.') {
                is_float = true;
                self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
            }
            if matches!(self.peek(), Some('p' | 'P')) {
                is_float = true;
                self.scan_exponent();
            }
        } else if first == '0' && matches!(self.peek(), Some('b' | 'B' | 'o' | 'O')) {
            self.advance();
            self.consume_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.consume_while(|c| c.is_ascii_digit() || c == '_');
            if !is_float && self.peek() == Some('.') {
                is_float = true;
                self.advance();
                self.consume_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                is_float = true;
                self.scan_exponent();
            }
        }

        let imaginary = self.match_char('i');
        let text = self.source[start..self.current_pos].to_string();
        let kind = if imaginary {
            TokenKind::Imag(text)
        } else if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        self.add_token(kind, start, line);
    }

    fn scan_exponent(&mut self) {
        self.advance(); // e/E/p/P
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        self.consume_while(|c| c.is_ascii_digit() || c == '_');
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }
}
