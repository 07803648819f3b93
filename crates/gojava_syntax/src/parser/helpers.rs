/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Terminator handling (`skip_terminators`, `expect_terminator`)
/// - Error recovery (`synchronize`, `skip_spec`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn check_ident(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
    }

    fn check_terminator(&self) -> bool {
        self.peek().kind.is_terminator()
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Build a syntax error at the current token.
    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(
            format!("{}, found {}", msg, describe(&self.peek().kind)),
            self.current_span(),
        )
    }

    /// Consume a statement terminator. A closing `)` or `}` (or EOF) also ends a statement and is left in place.
    fn expect_terminator(&mut self, msg: &str) -> Result<(), CompileError> {
        if self.check_terminator() {
            self.advance();
            Ok(())
        } else if self.check_punct(PunctuationId::RParen) || self.check_punct(PunctuationId::RBrace) || self.is_at_end()
        {
            Ok(())
        } else {
            Err(self.unexpected(msg))
        }
    }

    fn skip_terminators(&mut self) {
        while self.check_terminator() {
            self.advance();
        }
    }

    /// Skip to the start of the next top-level declaration.
    ///
    /// Tracks bracket depth so a failed function signature also skips its body: recovery stops at a terminator at
    /// depth 0 (consumed) or at a declaration keyword at depth 0.
    fn synchronize(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            let at_declaration = kind
                .keyword_id()
                .is_some_and(gojava_core::lang::keywords::is_declaration_keyword);
            if depth == 0 && self.pos > start && at_declaration {
                return;
            }
            if depth == 0 && kind.is_terminator() {
                self.advance();
                return;
            }
            depth = adjust_depth(depth, kind);
            self.advance();
        }
    }

    /// Skip the remainder of a spec inside a parenthesized group.
    ///
    /// Stops (without consuming) at a terminator or at the group's closing `)`.
    fn skip_spec(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            if depth == 0 && (kind.is_terminator() || kind.is_punctuation(PunctuationId::RParen)) {
                return;
            }
            depth = adjust_depth(depth, kind);
            self.advance();
        }
    }

    /// Consume a balanced bracket group starting at the current opening token, returning its span.
    fn skip_balanced(&mut self, open: PunctuationId, close: PunctuationId) -> Result<Span, CompileError> {
        let start = self.current_span();
        self.expect_punct(open, &format!("Expected '{}'", gojava_core::lang::punctuation::as_str(open)))?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                return Err(CompileError::syntax(
                    format!(
                        "Unclosed '{}'",
                        gojava_core::lang::punctuation::as_str(open)
                    ),
                    start,
                ));
            }
            let kind = &self.peek().kind;
            if kind.is_punctuation(open) {
                depth += 1;
            } else if kind.is_punctuation(close) {
                depth -= 1;
            }
            self.advance();
        }
        Ok(start.merge(self.previous_span()))
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current_span()
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Return `true` if the current token can start a type expression.
    fn is_at_type_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_) => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::Star | PunctuationId::LBracket | PunctuationId::LParen | PunctuationId::Arrow
            ),
            TokenKind::Keyword(k) => matches!(
                k,
                KeywordId::Map | KeywordId::Chan | KeywordId::Func | KeywordId::Struct | KeywordId::Interface
            ),
            _ => false,
        }
    }
}

fn adjust_depth(depth: usize, kind: &TokenKind) -> usize {
    match kind {
        TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth + 1,
        TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
            depth.saturating_sub(1)
        }
        _ => depth,
    }
}

/// Human-readable token description for error messages.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(id) => format!("keyword '{}'", gojava_core::lang::keywords::as_str(*id)),
        TokenKind::Punctuation(id) => format!("'{}'", gojava_core::lang::punctuation::as_str(*id)),
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        other => match other.literal_text() {
            Some(text) => format!("literal {text}"),
            None => format!("{other:?}"),
        },
    }
}
