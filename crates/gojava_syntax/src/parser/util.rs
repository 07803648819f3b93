/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into “decl” or “types”: identifier
/// parsing, initializer spans, and doc-comment attachment.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("Expected identifier")),
        }
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, CompileError> {
        let span = self.current_span();
        let name = self.identifier()?;
        Ok(Spanned::new(name, span))
    }

    fn identifier_list(&mut self) -> Result<Vec<Ident>, CompileError> {
        let mut idents = vec![self.identifier()?];
        while self.match_punct(PunctuationId::Comma) {
            idents.push(self.identifier()?);
        }
        Ok(idents)
    }

    /// Return `true` at the end of a `const`/`var` spec.
    fn at_spec_end(&self) -> bool {
        self.check_terminator() || self.check_punct(PunctuationId::RParen) || self.is_at_end()
    }

    /// Parse a comma-separated list of initializer expressions, returning one span per expression.
    ///
    /// Expressions are not parsed; each one extends to the next comma or terminator at bracket depth 0.
    fn expression_list(&mut self) -> Result<Vec<Span>, CompileError> {
        let mut spans = Vec::new();
        loop {
            let start = self.current_span();
            let mut depth = 0usize;
            let mut consumed = false;
            while !self.is_at_end() {
                let kind = &self.peek().kind;
                let closes_group = matches!(
                    kind,
                    TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::RBrace | PunctuationId::RBracket)
                );
                if depth == 0 && (kind.is_terminator() || kind.is_punctuation(PunctuationId::Comma) || closes_group) {
                    break;
                }
                depth = adjust_depth(depth, kind);
                self.advance();
                consumed = true;
            }
            if !consumed {
                return Err(self.unexpected("Expected expression"));
            }
            spans.push(start.merge(self.previous_span()));
            if !self.match_punct(PunctuationId::Comma) {
                return Ok(spans);
            }
        }
    }

    /// Collect the doc comment ending on the line directly above `line`.
    ///
    /// ## Notes
    /// - Only comments on their own lines count; a trailing comment belongs to the code before it.
    /// - Adjacent comment lines are joined; a blank line ends the block.
    /// - Compiler directives (`//go:generate`, `//line`) are dropped.
    fn doc_before(&self, line: u32) -> Option<String> {
        let mut idx = self
            .comments
            .iter()
            .rposition(|c| c.own_line && c.line_end + 1 == line)?;
        let mut block = vec![&self.comments[idx]];
        while idx > 0 {
            let prev = &self.comments[idx - 1];
            if prev.own_line && prev.line_end + 1 == self.comments[idx].line_start {
                block.push(prev);
                idx -= 1;
            } else {
                break;
            }
        }
        block.reverse();
        let text = block
            .iter()
            .filter(|c| !c.text.starts_with("//go:") && !c.text.starts_with("//line "))
            .map(|c| c.body())
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() { None } else { Some(text) }
    }
}
