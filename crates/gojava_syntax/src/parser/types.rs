/// Type-expression parsing.
///
/// This chunk parses Go type syntax: named and qualified types, pointers, slices, arrays, maps, channels,
/// function types, struct and interface literals, and instantiated generics (`List[int]`). Parameter lists live
/// here too because Go's grouped-name rule (`a, b int`) is resolved against parsed types.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    fn type_expr(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        if self.type_depth >= MAX_TYPE_NESTING {
            return Err(CompileError::syntax(
                format!("type nesting exceeds {MAX_TYPE_NESTING} levels"),
                self.current_span(),
            ));
        }
        self.type_depth += 1;
        let ty = self.nested_type_expr();
        self.type_depth -= 1;
        ty
    }

    fn nested_type_expr(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span();
        let node = match self.peek().kind.clone() {
            TokenKind::Ident(first) => {
                self.advance();
                let (package, name) = if self.match_punct(PunctuationId::Dot) {
                    (Some(first), self.identifier()?)
                } else {
                    (None, first)
                };
                let named = Spanned::new(TypeExpr::Named { package, name }, start.merge(self.previous_span()));
                if self.check_punct(PunctuationId::LBracket) && !self.peek_next().is_punctuation(PunctuationId::RBracket)
                {
                    return self.type_arguments(named);
                }
                return Ok(named);
            }
            TokenKind::Punctuation(PunctuationId::Star) => {
                self.advance();
                TypeExpr::Pointer(Box::new(self.type_expr()?))
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                if self.match_punct(PunctuationId::RBracket) {
                    TypeExpr::Slice(Box::new(self.type_expr()?))
                } else {
                    let len = self.array_length()?;
                    TypeExpr::Array {
                        len,
                        elem: Box::new(self.type_expr()?),
                    }
                }
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after parenthesized type")?;
                return Ok(Spanned::new(inner.node, start.merge(self.previous_span())));
            }
            TokenKind::Punctuation(PunctuationId::Arrow) => {
                self.advance();
                if !self.match_keyword(KeywordId::Chan) {
                    return Err(self.unexpected("Expected 'chan' after '<-'"));
                }
                TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.type_expr()?),
                }
            }
            TokenKind::Keyword(KeywordId::Map) => {
                self.advance();
                self.expect_punct(PunctuationId::LBracket, "Expected '[' after 'map'")?;
                let key = self.type_expr()?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after map key type")?;
                let value = self.type_expr()?;
                TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            TokenKind::Keyword(KeywordId::Chan) => {
                self.advance();
                let dir = if self.match_punct(PunctuationId::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.type_expr()?),
                }
            }
            TokenKind::Keyword(KeywordId::Func) => {
                self.advance();
                TypeExpr::Func(Box::new(self.signature()?))
            }
            TokenKind::Keyword(KeywordId::Struct) => {
                self.advance();
                TypeExpr::Struct(self.struct_fields()?)
            }
            TokenKind::Keyword(KeywordId::Interface) => {
                self.advance();
                TypeExpr::Interface(self.interface_elems()?)
            }
            _ => return Err(self.unexpected("Expected type")),
        };
        Ok(Spanned::new(node, start.merge(self.previous_span())))
    }

    /// `[N]` after the opening bracket has been consumed; returns the span of the length expression.
    fn array_length(&mut self) -> Result<Span, CompileError> {
        let start = self.current_span();
        let mut depth = 0usize;
        loop {
            if self.is_at_end() {
                return Err(self.unexpected("Expected ']' after array length"));
            }
            if depth == 0 && self.check_punct(PunctuationId::RBracket) {
                let span = Span::new(start.start, self.previous_span().end.max(start.start));
                self.advance();
                return Ok(span);
            }
            depth = adjust_depth(depth, &self.peek().kind);
            self.advance();
        }
    }

    /// `Base[T1, T2]`
    fn type_arguments(&mut self, base: Spanned<TypeExpr>) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = base.span;
        self.advance(); // [
        let mut args = vec![self.type_expr()?];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::RBracket) {
                break;
            }
            args.push(self.type_expr()?);
        }
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after type arguments")?;
        Ok(Spanned::new(
            TypeExpr::Generic {
                base: Box::new(base),
                args,
            },
            start.merge(self.previous_span()),
        ))
    }

    // ========================================================================
    // Signatures
    // ========================================================================

    /// `(params) [result | (results)]`
    fn signature(&mut self) -> Result<Signature, CompileError> {
        let params = self.parameters()?;
        let results = if self.check_punct(PunctuationId::LParen) {
            self.parameters()?
        } else if self.is_at_type_start() {
            let ty = self.type_expr()?;
            let span = ty.span;
            vec![Spanned::new(
                ParamDecl {
                    name: None,
                    ty,
                    variadic: false,
                },
                span,
            )]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    /// Parse a parenthesized parameter list, expanding grouped names.
    ///
    /// ## Notes
    /// - Either every entry is named or none is. In a named list, bare identifiers take the type of the next named
    ///   entry (`a, b int, s string`).
    fn parameters(&mut self) -> Result<Vec<Spanned<ParamDecl>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let mut entries = Vec::new();
        self.skip_terminators();
        while !self.check_punct(PunctuationId::RParen) {
            entries.push(self.param_entry()?);
            self.skip_terminators();
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            self.skip_terminators();
        }
        self.skip_terminators();
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;

        let any_named = entries.iter().any(|e| matches!(e, ParamEntry::Named(..)));
        if !any_named {
            return Ok(entries
                .into_iter()
                .filter_map(|e| match e {
                    ParamEntry::Bare(ty, variadic) => {
                        let span = ty.span;
                        Some(Spanned::new(ParamDecl { name: None, ty, variadic }, span))
                    }
                    ParamEntry::Named(..) => None,
                })
                .collect());
        }

        let mut params = Vec::new();
        let mut pending: Vec<Spanned<Ident>> = Vec::new();
        for entry in entries {
            match entry {
                ParamEntry::Bare(ty, _) => match ty.node {
                    TypeExpr::Named { package: None, name } => pending.push(Spanned::new(name, ty.span)),
                    _ => {
                        return Err(CompileError::syntax(
                            "mixed named and unnamed parameters".to_string(),
                            ty.span,
                        ));
                    }
                },
                ParamEntry::Named(name, ty, variadic) => {
                    for grouped in pending.drain(..) {
                        params.push(Spanned::new(
                            ParamDecl {
                                name: Some(grouped.node),
                                ty: ty.clone(),
                                variadic,
                            },
                            grouped.span.merge(ty.span),
                        ));
                    }
                    let span = name.span.merge(ty.span);
                    params.push(Spanned::new(
                        ParamDecl {
                            name: Some(name.node),
                            ty,
                            variadic,
                        },
                        span,
                    ));
                }
            }
        }
        if let Some(dangling) = pending.first() {
            return Err(CompileError::syntax(
                "mixed named and unnamed parameters".to_string(),
                dangling.span,
            ));
        }
        Ok(params)
    }

    fn param_entry(&mut self) -> Result<ParamEntry, CompileError> {
        if self.check_ident() && self.starts_named_param() {
            let name = self.identifier_spanned()?;
            let variadic = self.match_punct(PunctuationId::Ellipsis);
            let ty = self.type_expr()?;
            return Ok(ParamEntry::Named(name, ty, variadic));
        }
        let variadic = self.match_punct(PunctuationId::Ellipsis);
        let ty = self.type_expr()?;
        Ok(ParamEntry::Bare(ty, variadic))
    }

    /// Return `true` if the identifier at the cursor is a parameter name followed by its type.
    fn starts_named_param(&self) -> bool {
        match &self.peek_next().kind {
            TokenKind::Ident(_) => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::Star
                    | PunctuationId::LBracket
                    | PunctuationId::LParen
                    | PunctuationId::Ellipsis
                    | PunctuationId::Arrow
            ),
            TokenKind::Keyword(k) => matches!(
                k,
                KeywordId::Map | KeywordId::Chan | KeywordId::Func | KeywordId::Struct | KeywordId::Interface
            ),
            _ => false,
        }
    }

    // ========================================================================
    // Struct and interface bodies
    // ========================================================================

    fn struct_fields(&mut self) -> Result<Vec<Spanned<FieldDecl>>, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{' after 'struct'")?;
        let mut fields = Vec::new();
        self.skip_terminators();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            fields.push(self.field_decl()?);
            self.expect_terminator("Expected newline after struct field")?;
            self.skip_terminators();
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' to close struct")?;
        Ok(fields)
    }

    fn field_decl(&mut self) -> Result<Spanned<FieldDecl>, CompileError> {
        let start = self.current_span();
        let doc = self.doc_before(self.peek().line);

        let embedded = self.check_punct(PunctuationId::Star)
            || (self.check_ident()
                && (self.peek_next().is_punctuation(PunctuationId::Dot)
                    || self.peek_next().kind.is_terminator()
                    || self.peek_next().is_punctuation(PunctuationId::RBrace)
                    || matches!(self.peek_next().kind, TokenKind::String(_) | TokenKind::RawString(_))));

        let (names, ty) = if embedded {
            (Vec::new(), self.type_expr()?)
        } else {
            let names = self.identifier_list()?;
            (names, self.type_expr()?)
        };

        let tag = match &self.peek().kind {
            TokenKind::String(text) | TokenKind::RawString(text) => {
                let text = text.clone();
                self.advance();
                Some(text)
            }
            _ => None,
        };

        Ok(Spanned::new(
            FieldDecl { names, ty, tag, doc },
            start.merge(self.previous_span()),
        ))
    }

    fn interface_elems(&mut self) -> Result<Vec<Spanned<InterfaceElem>>, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{' after 'interface'")?;
        let mut elems = Vec::new();
        self.skip_terminators();
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            elems.push(self.interface_elem()?);
            self.expect_terminator("Expected newline after interface element")?;
            self.skip_terminators();
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' to close interface")?;
        Ok(elems)
    }

    fn interface_elem(&mut self) -> Result<Spanned<InterfaceElem>, CompileError> {
        let start = self.current_span();
        let doc = self.doc_before(self.peek().line);

        if self.check_ident() && self.peek_next().is_punctuation(PunctuationId::LParen) {
            let name = self.identifier()?;
            let signature = self.signature()?;
            return Ok(Spanned::new(
                InterfaceElem::Method { name, signature, doc },
                start.merge(self.previous_span()),
            ));
        }

        if self.check_punct(PunctuationId::Tilde) {
            self.skip_constraint();
            return Ok(Spanned::new(InterfaceElem::Constraint, start.merge(self.previous_span())));
        }

        let ty = self.type_expr()?;
        if self.check_punct(PunctuationId::Pipe) {
            self.skip_constraint();
            return Ok(Spanned::new(InterfaceElem::Constraint, start.merge(self.previous_span())));
        }
        Ok(Spanned::new(InterfaceElem::Embedded(ty), start.merge(self.previous_span())))
    }

    /// Skip a type-set union (`~int | ~string`) up to the end of the element.
    fn skip_constraint(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            if depth == 0 && (kind.is_terminator() || kind.is_punctuation(PunctuationId::RBrace)) {
                return;
            }
            depth = adjust_depth(depth, kind);
            self.advance();
        }
    }
}
