/// Declaration parsing.
///
/// This chunk parses the package clause, imports, and the four top-level declaration forms:
/// - `const` / `var` specs (single or grouped), keeping initializers as spans
/// - `type` specs, including aliases (`type A = B`)
/// - functions and methods (receiver, signature, optional body span)
///
/// ## Notes
/// - Type parameters (`type List[T any]`, `func Map[T any]`) are reported as [`ErrorKind::Unsupported`] and the
///   declaration is skipped.
///
/// [`ErrorKind::Unsupported`]: crate::diagnostics::ErrorKind::Unsupported
impl<'a> Parser<'a> {
    // ========================================================================
    // Package and imports
    // ========================================================================

    fn package_clause(&mut self) -> Result<Spanned<Ident>, CompileError> {
        self.advance(); // package
        let name = self.identifier_spanned()?;
        self.expect_terminator("Expected newline after package clause")?;
        Ok(name)
    }

    fn import_decl(&mut self) -> Result<Vec<Spanned<ImportSpec>>, CompileError> {
        self.advance(); // import
        let mut specs = Vec::new();
        if self.match_punct(PunctuationId::LParen) {
            self.skip_terminators();
            while !self.check_punct(PunctuationId::RParen) && !self.is_at_end() {
                specs.push(self.import_spec()?);
                self.expect_terminator("Expected newline between imports")?;
                self.skip_terminators();
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' to close import group")?;
        } else {
            specs.push(self.import_spec()?);
        }
        self.expect_terminator("Expected newline after import")?;
        Ok(specs)
    }

    fn import_spec(&mut self) -> Result<Spanned<ImportSpec>, CompileError> {
        let start = self.current_span();
        let alias = if self.match_punct(PunctuationId::Dot) {
            Some(".".to_string())
        } else if self.check_ident() {
            Some(self.identifier()?)
        } else {
            None
        };
        let path = match &self.peek().kind {
            TokenKind::String(text) | TokenKind::RawString(text) => unquote(text),
            _ => return Err(self.unexpected("Expected import path")),
        };
        self.advance();
        Ok(Spanned::new(ImportSpec { alias, path }, start.merge(self.previous_span())))
    }

    // ========================================================================
    // Top-level declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span();
        let doc = self.doc_before(self.peek().line);
        let decl = match self.peek().kind.keyword_id() {
            Some(KeywordId::Const) => Declaration::Const(self.gen_decl(doc, Self::value_spec)?),
            Some(KeywordId::Var) => Declaration::Var(self.gen_decl(doc, Self::value_spec)?),
            Some(KeywordId::Type) => Declaration::Type(self.gen_decl(doc, Self::type_spec)?),
            Some(KeywordId::Func) => Declaration::Func(self.func_decl(doc)?),
            _ => return Err(self.unexpected("Expected declaration")),
        };
        let span = start.merge(self.previous_span());
        if !matches!(decl, Declaration::Func(_)) {
            self.expect_terminator("Expected newline after declaration")?;
        }
        Ok(Spanned::new(decl, span))
    }

    /// Parse `kw spec` or `kw ( spec; spec; ... )`.
    ///
    /// Inside a group, a malformed spec is recorded and skipped so its siblings still parse.
    fn gen_decl<T>(
        &mut self,
        doc: Option<String>,
        spec: fn(&mut Self, Option<String>) -> Result<Spanned<T>, CompileError>,
    ) -> Result<GenDecl<T>, CompileError> {
        self.advance(); // const / var / type
        if !self.match_punct(PunctuationId::LParen) {
            let single = spec(self, doc)?;
            return Ok(GenDecl {
                specs: vec![single],
                grouped: false,
            });
        }

        let mut specs = Vec::new();
        self.skip_terminators();
        while !self.check_punct(PunctuationId::RParen) && !self.is_at_end() {
            let spec_doc = self.doc_before(self.peek().line);
            let parsed = spec(self, spec_doc).and_then(|s| {
                self.expect_terminator("Expected newline after spec")?;
                Ok(s)
            });
            match parsed {
                Ok(s) => specs.push(s),
                Err(e) => {
                    self.errors.push(e);
                    self.skip_spec();
                }
            }
            self.skip_terminators();
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' to close declaration group")?;
        Ok(GenDecl { specs, grouped: true })
    }

    /// `a, b [Type] [= x, y]`
    fn value_spec(&mut self, doc: Option<String>) -> Result<Spanned<ValueSpec>, CompileError> {
        let start = self.current_span();
        let names = self.identifier_list()?;
        let (ty, values) = self.value_spec_tail().map_err(|e| e.in_declaration(&names[0]))?;
        Ok(Spanned::new(
            ValueSpec { names, ty, values, doc },
            start.merge(self.previous_span()),
        ))
    }

    /// The optional type and initializer list following the names of a value spec.
    fn value_spec_tail(&mut self) -> Result<(Option<Spanned<TypeExpr>>, Vec<Span>), CompileError> {
        let ty = if self.check_punct(PunctuationId::Assign) || self.at_spec_end() {
            None
        } else {
            Some(self.type_expr()?)
        };
        let values = if self.match_punct(PunctuationId::Assign) {
            self.expression_list()?
        } else {
            Vec::new()
        };
        Ok((ty, values))
    }

    /// `Name Type`, `Name = Type`
    fn type_spec(&mut self, doc: Option<String>) -> Result<Spanned<TypeSpec>, CompileError> {
        let start = self.current_span();
        let name = self.identifier()?;
        if self.at_type_params() {
            let span = self.current_span();
            self.skip_spec();
            return Err(CompileError::unsupported(
                format!("generic type `{name}` is not translated"),
                span,
            )
            .with_note("type parameters have no structural Java equivalent here")
            .in_declaration(&name));
        }
        let alias = self.match_punct(PunctuationId::Assign);
        let ty = self.type_expr().map_err(|e| e.in_declaration(&name))?;
        Ok(Spanned::new(
            TypeSpec { name, alias, ty, doc },
            start.merge(self.previous_span()),
        ))
    }

    /// Return `true` if a `[` after a type name opens a type-parameter list rather than an array length.
    ///
    /// `type A [N]int` has a single identifier between brackets; `type L[T any]` and `type P[K, V any]` do not.
    fn at_type_params(&self) -> bool {
        if !self.check_punct(PunctuationId::LBracket) || !matches!(self.peek_next().kind, TokenKind::Ident(_)) {
            return false;
        }
        match &self.peek_at(2).kind {
            TokenKind::Ident(_) | TokenKind::Keyword(_) => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::Comma | PunctuationId::Tilde | PunctuationId::Star | PunctuationId::LBracket
            ),
            _ => false,
        }
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn func_decl(&mut self, doc: Option<String>) -> Result<FuncDecl, CompileError> {
        self.advance(); // func
        let receiver = if self.check_punct(PunctuationId::LParen) {
            let mut params = self.parameters()?;
            if params.len() != 1 {
                return Err(CompileError::syntax(
                    format!("method receiver must be a single parameter, found {}", params.len()),
                    self.previous_span(),
                ));
            }
            params.pop()
        } else {
            None
        };

        let name = self.identifier()?;

        if let Some(span) = receiver
            .as_ref()
            .filter(|recv| is_generic_type(&recv.node.ty.node))
            .map(|recv| recv.span)
        {
            self.synchronize_function();
            return Err(CompileError::unsupported(
                format!("method `{name}` on a generic receiver is not translated"),
                span,
            )
            .in_declaration(&name));
        }
        if self.check_punct(PunctuationId::LBracket) {
            let span = self.current_span();
            self.synchronize_function();
            return Err(
                CompileError::unsupported(format!("generic function `{name}` is not translated"), span)
                    .with_note("type parameters have no structural Java equivalent here")
                    .in_declaration(&name),
            );
        }

        let signature = self.signature().map_err(|e| e.in_declaration(&name))?;
        let body = if self.check_punct(PunctuationId::LBrace) {
            Some(
                self.skip_balanced(PunctuationId::LBrace, PunctuationId::RBrace)
                    .map_err(|e| e.in_declaration(&name))?,
            )
        } else {
            None
        };
        self.expect_terminator("Expected newline after function")
            .map_err(|e| e.in_declaration(&name))?;

        Ok(FuncDecl {
            name,
            receiver,
            signature,
            body,
            doc,
        })
    }

    /// Skip the rest of a function declaration (signature and body) after an unsupported construct.
    fn synchronize_function(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            if depth == 0 && kind.is_terminator() {
                return;
            }
            depth = adjust_depth(depth, kind);
            self.advance();
        }
    }
}

fn is_generic_type(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Generic { .. } => true,
        TypeExpr::Pointer(inner) => is_generic_type(&inner.node),
        _ => false,
    }
}

/// Strip the quotes from an import-path literal.
fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '`').to_string()
}
