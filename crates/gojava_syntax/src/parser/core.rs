/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `parse_file()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// One entry of a parameter list before grouped names are resolved.
enum ParamEntry {
    /// `name Type` or `name ...Type`
    Named(Spanned<Ident>, Spanned<TypeExpr>, bool),
    /// A bare type, which may turn out to be a name in a grouped list (`a, b int`).
    Bare(Spanned<TypeExpr>, bool),
}

/// Deepest type expression the parser accepts; deeper text is a syntax error for its declaration.
pub const MAX_TYPE_NESTING: usize = 256;

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at declaration boundaries (or at spec
///   boundaries inside a parenthesized group), so one malformed declaration never hides its neighbours.
/// - Comments are not tokens; they come in through a side table and are only consulted for doc attachment.
pub struct Parser<'a> {
    tokens: &'a [Token],
    comments: &'a [Comment],
    pos: usize,
    errors: Vec<CompileError>,
    /// Type expressions currently open.
    type_depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `gojava_syntax::lexer`. Must end with `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_comments(tokens, &[])
    }

    /// Create a parser that attaches doc comments from `comments`.
    pub fn with_comments(tokens: &'a [Token], comments: &'a [Comment]) -> Self {
        Self {
            tokens,
            comments,
            pos: 0,
            errors: Vec::new(),
            type_depth: 0,
        }
    }

    /// Parse the entire token stream.
    ///
    /// Returns the (possibly partial) tree together with every error encountered.
    pub fn parse_file(mut self) -> (SourceFile, Vec<CompileError>) {
        let mut file = SourceFile::default();
        if self.tokens.is_empty() {
            return (file, self.errors);
        }

        self.skip_terminators();
        if self.check_keyword(KeywordId::Package) {
            match self.package_clause() {
                Ok(name) => file.package = Some(name),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }
        self.skip_terminators();

        while !self.is_at_end() {
            if self.check_keyword(KeywordId::Import) {
                match self.import_decl() {
                    Ok(specs) => file.imports.extend(specs),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            } else {
                match self.declaration() {
                    Ok(decl) => file.declarations.push(decl),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            }
            self.skip_terminators();
        }

        (file, self.errors)
    }
}
