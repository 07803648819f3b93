/// Parse a token stream into a [`SourceFile`].
///
/// This is the strict entrypoint: any error fails the whole parse.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `gojava_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<SourceFile, Vec<CompileError>> {
    let (file, errors) = Parser::new(tokens).parse_file();
    if errors.is_empty() { Ok(file) } else { Err(errors) }
}

/// Parse a token stream with doc-comment attachment, keeping whatever parsed successfully.
///
/// Declarations that failed are absent from the returned tree and described by the returned errors (each carrying
/// the declaration name when it was known).
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), comment_count = comments.len()))]
pub fn parse_with_comments(tokens: &[Token], comments: &[Comment]) -> (SourceFile, Vec<CompileError>) {
    Parser::with_comments(tokens, comments).parse_file()
}
