//! Line scanner: the fast parser strategy.
//!
//! Classifies each top-level line by its leading keyword and hands it to a declaration-specific scanner. Compound
//! declarations (struct and interface bodies, function bodies, multi-line initializers) are delimited by counting
//! brackets, never by parsing them.
//!
//! ## Notes
//! - Every line is first copied with string, rune and raw-string contents masked and comments blanked (byte for
//!   byte), so bracket counting and keyword tests never see literal text. Offsets computed on the blanked copy apply
//!   unchanged to the original line.
//! - A multi-line function signature is accumulated until the `{` that opens the body; the body itself is skipped.
//!   A `{` that follows `struct`/`interface` inside a signature is part of a type, not the body.
//! - Unrecognized text is recorded as a [`ParseFailure`] and scanning resumes on the next line.

use std::sync::OnceLock;

use gojava_core::lang::conventions::is_exported;
use regex::Regex;

use super::consts::{self, RawSpec};
use super::typeref::{MAX_TYPE_NESTING, matching_close, parse_results, parse_type_ref, split_params, top_level_ranges};
use crate::model::{
    FailureKind, Field, Function, Import, Interface, MethodSignature, Parameter, ParseFailure, SourcePosition,
    SourceRange, SourceUnit, Struct, TypeDef, TypeRef,
};

// ============================================================================
// Patterns
// ============================================================================

fn import_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?:([\p{L}_][\p{L}\p{N}_]*|\.)\s+)?["`]([^"`]*)["`]$"#).expect("INVARIANT: import pattern is valid")
    })
}

/// A bare, optionally pointer- and package-qualified type name: `Reader`, `*Reader`, `io.Reader`, `*sync.Mutex`.
fn embedded_field_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\*?(?:[\p{L}_][\p{L}\p{N}_]*\.)?[\p{L}_][\p{L}\p{N}_]*$")
            .expect("INVARIANT: embedded field pattern is valid")
    })
}

/// `a, b Type` with the type possibly spanning lines.
fn named_field_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^([\p{L}_][\p{L}\p{N}_]*(?:\s*,\s*[\p{L}_][\p{L}\p{N}_]*)*)\s+(\S.*)$")
            .expect("INVARIANT: named field pattern is valid")
    })
}

/// `a, b [Type]`, the left side of a value spec.
fn value_names_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^([\p{L}_][\p{L}\p{N}_]*(?:\s*,\s*[\p{L}_][\p{L}\p{N}_]*)*)(?:\s+(\S.*))?$")
            .expect("INVARIANT: value names pattern is valid")
    })
}

fn interface_method_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([\p{L}_][\p{L}\p{N}_]*)\s*\(").expect("INVARIANT: method pattern is valid"))
}

// ============================================================================
// Lines
// ============================================================================

/// One source line with its literal-blanked copy.
struct Line<'a> {
    raw: &'a str,
    /// `raw` with literal contents masked and comments blanked; same byte length.
    code: String,
    number: u32,
    /// The line starts inside a raw string or block comment.
    continued: bool,
    /// The line starts inside a raw string.
    in_raw_string: bool,
}

impl Line<'_> {
    fn bounds(&self) -> (usize, usize) {
        let end = self.code.trim_end().len();
        let start = end - self.code[..end].trim_start().len();
        (start, end)
    }

    fn text(&self) -> Text<'_> {
        let (start, end) = self.bounds();
        Text {
            code: &self.code[start..end],
            clean: &self.raw[start..end],
        }
    }

    fn indent(&self) -> u32 {
        self.raw[..self.bounds().0].chars().count() as u32
    }

    fn end_column(&self) -> u32 {
        self.raw[..self.bounds().1].chars().count() as u32
    }

    /// An own-line `//` comment.
    fn is_line_comment(&self) -> bool {
        !self.continued && self.text().is_empty() && self.raw.trim_start().starts_with("//")
    }
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut in_raw = false;
    let mut in_block = false;
    source
        .split('\n')
        .enumerate()
        .map(|(n, raw)| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            let continued = in_raw || in_block;
            let in_raw_string = in_raw;
            let code = blank_literals(raw, &mut in_raw, &mut in_block);
            Line {
                raw,
                code,
                number: n as u32,
                continued,
                in_raw_string,
            }
        })
        .collect()
}

/// Comments become spaces so trimming drops them.
fn blank(out: &mut String, c: char) {
    out.extend(std::iter::repeat_n(' ', c.len_utf8()));
}

/// Literal contents become `x` so a literal never trims away or reads as a bracket.
fn mask(out: &mut String, c: char) {
    out.extend(std::iter::repeat_n('x', c.len_utf8()));
}

/// Mask literal contents and blank comments, keeping quotes so literals stay visible as tokens.
fn blank_literals(raw: &str, in_raw: &mut bool, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if *in_block {
            blank(&mut out, c);
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                out.push(' ');
                *in_block = false;
            }
            continue;
        }
        if *in_raw {
            if c == '`' {
                out.push('`');
                *in_raw = false;
            } else {
                mask(&mut out, c);
            }
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                out.push(q);
                quote = None;
            } else {
                mask(&mut out, c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        mask(&mut out, escaped);
                    }
                }
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '`' => {
                *in_raw = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                blank(&mut out, c);
                for rest in chars.by_ref() {
                    blank(&mut out, rest);
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                *in_block = true;
            }
            _ => out.push(c),
        }
    }
    out
}

fn bracket_delta(code: &str) -> i32 {
    code.chars()
        .map(|c| match c {
            '(' | '[' | '{' => 1,
            ')' | ']' | '}' => -1,
            _ => 0,
        })
        .sum()
}

// ============================================================================
// Aligned text
// ============================================================================

/// A slice of source text paired with its literal-blanked copy. Structure is tested on `code`, values are read
/// from `clean`.
#[derive(Clone, Copy)]
struct Text<'c> {
    code: &'c str,
    clean: &'c str,
}

impl<'c> Text<'c> {
    fn slice(self, from: usize, to: usize) -> Text<'c> {
        Text {
            code: &self.code[from..to],
            clean: &self.clean[from..to],
        }
    }

    fn from(self, at: usize) -> Text<'c> {
        self.slice(at, self.code.len())
    }

    fn trim(self) -> Text<'c> {
        let end = self.code.trim_end().len();
        let start = end - self.code[..end].trim_start().len();
        self.slice(start, end)
    }

    fn strip_prefix(self, prefix: &str) -> Option<Text<'c>> {
        self.code.starts_with(prefix).then(|| self.from(prefix.len()))
    }

    fn is_empty(self) -> bool {
        self.code.is_empty()
    }

    /// Split on `sep` at bracket depth 0, dropping empty segments.
    fn split(self, sep: char) -> Vec<Text<'c>> {
        top_level_ranges(self.code, sep)
            .into_iter()
            .map(|r| self.slice(r.start, r.end).trim())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Owned text of one or more joined lines.
struct Chunk {
    code: String,
    clean: String,
    first: usize,
    last: usize,
}

impl Chunk {
    fn text(&self) -> Text<'_> {
        Text {
            code: &self.code,
            clean: &self.clean,
        }
    }
}

/// Byte length of the identifier at the start of `s` (0 if none).
fn ident_len(s: &str) -> usize {
    let mut end = 0;
    for (i, c) in s.char_indices() {
        let ok = if i == 0 {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || c == '_'
        };
        if !ok {
            break;
        }
        end = i + c.len_utf8();
    }
    end
}

/// Position of the first char matching `pred` at bracket depth 0.
fn find_top_level(code: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in code.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if depth == 0 && pred(c) => return Some(i),
            _ => {}
        }
    }
    None
}

/// `[T any]` rather than `[N]`: an identifier followed by another name, a comma, or a constraint token.
fn opens_type_params(code: &str) -> bool {
    let Some(inner) = code.strip_prefix('[').map(str::trim_start) else {
        return false;
    };
    let n = ident_len(inner);
    if n == 0 {
        return false;
    }
    matches!(
        inner[n..].trim_start().chars().next(),
        Some(c) if c.is_alphabetic() || matches!(c, '_' | ',' | '~' | '*' | '[')
    )
}

/// `struct {` / `interface{`: the keyword followed by its opening brace.
fn opens_block(text: Text<'_>, keyword: &str) -> bool {
    text.code
        .strip_prefix(keyword)
        .is_some_and(|rest| rest.trim_start().starts_with('{'))
}

/// Members of a single-line `struct{ a int; b string }` body.
fn inline_members(text: Text<'_>) -> Vec<Text<'_>> {
    let Some(open) = text.code.find('{') else {
        return Vec::new();
    };
    match matching_close(text.code, open) {
        Some(close) => text.slice(open + 1, close).split(';'),
        None => Vec::new(),
    }
}

/// Text after the opening brace on its line and before the closing brace on its line, for a multi-line body.
fn brace_edges(text: Text<'_>) -> (Text<'_>, Text<'_>) {
    let empty = text.slice(0, 0);
    let Some(open) = text.code.find('{') else {
        return (empty, empty);
    };
    // An unterminated body has no closing brace line; its last line is then the tail.
    let close = match text.code.rfind('}') {
        Some(c) if c > open && text.code.trim_end().ends_with('}') => c,
        _ => text.code.len(),
    };
    let body = &text.code[open + 1..close];
    let (head_end, tail_start) = match (body.find('\n'), body.rfind('\n')) {
        (Some(first), Some(last)) => (open + 1 + first, open + 1 + last + 1),
        _ => (close, close),
    };
    (text.slice(open + 1, head_end).trim(), text.slice(tail_start, close).trim())
}

fn follows_type_keyword(prefix: &str) -> bool {
    let trimmed = prefix.trim_end();
    ["struct", "interface"].iter().any(|kw| {
        trimmed
            .strip_suffix(kw)
            .is_some_and(|before| !before.ends_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

// ============================================================================
// Signatures
// ============================================================================

/// Why a function signature could not be turned into a [`Function`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureError {
    pub name: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

impl SignatureError {
    fn syntax(name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: FailureKind::Syntax,
            message: message.into(),
        }
    }

    fn unsupported(name: &str, message: String) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: FailureKind::Unsupported,
            message,
        }
    }
}

/// `(params) results`
fn signature_tail(text: &str) -> Option<(Vec<Parameter>, Vec<Parameter>)> {
    let t = text.trim();
    if !t.starts_with('(') {
        return None;
    }
    let close = matching_close(t, 0)?;
    Some((split_params(&t[1..close]), parse_results(&t[close + 1..])))
}

/// Parse `func [(recv)] Name(params) [results]` with the body already removed.
pub fn parse_signature(text: &str) -> Result<Function, SignatureError> {
    let rest = text
        .trim()
        .strip_prefix("func")
        .ok_or_else(|| SignatureError::syntax(None, "Expected `func`"))?
        .trim_start();

    let (receiver, rest) = if rest.starts_with('(') {
        let close = matching_close(rest, 0).ok_or_else(|| SignatureError::syntax(None, "Unclosed receiver"))?;
        let mut params = split_params(&rest[1..close]);
        if params.len() != 1 {
            return Err(SignatureError::syntax(
                None,
                format!("method receiver must be a single parameter, found {}", params.len()),
            ));
        }
        (params.pop(), rest[close + 1..].trim_start())
    } else {
        (None, rest)
    };

    let name_len = ident_len(rest);
    if name_len == 0 {
        return Err(SignatureError::syntax(None, "Expected identifier"));
    }
    let name = &rest[..name_len];
    let rest = rest[name_len..].trim_start();

    let generic_receiver = receiver
        .as_ref()
        .is_some_and(|r| matches!(r.ty.base(), TypeRef::Opaque(t) if t.contains('[')));
    if generic_receiver {
        return Err(SignatureError::unsupported(
            name,
            format!("method `{name}` on a generic receiver is not translated"),
        ));
    }
    if rest.starts_with('[') {
        return Err(SignatureError::unsupported(
            name,
            format!("generic function `{name}` is not translated"),
        ));
    }

    let (params, results) =
        signature_tail(rest).ok_or_else(|| SignatureError::syntax(Some(name), "Expected parameter list"))?;
    Ok(Function {
        name: name.to_string(),
        params,
        results,
        is_method: receiver.is_some(),
        receiver,
        doc: None,
        range: None,
    })
}

// ============================================================================
// Scanner
// ============================================================================

struct Scanner<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    unit: SourceUnit,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lines: split_lines(source),
            pos: 0,
            unit: SourceUnit::default(),
        }
    }

    fn run(mut self) -> SourceUnit {
        while self.pos < self.lines.len() {
            let idx = self.pos;
            let text = self.lines[idx].text();
            if text.is_empty() {
                self.pos += 1;
                continue;
            }
            let kw_len = ident_len(text.code);
            let keyword = text.code[..kw_len].to_string();
            match keyword.as_str() {
                "package" => {
                    self.unit.package = text.clean[kw_len..].trim().to_string();
                    self.pos += 1;
                }
                "import" => self.declaration(idx, kw_len, Self::import_spec),
                "type" => self.declaration(idx, kw_len, Self::type_spec),
                "var" => self.value_decl(idx, kw_len, false),
                "const" => self.value_decl(idx, kw_len, true),
                "func" => self.func_decl(idx),
                _ => self.stray(idx),
            }
        }
        self.unit
    }

    // ------------------------------------------------------------------------
    // Line plumbing
    // ------------------------------------------------------------------------

    /// Last line of the bracketed block starting at byte `offset` of line `idx`, including any raw string that is
    /// still open at its end.
    fn block_end(&self, idx: usize, offset: usize) -> usize {
        let mut depth = bracket_delta(&self.lines[idx].text().code[offset..]);
        let mut i = idx;
        while i + 1 < self.lines.len() && (depth > 0 || self.lines[i + 1].in_raw_string) {
            i += 1;
            depth += bracket_delta(self.lines[i].text().code);
        }
        i
    }

    fn join(&self, first: usize, last: usize, offset: usize) -> Chunk {
        let mut code = String::new();
        let mut clean = String::new();
        for i in first..=last {
            let text = self.lines[i].text();
            let text = if i == first { text.from(offset) } else { text };
            if i > first {
                code.push('\n');
                clean.push('\n');
            }
            code.push_str(text.code);
            clean.push_str(text.clean);
        }
        Chunk {
            code,
            clean,
            first,
            last,
        }
    }

    /// Consume the block starting at line `idx`, returning its text.
    fn take(&mut self, idx: usize, offset: usize) -> Chunk {
        let last = self.block_end(idx, offset);
        self.pos = last + 1;
        self.join(idx, last, offset)
    }

    fn range(&self, first: usize, last: usize) -> SourceRange {
        let (start, end) = (&self.lines[first], &self.lines[last]);
        SourceRange::new(
            SourcePosition::new(start.number, start.indent()),
            SourcePosition::new(end.number, end.end_column()),
        )
    }

    fn position(&self, idx: usize, offset: usize) -> SourcePosition {
        let line = &self.lines[idx];
        let skipped = line.text().clean[..offset].chars().count() as u32;
        SourcePosition::new(line.number, line.indent() + skipped)
    }

    /// The own-line `//` comment block directly above line `idx`.
    fn doc_before(&self, idx: usize) -> Option<String> {
        let mut k = idx;
        while k > 0 && self.lines[k - 1].is_line_comment() {
            k -= 1;
        }
        let text = self.lines[k..idx]
            .iter()
            .map(|l| l.raw.trim())
            .filter(|c| !c.starts_with("//go:") && !c.starts_with("//line "))
            .map(|c| {
                let body = c.strip_prefix("//").unwrap_or(c);
                body.strip_prefix(' ').unwrap_or(body).trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() { None } else { Some(text) }
    }

    fn fail(&mut self, name: Option<&str>, kind: FailureKind, message: impl Into<String>, idx: usize) {
        let failure = ParseFailure {
            name: name.map(str::to_string),
            kind,
            message: message.into(),
            line: self.lines[idx].number,
        };
        tracing::debug!(line = failure.line, name = ?failure.name, "scanner: {}", failure.message);
        self.unit.failures.push(failure);
    }

    fn stray(&mut self, idx: usize) {
        let chunk = self.take(idx, 0);
        let head: String = chunk.clean.lines().next().unwrap_or_default().chars().take(40).collect();
        self.fail(None, FailureKind::Syntax, format!("Expected declaration, found `{head}`"), idx);
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    /// `kw spec` or `kw ( spec ... )`, calling `spec(line, offset, doc)` for each spec.
    fn declaration(
        &mut self,
        idx: usize,
        keyword_len: usize,
        mut spec: impl FnMut(&mut Self, usize, usize, Option<String>),
    ) {
        let doc = self.doc_before(idx);
        let text = self.lines[idx].text();
        let after = text.from(keyword_len);
        let offset = keyword_len + (after.code.len() - after.code.trim_start().len());
        let rest = after.trim();

        if rest.code.starts_with('(') {
            if rest.code != "(" {
                // `var ()` and other single-line groups.
                let chunk = self.take(idx, offset);
                for member in chunk.text().from(1).split(';') {
                    if member.code != ")" {
                        self.fail(None, FailureKind::Syntax, "single-line declaration groups are not scanned", idx);
                    }
                }
                return;
            }
            self.pos = idx + 1;
            while self.pos < self.lines.len() {
                let i = self.pos;
                let text = self.lines[i].text();
                if text.is_empty() {
                    self.pos += 1;
                    continue;
                }
                if text.code.starts_with(')') {
                    self.pos += 1;
                    return;
                }
                let spec_doc = self.doc_before(i);
                spec(self, i, 0, spec_doc);
            }
            return;
        }
        spec(self, idx, offset, doc);
    }

    fn import_spec(&mut self, idx: usize, offset: usize, _doc: Option<String>) {
        let chunk = self.take(idx, offset);
        let text = chunk.text().trim();
        match import_pattern().captures(text.clean) {
            Some(caps) => self.unit.imports.push(Import {
                alias: caps.get(1).map(|m| m.as_str().to_string()),
                path: caps[2].to_string(),
                line: Some(self.lines[idx].number),
            }),
            None => self.fail(None, FailureKind::Syntax, format!("Expected import path, found `{}`", text.clean), idx),
        }
    }

    fn type_spec(&mut self, idx: usize, offset: usize, doc: Option<String>) {
        let chunk = self.take(idx, offset);
        let range = self.range(chunk.first, chunk.last);
        let text = chunk.text().trim();

        let name_len = ident_len(text.code);
        if name_len == 0 {
            self.fail(None, FailureKind::Syntax, "Expected type name", idx);
            return;
        }
        let name = text.clean[..name_len].to_string();
        let mut rest = text.from(name_len).trim();

        if opens_type_params(rest.code) {
            self.fail(
                Some(&name),
                FailureKind::Unsupported,
                format!("generic type `{name}` is not translated"),
                idx,
            );
            return;
        }
        let alias = match rest.strip_prefix("=") {
            Some(after) => {
                rest = after.trim();
                true
            }
            None => false,
        };

        if opens_block(rest, "struct") {
            let fields = if chunk.first == chunk.last {
                let position = self.position(idx, offset);
                let mut fields = Vec::new();
                for member in inline_members(rest) {
                    match parse_field(member, None, position) {
                        Ok(parsed) => fields.extend(parsed),
                        Err(message) => self.fail(Some(&name), FailureKind::Syntax, message, idx),
                    }
                }
                fields
            } else {
                let (head, tail) = brace_edges(rest);
                let mut fields = Vec::new();
                for member in self.edge_members(&name, head, chunk.first) {
                    match parse_field(member, None, self.position(chunk.first, 0)) {
                        Ok(parsed) => fields.extend(parsed),
                        Err(message) => self.fail(Some(&name), FailureKind::Syntax, message, chunk.first),
                    }
                }
                fields.extend(self.struct_fields(&name, chunk.first + 1, chunk.last));
                for member in self.edge_members(&name, tail, chunk.last) {
                    match parse_field(member, None, self.position(chunk.last, 0)) {
                        Ok(parsed) => fields.extend(parsed),
                        Err(message) => self.fail(Some(&name), FailureKind::Syntax, message, chunk.last),
                    }
                }
                fields
            };
            self.unit.structs.push(Struct {
                name,
                fields,
                methods: Vec::new(),
                doc,
                range: Some(range),
            });
        } else if opens_block(rest, "interface") {
            let (methods, embedded) = if chunk.first == chunk.last {
                let members = inline_members(rest);
                let mut methods = Vec::new();
                let mut embedded = Vec::new();
                for member in members {
                    match interface_member(member, None) {
                        Some(Member::Method(m)) => methods.push(m),
                        Some(Member::Embedded(t)) => embedded.push(t),
                        None => {}
                    }
                }
                (methods, embedded)
            } else {
                let (head, tail) = brace_edges(rest);
                let mut members = (Vec::new(), Vec::new());
                self.edge_interface_members(&name, head, chunk.first, &mut members);
                let (methods, embedded) = self.interface_members(&name, chunk.first + 1, chunk.last);
                members.0.extend(methods);
                members.1.extend(embedded);
                self.edge_interface_members(&name, tail, chunk.last, &mut members);
                members
            };
            self.unit.interfaces.push(Interface {
                name,
                methods,
                embedded,
                doc,
                range: Some(range),
            });
        } else if rest.is_empty() {
            self.fail(Some(&name), FailureKind::Syntax, "Expected type", idx);
        } else {
            self.unit.typedefs.push(TypeDef {
                name,
                underlying: parse_type_ref(rest.clean),
                alias,
                methods: Vec::new(),
                doc,
                range: Some(range),
            });
        }
    }

    /// Members sharing a line with a multi-line body's brace. Text there that opens or closes a nested block is
    /// recorded as a failure instead.
    fn edge_members<'t>(&mut self, owner: &str, edge: Text<'t>, idx: usize) -> Vec<Text<'t>> {
        if bracket_delta(edge.code) != 0 {
            self.fail(
                Some(owner),
                FailureKind::Syntax,
                format!("members next to a nested block's brace are not scanned: `{}`", edge.clean),
                idx,
            );
            return Vec::new();
        }
        edge.split(';')
    }

    fn edge_interface_members(
        &mut self,
        owner: &str,
        edge: Text<'_>,
        idx: usize,
        (methods, embedded): &mut (Vec<MethodSignature>, Vec<TypeRef>),
    ) {
        for member in self.edge_members(owner, edge, idx) {
            match interface_member(member, None) {
                Some(Member::Method(mut m)) => {
                    m.range = Some(self.range(idx, idx));
                    methods.push(m);
                }
                Some(Member::Embedded(t)) => embedded.push(t),
                None => {}
            }
        }
    }

    /// Fields on lines `from..to` (exclusive; `to` holds the closing brace).
    fn struct_fields(&mut self, owner: &str, from: usize, to: usize) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut i = from;
        while i < to {
            if self.lines[i].text().is_empty() {
                i += 1;
                continue;
            }
            let end = self.block_end(i, 0).min(to.saturating_sub(1)).max(i);
            let chunk = self.join(i, end, 0);
            let doc = self.doc_before(i);
            match parse_field(chunk.text().trim(), doc, self.position(i, 0)) {
                Ok(parsed) => fields.extend(parsed),
                Err(message) => self.fail(Some(owner), FailureKind::Syntax, message, i),
            }
            i = end + 1;
        }
        fields
    }

    fn interface_members(&mut self, owner: &str, from: usize, to: usize) -> (Vec<MethodSignature>, Vec<TypeRef>) {
        let mut methods = Vec::new();
        let mut embedded = Vec::new();
        let mut i = from;
        while i < to {
            if self.lines[i].text().is_empty() {
                i += 1;
                continue;
            }
            let end = self.block_end(i, 0).min(to.saturating_sub(1)).max(i);
            let chunk = self.join(i, end, 0);
            let doc = self.doc_before(i);
            match interface_member(chunk.text().trim(), doc) {
                Some(Member::Method(mut m)) => {
                    m.range = Some(self.range(i, end));
                    methods.push(m);
                }
                Some(Member::Embedded(t)) => embedded.push(t),
                None => tracing::debug!(interface = owner, line = i, "scanner: skipped constraint element"),
            }
            i = end + 1;
        }
        (methods, embedded)
    }

    fn func_decl(&mut self, idx: usize) {
        let doc = self.doc_before(idx);
        let (signature, last) = self.signature_text(idx);
        self.pos = last + 1;
        match parse_signature(&signature) {
            Ok(mut function) => {
                function.doc = doc;
                function.range = Some(self.range(idx, last));
                self.unit.functions.push(function);
            }
            Err(err) => self.fail(err.name.as_deref(), err.kind, err.message, idx),
        }
    }

    /// Accumulate signature text from line `idx` up to the body's `{`; returns it with the declaration's last line.
    fn signature_text(&self, idx: usize) -> (String, usize) {
        let mut signature = String::new();
        let mut depth = 0i32;
        let mut i = idx;
        loop {
            let text = self.lines[i].text();
            let mut body_at = None;
            for (off, c) in text.code.char_indices() {
                match c {
                    '(' | '[' => depth += 1,
                    ')' | ']' | '}' => depth -= 1,
                    '{' if depth == 0 && !follows_type_keyword(&text.code[..off]) => {
                        body_at = Some(off);
                        break;
                    }
                    '{' => depth += 1,
                    _ => {}
                }
            }
            if let Some(off) = body_at {
                signature.push_str(&text.clean[..off]);
                return (signature, self.block_end(i, off));
            }
            signature.push_str(text.clean);
            if depth <= 0 || i + 1 >= self.lines.len() {
                return (signature, i);
            }
            signature.push(' ');
            i += 1;
        }
    }

    fn value_decl(&mut self, idx: usize, keyword_len: usize, is_const: bool) {
        let mut specs = Vec::new();
        self.declaration(idx, keyword_len, |scanner, i, offset, doc| {
            if let Some(spec) = scanner.value_spec(i, offset, doc) {
                specs.push(spec);
            }
        });
        if is_const {
            let constants = consts::expand_const_group(specs);
            self.unit.constants.extend(constants);
        } else {
            let variables = consts::expand_var_group(specs);
            self.unit.variables.extend(variables);
        }
    }

    fn value_spec(&mut self, idx: usize, offset: usize, doc: Option<String>) -> Option<RawSpec> {
        let position = self.position(idx, offset);
        let chunk = self.take(idx, offset);
        let text = chunk.text().trim();
        let (left, values) = match find_top_level(text.code, |c| c == '=') {
            Some(eq) => {
                let values = text
                    .from(eq + 1)
                    .split(',')
                    .into_iter()
                    .map(|v| v.clean.to_string())
                    .collect();
                (text.slice(0, eq).trim(), values)
            }
            None => (text, Vec::new()),
        };
        let Some(caps) = value_names_pattern().captures(left.clean) else {
            let name = &left.clean[..ident_len(left.clean)];
            let name = (!name.is_empty()).then_some(name);
            self.fail(name, FailureKind::Syntax, format!("Expected value spec, found `{}`", left.clean), idx);
            return None;
        };
        Some(RawSpec {
            names: caps[1].split(',').map(|n| n.trim().to_string()).collect(),
            ty: caps.get(2).map(|m| parse_type_ref(m.as_str())),
            values,
            doc,
            position: Some(position),
        })
    }
}

// ============================================================================
// Members
// ============================================================================

fn parse_field(text: Text<'_>, doc: Option<String>, position: SourcePosition) -> Result<Vec<Field>, String> {
    let (head, tag) = match find_top_level(text.code, |c| c == '`' || c == '"') {
        Some(at) => (text.slice(0, at).trim(), Some(text.clean[at..].trim().to_string())),
        None => (text, None),
    };

    if embedded_field_pattern().is_match(head.code) {
        let ty = parse_type_ref(head.clean);
        let name = head
            .clean
            .trim_start_matches('*')
            .rsplit('.')
            .next()
            .unwrap_or(head.clean)
            .to_string();
        return Ok(vec![Field {
            exported: is_exported(&name),
            name,
            ty,
            tag,
            embedded: true,
            doc,
            position: Some(position),
        }]);
    }

    let caps = named_field_pattern()
        .captures(head.clean)
        .ok_or_else(|| format!("Expected struct field, found `{}`", head.clean))?;
    let ty = parse_type_ref(&caps[2]);
    Ok(caps[1]
        .split(',')
        .map(|n| n.trim().to_string())
        .map(|name| Field {
            exported: is_exported(&name),
            name,
            ty: ty.clone(),
            tag: tag.clone(),
            embedded: false,
            doc: doc.clone(),
            position: Some(position),
        })
        .collect())
}

enum Member {
    Method(MethodSignature),
    Embedded(TypeRef),
}

/// A method signature or embedded interface; `None` for type-set constraint elements.
fn interface_member(text: Text<'_>, doc: Option<String>) -> Option<Member> {
    if let Some(caps) = interface_method_pattern().captures(text.clean) {
        let open = caps.get(0).map_or(0, |m| m.end() - 1);
        let name = caps[1].to_string();
        let (params, results) = signature_tail(&text.clean[open..])?;
        return Some(Member::Method(Function {
            name,
            params,
            results,
            is_method: true,
            receiver: None,
            doc,
            range: None,
        }));
    }
    if text.code.starts_with('~') || text.code.contains('|') {
        return None;
    }
    Some(Member::Embedded(parse_type_ref(text.clean)))
}

/// Scan a whole file or fragment. Never fails; unrecognized text becomes [`ParseFailure`]s.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn scan_unit(source: &str) -> SourceUnit {
    let mut unit = Scanner::new(source).run();
    reject_deep_types(&mut unit);
    unit
}

fn signature_types(function: &Function) -> impl Iterator<Item = &TypeRef> {
    function.receiver.iter().chain(&function.params).chain(&function.results).map(|p| &p.ty)
}

/// Drop declarations whose types nest past [`MAX_TYPE_NESTING`], recording each as a failure.
fn reject_deep_types(unit: &mut SourceUnit) {
    fn too_deep<'t>(mut types: impl Iterator<Item = &'t TypeRef>) -> bool {
        types.any(|ty| ty.depth() > MAX_TYPE_NESTING)
    }

    let mut failures = Vec::new();
    let mut reject = |name: &str, line: u32| {
        tracing::debug!(name, line, "type nesting limit hit");
        failures.push(ParseFailure {
            name: Some(name.to_string()),
            kind: FailureKind::Syntax,
            message: format!("type nesting exceeds {MAX_TYPE_NESTING} levels"),
            line,
        });
    };
    let start = |range: Option<SourceRange>| range.map_or(0, |r| r.start.line);

    unit.structs.retain(|s| {
        let deep = too_deep(s.fields.iter().map(|f| &f.ty));
        if deep {
            reject(&s.name, start(s.range));
        }
        !deep
    });
    unit.interfaces.retain(|i| {
        let deep = too_deep(i.methods.iter().flat_map(signature_types).chain(&i.embedded));
        if deep {
            reject(&i.name, start(i.range));
        }
        !deep
    });
    unit.typedefs.retain(|t| {
        let deep = t.underlying.depth() > MAX_TYPE_NESTING;
        if deep {
            reject(&t.name, start(t.range));
        }
        !deep
    });
    unit.functions.retain(|f| {
        let deep = too_deep(signature_types(f));
        if deep {
            reject(&f.name, start(f.range));
        }
        !deep
    });
    for list in [&mut unit.variables, &mut unit.constants] {
        list.retain(|v| {
            let deep = too_deep(v.ty.iter());
            if deep {
                reject(&v.name, v.position.map_or(0, |p| p.line));
            }
            !deep
        });
    }

    if !failures.is_empty() {
        unit.failures.extend(failures);
        unit.failures.sort_by_key(|f| f.line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanking_keeps_byte_alignment() {
        let (mut raw, mut block) = (false, false);
        let line = r#"x := "a{b}" + 'c' // tail {"#;
        let code = blank_literals(line, &mut raw, &mut block);
        assert_eq!(code.len(), line.len());
        assert_eq!(bracket_delta(&code), 0);
        assert!(code.starts_with("x := \"xxxx\" + 'x'"));
        assert!(code.trim_end().ends_with("'x'"));
    }

    #[test]
    fn raw_strings_span_lines() {
        let lines = split_lines("var s = `a {\nb }\n`\nfunc F() {}\n");
        assert!(lines[1].continued);
        assert_eq!(bracket_delta(&lines[0].code), 0);
        assert!(lines[3].text().code.starts_with("func"));

        let unit = scan_unit("var s = `a {\nb }\n`\nfunc F() {}\n");
        assert!(unit.failures.is_empty(), "{:?}", unit.failures);
        assert_eq!(unit.variables[0].value.as_deref(), Some("`a {\nb }\n`"));
        assert_eq!(unit.functions.len(), 1);
    }

    #[test]
    fn multi_line_signature_and_body_skip() {
        let src = "func Process(\n\tinput string,\n\topts map[string]int,\n) (string, error) {\n\tif x { return \"}\", nil }\n\treturn \"\", nil\n}\n\nfunc After() {}\n";
        let unit = scan_unit(src);
        let names: Vec<_> = unit.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Process", "After"]);
        assert_eq!(unit.functions[0].params.len(), 2);
        assert!(unit.functions[0].has_error_return());
        assert!(unit.failures.is_empty());
    }

    #[test]
    fn struct_result_type_brace_is_not_the_body() {
        let unit = scan_unit("func Empty() struct{} { return struct{}{} }\nfunc Next() {}\n");
        assert_eq!(unit.functions.len(), 2);
        assert_eq!(unit.functions[0].results[0].ty, TypeRef::Opaque("struct{}".into()));
    }

    #[test]
    fn struct_with_embedding_tags_and_docs() {
        let src = "// Employee works here.\ntype Employee struct {\n\t*io.Reader\n\tPerson\n\t// ID is unique.\n\tID, Age int `json:\"id\"`\n\tname string // trailing\n}\n";
        let unit = scan_unit(src);
        let s = &unit.structs[0];
        assert_eq!(s.doc.as_deref(), Some("Employee works here."));
        let shape: Vec<_> = s.fields.iter().map(|f| (f.name.as_str(), f.embedded, f.exported)).collect();
        assert_eq!(
            shape,
            vec![
                ("Reader", true, true),
                ("Person", true, true),
                ("ID", false, true),
                ("Age", false, true),
                ("name", false, false)
            ]
        );
        assert_eq!(s.fields[2].tag.as_deref(), Some("`json:\"id\"`"));
        assert_eq!(s.fields[2].doc.as_deref(), Some("ID is unique."));
        assert_eq!(s.fields[4].tag, None);
    }

    #[test]
    fn member_sharing_the_closing_brace_line() {
        let unit = scan_unit("type T struct {\n\tA int\n\tB string }\n");
        let names: Vec<_> = unit.structs[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(unit.failures.is_empty());
    }

    #[test]
    fn nested_block_on_a_brace_line_is_a_failure() {
        let unit = scan_unit("type T struct { Inner struct {\n\t\tX int\n\t}\n}\n");
        assert_eq!(unit.structs.len(), 1);
        assert!(unit.failures[0].message.contains("nested block"), "{:?}", unit.failures);
        assert!(unit.failures.iter().all(|f| f.name.as_deref() == Some("T")));
    }

    #[test]
    fn deeply_nested_types_are_rejected() {
        let src = format!("var x {}int\nvar y *int\nfunc F(p {}int) {{}}\n", "*".repeat(3000), "[]".repeat(300));
        let unit = scan_unit(&src);
        assert_eq!(unit.variables.len(), 1);
        assert_eq!(unit.variables[0].name, "y");
        assert!(unit.functions.is_empty());
        assert_eq!(unit.failures.len(), 2, "{:?}", unit.failures);
        assert!(unit.failures.iter().all(|f| f.message == "type nesting exceeds 256 levels"));
        assert_eq!(unit.failures[0].name.as_deref(), Some("x"));
        assert_eq!(unit.failures[1].name.as_deref(), Some("F"));

        let limit = format!("var z {}int\n", "*".repeat(MAX_TYPE_NESTING - 1));
        let unit = scan_unit(&limit);
        assert!(unit.failures.is_empty(), "{:?}", unit.failures);
        assert_eq!(unit.variables[0].ty.as_ref().map(TypeRef::depth), Some(MAX_TYPE_NESTING));
    }

    #[test]
    fn nested_anonymous_struct_field() {
        let src = "type Config struct {\n\tServer struct {\n\t\tPort int\n\t}\n\tName string\n}\n";
        let unit = scan_unit(src);
        let fields = &unit.structs[0].fields;
        assert_eq!(fields.len(), 2);
        assert!(matches!(fields[0].ty, TypeRef::Opaque(_)));
        assert_eq!(fields[1].name, "Name");
    }

    #[test]
    fn interface_methods_and_embeds() {
        let src = "type Store interface {\n\tio.Closer\n\t// Get fetches.\n\tGet(key string) ([]byte, error)\n\tPut(key string,\n\t\tvalue []byte) error\n}\n";
        let unit = scan_unit(src);
        let i = &unit.interfaces[0];
        assert_eq!(i.embedded, vec![TypeRef::named("io.Closer")]);
        let names: Vec<_> = i.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Get", "Put"]);
        assert_eq!(i.methods[0].doc.as_deref(), Some("Get fetches."));
        assert_eq!(i.methods[1].params.len(), 2);
    }

    #[test]
    fn grouped_declarations() {
        let src = "package demo\n\nimport (\n\t\"fmt\"\n\tm \"math\"\n)\n\nconst (\n\tA = iota\n\tB\n)\n\nvar (\n\tx int\n\ty = \"s\"\n)\n\ntype (\n\tID string\n\tPoint struct{ X, Y int }\n)\n";
        let unit = scan_unit(src);
        assert_eq!(unit.package, "demo");
        assert_eq!(unit.imports.len(), 2);
        assert_eq!(unit.imports[1].alias.as_deref(), Some("m"));
        assert_eq!(unit.constants[1].value.as_deref(), Some("1"));
        assert_eq!(unit.variables[1].ty, Some(TypeRef::named("string")));
        assert_eq!(unit.typedefs[0].name, "ID");
        assert_eq!(unit.structs[0].fields.len(), 2);
        assert!(unit.failures.is_empty(), "{:?}", unit.failures);
    }

    #[test]
    fn multi_line_initializer_is_one_value() {
        let unit = scan_unit("var m = map[string]int{\n\t\"a,b\": 1,\n}\n\nfunc F() {}\n");
        assert_eq!(unit.variables.len(), 1);
        assert!(unit.variables[0].value.as_deref().is_some_and(|v| v.contains("\"a,b\"")));
        assert_eq!(unit.functions.len(), 1);
    }

    #[test]
    fn generics_are_recorded_as_failures() {
        let src = "type List[T any] struct {\n\titems []T\n}\n\nfunc Map[T any](xs []T) []T { return xs }\n\ntype Grid [4]int\n";
        let unit = scan_unit(src);
        let failed: Vec<_> = unit.failures.iter().map(|f| (f.name.as_deref(), f.kind)).collect();
        assert_eq!(
            failed,
            vec![
                (Some("List"), FailureKind::Unsupported),
                (Some("Map"), FailureKind::Unsupported)
            ]
        );
        assert_eq!(unit.typedefs[0].name, "Grid");
    }

    #[test]
    fn signature_parsing() {
        let f = parse_signature("func (p *Person) SetAge(age int)").expect("valid");
        assert!(f.is_method);
        assert_eq!(f.receiver_type_name(), Some("Person"));
        let err = parse_signature("func (s Stack[T]) Push(v T)").expect_err("generic receiver");
        assert_eq!(err.kind, FailureKind::Unsupported);
        assert!(parse_signature("type X int").is_err());
    }

    #[test]
    fn stray_text_is_a_failure_not_an_abort() {
        let unit = scan_unit("package a\n\nx := 1\n\nfunc F() {}\n");
        assert_eq!(unit.failures.len(), 1);
        assert_eq!(unit.functions.len(), 1);
    }
}
