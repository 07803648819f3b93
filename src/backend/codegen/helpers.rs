//! Naming, literal and comment helpers for Java generation.

use gojava_core::lang::conventions::{to_java_ident, to_lower_camel, to_pascal_case, to_upper_snake};
use gojava_core::lang::primitives::PrimitiveId;

use crate::frontend::consts::infer_literal_type;
use crate::mapping::JavaType;
use crate::model::{SourceUnit, TypeRef};

/// `public ` for exported Go names, package-private otherwise.
pub(super) fn visibility(exported: bool) -> &'static str {
    if exported { "public " } else { "" }
}

/// Java member (field, method, variable) name for a Go identifier.
pub(super) fn member_name(go: &str) -> String {
    to_java_ident(&to_lower_camel(go))
}

pub(super) fn constant_name(go: &str) -> String {
    to_upper_snake(go)
}

pub(super) fn type_name(go: &str) -> String {
    to_java_ident(go)
}

/// Parameter name; blank and unnamed parameters get positional names.
pub(super) fn param_name(go: &str, index: usize) -> String {
    if go.is_empty() || go == "_" {
        format!("arg{index}")
    } else {
        to_java_ident(go)
    }
}

/// `get`/`set` accessor suffix for a Java field name.
pub(super) fn accessor_suffix(field: &str) -> String {
    to_pascal_case(field.trim_end_matches('_'))
}

/// Outer class name for a Go package; never equal to a declared type name.
pub(super) fn outer_class_name(unit: &SourceUnit) -> String {
    let base = if unit.package.is_empty() {
        "Translation".to_string()
    } else {
        to_pascal_case(&unit.package)
    };
    if unit.declared_type_names().contains(base.as_str()) {
        format!("{base}Package")
    } else {
        base
    }
}

pub(super) fn doc_lines(doc: Option<&str>) -> Vec<String> {
    doc.map(|d| d.lines().map(str::to_string).collect()).unwrap_or_default()
}

pub(super) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert a Go literal to a Java literal assignable to `target`.
///
/// ## Returns
/// - `None` if `text` is not a literal Java can express (expressions, imaginary numbers).
pub(super) fn java_literal(text: &str, target: &JavaType) -> Option<String> {
    let t = text.trim();
    if t == "true" || t == "false" {
        return Some(t.to_string());
    }
    if t.starts_with('"') {
        return Some(java_escapes(t));
    }
    if t.starts_with('\'') {
        return Some(java_rune(t));
    }
    if let Some(raw) = t.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(quote_java(raw));
    }
    let is_float = match infer_literal_type(t)? {
        TypeRef::Primitive(PrimitiveId::Float64) => true,
        TypeRef::Primitive(PrimitiveId::Int | PrimitiveId::Int64) => false,
        _ => return None,
    };
    let mut literal = go_octal_to_java(t);
    let decimal = literal
        .trim_start_matches(['-', '+'])
        .chars()
        .all(|c| c.is_ascii_digit() || c == '_');
    match target.name.as_str() {
        "long" | "Long" if !is_float => literal.push('L'),
        "float" | "Float" => {
            if decimal {
                literal.push_str(".0");
            }
            if is_float || decimal {
                literal.push('f');
            }
        }
        "double" | "Double" if decimal => literal.push_str(".0"),
        _ => {}
    }
    Some(literal)
}

/// `0o17` is `017` in Java.
fn go_octal_to_java(t: &str) -> String {
    let (sign, digits) = match t.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", t),
    };
    match digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        Some(octal) => format!("{sign}0{octal}"),
        None => t.to_string(),
    }
}

/// Rewrite the Go escapes Java lacks.
///
/// ## Notes
/// - `\xNN`, `\a`, `\v` and any `\u`/`\U` value up to `0xFF` become three-digit octal escapes. Java decodes
///   `\uXXXX` before lexing, so `\u000a` or `\u0022` would break the literal.
/// - `\U` values outside the Basic Multilingual Plane become a UTF-16 surrogate pair.
fn java_escapes(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(kind) = chars.next() else {
            out.push(c);
            break;
        };
        let digits = match kind {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            'a' => {
                out.push_str("\\007");
                continue;
            }
            'v' => {
                out.push_str("\\013");
                continue;
            }
            other => {
                out.push('\\');
                out.push(other);
                continue;
            }
        };
        let hex: String = chars.by_ref().take(digits).collect();
        if hex.len() == digits && hex.chars().all(|h| h.is_ascii_hexdigit()) {
            let value = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
            push_escaped(&mut out, value);
        } else {
            out.push('\\');
            out.push(kind);
            out.push_str(&hex);
        }
    }
    out
}

fn push_escaped(out: &mut String, value: u32) {
    if value <= 0xFF {
        out.push_str(&format!("\\{value:03o}"));
        return;
    }
    let c = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
    for unit in c.encode_utf16(&mut [0; 2]) {
        out.push_str(&format!("\\u{unit:04X}"));
    }
}

/// A rune literal. A rune outside the Basic Multilingual Plane has no `char` form and becomes its code point.
fn java_rune(t: &str) -> String {
    let inner = t.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')).unwrap_or(t);
    let astral = match inner.strip_prefix("\\U") {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => {
            let mut chars = inner.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(u32::from(c)),
                _ => None,
            }
        }
    };
    match astral.filter(|v| *v > 0xFFFF) {
        Some(value) => format!("0x{value:X}"),
        None => java_escapes(t),
    }
}

/// A raw string's contents as a Java string literal.
pub(super) fn quote_java(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// The clearly marked text shown instead of Java when nothing could be translated.
pub(super) fn error_stub(unit: &SourceUnit) -> String {
    let mut stub = String::from(
        "// gojava: no translatable declarations found.\n// Expected at least one Go type, func, var or const declaration.\n",
    );
    for failure in &unit.failures {
        stub.push_str(&format!("// line {}: {}\n", failure.line + 1, collapse_whitespace(&failure.message)));
    }
    stub
}
