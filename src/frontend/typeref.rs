//! Type-reference and parameter-list parsing from source text.
//!
//! Both parser strategies funnel type text through [`parse_type_ref`], so `...[]T`, `*map[K]V` and friends decompose
//! identically regardless of where the text came from (a scanned line, hover text, a declaration fragment).
//!
//! ## Notes
//! - Prefixes are stripped in a fixed order: variadic marker, pointer marker, slice/array marker, and only then is
//!   the map pattern inspected. `...[]T` is therefore variadic-of-slice and `*map[K]V` pointer-to-map.
//! - Types with no structural mapping (func, chan, anonymous struct, generic instantiations) come back as
//!   [`TypeRef::Opaque`] with their Go spelling.
//!
//! ## Examples
//! ```rust
//! use gojava::frontend::typeref::{parse_type_ref, split_params};
//! use gojava::model::TypeRef;
//!
//! assert!(matches!(parse_type_ref("...[]int"), TypeRef::Variadic(inner) if matches!(*inner, TypeRef::Slice(_))));
//! assert!(matches!(parse_type_ref("*map[string]int"), TypeRef::Pointer(inner) if matches!(*inner, TypeRef::Map(..))));
//!
//! let params = split_params("a, b int, s string");
//! assert_eq!(params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["a", "b", "s"]);
//! ```

use std::ops::Range;

use gojava_core::lang::keywords;

use crate::model::{Parameter, TypeRef};

pub use gojava_syntax::parser::MAX_TYPE_NESTING;

/// Parse Go type text into a [`TypeRef`].
///
/// Nesting stops at [`MAX_TYPE_NESTING`] levels: the remaining text becomes an opaque leaf, so the result's
/// [`TypeRef::depth`] exceeds the limit and callers can reject the declaration.
pub fn parse_type_ref(text: &str) -> TypeRef {
    parse_nested(text, 0)
}

fn parse_nested(text: &str, depth: usize) -> TypeRef {
    let t = text.trim();
    if depth >= MAX_TYPE_NESTING {
        return TypeRef::Opaque(t.to_string());
    }
    let nested = |rest: &str| Box::new(parse_nested(rest, depth + 1));

    if let Some(rest) = t.strip_prefix("...") {
        return TypeRef::Variadic(nested(rest));
    }
    if let Some(rest) = t.strip_prefix('*') {
        return TypeRef::Pointer(nested(rest));
    }
    if let Some(rest) = t.strip_prefix("[]") {
        return TypeRef::Slice(nested(rest));
    }
    if t.starts_with('[') {
        if let Some(close) = matching_close(t, 0) {
            return TypeRef::Slice(nested(&t[close + 1..]));
        }
        return TypeRef::Opaque(t.to_string());
    }
    if let Some(rest) = t.strip_prefix("map") {
        let rest = rest.trim_start();
        if rest.starts_with('[') {
            if let Some(close) = matching_close(rest, 0) {
                return TypeRef::Map(nested(&rest[1..close]), nested(&rest[close + 1..]));
            }
            return TypeRef::Opaque(t.to_string());
        }
    }
    if let Some(inner) = t.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return parse_nested(inner, depth + 1);
    }
    if is_empty_interface(t) {
        return TypeRef::named("any");
    }
    if t.is_empty() || !is_type_name(t) {
        return TypeRef::Opaque(t.to_string());
    }
    TypeRef::named(t)
}

/// `interface{}` with any inner whitespace.
fn is_empty_interface(t: &str) -> bool {
    t.strip_prefix("interface")
        .map(|rest| rest.chars().filter(|c| !c.is_whitespace()).collect::<String>() == "{}")
        .unwrap_or(false)
}

/// `Name` or `pkg.Name`, neither part a keyword.
fn is_type_name(t: &str) -> bool {
    let mut parts = t.split('.');
    let ok = |s: &str| is_identifier(s) && keywords::from_str(s).is_none();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), None, _) => ok(a),
        (Some(a), Some(b), None) => ok(a) && ok(b),
        _ => false,
    }
}

/// Return `true` if `s` is a Go identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Find the index of the bracket closing the one at byte `open` (`[`, `(` or `{`), honoring nesting.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `text` on `sep` at bracket depth 0. Empty segments are dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    top_level_ranges(text, sep)
        .into_iter()
        .map(|r| text[r].trim())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Byte ranges of the `sep`-separated segments of `text` at bracket depth 0.
///
/// Separate from [`split_top_level`] so a caller can compute ranges on a copy with string contents blanked and
/// apply them to the original.
pub fn top_level_ranges(text: &str, sep: char) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                ranges.push(start..i);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    ranges.push(start..text.len());
    ranges
}

/// Split a segment into `(name, type)` at the first whitespace at bracket depth 0, if the head is a plain name.
fn split_name_and_type(segment: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in segment.char_indices() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                let (head, tail) = (&segment[..i], segment[i..].trim());
                let is_name = is_identifier(head) && keywords::from_str(head).is_none();
                return (is_name && !tail.is_empty()).then_some((head, tail));
            }
            _ => {}
        }
    }
    // `name...T` has no whitespace but is still a named variadic.
    segment
        .find("...")
        .filter(|&i| i > 0 && is_identifier(&segment[..i]))
        .map(|i| (&segment[..i], &segment[i..]))
}

/// Parse the inside of a parameter or result list.
///
/// ## Notes
/// - Grouped names share the next type: `a, b int` yields two `int` parameters.
/// - If no segment carries both a name and a type, every segment is an unnamed type (`(int, error)`).
pub fn split_params(text: &str) -> Vec<Parameter> {
    let segments: Vec<(Option<&str>, &str)> = split_top_level(text, ',')
        .into_iter()
        .map(|seg| match split_name_and_type(seg) {
            Some((name, ty)) => (Some(name), ty),
            None => (None, seg),
        })
        .collect();

    if segments.iter().all(|(name, _)| name.is_none()) {
        return segments
            .into_iter()
            .map(|(_, ty)| Parameter::new("", parse_type_ref(ty)))
            .collect();
    }

    let mut params = Vec::new();
    let mut carried: Vec<&str> = Vec::new();
    for (name, ty) in segments {
        match name {
            None => carried.push(ty),
            Some(name) => {
                let parsed = parse_type_ref(ty);
                for grouped in carried.drain(..) {
                    params.push(Parameter::new(grouped, parsed.clone()));
                }
                params.push(Parameter::new(name, parsed));
            }
        }
    }
    // Dangling names with no type are malformed; keep them visible as unnamed types.
    params.extend(carried.into_iter().map(|t| Parameter::new("", parse_type_ref(t))));
    params
}

/// Parse the result part of a signature: `T`, `(T, U)`, `(a T, err error)` or nothing.
pub fn parse_results(text: &str) -> Vec<Parameter> {
    let t = text.trim();
    if t.is_empty() {
        return Vec::new();
    }
    if t.starts_with('(') && matching_close(t, 0) == Some(t.len() - 1) {
        return split_params(&t[1..t.len() - 1]);
    }
    vec![Parameter::new("", parse_type_ref(t))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gojava_core::lang::primitives::PrimitiveId;

    fn prim(id: PrimitiveId) -> TypeRef {
        TypeRef::Primitive(id)
    }

    #[test]
    fn prefix_order_matters() {
        assert_eq!(
            parse_type_ref("...[]int"),
            TypeRef::Variadic(Box::new(TypeRef::Slice(Box::new(prim(PrimitiveId::Int)))))
        );
        assert_eq!(
            parse_type_ref("*map[string]int"),
            TypeRef::Pointer(Box::new(TypeRef::Map(
                Box::new(prim(PrimitiveId::String)),
                Box::new(prim(PrimitiveId::Int))
            )))
        );
    }

    #[test]
    fn nested_maps_split_at_matching_bracket() {
        let t = parse_type_ref("map[string]map[int][]*models.User");
        assert_eq!(t.to_string(), "map[string]map[int][]*models.User");
    }

    #[test]
    fn arrays_become_slices() {
        assert_eq!(parse_type_ref("[4]byte"), TypeRef::Slice(Box::new(prim(PrimitiveId::Byte))));
    }

    #[test]
    fn empty_interface_and_any() {
        assert_eq!(parse_type_ref("interface{}"), prim(PrimitiveId::Any));
        assert_eq!(parse_type_ref("interface { }"), prim(PrimitiveId::Any));
        assert_eq!(parse_type_ref("any"), prim(PrimitiveId::Any));
    }

    #[test]
    fn opaque_shapes() {
        assert_eq!(parse_type_ref("func(int) error"), TypeRef::Opaque("func(int) error".into()));
        assert_eq!(parse_type_ref("chan int"), TypeRef::Opaque("chan int".into()));
        assert_eq!(parse_type_ref("List[int]"), TypeRef::Opaque("List[int]".into()));
    }

    #[test]
    fn grouped_names_take_trailing_type() {
        let params = split_params("a, b int, s string");
        let rendered: Vec<String> = params.iter().map(|p| format!("{} {}", p.name, p.ty)).collect();
        assert_eq!(rendered, vec!["a int", "b int", "s string"]);
    }

    #[test]
    fn unnamed_params() {
        let params = split_params("int, error");
        assert!(params.iter().all(|p| p.name.is_empty()));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn variadic_and_func_typed_params() {
        let params = split_params("f func(a, b int) error, nums ...int");
        assert_eq!(params[0].name, "f");
        assert_eq!(params[0].ty, TypeRef::Opaque("func(a, b int) error".into()));
        assert_eq!(params[1].ty, TypeRef::Variadic(Box::new(prim(PrimitiveId::Int))));
    }

    #[test]
    fn results_forms() {
        assert!(parse_results("").is_empty());
        assert_eq!(parse_results("string").len(), 1);
        let named = parse_results("(avg float64, count int)");
        assert_eq!(named[1].name, "count");
        // A function-typed single result is not a parenthesized list.
        assert_eq!(parse_results("(func() int)").len(), 1);
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
    }
}
