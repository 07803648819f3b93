//! Constant-group expansion: `iota`, implicit repetition, and literal type inference.
//!
//! Go const groups let a spec omit its type and value, in which case it repeats the previous spec's expression with
//! `iota` advanced to the spec's index. Both parser strategies collect raw specs and hand them to
//! [`expand_const_group`], so the two strategies produce identical constants.
//!
//! ## Notes
//! - Expressions mentioning `iota` are evaluated with a small integer evaluator (`+ - * / % << >> & |`, unary minus,
//!   parentheses). Anything it cannot evaluate keeps its source text.
//! - Blank names (`_`) consume an `iota` slot but produce no constant.

use gojava_core::lang::conventions::is_exported;

use crate::model::{SourcePosition, TypeRef, Variable};

/// One raw `name [type] [= values]` spec as written in source.
#[derive(Debug, Clone, Default)]
pub struct RawSpec {
    pub names: Vec<String>,
    pub ty: Option<TypeRef>,
    pub values: Vec<String>,
    pub doc: Option<String>,
    pub position: Option<SourcePosition>,
}

/// Expand a `const` declaration (grouped or not) into constants.
pub fn expand_const_group(specs: Vec<RawSpec>) -> Vec<Variable> {
    let mut out = Vec::new();
    let mut previous: (Option<TypeRef>, Vec<String>) = (None, Vec::new());

    for (iota, spec) in specs.into_iter().enumerate() {
        let (ty, values) = if spec.ty.is_none() && spec.values.is_empty() {
            previous.clone()
        } else {
            (spec.ty, spec.values)
        };

        for (i, name) in spec.names.iter().enumerate() {
            if name == "_" {
                continue;
            }
            let value = values.get(i).map(|raw| evaluate_iota(raw, iota as i64).unwrap_or_else(|| raw.clone()));
            let inferred = ty.clone().or_else(|| value.as_deref().and_then(infer_literal_type));
            out.push(Variable {
                name: name.clone(),
                ty: inferred,
                is_const: true,
                exported: is_exported(name),
                value,
                doc: spec.doc.clone(),
                position: spec.position,
            });
        }
        previous = (ty, values);
    }
    out
}

/// Expand a `var` declaration into variables. No `iota`, no repetition.
pub fn expand_var_group(specs: Vec<RawSpec>) -> Vec<Variable> {
    specs
        .into_iter()
        .flat_map(|spec| {
            let RawSpec {
                names,
                ty,
                values,
                doc,
                position,
            } = spec;
            names
                .into_iter()
                .enumerate()
                .filter(|(_, name)| name != "_")
                .map(|(i, name)| {
                    let value = values.get(i).cloned();
                    let ty = ty.clone().or_else(|| value.as_deref().and_then(infer_literal_type));
                    Variable {
                        exported: is_exported(&name),
                        name,
                        ty,
                        is_const: false,
                        value,
                        doc: doc.clone(),
                        position,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Infer the Go type of an untyped literal.
///
/// ## Returns
/// - `Some(type)` for integer, float, imaginary, string, rune and boolean literals (optionally negated).
///   Integers outside the 32-bit range infer `int64`, so they keep their value as a Java `long`.
/// - `None` for any other expression.
pub fn infer_literal_type(text: &str) -> Option<TypeRef> {
    let t = text.trim();
    let name = match t {
        "true" | "false" => "bool",
        _ if t.starts_with('"') || t.starts_with('`') => "string",
        _ if t.starts_with('\'') => "rune",
        _ => {
            let (negative, digits) = match t.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, t.strip_prefix('+').unwrap_or(t)),
            };
            match numeric_literal_kind(digits)? {
                "int" if !fits_i32(digits, negative) => "int64",
                kind => kind,
            }
        }
    };
    Some(TypeRef::named(name))
}

fn numeric_literal_kind(t: &str) -> Option<&'static str> {
    let first = t.chars().next()?;
    if !(first.is_ascii_digit() || (first == '.' && t.len() > 1)) {
        return None;
    }
    if let Some(body) = t.strip_suffix('i') {
        return numeric_literal_kind(body).map(|_| "complex128");
    }
    let lower = t.to_ascii_lowercase();
    if lower.starts_with("0x") || lower.starts_with("0b") || lower.starts_with("0o") {
        let ok = lower[2..].chars().all(|c| c.is_ascii_hexdigit() || c == '_');
        return ok.then_some("int");
    }
    let valid = lower
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '_' | '.' | 'e' | '+' | '-'));
    if !valid {
        return None;
    }
    if lower.contains('.') || lower.contains('e') {
        Some("float64")
    } else {
        Some("int")
    }
}

/// Whether an unsigned integer literal, negated if `negative`, fits a 32-bit `int`.
fn fits_i32(digits: &str, negative: bool) -> bool {
    let clean: String = digits.chars().filter(|c| *c != '_').collect::<String>().to_ascii_lowercase();
    let (radix, body) = match clean.get(..2) {
        Some("0x") => (16, &clean[2..]),
        Some("0b") => (2, &clean[2..]),
        Some("0o") => (8, &clean[2..]),
        _ if clean.len() > 1 && clean.starts_with('0') => (8, &clean[1..]),
        _ => (10, clean.as_str()),
    };
    let limit = if negative { 1u128 << 31 } else { (1u128 << 31) - 1 };
    // Too long for u128 is certainly out of range.
    u128::from_str_radix(body, radix).is_ok_and(|value| value <= limit)
}

// ============================================================================
// iota evaluation
// ============================================================================

/// Evaluate an integer expression mentioning `iota`; returns the decimal literal.
///
/// Expressions without an `iota` identifier are left alone so ordinary constants keep their spelling.
pub fn evaluate_iota(expr: &str, iota: i64) -> Option<String> {
    if !mentions_iota(expr) {
        return None;
    }
    let mut eval = Evaluator {
        chars: expr.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
        iota,
    };
    let value = eval.expr(0)?;
    (eval.pos == eval.chars.len()).then(|| value.to_string())
}

fn mentions_iota(expr: &str) -> bool {
    expr.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|word| word == "iota")
}

struct Evaluator {
    chars: Vec<char>,
    pos: usize,
    iota: i64,
}

#[derive(Clone, Copy)]
enum BinOp {
    Or,
    Add,
    Sub,
    And,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
}

impl BinOp {
    /// Go precedence: 5 for multiplicative and shifts, 4 for additive.
    fn precedence(self) -> u8 {
        match self {
            BinOp::Or | BinOp::Add | BinOp::Sub => 4,
            BinOp::And | BinOp::Mul | BinOp::Div | BinOp::Rem | BinOp::Shl | BinOp::Shr => 5,
        }
    }

    fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            BinOp::Or => Some(lhs | rhs),
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::And => Some(lhs & rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div => lhs.checked_div(rhs),
            BinOp::Rem => lhs.checked_rem(rhs),
            BinOp::Shl => u32::try_from(rhs).ok().and_then(|r| lhs.checked_shl(r)),
            BinOp::Shr => u32::try_from(rhs).ok().and_then(|r| lhs.checked_shr(r)),
        }
    }
}

impl Evaluator {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_op(&self) -> Option<(BinOp, usize)> {
        let c = self.peek()?;
        let next = self.chars.get(self.pos + 1).copied();
        Some(match (c, next) {
            ('<', Some('<')) => (BinOp::Shl, 2),
            ('>', Some('>')) => (BinOp::Shr, 2),
            ('+', _) => (BinOp::Add, 1),
            ('-', _) => (BinOp::Sub, 1),
            ('*', _) => (BinOp::Mul, 1),
            ('/', _) => (BinOp::Div, 1),
            ('%', _) => (BinOp::Rem, 1),
            ('&', _) => (BinOp::And, 1),
            ('|', _) => (BinOp::Or, 1),
            _ => return None,
        })
    }

    fn expr(&mut self, min_prec: u8) -> Option<i64> {
        let mut lhs = self.unary()?;
        while let Some((op, width)) = self.peek_op() {
            if op.precedence() < min_prec {
                break;
            }
            self.pos += width;
            let rhs = self.expr(op.precedence() + 1)?;
            lhs = op.apply(lhs, rhs)?;
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<i64> {
        match self.peek()? {
            '-' => {
                self.pos += 1;
                self.unary()?.checked_neg()
            }
            '+' => {
                self.pos += 1;
                self.unary()
            }
            '(' => {
                self.pos += 1;
                let value = self.expr(0)?;
                (self.peek() == Some(')')).then(|| self.pos += 1)?;
                Some(value)
            }
            c if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                    self.pos += 1;
                }
                let digits: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();
                digits.parse().ok()
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                    self.pos += 1;
                }
                let word: String = self.chars[start..self.pos].iter().collect();
                (word == "iota").then_some(self.iota)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(names: &[&str], ty: Option<&str>, values: &[&str]) -> RawSpec {
        RawSpec {
            names: names.iter().map(|s| s.to_string()).collect(),
            ty: ty.map(TypeRef::named),
            values: values.iter().map(|s| s.to_string()).collect(),
            ..RawSpec::default()
        }
    }

    #[test]
    fn iota_forms() {
        assert_eq!(evaluate_iota("iota", 3).as_deref(), Some("3"));
        assert_eq!(evaluate_iota("iota + 1", 2).as_deref(), Some("3"));
        assert_eq!(evaluate_iota("iota * 10", 2).as_deref(), Some("20"));
        assert_eq!(evaluate_iota("1 << iota", 4).as_deref(), Some("16"));
        assert_eq!(evaluate_iota("1 << (10 * (iota + 1))", 1).as_deref(), Some("1048576"));
        assert_eq!(evaluate_iota("42", 0), None);
        assert_eq!(evaluate_iota("iota + offset", 0), None);
    }

    #[test]
    fn implicit_repetition_advances_iota() {
        let consts = expand_const_group(vec![
            spec(&["_"], None, &["iota"]),
            spec(&["KB"], Some("ByteSize"), &["1 << (10 * iota)"]),
            spec(&["MB"], None, &[]),
        ]);
        let rendered: Vec<_> = consts
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_deref(), c.ty.as_ref().map(|t| t.to_string())))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("KB", Some("1024"), Some("ByteSize".to_string())),
                ("MB", Some("1048576"), Some("ByteSize".to_string())),
            ]
        );
    }

    #[test]
    fn untyped_iota_infers_int() {
        let consts = expand_const_group(vec![spec(&["Red"], None, &["iota"]), spec(&["Green"], None, &[])]);
        assert_eq!(consts[1].value.as_deref(), Some("1"));
        assert_eq!(consts[1].ty, Some(TypeRef::named("int")));
        assert!(consts[1].exported);
    }

    #[test]
    fn literal_inference() {
        let name = |t: &str| infer_literal_type(t).map(|t| t.to_string());
        assert_eq!(name("42").as_deref(), Some("int"));
        assert_eq!(name("-7").as_deref(), Some("int"));
        assert_eq!(name("0xFF").as_deref(), Some("int"));
        assert_eq!(name("2147483647").as_deref(), Some("int"));
        assert_eq!(name("-2147483648").as_deref(), Some("int"));
        assert_eq!(name("2147483648").as_deref(), Some("int64"));
        assert_eq!(name("-2_147_483_649").as_deref(), Some("int64"));
        assert_eq!(name("0xFFFFFFFF").as_deref(), Some("int64"));
        assert_eq!(name("0o17777777777").as_deref(), Some("int"));
        assert_eq!(name("1_000_000_000_000").as_deref(), Some("int64"));
        assert_eq!(name("3.14").as_deref(), Some("float64"));
        assert_eq!(name("1e9").as_deref(), Some("float64"));
        assert_eq!(name("2i").as_deref(), Some("complex128"));
        assert_eq!(name("\"hi\"").as_deref(), Some("string"));
        assert_eq!(name("`raw`").as_deref(), Some("string"));
        assert_eq!(name("'x'").as_deref(), Some("rune"));
        assert_eq!(name("true").as_deref(), Some("bool"));
        assert_eq!(name("compute()"), None);
        assert_eq!(name("x"), None);
    }

    #[test]
    fn vars_keep_value_text_and_skip_blank() {
        let vars = expand_var_group(vec![spec(&["a", "_", "c"], None, &["1", "2", "\"s\""])]);
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(vars[1].ty, Some(TypeRef::named("string")));
        assert!(!vars[0].is_const);
    }
}
