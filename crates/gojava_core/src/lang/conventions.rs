//! Naming conventions shared by both languages.
//!
//! Go encodes visibility in the case of an identifier's first letter; Java uses access modifiers and has its own
//! casing conventions (lowerCamel members, UpperCamel types, UPPER_SNAKE constants). These helpers perform the
//! name transforms the generator relies on.
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::conventions::{to_lower_camel, to_upper_snake, to_java_ident, is_exported};
//!
//! assert_eq!(to_lower_camel("GetName"), "getName");
//! assert_eq!(to_lower_camel("HTTPServer"), "httpServer");
//! assert_eq!(to_upper_snake("maxRetries"), "MAX_RETRIES");
//! assert_eq!(to_java_ident("class"), "class_");
//! assert!(is_exported("Person"));
//! ```

/// Java reserved words and literals that cannot be used as identifiers.
pub const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long", "native", "new", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "record",
    "yield",
];

/// Return `true` if a Go identifier is exported (its first character is an uppercase letter).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Escape a name that collides with a Java reserved word by appending `_`.
pub fn to_java_ident(name: &str) -> String {
    if JAVA_RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Uppercase the first character (`processNumbers` → `ProcessNumbers`).
pub fn to_pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a Go identifier to Java lowerCamel case.
///
/// ## Notes
/// - A leading acronym is lowercased as a unit: `ID` → `id`, `HTTPServer` → `httpServer`, `URLPath` → `urlPath`.
/// - Identifiers already in lowerCamel case are returned unchanged.
pub fn to_lower_camel(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let run = chars.iter().take_while(|c| c.is_uppercase()).count();
    let lower_upto = match run {
        0 => return name.to_string(),
        n if n == chars.len() => n,
        1 => 1,
        // Keep the last capital of the run: it starts the next word.
        n if chars[n].is_lowercase() => n - 1,
        n => n,
    };
    chars
        .iter()
        .enumerate()
        .flat_map(|(i, c)| {
            if i < lower_upto {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![*c]
            }
        })
        .collect()
}

/// Convert a Go identifier to Java UPPER_SNAKE case for constants.
///
/// ## Examples
/// ```rust
/// use gojava_core::lang::conventions::to_upper_snake;
///
/// assert_eq!(to_upper_snake("HTTPTimeout"), "HTTP_TIMEOUT");
/// assert_eq!(to_upper_snake("max_size"), "MAX_SIZE");
/// assert_eq!(to_upper_snake("Pi"), "PI");
/// ```
pub fn to_upper_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}
