//! Go standard-library vocabulary: the cross-reference table and the set of known standard packages.
//!
//! The cross-reference table maps a package-qualified Go type (`time.Duration`) to its documented Java equivalent,
//! the import that equivalent needs, and a note explaining the mapping. The type mapper consults it before any other
//! rule; the dependency resolver uses [`is_stdlib_package`] to avoid cross-file lookups for standard types.
//!
//! ## Examples
//! ```rust
//! use gojava_core::lang::stdlib;
//!
//! let dur = stdlib::cross_reference("time.Duration").unwrap();
//! assert_eq!(dur.java, "Duration");
//! assert_eq!(dur.import, Some("java.time.Duration"));
//! assert!(stdlib::is_stdlib_import_path("net/http"));
//! assert!(!stdlib::is_stdlib_import_path("github.com/acme/widgets"));
//! ```

/// One cross-reference entry: a Go standard-library type and its Java equivalent.
#[derive(Debug, Clone, Copy)]
pub struct CrossRefInfo {
    /// Package-qualified Go name, using the package *name* as written in source (`time.Time`).
    pub go: &'static str,
    /// Simple Java type name used in generated code.
    pub java: &'static str,
    /// Fully-qualified import needed for `java`, if it is not in `java.lang`.
    pub import: Option<&'static str>,
    /// Explanation threaded into generated doc comments.
    pub note: &'static str,
}

const fn xref(go: &'static str, java: &'static str, import: Option<&'static str>, note: &'static str) -> CrossRefInfo {
    CrossRefInfo { go, java, import, note }
}

/// Registry of Go standard-library types with documented Java equivalents.
pub const CROSS_REFERENCES: &[CrossRefInfo] = &[
    xref(
        "time.Time",
        "Instant",
        Some("java.time.Instant"),
        "time.Time is an instant with an optional location; java.time.Instant is the closest equivalent.",
    ),
    xref(
        "time.Duration",
        "Duration",
        Some("java.time.Duration"),
        "time.Duration is an int64 nanosecond count; java.time.Duration models the same span.",
    ),
    xref(
        "time.Location",
        "ZoneId",
        Some("java.time.ZoneId"),
        "time.Location corresponds to a java.time.ZoneId.",
    ),
    xref(
        "io.Reader",
        "InputStream",
        Some("java.io.InputStream"),
        "io.Reader is a one-method interface; java.io.InputStream is an abstract class with the same role.",
    ),
    xref(
        "io.Writer",
        "OutputStream",
        Some("java.io.OutputStream"),
        "io.Writer corresponds to java.io.OutputStream.",
    ),
    xref(
        "io.ReadCloser",
        "InputStream",
        Some("java.io.InputStream"),
        "Java streams are always closeable, so io.ReadCloser maps to java.io.InputStream.",
    ),
    xref(
        "io.Closer",
        "AutoCloseable",
        None,
        "io.Closer corresponds to java.lang.AutoCloseable (usable with try-with-resources).",
    ),
    xref(
        "os.File",
        "File",
        Some("java.io.File"),
        "os.File is an open handle; java.io.File only names a path, so reading needs a stream as well.",
    ),
    xref(
        "strings.Builder",
        "StringBuilder",
        None,
        "strings.Builder corresponds to java.lang.StringBuilder.",
    ),
    xref(
        "bytes.Buffer",
        "ByteArrayOutputStream",
        Some("java.io.ByteArrayOutputStream"),
        "bytes.Buffer is a growable byte buffer, like java.io.ByteArrayOutputStream.",
    ),
    xref(
        "big.Int",
        "BigInteger",
        Some("java.math.BigInteger"),
        "math/big.Int corresponds to java.math.BigInteger.",
    ),
    xref(
        "big.Float",
        "BigDecimal",
        Some("java.math.BigDecimal"),
        "math/big.Float is arbitrary precision; java.math.BigDecimal is the usual substitute.",
    ),
    xref(
        "url.URL",
        "URI",
        Some("java.net.URI"),
        "net/url.URL corresponds to java.net.URI.",
    ),
    xref(
        "regexp.Regexp",
        "Pattern",
        Some("java.util.regex.Pattern"),
        "A compiled regexp.Regexp corresponds to java.util.regex.Pattern.",
    ),
    xref(
        "json.RawMessage",
        "String",
        None,
        "json.RawMessage holds undecoded JSON; it is kept as a String.",
    ),
    xref(
        "fmt.Stringer",
        "Object",
        None,
        "Every Java object has toString(), so fmt.Stringer needs no interface of its own.",
    ),
    xref(
        "context.Context",
        "Object",
        None,
        "Java has no context.Context equivalent; deadlines and cancellation must be passed explicitly.",
    ),
    xref(
        "errors.Error",
        "Exception",
        None,
        "Go errors are values; Java signals them with exceptions.",
    ),
];

/// Import paths of commonly used Go standard-library packages.
pub const STDLIB_PACKAGES: &[&str] = &[
    "bufio",
    "bytes",
    "context",
    "crypto",
    "crypto/sha256",
    "database/sql",
    "encoding/base64",
    "encoding/json",
    "encoding/xml",
    "errors",
    "flag",
    "fmt",
    "io",
    "io/fs",
    "log",
    "math",
    "math/big",
    "math/rand",
    "net",
    "net/http",
    "net/url",
    "os",
    "os/exec",
    "path",
    "path/filepath",
    "reflect",
    "regexp",
    "sort",
    "strconv",
    "strings",
    "sync",
    "sync/atomic",
    "testing",
    "time",
    "unicode",
    "unicode/utf8",
];

/// Look up the cross-reference entry for a package-qualified Go type name.
pub fn cross_reference(qualified: &str) -> Option<&'static CrossRefInfo> {
    CROSS_REFERENCES.iter().find(|x| x.go == qualified)
}

/// Return `true` if `path` is a standard-library import path.
///
/// ## Notes
/// - Go module paths of third-party code always start with a domain (`github.com/...`), so any path whose first
///   element contains no `.` is treated as standard library even if it is missing from [`STDLIB_PACKAGES`].
pub fn is_stdlib_import_path(path: &str) -> bool {
    if STDLIB_PACKAGES.contains(&path) {
        return true;
    }
    let first = path.split('/').next().unwrap_or(path);
    !first.is_empty() && !first.contains('.')
}

/// Return `true` if `name` is the package *name* (last path element) of a known standard package.
///
/// Used when a qualifier appears without a matching import (e.g. when parsing hover text).
pub fn is_stdlib_package(name: &str) -> bool {
    STDLIB_PACKAGES
        .iter()
        .any(|path| path.rsplit('/').next() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_reference_keys_are_qualified() {
        for x in CROSS_REFERENCES {
            assert!(x.go.contains('.'), "{} must be package-qualified", x.go);
            if let Some(import) = x.import {
                assert!(import.ends_with(x.java), "{import} does not name {}", x.java);
            }
        }
    }

    #[test]
    fn unknown_types_have_no_cross_reference() {
        assert!(cross_reference("time.Month").is_none());
        assert!(cross_reference("Time").is_none());
    }

    #[test]
    fn stdlib_paths() {
        assert!(is_stdlib_import_path("fmt"));
        assert!(is_stdlib_import_path("encoding/json"));
        assert!(is_stdlib_import_path("hash/crc32"));
        assert!(!is_stdlib_import_path("example.com/app/models"));
    }

    #[test]
    fn stdlib_package_names() {
        assert!(is_stdlib_package("http"));
        assert!(is_stdlib_package("json"));
        assert!(!is_stdlib_package("models"));
    }
}
