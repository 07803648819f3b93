//! Layering guardrails to keep the shared crates free of I/O and async machinery.
//!
//! `gojava_core` is a pure vocabulary crate and may not depend on anything. `gojava_syntax` parses text and may not
//! pull in the async runtime or the LSP types the resolver uses.
//! These tests scan the crates' `Cargo.toml` files and fail if a forbidden crate appears in `[dependencies]`.

/// Dependency names listed in a manifest's `[dependencies]` table.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let deps = dependencies(include_str!("../crates/gojava_core/Cargo.toml"));
    assert!(deps.is_empty(), "gojava_core must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_frontend_stays_synchronous() {
    let deps = dependencies(include_str!("../crates/gojava_syntax/Cargo.toml"));
    for forbidden in ["tokio", "tower-lsp", "serde_json", "gojava"] {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "`{forbidden}` must not appear in gojava_syntax [dependencies]"
        );
    }
    assert!(deps.iter().any(|d| d == "gojava_core"));
}

#[test]
fn translator_depends_on_both_shared_crates() {
    let deps = dependencies(include_str!("../Cargo.toml"));
    assert!(deps.iter().any(|d| d == "gojava_core"));
    assert!(deps.iter().any(|d| d == "gojava_syntax"));
}
