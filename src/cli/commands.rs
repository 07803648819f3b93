//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tower_lsp::lsp_types::Url;

use crate::backend::{GenerateError, generate_function, generate_unit};
use crate::config::Settings;
use crate::frontend::{parse_declaration, parse_unit};
use crate::model::{Enrichment, Function, Parameter, SourceUnit};
use crate::resolve::{DependencyResolver, FsDocuments, ResolutionCache, WorkspaceOracle};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (10 MB)
///
/// Go files larger than this are rejected before reading.
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (10 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let shown = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", shown, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            shown,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", shown, e)))
}

/// Write generated text to `output`, or stdout when no path is given.
fn write_output(text: &str, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => fs::write(path, text)
            .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e))),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

// ============================================================================
// translate
// ============================================================================

/// Translate a Go file into Java.
///
/// With the resolver enabled, the file's directory and every `include` root are indexed and types the file
/// references but does not declare are pulled in from there. A file with no declarations prints the marked error
/// stub and exits with [`ExitCode::NO_DECLARATIONS`].
pub fn translate(file: &Path, output: Option<&Path>, include: &[PathBuf], settings: &Settings) -> CliResult<ExitCode> {
    let source = read_source(file)?;
    let unit = parse_unit(&source, settings.parser);
    for failure in &unit.failures {
        tracing::warn!(
            line = failure.line + 1,
            name = failure.name.as_deref().unwrap_or("declaration"),
            "skipped: {}",
            failure.message
        );
    }

    let enrichment = if settings.resolver_enabled {
        Some(resolve_external(file, &source, &unit, include, settings)?)
    } else {
        None
    };

    match generate_unit(&unit, enrichment.as_ref(), &settings.generator_options()) {
        Ok(java) => {
            write_output(&java, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let GenerateError::NoDeclarations { stub, .. } = &err;
            write_output(stub, output)?;
            Err(CliError::diagnostic(err, ExitCode::NO_DECLARATIONS))
        }
    }
}

/// Run the dependency resolver over a workspace index rooted at the file's directory.
fn resolve_external(
    file: &Path,
    source: &str,
    unit: &SourceUnit,
    include: &[PathBuf],
    settings: &Settings,
) -> CliResult<Enrichment> {
    let path = fs::canonicalize(file)
        .map_err(|e| CliError::failure(format!("Cannot resolve path '{}': {}", file.display(), e)))?;
    let origin = Url::from_file_path(&path)
        .map_err(|()| CliError::failure(format!("Cannot form a file URI for '{}'", path.display())))?;

    let mut roots: Vec<PathBuf> = path.parent().map(Path::to_path_buf).into_iter().collect();
    roots.extend(include.iter().cloned());

    let documents = Arc::new(FsDocuments::new());
    let oracle = WorkspaceOracle::index(&roots, documents.clone());
    tracing::info!(names = oracle.len(), roots = roots.len(), "indexed workspace");

    let mut resolver = DependencyResolver::with_cache(
        Arc::new(oracle),
        documents.clone(),
        settings.resolver_options(),
        ResolutionCache::new(settings.cache_ttl()),
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Cannot start async runtime: {}", e)))?;

    let enrichment = runtime.block_on(async {
        // The buffer being translated wins over whatever is on disk.
        documents.open(origin.clone(), source.to_string()).await;
        resolver.resolve(unit, &origin).await
    });
    tracing::info!(
        structs = enrichment.structs.len(),
        interfaces = enrichment.interfaces.len(),
        "resolved external types"
    );
    Ok(enrichment)
}

// ============================================================================
// parse / decl
// ============================================================================

/// Print the Source Model parsed from a Go file.
pub fn parse(file: &Path, settings: &Settings) -> CliResult<ExitCode> {
    let source = read_source(file)?;
    let unit = parse_unit(&source, settings.parser);
    print!("{}", describe_unit(&unit));
    Ok(ExitCode::SUCCESS)
}

/// Translate one function or method declaration.
pub fn decl(text: &str, settings: &Settings) -> CliResult<ExitCode> {
    let Some(function) = parse_declaration(text) else {
        return Err(CliError::failure("No function or method declaration recognized"));
    };
    print!("{}", generate_function(&function, &settings.generator_options()));
    Ok(ExitCode::SUCCESS)
}

/// Human-readable outline of a unit, one declaration per line.
pub fn describe_unit(unit: &SourceUnit) -> String {
    let mut out = String::new();
    let package = if unit.package.is_empty() { "(none)" } else { &unit.package };
    let _ = writeln!(out, "package {package}");
    for import in &unit.imports {
        match &import.alias {
            Some(alias) => {
                let _ = writeln!(out, "import {alias} {:?}", import.path);
            }
            None => {
                let _ = writeln!(out, "import {:?}", import.path);
            }
        }
    }
    for s in &unit.structs {
        let _ = writeln!(out, "struct {}", s.name);
        for field in &s.fields {
            let mut line = if field.embedded {
                format!("  embeds {}", field.ty)
            } else {
                format!("  field {} {}", field.name, field.ty)
            };
            if let Some(tag) = &field.tag {
                let _ = write!(line, " {tag}");
            }
            let _ = writeln!(out, "{line}");
        }
        for method in &s.methods {
            let _ = writeln!(out, "  method {}", signature(method));
        }
    }
    for i in &unit.interfaces {
        let _ = writeln!(out, "interface {}", i.name);
        for embedded in &i.embedded {
            let _ = writeln!(out, "  embeds {embedded}");
        }
        for method in &i.methods {
            let _ = writeln!(out, "  method {}", signature(method));
        }
    }
    for t in &unit.typedefs {
        let eq = if t.alias { " =" } else { "" };
        let _ = writeln!(out, "type {}{eq} {}", t.name, t.underlying);
        for method in &t.methods {
            let _ = writeln!(out, "  method {}", signature(method));
        }
    }
    for f in &unit.functions {
        let kind = if f.is_method { "method" } else { "func" };
        let _ = writeln!(out, "{kind} {}", signature(f));
    }
    for v in unit.constants.iter().chain(&unit.variables) {
        let kind = if v.is_const { "const" } else { "var" };
        let mut line = format!("{kind} {}", v.name);
        if let Some(ty) = &v.ty {
            let _ = write!(line, " {ty}");
        }
        if let Some(value) = &v.value {
            let _ = write!(line, " = {value}");
        }
        let _ = writeln!(out, "{line}");
    }
    for failure in &unit.failures {
        let name = failure.name.as_deref().unwrap_or("declaration");
        let _ = writeln!(out, "skipped {name} at line {}: {}", failure.line + 1, failure.message);
    }
    out
}

fn params(list: &[Parameter]) -> String {
    list.iter()
        .map(|p| {
            if p.name.is_empty() {
                p.ty.to_string()
            } else {
                format!("{} {}", p.name, p.ty)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `(r *Rect) Area() float64` style signature text.
fn signature(f: &Function) -> String {
    let mut out = String::new();
    if let Some(receiver) = &f.receiver {
        let _ = write!(out, "({}) ", params(std::slice::from_ref(receiver)));
    }
    let _ = write!(out, "{}({})", f.name, params(&f.params));
    match f.results.as_slice() {
        [] => {}
        [single] if single.name.is_empty() => {
            let _ = write!(out, " {}", single.ty);
        }
        results => {
            let _ = write!(out, " ({})", params(results));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::frontend::ParserStrategy;

    #[test]
    fn test_describe_unit_outline() {
        let unit = parse_unit(
            "package shapes\n\nimport \"io\"\n\ntype Rect struct {\n\tio.Reader\n\tW float64 `json:\"w\"`\n}\n\n\
             func (r *Rect) Area() float64 { return 0 }\n\nfunc Split(s string) (head, tail string, err error) { return }\n\n\
             const Max = 3\n",
            ParserStrategy::Grammar,
        );
        let outline = describe_unit(&unit);
        assert_eq!(
            outline,
            "package shapes\n\
             import \"io\"\n\
             struct Rect\n  embeds io.Reader\n  field W float64 `json:\"w\"`\n  method (r *Rect) Area() float64\n\
             func Split(s string) (head string, tail string, err error)\n\
             const Max int = 3\n"
        );
    }

    #[test]
    fn test_describe_unit_reports_failures() {
        let unit = parse_unit("package p\n\ntype List[T any] struct {\n\titems []T\n}\n", ParserStrategy::Grammar);
        let outline = describe_unit(&unit);
        assert!(outline.starts_with("package p\n"));
        assert!(outline.contains("skipped List at line 3:"), "{outline}");
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.go")).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.starts_with("Cannot access file"));
    }

    #[test]
    fn test_decl_rejects_non_declarations() {
        let err = decl("type X struct{}", &Settings::default()).unwrap_err();
        assert!(err.message.contains("No function"));
    }
}
