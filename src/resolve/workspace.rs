//! A semantic oracle over the `.go` files of a workspace, and a document source over open buffers and disk.
//!
//! The oracle indexes every struct, interface and named type by name, using the same parser as the translator. It
//! answers definition queries by reading the identifier at the queried position and looking the name up, preferring
//! the package a qualifier names or, for bare names, the querying document's own directory. Hover answers are the
//! declaration text itself, which the resolver can parse as a fallback.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::{Location, Position, Range, Url};

use super::oracle::{DocumentSource, OracleError, SemanticOracle};
use crate::frontend::{ParserStrategy, parse_unit};
use crate::model::SourceRange;

// ============================================================================
// Document source
// ============================================================================

/// Open editor buffers first, the file system otherwise.
#[derive(Debug, Default)]
pub struct FsDocuments {
    open: RwLock<HashMap<Url, String>>,
}

impl FsDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `uri` instead of the file on disk.
    pub async fn open(&self, uri: Url, text: String) {
        self.open.write().await.insert(uri, text);
    }

    pub async fn close(&self, uri: &Url) {
        self.open.write().await.remove(uri);
    }
}

#[tower_lsp::async_trait]
impl DocumentSource for FsDocuments {
    async fn read_text(&self, document: &Url) -> Result<String, OracleError> {
        if let Some(text) = self.open.read().await.get(document) {
            return Ok(text.clone());
        }
        let path = document.to_file_path().map_err(|()| OracleError::Document {
            uri: document.to_string(),
            message: "not a file URI".to_string(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| OracleError::Document {
                uri: document.to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Workspace oracle
// ============================================================================

#[derive(Debug, Clone)]
struct IndexedDecl {
    uri: Url,
    /// Go package name of the declaring file.
    package: String,
    range: Range,
    /// `type Name ...` declaration text.
    text: String,
}

pub struct WorkspaceOracle {
    index: HashMap<String, Vec<IndexedDecl>>,
    documents: Arc<dyn DocumentSource>,
}

impl WorkspaceOracle {
    /// An empty index reading queried documents through `documents`.
    pub fn new(documents: Arc<dyn DocumentSource>) -> Self {
        Self {
            index: HashMap::new(),
            documents,
        }
    }

    /// Index every `.go` file (tests excluded) under `roots`.
    ///
    /// Unreadable files and directories are skipped with a warning.
    #[tracing::instrument(skip_all, fields(roots = roots.len()))]
    pub fn index(roots: &[PathBuf], documents: Arc<dyn DocumentSource>) -> Self {
        let mut oracle = Self::new(documents);
        let mut files = Vec::new();
        for root in roots {
            collect_go_files(root, &mut files);
        }
        files.sort();
        files.dedup();
        for path in files {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "workspace: cannot read file");
                    continue;
                }
            };
            let Ok(uri) = Url::from_file_path(&path) else {
                continue;
            };
            oracle.add_document(uri, &text);
        }
        tracing::debug!(names = oracle.index.len(), "workspace: indexed");
        oracle
    }

    /// Index the declarations of one document.
    pub fn add_document(&mut self, uri: Url, text: &str) {
        let unit = parse_unit(text, ParserStrategy::Grammar);
        let lines: Vec<&str> = text.lines().collect();
        let decls = unit
            .structs
            .iter()
            .map(|s| (&s.name, s.range))
            .chain(unit.interfaces.iter().map(|i| (&i.name, i.range)))
            .chain(unit.typedefs.iter().map(|t| (&t.name, t.range)));
        for (name, range) in decls {
            let Some(range) = range else {
                continue;
            };
            self.index.entry(name.clone()).or_default().push(IndexedDecl {
                uri: uri.clone(),
                package: unit.package.clone(),
                range: lsp_range(range),
                text: declaration_text(&lines, range),
            });
        }
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    async fn lookup(&self, document: &Url, position: Position) -> Result<Option<&IndexedDecl>, OracleError> {
        let text = self.documents.read_text(document).await?;
        let Some((qualifier, name)) = identifier_at(&text, position) else {
            return Ok(None);
        };
        let Some(candidates) = self.index.get(&name) else {
            return Ok(None);
        };
        let found = match qualifier {
            Some(qualifier) => {
                let unit = parse_unit(&text, ParserStrategy::Scan);
                let package = unit
                    .import_for(&qualifier)
                    .map(|i| i.path.rsplit('/').next().unwrap_or(&i.path).to_string())
                    .unwrap_or(qualifier);
                candidates.iter().find(|d| d.package == package)
            }
            None => {
                let dir = parent_dir(document);
                candidates
                    .iter()
                    .find(|d| dir.is_some() && parent_dir(&d.uri) == dir)
                    .or_else(|| candidates.first())
            }
        };
        Ok(found)
    }
}

#[tower_lsp::async_trait]
impl SemanticOracle for WorkspaceOracle {
    async fn hover_info(&self, document: &Url, position: Position) -> Result<Option<String>, OracleError> {
        Ok(self.lookup(document, position).await?.map(|d| d.text.clone()))
    }

    async fn type_definition_location(
        &self,
        document: &Url,
        position: Position,
    ) -> Result<Option<Location>, OracleError> {
        Ok(self
            .lookup(document, position)
            .await?
            .map(|d| Location::new(d.uri.clone(), d.range)))
    }
}

fn collect_go_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "workspace: cannot read directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_dir() {
            if !name.starts_with('.') && name != "testdata" && name != "vendor" {
                collect_go_files(&path, out);
            }
        } else if name.ends_with(".go") && !name.ends_with("_test.go") {
            out.push(path);
        }
    }
}

fn parent_dir(uri: &Url) -> Option<PathBuf> {
    uri.to_file_path().ok()?.parent().map(Path::to_path_buf)
}

fn lsp_range(range: SourceRange) -> Range {
    Range::new(
        Position::new(range.start.line, range.start.character),
        Position::new(range.end.line, range.end.character),
    )
}

/// The full lines a declaration spans, prefixed with `type` when it sat inside a group.
fn declaration_text(lines: &[&str], range: SourceRange) -> String {
    let start = range.start.line as usize;
    let end = (range.end.line as usize).min(lines.len().saturating_sub(1));
    let text = lines.get(start..=end).map(|l| l.join("\n")).unwrap_or_default();
    let text = text.trim();
    if text.starts_with("type ") {
        text.to_string()
    } else {
        format!("type {text}")
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The (possibly qualified) identifier touching `position`; the character offset is in UTF-16 units.
pub fn identifier_at(text: &str, position: Position) -> Option<(Option<String>, String)> {
    let line = text.lines().nth(position.line as usize)?;
    let mut units = 0usize;
    let mut at = line.len();
    for (i, c) in line.char_indices() {
        if units >= position.character as usize {
            at = i;
            break;
        }
        units += c.len_utf16();
    }

    let start = line[..at].rfind(|c: char| !is_ident_char(c)).map_or(0, |i| i + 1);
    let end = line[at..].find(|c: char| !is_ident_char(c)).map_or(line.len(), |i| at + i);
    if start >= end {
        return None;
    }
    let word = &line[start..end];

    // `pkg.Name` with the cursor on `Name`
    if line[..start].ends_with('.') {
        let before = &line[..start - 1];
        let q_start = before.rfind(|c: char| !is_ident_char(c)).map_or(0, |i| i + 1);
        let qualifier = &before[q_start..];
        if !qualifier.is_empty() {
            return Some((Some(qualifier.to_string()), word.to_string()));
        }
    }
    // `pkg.Name` with the cursor on `pkg`
    if let Some(rest) = line[end..].strip_prefix('.') {
        let name_end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if name_end > 0 {
            return Some((Some(word.to_string()), rest[..name_end].to_string()));
        }
    }
    Some((None, word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(path: &str) -> Url {
        Url::parse(&format!("file://{path}")).expect("url")
    }

    #[test]
    fn identifiers_with_and_without_qualifiers() {
        let text = "type A struct {\n\tU models.User\n\tB *Boss\n}\n";
        assert_eq!(identifier_at(text, Position::new(1, 11)), Some((Some("models".into()), "User".into())));
        assert_eq!(identifier_at(text, Position::new(1, 4)), Some((Some("models".into()), "User".into())));
        assert_eq!(identifier_at(text, Position::new(2, 4)), Some((None, "Boss".into())));
        assert_eq!(identifier_at(text, Position::new(9, 0)), None);
    }

    #[tokio::test]
    async fn definitions_prefer_the_qualified_package() {
        let documents = Arc::new(FsDocuments::new());
        let origin = uri("/ws/app/order.go");
        documents
            .open(
                origin.clone(),
                "package app\n\nimport \"example.com/ws/models\"\n\ntype Order struct {\n\tBuyer models.User\n}\n"
                    .to_string(),
            )
            .await;

        let mut oracle = WorkspaceOracle::new(documents.clone());
        oracle.add_document(uri("/ws/other/user.go"), "package other\n\ntype User struct {\n\tID int\n}\n");
        oracle.add_document(uri("/ws/models/user.go"), "package models\n\ntype User struct {\n\tName string\n}\n");
        assert_eq!(oracle.len(), 1);

        let location = oracle
            .type_definition_location(&origin, Position::new(5, 14))
            .await
            .expect("query")
            .expect("location");
        assert_eq!(location.uri, uri("/ws/models/user.go"));
        assert_eq!(location.range.start.line, 2);

        let hover = oracle.hover_info(&origin, Position::new(5, 14)).await.expect("query").expect("text");
        assert_eq!(hover, "type User struct {\n\tName string\n}");
    }

    #[tokio::test]
    async fn unreadable_documents_are_errors() {
        let oracle = WorkspaceOracle::new(Arc::new(FsDocuments::new()));
        let missing = uri("/definitely/not/here.go");
        assert!(matches!(
            oracle.type_definition_location(&missing, Position::new(0, 0)).await,
            Err(OracleError::Document { .. })
        ));
    }
}
