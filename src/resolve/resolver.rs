//! Dependency Resolver: finds the declarations of types a unit references but does not declare.
//!
//! The walk is a sequential depth-first search over every named type reference reachable from struct fields,
//! interface methods, function signatures, variable and constant types, and named-type underlyings. Each reference
//! site is located in its document and handed to the semantic oracle; the defining document is read (through the
//! cache) and parsed, and the matching struct or interface is recorded once.
//!
//! ## Notes
//! - Termination: a visited set keyed by (type name, package path or referencing document) plus a set of recorded
//!   declarations keyed by (name, defining document), and the `max_depth` bound.
//! - Failures (timeouts, unreadable documents, unknown positions) are logged at `debug` and leave that node
//!   unresolved; they never abort the walk.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use gojava_core::lang::primitives::is_builtin_type_name;
use gojava_core::lang::stdlib::{is_stdlib_import_path, is_stdlib_package};
use regex::Regex;
use tower_lsp::lsp_types::{Location, Position, Url};

use super::cache::{ParsedDocument, QueryAnswer, QueryKey, QueryKind, ResolutionCache};
use super::oracle::{DEFAULT_TIMEOUT, DocumentSource, SemanticOracle, with_deadline};
use crate::frontend::{ParserStrategy, parse_unit};
use crate::model::{DeclSource, Enrichment, External, Interface, SourceUnit, Struct, TypeRef};

/// Default walk depth bound.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Resolver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Walk depth bound; references deeper than this are not explored.
    pub max_depth: usize,
    /// Also resolve standard-library types through the oracle.
    pub resolve_stdlib: bool,
    /// Deadline for each oracle query and document read.
    pub timeout: Duration,
    /// Parser used for documents the walk reads.
    pub strategy: ParserStrategy,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            resolve_stdlib: false,
            timeout: DEFAULT_TIMEOUT,
            strategy: ParserStrategy::default(),
        }
    }
}

impl ResolverOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_resolve_stdlib(mut self, on: bool) -> Self {
        self.resolve_stdlib = on;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: ParserStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// A reference waiting to be resolved.
#[derive(Debug, Clone)]
struct Pending {
    name: String,
    /// Qualifier as written (`models` in `models.User`).
    qualifier: Option<String>,
    /// Import path behind the qualifier, when the referencing unit imports it.
    package: Option<String>,
    /// Document containing the reference site.
    document: Url,
    depth: usize,
}

#[derive(Debug, Clone)]
enum Found {
    Struct(Struct),
    Interface(Interface),
}

pub struct DependencyResolver {
    oracle: Arc<dyn SemanticOracle>,
    documents: Arc<dyn DocumentSource>,
    cache: ResolutionCache,
    options: ResolverOptions,
}

impl DependencyResolver {
    pub fn new(oracle: Arc<dyn SemanticOracle>, documents: Arc<dyn DocumentSource>, options: ResolverOptions) -> Self {
        Self::with_cache(oracle, documents, options, ResolutionCache::default())
    }

    /// Build a resolver around an existing cache (one per host session).
    pub fn with_cache(
        oracle: Arc<dyn SemanticOracle>,
        documents: Arc<dyn DocumentSource>,
        options: ResolverOptions,
        cache: ResolutionCache,
    ) -> Self {
        Self {
            oracle,
            documents,
            cache,
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache_mut(&mut self) -> &mut ResolutionCache {
        &mut self.cache
    }

    /// Forget everything cached for `document`, e.g. after its text changed.
    pub fn invalidate(&mut self, document: &Url) {
        self.cache.invalidate(document);
    }

    /// Resolve the external declarations `unit` depends on.
    ///
    /// `origin` identifies the document `unit` was parsed from; declarations found there are local and never part
    /// of the result. References deeper than [`ResolverOptions::max_depth`] are not explored.
    #[tracing::instrument(skip_all, fields(origin = %origin, max_depth = self.options.max_depth))]
    pub async fn resolve(&mut self, unit: &SourceUnit, origin: &Url) -> Enrichment {
        let max_depth = self.options.max_depth;
        let mut enrichment = Enrichment::default();
        let mut visited: HashSet<(String, String)> = HashSet::new();
        let mut recorded: HashSet<(String, String)> = HashSet::new();
        let local = unit.declared_type_names();

        let mut stack: Vec<Pending> = Vec::new();
        let mut roots = Vec::new();
        for ty in unit_type_refs(unit) {
            roots.extend(pending_refs(ty, unit, origin, 1));
        }
        // Reversed so that the first reference is explored first.
        roots.reverse();
        stack.extend(roots.into_iter().filter(|p| p.qualifier.is_some() || !local.contains(p.name.as_str())));

        while let Some(item) = stack.pop() {
            if item.depth > max_depth {
                tracing::debug!(name = %item.name, depth = item.depth, "resolver: depth bound reached");
                continue;
            }
            let scope = item.package.clone().unwrap_or_else(|| item.document.to_string());
            if !visited.insert((item.name.clone(), scope)) {
                continue;
            }
            if item.qualifier.is_none() && is_builtin_type_name(&item.name) {
                continue;
            }
            if self.is_stdlib(&item) && !self.options.resolve_stdlib {
                tracing::debug!(name = %item.name, "resolver: standard library, left to the cross-reference table");
                continue;
            }

            let Some((found, source, defining)) = self.locate(&item, origin).await else {
                continue;
            };
            let name = match &found {
                Found::Struct(s) => s.name.clone(),
                Found::Interface(i) => i.name.clone(),
            };
            if !recorded.insert((name.clone(), defining.to_string())) {
                continue;
            }
            tracing::debug!(%name, %source, depth = item.depth, "resolver: resolved");

            // Imports of the defining document qualify the declaration's own references.
            let defining_doc = self.document(&defining).await;
            let empty = SourceUnit::default();
            let context = defining_doc.as_deref().map_or(&empty, |d| &d.unit);
            let mut children = Vec::new();
            for ty in found_type_refs(&found) {
                children.extend(pending_refs(ty, context, &defining, item.depth + 1));
            }
            children.reverse();
            stack.extend(children);

            match found {
                Found::Struct(decl) => enrichment.structs.push(External {
                    decl,
                    source,
                    package: item.qualifier.clone(),
                }),
                Found::Interface(decl) => enrichment.interfaces.push(External {
                    decl,
                    source,
                    package: item.qualifier.clone(),
                }),
            }
        }

        tracing::debug!(
            structs = enrichment.structs.len(),
            interfaces = enrichment.interfaces.len(),
            "resolver: walk finished"
        );
        enrichment
    }

    fn is_stdlib(&self, item: &Pending) -> bool {
        match (&item.package, &item.qualifier) {
            (Some(path), _) => is_stdlib_import_path(path),
            (None, Some(qualifier)) => is_stdlib_package(qualifier),
            (None, None) => false,
        }
    }

    /// Find the declaration a reference names: in its own document, through the oracle, or from hover text.
    ///
    /// ## Returns
    /// - The declaration, where it came from, and the document its own references live in.
    async fn locate(&mut self, item: &Pending, origin: &Url) -> Option<(Found, DeclSource, Url)> {
        let referencing = self.document(&item.document).await?;

        // Same-package types of an external document need no oracle.
        if item.qualifier.is_none() && item.document != *origin {
            if let Some(found) = find_decl(&referencing.unit, &item.name) {
                return Some((found, DeclSource::Document(item.document.to_string()), item.document.clone()));
            }
        }

        let spelled = match &item.qualifier {
            Some(q) => format!("{q}.{}", item.name),
            None => item.name.clone(),
        };
        let Some(position) = find_reference(&referencing.text, item.qualifier.as_deref(), &item.name) else {
            tracing::debug!(name = %spelled, document = %item.document, "resolver: no reference site");
            return None;
        };

        if let Some(location) = self.definition(&item.document, &spelled, position).await {
            if location.uri == *origin {
                return None;
            }
            if let Some(target) = self.document(&location.uri).await {
                if let Some(found) = find_decl(&target.unit, &item.name) {
                    return Some((found, DeclSource::Document(location.uri.to_string()), location.uri));
                }
            }
        }

        let text = self.hover(&item.document, &spelled, position).await?;
        let parsed = parse_unit(&text, ParserStrategy::Scan);
        let found = find_decl(&parsed, &item.name)?;
        Some((found, DeclSource::Hover(item.document.to_string()), item.document.clone()))
    }

    async fn definition(&mut self, document: &Url, name: &str, position: Position) -> Option<Location> {
        let key = QueryKey::new(document, QueryKind::Definition, name);
        if let Some(QueryAnswer::Definition(location)) = self.cache.get_query(&key) {
            return location;
        }
        let call = self.oracle.type_definition_location(document, position);
        match with_deadline(self.options.timeout, call).await {
            Ok(location) => {
                self.cache.set_query(key, QueryAnswer::Definition(location.clone()));
                location
            }
            Err(err) => {
                tracing::debug!(%name, %err, "resolver: definition query failed");
                None
            }
        }
    }

    async fn hover(&mut self, document: &Url, name: &str, position: Position) -> Option<String> {
        let key = QueryKey::new(document, QueryKind::Hover, name);
        if let Some(QueryAnswer::Hover(text)) = self.cache.get_query(&key) {
            return text;
        }
        let call = self.oracle.hover_info(document, position);
        match with_deadline(self.options.timeout, call).await {
            Ok(text) => {
                self.cache.set_query(key, QueryAnswer::Hover(text.clone()));
                text
            }
            Err(err) => {
                tracing::debug!(%name, %err, "resolver: hover query failed");
                None
            }
        }
    }

    /// Read and parse a document through the cache.
    async fn document(&mut self, document: &Url) -> Option<Arc<ParsedDocument>> {
        if let Some(parsed) = self.cache.get_document(document) {
            return Some(parsed);
        }
        let call = self.documents.read_text(document);
        match with_deadline(self.options.timeout, call).await {
            Ok(text) => {
                let unit = parse_unit(&text, self.options.strategy);
                let parsed = Arc::new(ParsedDocument { text, unit });
                self.cache.set_document(document.clone(), Arc::clone(&parsed));
                Some(parsed)
            }
            Err(err) => {
                tracing::debug!(%document, %err, "resolver: document unavailable");
                None
            }
        }
    }
}

// ============================================================================
// Reference collection
// ============================================================================

/// Every type reference written in a unit's declarations.
fn unit_type_refs(unit: &SourceUnit) -> Vec<&TypeRef> {
    let mut refs: Vec<&TypeRef> = Vec::new();
    for s in &unit.structs {
        refs.extend(s.fields.iter().map(|f| &f.ty));
    }
    for i in &unit.interfaces {
        refs.extend(interface_refs(i));
    }
    for function in unit.all_functions() {
        refs.extend(function.params.iter().chain(&function.results).map(|p| &p.ty));
    }
    refs.extend(unit.variables.iter().chain(&unit.constants).filter_map(|v| v.ty.as_ref()));
    refs.extend(unit.typedefs.iter().map(|t| &t.underlying));
    refs
}

fn interface_refs(interface: &Interface) -> Vec<&TypeRef> {
    let mut refs: Vec<&TypeRef> = interface.embedded.iter().collect();
    for method in &interface.methods {
        refs.extend(method.params.iter().chain(&method.results).map(|p| &p.ty));
    }
    refs
}

fn found_type_refs(found: &Found) -> Vec<&TypeRef> {
    match found {
        Found::Struct(s) => s.fields.iter().map(|f| &f.ty).collect(),
        Found::Interface(i) => interface_refs(i),
    }
}

/// Named references inside `ty` (map keys and values included) as pending walk items.
fn pending_refs(ty: &TypeRef, unit: &SourceUnit, document: &Url, depth: usize) -> Vec<Pending> {
    ty.named_refs()
        .into_iter()
        .filter_map(|named| match named {
            TypeRef::Named { name, package } => Some(Pending {
                name: name.clone(),
                qualifier: package.clone(),
                package: package
                    .as_deref()
                    .and_then(|q| unit.import_for(q))
                    .map(|import| import.path.clone()),
                document: document.clone(),
                depth,
            }),
            _ => None,
        })
        .collect()
}

fn find_decl(unit: &SourceUnit, name: &str) -> Option<Found> {
    if let Some(s) = unit.find_struct(name) {
        return Some(Found::Struct(s.clone()));
    }
    unit.find_interface(name).map(|i| Found::Interface(i.clone()))
}

/// Position of the first use of a type name in `text`, skipping comments and the name's own declaration.
///
/// ## Notes
/// - The character offset counts UTF-16 code units, as LSP positions do.
pub(crate) fn find_reference(text: &str, qualifier: Option<&str>, name: &str) -> Option<Position> {
    let spelled = match qualifier {
        Some(q) => format!(r"\b(?P<name>{}\.{})\b", regex::escape(q), regex::escape(name)),
        None => format!(r"(?:^|[^.\w])(?P<name>{})\b", regex::escape(name)),
    };
    let pattern = Regex::new(&spelled).ok()?;
    for (line_no, line) in text.lines().enumerate() {
        let code = line.split("//").next().unwrap_or(line);
        for caps in pattern.captures_iter(code) {
            let Some(found) = caps.name("name") else {
                continue;
            };
            let before = &code[..found.start()];
            if before.trim_end().ends_with("type") {
                continue;
            }
            let character = before.encode_utf16().count();
            return Some(Position::new(u32::try_from(line_no).ok()?, u32::try_from(character).ok()?));
        }
    }
    None
}
