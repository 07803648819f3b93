//! Dependency resolver scenarios against in-memory oracle and document fakes.
//!
//! Run with: `cargo test --test resolver_tests`

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gojava::frontend::{ParserStrategy, parse_unit};
use gojava::model::{DeclSource, Enrichment, SourceUnit};
use gojava::resolve::workspace::identifier_at;
use gojava::resolve::{
    DependencyResolver, DocumentSource, NullOracle, OracleError, ResolverOptions, SemanticOracle, WorkspaceOracle,
};
use tower_lsp::lsp_types::{Location, Position, Range, Url};

// ============================================================================
// Fakes
// ============================================================================

fn uri(path: &str) -> Url {
    Url::parse(&format!("file:///ws/{path}")).expect("url")
}

#[derive(Default)]
struct MemDocuments {
    texts: HashMap<Url, String>,
}

impl MemDocuments {
    fn with(mut self, document: &Url, text: &str) -> Self {
        self.texts.insert(document.clone(), text.to_string());
        self
    }
}

#[tower_lsp::async_trait]
impl DocumentSource for MemDocuments {
    async fn read_text(&self, document: &Url) -> Result<String, OracleError> {
        self.texts.get(document).cloned().ok_or_else(|| OracleError::Document {
            uri: document.to_string(),
            message: "no such document".to_string(),
        })
    }
}

/// Answers by the identifier at the queried position.
struct FakeOracle {
    documents: Arc<MemDocuments>,
    definitions: HashMap<String, Location>,
    hovers: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeOracle {
    fn new(documents: Arc<MemDocuments>) -> Self {
        Self {
            documents,
            definitions: HashMap::new(),
            hovers: HashMap::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn define(mut self, name: &str, document: &Url, line: u32) -> Self {
        let range = Range::new(Position::new(line, 5), Position::new(line, 5 + name.len() as u32));
        self.definitions.insert(name.to_string(), Location::new(document.clone(), range));
        self
    }

    fn hover(mut self, name: &str, text: &str) -> Self {
        self.hovers.insert(name.to_string(), text.to_string());
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn name_at(&self, document: &Url, position: Position) -> Result<Option<String>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let text = self.documents.read_text(document).await?;
        Ok(identifier_at(&text, position).map(|(_, name)| name))
    }
}

#[tower_lsp::async_trait]
impl SemanticOracle for FakeOracle {
    async fn hover_info(&self, document: &Url, position: Position) -> Result<Option<String>, OracleError> {
        let name = self.name_at(document, position).await?;
        Ok(name.and_then(|n| self.hovers.get(&n).cloned()))
    }

    async fn type_definition_location(
        &self,
        document: &Url,
        position: Position,
    ) -> Result<Option<Location>, OracleError> {
        let name = self.name_at(document, position).await?;
        Ok(name.and_then(|n| self.definitions.get(&n).cloned()))
    }
}

fn names(enrichment: &Enrichment) -> Vec<&str> {
    enrichment
        .structs
        .iter()
        .map(|s| s.decl.name.as_str())
        .chain(enrichment.interfaces.iter().map(|i| i.decl.name.as_str()))
        .collect()
}

fn unit_of(documents: &MemDocuments, document: &Url) -> SourceUnit {
    parse_unit(&documents.texts[document], ParserStrategy::Grammar)
}

const A_GO: &str = "package p\n\ntype A struct {\n\tPeer *B\n}\n";
const B_GO: &str = "package p\n\ntype B struct {\n\tBack *A\n}\n";

fn mutual() -> (Arc<MemDocuments>, Url, Url) {
    let (a, b) = (uri("p/a.go"), uri("p/b.go"));
    let documents = Arc::new(MemDocuments::default().with(&a, A_GO).with(&b, B_GO));
    (documents, a, b)
}

// ============================================================================
// Walk
// ============================================================================

#[tokio::test]
async fn mutual_references_resolve_the_other_side_once() {
    let (documents, a, b) = mutual();
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("A", &a, 2).define("B", &b, 2));
    let options = ResolverOptions::default().with_max_depth(2);
    let mut resolver = DependencyResolver::new(oracle, documents.clone(), options);

    let enrichment = resolver.resolve(&unit_of(&documents, &a), &a).await;
    assert_eq!(names(&enrichment), vec!["B"]);
    assert_eq!(enrichment.structs[0].source, DeclSource::Document(b.to_string()));
    assert_eq!(enrichment.structs[0].package, None);
}

#[tokio::test]
async fn an_oracle_that_knows_nothing_adds_nothing() {
    let (documents, a, _) = mutual();
    let mut resolver = DependencyResolver::new(Arc::new(NullOracle), documents.clone(), ResolverOptions::default());
    let enrichment = resolver.resolve(&unit_of(&documents, &a), &a).await;
    assert!(names(&enrichment).is_empty());
}

#[tokio::test]
async fn cycles_terminate_with_each_type_at_most_once() {
    let origin = uri("app/main.go");
    let (a, b) = (uri("p/a.go"), uri("p/b.go"));
    let documents = Arc::new(
        MemDocuments::default()
            .with(&origin, "package app\n\ntype Root struct {\n\tFirst A\n}\n")
            .with(&a, A_GO)
            .with(&b, B_GO),
    );
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("A", &a, 2).define("B", &b, 2));
    for depth in [3, 10] {
        let options = ResolverOptions::default().with_max_depth(depth);
        let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), options);
        let enrichment = resolver.resolve(&unit_of(&documents, &origin), &origin).await;
        assert_eq!(names(&enrichment), vec!["A", "B"], "max depth {depth}");
    }
}

#[tokio::test]
async fn depth_bound_stops_the_walk() {
    let origin = uri("app/main.go");
    let (a, b) = (uri("p/a.go"), uri("p/b.go"));
    let documents = Arc::new(
        MemDocuments::default()
            .with(&origin, "package app\n\ntype Root struct {\n\tFirst A\n}\n")
            .with(&a, A_GO)
            .with(&b, B_GO),
    );
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("A", &a, 2).define("B", &b, 2));
    let resolver = |depth| {
        let options = ResolverOptions::default().with_max_depth(depth);
        DependencyResolver::new(oracle.clone(), documents.clone(), options)
    };

    let enrichment = resolver(1).resolve(&unit_of(&documents, &origin), &origin).await;
    assert_eq!(names(&enrichment), vec!["A"]);
    let nothing = resolver(0).resolve(&unit_of(&documents, &origin), &origin).await;
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn same_package_types_in_external_documents_need_no_oracle() {
    let origin = uri("app/main.go");
    let models = uri("models/user.go");
    let documents = Arc::new(
        MemDocuments::default()
            .with(&origin, "package app\n\nimport \"example.com/models\"\n\ntype Session struct {\n\tUser models.User\n}\n")
            .with(&models, "package models\n\ntype User struct {\n\tAddress Address\n}\n\ntype Address struct {\n\tCity string\n}\n"),
    );
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("User", &models, 2));
    let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), ResolverOptions::default());

    let enrichment = resolver.resolve(&unit_of(&documents, &origin), &origin).await;
    assert_eq!(names(&enrichment), vec!["User", "Address"]);
    assert_eq!(enrichment.structs[0].package.as_deref(), Some("models"));
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn interfaces_and_their_method_types_are_followed() {
    let origin = uri("app/main.go");
    let store = uri("store/store.go");
    let documents = Arc::new(
        MemDocuments::default()
            .with(&origin, "package app\n\nfunc Open(s Store) error { return nil }\n")
            .with(&store, "package app\n\ntype Store interface {\n\tGet(key string) (*Record, error)\n}\n\ntype Record struct {\n\tKey string\n}\n"),
    );
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("Store", &store, 2));
    let mut resolver = DependencyResolver::new(oracle, documents.clone(), ResolverOptions::default());

    let enrichment = resolver.resolve(&unit_of(&documents, &origin), &origin).await;
    assert_eq!(enrichment.interfaces.len(), 1);
    assert_eq!(enrichment.interfaces[0].decl.name, "Store");
    assert_eq!(enrichment.structs.len(), 1);
    assert_eq!(enrichment.structs[0].decl.name, "Record");
}

// ============================================================================
// Oracle behavior
// ============================================================================

#[tokio::test]
async fn hover_text_is_the_fallback() {
    let origin = uri("app/order.go");
    let documents = Arc::new(MemDocuments::default().with(&origin, "package app\n\ntype Order struct {\n\tTotal Money\n}\n"));
    let oracle = Arc::new(
        FakeOracle::new(documents.clone()).hover("Money", "type Money struct {\n\tAmount int64\n\tCurrency string\n}"),
    );
    let mut resolver = DependencyResolver::new(oracle, documents.clone(), ResolverOptions::default());

    let enrichment = resolver.resolve(&unit_of(&documents, &origin), &origin).await;
    assert_eq!(names(&enrichment), vec!["Money"]);
    let money = &enrichment.structs[0];
    assert_eq!(money.source, DeclSource::Hover(origin.to_string()));
    assert_eq!(money.decl.fields.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_oracles_time_out_and_leave_types_unresolved() {
    let (documents, a, b) = mutual();
    let oracle = Arc::new(
        FakeOracle::new(documents.clone())
            .define("B", &b, 2)
            .slow(Duration::from_secs(30)),
    );
    let options = ResolverOptions::default().with_timeout(Duration::from_millis(100));
    let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), options);

    let start = tokio::time::Instant::now();
    let enrichment = resolver.resolve(&unit_of(&documents, &a), &a).await;
    assert!(enrichment.is_empty());
    assert!(start.elapsed() < Duration::from_secs(1));
    // Definition, then the hover fallback.
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn standard_library_types_are_skipped_unless_requested() {
    let origin = uri("app/stream.go");
    let documents = Arc::new(
        MemDocuments::default()
            .with(&origin, "package app\n\nimport \"io\"\n\ntype Stream struct {\n\tSrc io.Reader\n\tN   int\n}\n"),
    );
    let unit = unit_of(&documents, &origin);

    let oracle = Arc::new(FakeOracle::new(documents.clone()));
    let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), ResolverOptions::default());
    assert!(resolver.resolve(&unit, &origin).await.is_empty());
    assert_eq!(oracle.calls(), 0);

    let oracle = Arc::new(FakeOracle::new(documents.clone()));
    let options = ResolverOptions::default().with_resolve_stdlib(true);
    let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), options);
    assert!(resolver.resolve(&unit, &origin).await.is_empty());
    assert!(oracle.calls() > 0);
}

#[tokio::test]
async fn answers_are_cached_until_invalidated() {
    let (documents, a, b) = mutual();
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("A", &a, 2).define("B", &b, 2));
    let mut resolver = DependencyResolver::new(oracle.clone(), documents.clone(), ResolverOptions::default());
    let unit = unit_of(&documents, &a);

    let first = resolver.resolve(&unit, &a).await;
    let asked = oracle.calls();
    assert_eq!(asked, 2);

    let second = resolver.resolve(&unit, &a).await;
    assert_eq!(first, second);
    assert_eq!(oracle.calls(), asked);

    resolver.invalidate(&a);
    let third = resolver.resolve(&unit, &a).await;
    assert_eq!(first, third);
    assert_eq!(oracle.calls(), asked + 1);
}

#[tokio::test]
async fn unreadable_documents_are_not_fatal() {
    let origin = uri("app/main.go");
    let gone = uri("p/gone.go");
    let documents = Arc::new(MemDocuments::default().with(&origin, "package app\n\ntype Root struct {\n\tX Lost\n}\n"));
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("Lost", &gone, 2));
    let mut resolver = DependencyResolver::new(oracle, documents.clone(), ResolverOptions::default());

    assert!(resolver.resolve(&unit_of(&documents, &origin), &origin).await.is_empty());
}

// ============================================================================
// Workspace oracle
// ============================================================================

#[tokio::test]
async fn workspace_index_answers_for_the_resolver() {
    let origin = uri("app/order.go");
    let customer = uri("crm/customer.go");
    let order = "package app\n\nimport \"example.com/crm\"\n\ntype Order struct {\n\tBuyer *crm.Customer\n}\n";
    let crm = "package crm\n\n// Customer buys things.\ntype Customer struct {\n\tName string\n\tTier Tier\n}\n\ntype Tier interface {\n\tDiscount() float64\n}\n";
    let documents = Arc::new(MemDocuments::default().with(&origin, order).with(&customer, crm));

    let mut oracle = WorkspaceOracle::new(documents.clone());
    oracle.add_document(customer.clone(), crm);
    let mut resolver = DependencyResolver::new(Arc::new(oracle), documents.clone(), ResolverOptions::default());

    let enrichment = resolver.resolve(&unit_of(&documents, &origin), &origin).await;
    assert_eq!(names(&enrichment), vec!["Customer", "Tier"]);
    assert_eq!(enrichment.structs[0].decl.doc.as_deref(), Some("Customer buys things."));
}

#[tokio::test]
async fn resolved_types_render_with_provenance() {
    use gojava::backend::{GeneratorOptions, generate_unit};

    let (documents, a, b) = mutual();
    let oracle = Arc::new(FakeOracle::new(documents.clone()).define("A", &a, 2).define("B", &b, 2));
    let options = ResolverOptions::default().with_max_depth(2);
    let mut resolver = DependencyResolver::new(oracle, documents.clone(), options);
    let unit = unit_of(&documents, &a);

    let enrichment = resolver.resolve(&unit, &a).await;
    let java = generate_unit(&unit, Some(&enrichment), &GeneratorOptions::default()).expect("declarations");
    assert!(java.contains(&format!("// Resolved from {b}\n")), "{java}");
    assert_eq!(java.matches("public static class B {").count(), 1);
    assert_eq!(java.matches("public static class A {").count(), 1);
    assert!(java.contains("private B peer;"));
    assert!(!java.contains("unresolved"));
}
