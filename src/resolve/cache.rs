//! Resolution Cache: parsed documents and oracle answers with a time-to-live.
//!
//! Two independent tables, each entry stamped on insertion. An entry is a hit strictly before `inserted + ttl` and a
//! miss from that instant on, whether or not it was invalidated. Timestamps come from the tokio clock, so a paused
//! runtime controls expiry in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tower_lsp::lsp_types::{Location, Url};

use crate::model::SourceUnit;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A document's text and the unit parsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub text: String,
    pub unit: SourceUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Hover,
    Definition,
}

/// Oracle queries are keyed by document and the type name asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub document: Url,
    pub kind: QueryKind,
    pub name: String,
}

impl QueryKey {
    pub fn new(document: &Url, kind: QueryKind, name: &str) -> Self {
        Self {
            document: document.clone(),
            kind,
            name: name.to_string(),
        }
    }
}

/// A successful oracle answer; "no information" is cached too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAnswer {
    Hover(Option<String>),
    Definition(Option<Location>),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    inserted: Instant,
}

#[derive(Debug, Clone)]
pub struct ResolutionCache {
    ttl: Duration,
    documents: HashMap<Url, Entry<Arc<ParsedDocument>>>,
    queries: HashMap<QueryKey, Entry<QueryAnswer>>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            documents: HashMap::new(),
            queries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_document(&mut self, document: &Url) -> Option<Arc<ParsedDocument>> {
        let ttl = self.ttl;
        fresh(&mut self.documents, document, ttl)
    }

    pub fn set_document(&mut self, document: Url, parsed: Arc<ParsedDocument>) {
        self.documents.insert(document, stamp(parsed));
    }

    pub fn get_query(&mut self, key: &QueryKey) -> Option<QueryAnswer> {
        let ttl = self.ttl;
        fresh(&mut self.queries, key, ttl)
    }

    pub fn set_query(&mut self, key: QueryKey, answer: QueryAnswer) {
        self.queries.insert(key, stamp(answer));
    }

    /// Drop every entry keyed by `document`; called when its text changes.
    pub fn invalidate(&mut self, document: &Url) {
        let dropped_doc = self.documents.remove(document).is_some();
        let before = self.queries.len();
        self.queries.retain(|key, _| key.document != *document);
        tracing::debug!(
            %document,
            parsed = dropped_doc,
            queries = before - self.queries.len(),
            "cache: invalidated"
        );
    }

    /// Number of live and expired-but-unread entries across both tables.
    pub fn len(&self) -> usize {
        self.documents.len() + self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stamp<T>(value: T) -> Entry<T> {
    Entry {
        value,
        inserted: Instant::now(),
    }
}

/// Return a clone of a live entry, evicting it if it has expired.
fn fresh<K, T>(table: &mut HashMap<K, Entry<T>>, key: &K, ttl: Duration) -> Option<T>
where
    K: std::hash::Hash + Eq,
    T: Clone,
{
    let entry = table.get(key)?;
    if entry.inserted.elapsed() < ttl {
        return Some(entry.value.clone());
    }
    table.remove(key);
    None
}
