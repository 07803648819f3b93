//! Cross-file type resolution.
//!
//! ## Module Organization
//!
//! - `oracle` - the [`SemanticOracle`] and [`DocumentSource`] boundaries, deadlines, the null oracle
//! - `cache` - [`ResolutionCache`] with its two TTL tables
//! - `resolver` - the depth-first [`DependencyResolver`]
//! - `workspace` - a concrete oracle over a directory of `.go` files, and a file-system document source
//!
//! The resolver enriches a unit; it never mutates it. Everything it learns travels in an
//! [`Enrichment`](crate::model::Enrichment) handed to the generator alongside the unit.

pub mod cache;
pub mod oracle;
pub mod resolver;
pub mod workspace;

pub use cache::{DEFAULT_TTL, ParsedDocument, ResolutionCache};
pub use oracle::{DEFAULT_TIMEOUT, DocumentSource, NullOracle, OracleError, SemanticOracle, with_deadline};
pub use resolver::{DEFAULT_MAX_DEPTH, DependencyResolver, ResolverOptions};
pub use workspace::{FsDocuments, WorkspaceOracle};
