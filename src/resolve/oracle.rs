//! The semantic-oracle and document-source boundaries.
//!
//! Both are external collaborators: the resolver treats every answer as untrusted and every failure as "no
//! information". Positions and locations use the LSP types, since a language server is the usual oracle.

use std::future::Future;
use std::time::Duration;

use tower_lsp::lsp_types::{Location, Position, Url};

/// Default per-call deadline for oracle queries and document reads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Failure of a single oracle query or document read.
///
/// These never reach the user: the resolver logs them and treats the node as unresolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum OracleError {
    #[error("oracle query timed out after {}ms", .0.as_millis())]
    #[diagnostic(code(gojava::oracle::timeout))]
    Timeout(Duration),

    #[error("oracle unavailable: {0}")]
    #[diagnostic(code(gojava::oracle::unavailable))]
    Unavailable(String),

    #[error("cannot read `{uri}`: {message}")]
    #[diagnostic(code(gojava::oracle::document))]
    Document { uri: String, message: String },
}

/// An external service answering "what is at this position" questions.
#[tower_lsp::async_trait]
pub trait SemanticOracle: Send + Sync {
    /// Signature or declaration text for the symbol at `position`.
    async fn hover_info(&self, document: &Url, position: Position) -> Result<Option<String>, OracleError>;

    /// Where the type of the symbol at `position` is defined.
    async fn type_definition_location(&self, document: &Url, position: Position)
    -> Result<Option<Location>, OracleError>;
}

/// Reads document text, from an open buffer or from disk.
#[tower_lsp::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn read_text(&self, document: &Url) -> Result<String, OracleError>;
}

/// Run `call` with a deadline; an expired deadline becomes [`OracleError::Timeout`].
///
/// The abandoned call is dropped, so a late answer is discarded. There is no retry.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(deadline)),
    }
}

/// An oracle that never knows anything; used when resolution is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOracle;

#[tower_lsp::async_trait]
impl SemanticOracle for NullOracle {
    async fn hover_info(&self, _document: &Url, _position: Position) -> Result<Option<String>, OracleError> {
        Ok(None)
    }

    async fn type_definition_location(
        &self,
        _document: &Url,
        _position: Position,
    ) -> Result<Option<Location>, OracleError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_turns_slow_calls_into_timeouts() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, OracleError>(1)
        };
        let result = with_deadline(Duration::from_millis(100), slow).await;
        assert_eq!(result, Err(OracleError::Timeout(Duration::from_millis(100))));
    }

    #[tokio::test]
    async fn deadline_passes_answers_and_errors_through() {
        assert_eq!(with_deadline(DEFAULT_TIMEOUT, async { Ok::<_, OracleError>(7) }).await, Ok(7));
        let failed = with_deadline(DEFAULT_TIMEOUT, async {
            Err::<u8, _>(OracleError::Unavailable("not running".into()))
        })
        .await;
        assert!(matches!(failed, Err(OracleError::Unavailable(_))));
    }

    #[tokio::test]
    async fn null_oracle_knows_nothing() {
        let uri = Url::parse("file:///tmp/a.go").expect("url");
        let oracle = NullOracle;
        assert_eq!(oracle.hover_info(&uri, Position::new(0, 0)).await, Ok(None));
        assert_eq!(oracle.type_definition_location(&uri, Position::new(0, 0)).await, Ok(None));
    }
}
