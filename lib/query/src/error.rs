use crate::{QueryFormat, QueryResultType};
use rdf_interop_model::TermError;
use rdf_interop_stream::{StoreError, StreamError};

/// An error raised while initiating or executing a query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The query is malformed, for example an operator got the wrong number of arguments.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Queries in the format {0} are not supported")]
    UnsupportedFormat(QueryFormat),
    /// The query is well-formed but uses something the engine does not implement.
    #[error("Unsupported query feature: {0}")]
    UnsupportedFeature(String),
    #[error("Unsupported expression operator '{0}'")]
    UnsupportedOperator(String),
    #[error("The requested result order is not supported")]
    UnsupportedOrder,
    #[error("Expected a query producing {expected} but got one producing {actual}")]
    UnexpectedResultType {
        expected: QueryResultType,
        actual: QueryResultType,
    },
    #[error("The query context does not name any source")]
    MissingSources,
    /// Query results are produced by tasks that need a running Tokio runtime.
    #[error("Query evaluation requires a running Tokio runtime")]
    MissingRuntime,
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Term(#[from] TermError),
}

impl QueryError {
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFeature(msg.into())
    }
}

impl From<QueryError> for StreamError {
    /// Wraps the error so that it can be delivered through a
    /// [ResultStream](rdf_interop_stream::ResultStream).
    #[inline]
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::Stream(error) => error,
            error => StreamError::new(error),
        }
    }
}
