use crate::{
    Bindings, MetadataRequest, MetadataSupport, QueryError, QueryExecuteOptions,
    QueryResultMetadata,
};
use async_trait::async_trait;
use rdf_interop_model::{Quad, QuadTermName, Variable};
use rdf_interop_stream::ResultStream;
use std::fmt::{Debug, Display, Formatter};

/// The kind of result a [Query] produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryResultType {
    Bindings,
    Quads,
    Boolean,
    Void,
}

impl QueryResultType {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryResultType::Bindings => "bindings",
            QueryResultType::Quads => "quads",
            QueryResultType::Boolean => "boolean",
            QueryResultType::Void => "void",
        }
    }
}

impl Display for QueryResultType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prepared query producing a stream of [Bindings], for example a SPARQL `SELECT`.
///
/// Nothing is evaluated before [BindingsQuery::execute] is called.
#[async_trait]
pub trait BindingsQuery: Send + Sync {
    /// Evaluates the query.
    ///
    /// Fails with [QueryError::UnsupportedOrder] if `options` requests an order that the query
    /// cannot provide.
    async fn execute(
        &self,
        options: QueryExecuteOptions<Variable>,
    ) -> Result<ResultStream<Bindings>, QueryError>;

    /// The variables that the produced bindings may bind.
    async fn variables(&self) -> Result<Vec<Variable>, QueryError>;

    /// The metadata kinds that [BindingsQuery::metadata] can provide.
    fn metadata_support(&self) -> MetadataSupport {
        MetadataSupport::NONE
    }

    /// Computes the requested metadata. Unsupported kinds are [None].
    async fn metadata(
        &self,
        _request: MetadataRequest,
    ) -> Result<QueryResultMetadata<Variable>, QueryError> {
        Ok(QueryResultMetadata::default())
    }
}

/// A prepared query producing a stream of quads, for example a SPARQL `CONSTRUCT`.
#[async_trait]
pub trait QuadsQuery: Send + Sync {
    async fn execute(
        &self,
        options: QueryExecuteOptions<QuadTermName>,
    ) -> Result<ResultStream<Quad>, QueryError>;

    fn metadata_support(&self) -> MetadataSupport {
        MetadataSupport::NONE
    }

    async fn metadata(
        &self,
        _request: MetadataRequest,
    ) -> Result<QueryResultMetadata<QuadTermName>, QueryError> {
        Ok(QueryResultMetadata::default())
    }
}

/// A prepared query producing a boolean, for example a SPARQL `ASK`.
#[async_trait]
pub trait BooleanQuery: Send + Sync {
    async fn execute(&self) -> Result<bool, QueryError>;
}

/// A prepared query that is evaluated for its side effects, for example a SPARQL update.
#[async_trait]
pub trait VoidQuery: Send + Sync {
    async fn execute(&self) -> Result<(), QueryError>;
}

/// A prepared query of any result type.
///
/// The variant tells which kind of result [Query::execute] returns.
pub enum Query {
    Bindings(Box<dyn BindingsQuery>),
    Quads(Box<dyn QuadsQuery>),
    Boolean(Box<dyn BooleanQuery>),
    Void(Box<dyn VoidQuery>),
}

impl Query {
    pub fn result_type(&self) -> QueryResultType {
        match self {
            Query::Bindings(_) => QueryResultType::Bindings,
            Query::Quads(_) => QueryResultType::Quads,
            Query::Boolean(_) => QueryResultType::Boolean,
            Query::Void(_) => QueryResultType::Void,
        }
    }

    /// Evaluates the query with default options.
    pub async fn execute(&self) -> Result<QueryResult, QueryError> {
        Ok(match self {
            Query::Bindings(query) => {
                QueryResult::Bindings(query.execute(QueryExecuteOptions::default()).await?)
            }
            Query::Quads(query) => {
                QueryResult::Quads(query.execute(QueryExecuteOptions::default()).await?)
            }
            Query::Boolean(query) => QueryResult::Boolean(query.execute().await?),
            Query::Void(query) => {
                query.execute().await?;
                QueryResult::Void
            }
        })
    }

    /// Returns the bindings query or fails with [QueryError::UnexpectedResultType].
    pub fn into_bindings(self) -> Result<Box<dyn BindingsQuery>, QueryError> {
        match self {
            Query::Bindings(query) => Ok(query),
            query => Err(query.unexpected(QueryResultType::Bindings)),
        }
    }

    pub fn into_quads(self) -> Result<Box<dyn QuadsQuery>, QueryError> {
        match self {
            Query::Quads(query) => Ok(query),
            query => Err(query.unexpected(QueryResultType::Quads)),
        }
    }

    pub fn into_boolean(self) -> Result<Box<dyn BooleanQuery>, QueryError> {
        match self {
            Query::Boolean(query) => Ok(query),
            query => Err(query.unexpected(QueryResultType::Boolean)),
        }
    }

    pub fn into_void(self) -> Result<Box<dyn VoidQuery>, QueryError> {
        match self {
            Query::Void(query) => Ok(query),
            query => Err(query.unexpected(QueryResultType::Void)),
        }
    }

    fn unexpected(&self, expected: QueryResultType) -> QueryError {
        QueryError::UnexpectedResultType {
            expected,
            actual: self.result_type(),
        }
    }
}

impl Debug for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("result_type", &self.result_type())
            .finish_non_exhaustive()
    }
}

/// The result of [Query::execute].
#[derive(Debug)]
pub enum QueryResult {
    Bindings(ResultStream<Bindings>),
    Quads(ResultStream<Quad>),
    Boolean(bool),
    Void,
}

impl QueryResult {
    pub fn result_type(&self) -> QueryResultType {
        match self {
            QueryResult::Bindings(_) => QueryResultType::Bindings,
            QueryResult::Quads(_) => QueryResultType::Quads,
            QueryResult::Boolean(_) => QueryResultType::Boolean,
            QueryResult::Void => QueryResultType::Void,
        }
    }
}
