use crate::{Bindings, Query, QueryContext, QueryError};
use async_trait::async_trait;
use rdf_interop_model::Quad;
use rdf_interop_stream::ResultStream;

/// A query as handed to an engine: either a string in the format named by the
/// [QueryContext], or an engine-specific algebra `A`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryInput<A> {
    Text(String),
    Algebra(A),
}

impl<A> From<&str> for QueryInput<A> {
    fn from(query: &str) -> Self {
        QueryInput::Text(query.to_owned())
    }
}

impl<A> From<String> for QueryInput<A> {
    fn from(query: String) -> Self {
        QueryInput::Text(query)
    }
}

/// A query engine that initiates queries of type `Q` over sources of type `S`.
#[async_trait]
pub trait Queryable<Q: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    /// Validates `query` and prepares it for execution.
    ///
    /// Fails if the query is invalid or not supported. No results are computed before the
    /// returned [Query] is executed.
    async fn query(&self, query: Q, context: QueryContext<S>) -> Result<Query, QueryError>;
}

/// An engine that answers queries with [Bindings], for example SPARQL `SELECT` queries.
///
/// Together with [QueryableBoolean], [QueryableQuads] and [QueryableVoid], this describes which
/// result types an engine supports. An engine only implements the traits of the result types
/// it produces.
#[async_trait]
pub trait QueryableBindings<Q: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    /// Initiates and executes `query`. Fails if the query does not produce bindings.
    async fn query_bindings(
        &self,
        query: Q,
        context: QueryContext<S>,
    ) -> Result<ResultStream<Bindings>, QueryError>;
}

/// An engine that answers queries with a boolean, for example SPARQL `ASK` queries.
#[async_trait]
pub trait QueryableBoolean<Q: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    async fn query_boolean(&self, query: Q, context: QueryContext<S>) -> Result<bool, QueryError>;
}

/// An engine that answers queries with quads, for example SPARQL `CONSTRUCT` queries.
#[async_trait]
pub trait QueryableQuads<Q: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    async fn query_quads(
        &self,
        query: Q,
        context: QueryContext<S>,
    ) -> Result<ResultStream<Quad>, QueryError>;
}

/// An engine that executes queries for their side effects, for example SPARQL updates.
#[async_trait]
pub trait QueryableVoid<Q: Send + 'static, S: Send + Sync + 'static>: Send + Sync {
    async fn query_void(&self, query: Q, context: QueryContext<S>) -> Result<(), QueryError>;
}

/// An engine that supports every result type of SPARQL.
pub trait SparqlQueryable<Q: Send + 'static, S: Send + Sync + 'static>:
    QueryableBindings<Q, S> + QueryableBoolean<Q, S> + QueryableQuads<Q, S> + QueryableVoid<Q, S>
{
}

impl<T, Q, S> SparqlQueryable<Q, S> for T
where
    T: QueryableBindings<Q, S> + QueryableBoolean<Q, S> + QueryableQuads<Q, S> + QueryableVoid<Q, S>,
    Q: Send + 'static,
    S: Send + Sync + 'static,
{
}
