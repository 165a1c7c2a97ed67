use crate::{ResultStream, StoreError};
use async_trait::async_trait;
use rdf_interop_model::{GraphName, NamedNode, Quad, QuadPattern};

/// A source of quads that can be queried with a [QuadPattern].
///
/// Variables in the pattern act as wildcards, with repeated variables binding equal terms. An
/// absent graph spans all graphs, while an explicit default graph only spans
/// the default graph.
pub trait Source: Send + Sync {
    /// Returns a stream of all quads matching `pattern`.
    fn match_quads(&self, pattern: &QuadPattern) -> ResultStream<Quad>;
}

/// Consumes streams for their side effects, for example persisting quads.
#[async_trait]
pub trait Sink<T: Send + 'static>: Send + Sync {
    /// Drains `stream` into the sink.
    ///
    /// Resolves with the number of consumed items once the stream ended. Fails with the error of
    /// the stream. Items consumed before the error are not rolled back.
    async fn import(&self, stream: ResultStream<T>) -> Result<usize, StoreError>;
}

/// A mutable collection of quads that is both a [Source] and a [Sink].
#[async_trait]
pub trait Store: Source + Sink<Quad> {
    /// Removes every quad that `stream` yields.
    ///
    /// Resolves with the number of quads that were actually removed.
    async fn remove(&self, stream: ResultStream<Quad>) -> Result<usize, StoreError>;

    /// Removes every quad matching `pattern`, using the same wildcard rules as
    /// [Source::match_quads].
    async fn remove_matches(&self, pattern: &QuadPattern) -> Result<usize, StoreError>;

    /// Removes every quad in `graph`.
    async fn delete_graph(&self, graph: GraphName) -> Result<usize, StoreError>;

    /// Removes every quad in the graph named by the IRI `graph`.
    async fn delete_graph_by_name(&self, graph: &str) -> Result<usize, StoreError> {
        let graph = NamedNode::new(graph)?;
        self.delete_graph(graph.into()).await
    }
}
