use crate::Dataset;
use async_trait::async_trait;
use futures::StreamExt;
use rdf_interop_model::{GraphName, Quad, QuadPattern, VariableMatchingMode};
use rdf_interop_stream::{ResultStream, Sink, Source, Store, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configures a [MemoryStore].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryStoreConfig {
    /// The maximum number of quads that [Sink::import] and [Store::remove] apply under a single
    /// write lock. Readers may observe the intermediate state between two batches.
    pub batch_size: usize,
}

impl MemoryStoreConfig {
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self { batch_size: 1024 }
    }
}

/// A [Store] that keeps its quads in a [Dataset] in memory.
///
/// The store can be shared between tasks by cloning it. All clones operate on the same quads.
/// Readers obtain a point-in-time view: the stream returned by [Source::match_quads] copies the
/// matching quads when it is first polled, and later writes do not affect it.
///
/// ```
/// use rdf_interop_dataset::MemoryStore;
/// use rdf_interop_model::*;
/// use rdf_interop_stream::{ResultStream, Sink, Source};
///
/// let ex = NamedNode::new("http://example.com/s")?;
/// let quad = Quad::in_default_graph(ex.clone(), ex.clone(), ex.clone());
///
/// let store = MemoryStore::new();
/// let matches = tokio_test::block_on(async {
///     store.import([quad.clone()].into_iter().collect()).await?;
///     let matches = store.match_quads(&QuadPattern::any()).try_collect_to_vec().await?;
///     Result::<_, Box<dyn std::error::Error>>::Ok(matches)
/// })?;
/// assert_eq!(matches, [quad]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    dataset: Arc<RwLock<Dataset>>,
    config: MemoryStoreConfig,
}

impl MemoryStore {
    /// Creates an empty store with the default [MemoryStoreConfig].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            dataset: Arc::default(),
            config,
        }
    }

    /// Creates a store that initially holds the quads of `dataset`.
    pub fn from_dataset(dataset: Dataset, config: MemoryStoreConfig) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
            config,
        }
    }

    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// The number of quads in the store.
    pub async fn len(&self) -> usize {
        self.dataset.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.dataset.read().await.is_empty()
    }

    /// Returns a copy of the current content.
    pub async fn snapshot(&self) -> Dataset {
        self.dataset.read().await.clone()
    }

    /// Drains `stream` in batches of [MemoryStoreConfig::batch_size] and passes every quad to
    /// `apply` while holding the write lock.
    ///
    /// Returns the number of quads read and the number of quads for which `apply` returned true.
    /// A failing stream aborts after the quads read before the error have been applied.
    async fn apply_batched(
        &self,
        mut stream: ResultStream<Quad>,
        apply: fn(&mut Dataset, Quad) -> bool,
    ) -> Result<(usize, usize), StoreError> {
        let batch_size = self.config.batch_size.max(1);
        let mut read = 0;
        let mut changed = 0;
        let mut batch = Vec::with_capacity(batch_size);
        loop {
            let (failure, ended) = match stream.next().await {
                Some(Ok(quad)) => {
                    batch.push(quad);
                    read += 1;
                    if batch.len() < batch_size {
                        continue;
                    }
                    (None, false)
                }
                Some(Err(error)) => (Some(error), true),
                None => (None, true),
            };

            if !batch.is_empty() {
                let mut dataset = self.dataset.write().await;
                for quad in batch.drain(..) {
                    if apply(&mut dataset, quad) {
                        changed += 1;
                    }
                }
            }

            if let Some(error) = failure {
                tracing::debug!(read, changed, "Stream failed while writing to the memory store.");
                return Err(error.into());
            }
            if ended {
                return Ok((read, changed));
            }
        }
    }
}

impl Source for MemoryStore {
    fn match_quads(&self, pattern: &QuadPattern) -> ResultStream<Quad> {
        let dataset = Arc::clone(&self.dataset);
        let pattern = pattern.clone();
        let snapshot = futures::stream::once(async move {
            let dataset = dataset.read().await;
            dataset
                .quads_for_pattern(&pattern, VariableMatchingMode::Wildcard)
                .cloned()
                .collect::<Vec<_>>()
        });
        ResultStream::from_stream(
            snapshot.flat_map(|quads| futures::stream::iter(quads.into_iter().map(Ok))),
        )
    }
}

#[async_trait]
impl Sink<Quad> for MemoryStore {
    async fn import(&self, stream: ResultStream<Quad>) -> Result<usize, StoreError> {
        let (read, inserted) = self.apply_batched(stream, Dataset::insert).await?;
        tracing::debug!(read, inserted, "Imported quads into the memory store.");
        Ok(read)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn remove(&self, stream: ResultStream<Quad>) -> Result<usize, StoreError> {
        let (read, removed) = self
            .apply_batched(stream, |dataset, quad| dataset.remove(&quad))
            .await?;
        tracing::debug!(read, removed, "Removed quads from the memory store.");
        Ok(removed)
    }

    async fn remove_matches(&self, pattern: &QuadPattern) -> Result<usize, StoreError> {
        let removed = self
            .dataset
            .write()
            .await
            .remove_pattern(pattern, VariableMatchingMode::Wildcard);
        tracing::debug!(removed, "Removed matching quads from the memory store.");
        Ok(removed)
    }

    async fn delete_graph(&self, graph: GraphName) -> Result<usize, StoreError> {
        let pattern = QuadPattern::any().with_graph(graph.into_term());
        let removed = self
            .dataset
            .write()
            .await
            .remove_pattern(&pattern, VariableMatchingMode::Constant);
        tracing::debug!(removed, "Deleted graph from the memory store.");
        Ok(removed)
    }
}
