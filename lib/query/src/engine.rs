//! A reference engine that evaluates basic graph patterns over [Store]s.
//!
//! The engine does not parse queries. It accepts an [Algebra] that names the operation
//! directly. Solutions are computed by a nested-loop join over [Store::match_quads] in a
//! spawned task and handed to the consumer through a bounded channel.

use crate::{
    Bindings, BindingsQuery, BooleanQuery, Expression, Filter, MetadataRequest, MetadataSupport,
    QuadsQuery, Query, QueryContext, QueryError, QueryExecuteOptions, QueryInput,
    QueryResultCardinality, QueryResultMetadata, Queryable, QueryableBindings, QueryableBoolean,
    QueryableQuads, QueryableVoid, VoidQuery,
};
use async_trait::async_trait;
use futures::StreamExt;
use rdf_interop_model::{
    BlankNode, GraphName, Quad, QuadPattern, QuadTermName, Term, Variable, VariableMatchingMode,
};
use rdf_interop_stream::{ResultStream, Sink, Source, Store, StreamError, StreamSender};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Configures a [PatternEngine].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternEngineConfig {
    /// How many solutions the evaluation may compute ahead of the consumer.
    pub channel_capacity: usize,
}

impl PatternEngineConfig {
    #[must_use]
    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity.max(1);
        self
    }
}

impl Default for PatternEngineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 128,
        }
    }
}

/// A conjunction of quad patterns, optionally restricted by a filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasicGraphPattern {
    pub patterns: Vec<QuadPattern>,
    /// Evaluated on complete solutions. Solutions for which it is not true are dropped.
    pub filter: Option<Expression>,
}

impl BasicGraphPattern {
    pub fn new(patterns: impl IntoIterator<Item = QuadPattern>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
            filter: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The distinct variables of the patterns in order of appearance.
    pub fn variables(&self) -> Vec<Variable> {
        let mut result: Vec<Variable> = Vec::new();
        for variable in self.patterns.iter().flat_map(QuadPattern::variables) {
            if !result.contains(variable) {
                result.push(variable.clone());
            }
        }
        result
    }
}

/// The operations understood by [PatternEngine].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Algebra {
    /// Produces the solutions of the pattern. A projection restricts them to the given
    /// variables.
    Select {
        pattern: BasicGraphPattern,
        projection: Option<Vec<Variable>>,
    },
    /// Whether the pattern has at least one solution.
    Ask(BasicGraphPattern),
    /// Instantiates `template` once per solution. Blank nodes of the template are fresh for
    /// every solution.
    Construct {
        template: Vec<Quad>,
        pattern: BasicGraphPattern,
    },
    /// Adds ground quads to the first source.
    InsertData(Vec<Quad>),
    /// Removes ground quads from every source.
    DeleteData(Vec<Quad>),
    /// Removes every quad of a graph from every source.
    ClearGraph(GraphName),
}

impl Algebra {
    /// The name of the operation, for example `select`.
    pub fn operation(&self) -> &'static str {
        match self {
            Algebra::Select { .. } => "select",
            Algebra::Ask(_) => "ask",
            Algebra::Construct { .. } => "construct",
            Algebra::InsertData(_) => "insert data",
            Algebra::DeleteData(_) => "delete data",
            Algebra::ClearGraph(_) => "clear graph",
        }
    }
}

/// Evaluates [Algebra] over the [Store]s of a [QueryContext].
///
/// ```
/// use rdf_interop_dataset::MemoryStore;
/// use rdf_interop_model::*;
/// use rdf_interop_query::*;
/// use rdf_interop_stream::Store;
/// use std::sync::Arc;
///
/// let ex = |name: &str| NamedNode::new_unchecked(format!("http://example.com/{name}"));
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let engine = PatternEngine::default();
/// let context = || QueryContext::new().with_source(Arc::clone(&store));
///
/// let known = tokio_test::block_on(async {
///     let insert = Algebra::InsertData(vec![Quad::in_default_graph(
///         ex("alice"),
///         ex("knows"),
///         ex("bob"),
///     )]);
///     engine.query_void(QueryInput::Algebra(insert), context()).await?;
///
///     let ask = Algebra::Ask(BasicGraphPattern::new([QuadPattern::any()
///         .with_subject(ex("alice"))
///         .with_predicate(ex("knows"))]));
///     engine.query_boolean(QueryInput::Algebra(ask), context()).await
/// })?;
/// assert!(known);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct PatternEngine {
    config: PatternEngineConfig,
}

impl PatternEngine {
    pub fn new(config: PatternEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatternEngineConfig {
        &self.config
    }

    fn plan(
        &self,
        sources: &[Arc<dyn Store>],
        pattern: BasicGraphPattern,
        projection: Option<Vec<Variable>>,
    ) -> Result<Arc<SolutionPlan>, QueryError> {
        let filter = pattern.filter.as_ref().map(Expression::compile).transpose()?;
        let variables = match &projection {
            Some(projection) => projection.clone(),
            None => pattern.variables(),
        };
        Ok(Arc::new(SolutionPlan {
            sources: sources.iter().map(Arc::clone).collect(),
            patterns: pattern.patterns,
            filter,
            projection,
            variables,
            channel_capacity: self.config.channel_capacity,
        }))
    }
}

#[async_trait]
impl Queryable<QueryInput<Algebra>, Arc<dyn Store>> for PatternEngine {
    async fn query(
        &self,
        query: QueryInput<Algebra>,
        context: QueryContext<Arc<dyn Store>>,
    ) -> Result<Query, QueryError> {
        let algebra = match query {
            QueryInput::Algebra(algebra) => algebra,
            QueryInput::Text(_) => {
                return Err(QueryError::UnsupportedFormat(
                    context.query_format_or_default(),
                ))
            }
        };
        let sources = context.sources();
        if sources.is_empty() {
            return Err(QueryError::MissingSources);
        }
        tracing::debug!(sources = sources.len(), "Preparing {} query.", algebra.operation());

        Ok(match algebra {
            Algebra::Select {
                pattern,
                projection,
            } => Query::Bindings(Box::new(SelectQuery {
                plan: self.plan(sources, pattern, projection)?,
            })),
            Algebra::Ask(pattern) => Query::Boolean(Box::new(AskQuery {
                plan: self.plan(sources, pattern, None)?,
            })),
            Algebra::Construct { template, pattern } => Query::Quads(Box::new(ConstructQuery {
                plan: self.plan(sources, pattern, None)?,
                template: template.into(),
            })),
            Algebra::InsertData(quads) => {
                ensure_ground(&quads)?;
                Query::Void(Box::new(UpdateQuery {
                    sources: sources.iter().map(Arc::clone).collect(),
                    update: Update::Insert(quads),
                }))
            }
            Algebra::DeleteData(quads) => {
                ensure_ground(&quads)?;
                Query::Void(Box::new(UpdateQuery {
                    sources: sources.iter().map(Arc::clone).collect(),
                    update: Update::Delete(quads),
                }))
            }
            Algebra::ClearGraph(graph) => Query::Void(Box::new(UpdateQuery {
                sources: sources.iter().map(Arc::clone).collect(),
                update: Update::Clear(graph),
            })),
        })
    }
}

#[async_trait]
impl QueryableBindings<QueryInput<Algebra>, Arc<dyn Store>> for PatternEngine {
    async fn query_bindings(
        &self,
        query: QueryInput<Algebra>,
        context: QueryContext<Arc<dyn Store>>,
    ) -> Result<ResultStream<Bindings>, QueryError> {
        self.query(query, context)
            .await?
            .into_bindings()?
            .execute(QueryExecuteOptions::default())
            .await
    }
}

#[async_trait]
impl QueryableBoolean<QueryInput<Algebra>, Arc<dyn Store>> for PatternEngine {
    async fn query_boolean(
        &self,
        query: QueryInput<Algebra>,
        context: QueryContext<Arc<dyn Store>>,
    ) -> Result<bool, QueryError> {
        self.query(query, context).await?.into_boolean()?.execute().await
    }
}

#[async_trait]
impl QueryableQuads<QueryInput<Algebra>, Arc<dyn Store>> for PatternEngine {
    async fn query_quads(
        &self,
        query: QueryInput<Algebra>,
        context: QueryContext<Arc<dyn Store>>,
    ) -> Result<ResultStream<Quad>, QueryError> {
        self.query(query, context)
            .await?
            .into_quads()?
            .execute(QueryExecuteOptions::default())
            .await
    }
}

#[async_trait]
impl QueryableVoid<QueryInput<Algebra>, Arc<dyn Store>> for PatternEngine {
    async fn query_void(
        &self,
        query: QueryInput<Algebra>,
        context: QueryContext<Arc<dyn Store>>,
    ) -> Result<(), QueryError> {
        self.query(query, context).await?.into_void()?.execute().await
    }
}

fn ensure_ground(quads: &[Quad]) -> Result<(), QueryError> {
    match quads.iter().find(|quad| !quad.variables().is_empty()) {
        Some(quad) => Err(QueryError::invalid(format!(
            "Data operations do not allow variables: {quad}"
        ))),
        None => Ok(()),
    }
}

/// Everything needed to compute the solutions of a [BasicGraphPattern].
struct SolutionPlan {
    sources: Vec<Arc<dyn Store>>,
    patterns: Vec<QuadPattern>,
    filter: Option<Filter>,
    projection: Option<Vec<Variable>>,
    variables: Vec<Variable>,
    channel_capacity: usize,
}

impl SolutionPlan {
    /// Starts the evaluation in a new task on the current Tokio runtime.
    fn solutions(self: &Arc<Self>) -> Result<ResultStream<Bindings>, QueryError> {
        let runtime = Handle::try_current().map_err(|_| QueryError::MissingRuntime)?;
        let (sender, stream) = ResultStream::channel(self.channel_capacity);
        let plan = Arc::clone(self);
        runtime.spawn(async move { plan.produce(sender).await });
        Ok(stream)
    }

    async fn produce(&self, sender: StreamSender<Bindings>) {
        match self.evaluate(&sender).await {
            Ok(()) => {}
            Err(QueryError::Stream(StreamError::Closed)) => {
                tracing::debug!("Stopped evaluation as the consumer is gone.");
            }
            Err(error) => sender.fail(error.into()).await,
        }
    }

    async fn evaluate(&self, sender: &StreamSender<Bindings>) -> Result<(), QueryError> {
        let Some((last, init)) = self.patterns.split_last() else {
            return self.emit(Bindings::new(), sender).await;
        };

        let mut solutions = vec![Bindings::new()];
        for pattern in init {
            let mut extended = Vec::new();
            for solution in &solutions {
                extended.extend(self.join(pattern, solution).await?);
            }
            if extended.is_empty() {
                return Ok(());
            }
            solutions = extended;
        }

        for solution in &solutions {
            for complete in self.join(last, solution).await? {
                self.emit(complete, sender).await?;
            }
        }
        Ok(())
    }

    /// Extends `solution` with every match of `pattern`.
    async fn join(
        &self,
        pattern: &QuadPattern,
        solution: &Bindings,
    ) -> Result<Vec<Bindings>, QueryError> {
        let bound = pattern.substitute(|variable| solution.get(variable).cloned());
        let mut result = Vec::new();
        for source in &self.sources {
            let mut quads = source.match_quads(&bound);
            while let Some(quad) = quads.next().await {
                let quad = quad?;
                let Some(matched) = pattern.bind(&quad, VariableMatchingMode::Wildcard) else {
                    continue;
                };
                if let Some(merged) = solution.merge(&matched.into_iter().collect()) {
                    result.push(merged);
                }
            }
        }
        Ok(result)
    }

    async fn emit(
        &self,
        solution: Bindings,
        sender: &StreamSender<Bindings>,
    ) -> Result<(), QueryError> {
        if !self.filter.as_ref().map_or(true, |filter| filter.test(&solution)) {
            return Ok(());
        }
        let solution = match &self.projection {
            Some(projection) => solution.filter(|_, variable| projection.contains(variable)),
            None => solution,
        };
        sender.send(solution).await?;
        Ok(())
    }

    async fn count(self: &Arc<Self>) -> Result<u64, QueryError> {
        let mut count = 0_u64;
        self.solutions()?.for_each_item(|_| count += 1).await?;
        Ok(count)
    }
}

struct SelectQuery {
    plan: Arc<SolutionPlan>,
}

#[async_trait]
impl BindingsQuery for SelectQuery {
    async fn execute(
        &self,
        options: QueryExecuteOptions<Variable>,
    ) -> Result<ResultStream<Bindings>, QueryError> {
        if options.order.is_some() {
            return Err(QueryError::UnsupportedOrder);
        }
        self.plan.solutions()
    }

    async fn variables(&self) -> Result<Vec<Variable>, QueryError> {
        Ok(self.plan.variables.clone())
    }

    fn metadata_support(&self) -> MetadataSupport {
        MetadataSupport::CARDINALITY.with(MetadataSupport::VARIABLES)
    }

    async fn metadata(
        &self,
        request: MetadataRequest,
    ) -> Result<QueryResultMetadata<Variable>, QueryError> {
        let mut metadata = QueryResultMetadata::default();
        if request.cardinality.is_some() {
            let count = self.plan.count().await?;
            metadata.cardinality = Some(QueryResultCardinality::exact(count));
        }
        Ok(metadata)
    }
}

struct AskQuery {
    plan: Arc<SolutionPlan>,
}

#[async_trait]
impl BooleanQuery for AskQuery {
    async fn execute(&self) -> Result<bool, QueryError> {
        let mut solutions = self.plan.solutions()?;
        match solutions.next().await {
            None => Ok(false),
            Some(Ok(_)) => Ok(true),
            Some(Err(error)) => Err(error.into()),
        }
    }
}

struct ConstructQuery {
    plan: Arc<SolutionPlan>,
    template: Arc<[Quad]>,
}

impl ConstructQuery {
    fn quads(&self) -> Result<ResultStream<Quad>, QueryError> {
        let template = Arc::clone(&self.template);
        let mut seen = FxHashSet::default();
        let quads = self.plan.solutions()?.flat_map(move |solution| {
            let produced = match solution {
                Err(error) => vec![Err(error)],
                Ok(solution) => instantiate_template(&template, &solution)
                    .into_iter()
                    .filter(|quad| seen.insert(quad.clone()))
                    .map(Ok)
                    .collect(),
            };
            futures::stream::iter(produced)
        });
        Ok(ResultStream::from_stream(quads))
    }
}

#[async_trait]
impl QuadsQuery for ConstructQuery {
    async fn execute(
        &self,
        options: QueryExecuteOptions<QuadTermName>,
    ) -> Result<ResultStream<Quad>, QueryError> {
        if options.order.is_some() {
            return Err(QueryError::UnsupportedOrder);
        }
        self.quads()
    }

    fn metadata_support(&self) -> MetadataSupport {
        MetadataSupport::CARDINALITY
    }

    async fn metadata(
        &self,
        request: MetadataRequest,
    ) -> Result<QueryResultMetadata<QuadTermName>, QueryError> {
        let mut metadata = QueryResultMetadata::default();
        if request.cardinality.is_some() {
            let mut count = 0_u64;
            self.quads()?.for_each_item(|_| count += 1).await?;
            metadata.cardinality = Some(QueryResultCardinality::exact(count));
        }
        Ok(metadata)
    }
}

/// Instantiates every template quad with `solution`. Quads with unbound variables or with terms
/// in positions they may not take are skipped.
fn instantiate_template(template: &[Quad], solution: &Bindings) -> Vec<Quad> {
    let mut blank_nodes = FxHashMap::default();
    template
        .iter()
        .filter_map(|quad| instantiate_quad(quad, solution, &mut blank_nodes))
        .collect()
}

fn instantiate_quad(
    quad: &Quad,
    solution: &Bindings,
    blank_nodes: &mut FxHashMap<BlankNode, BlankNode>,
) -> Option<Quad> {
    let [subject, predicate, object, graph] = quad.terms();
    let subject = instantiate_term(subject.into_owned(), solution, blank_nodes)?;
    let predicate = instantiate_term(predicate.into_owned(), solution, blank_nodes)?;
    let object = instantiate_term(object.into_owned(), solution, blank_nodes)?;
    let graph = instantiate_term(graph.into_owned(), solution, blank_nodes)?;
    Quad::try_new(subject, predicate, object, Some(graph)).ok()
}

fn instantiate_term(
    term: Term,
    solution: &Bindings,
    blank_nodes: &mut FxHashMap<BlankNode, BlankNode>,
) -> Option<Term> {
    match term {
        Term::Variable(variable) => solution.get(&variable).cloned(),
        Term::BlankNode(node) => Some(blank_nodes.entry(node).or_default().clone().into()),
        Term::Quad(quad) => instantiate_quad(&quad, solution, blank_nodes).map(Term::from),
        term => Some(term),
    }
}

enum Update {
    Insert(Vec<Quad>),
    Delete(Vec<Quad>),
    Clear(GraphName),
}

struct UpdateQuery {
    sources: Vec<Arc<dyn Store>>,
    update: Update,
}

#[async_trait]
impl VoidQuery for UpdateQuery {
    async fn execute(&self) -> Result<(), QueryError> {
        match &self.update {
            Update::Insert(quads) => {
                let Some(target) = self.sources.first() else {
                    return Err(QueryError::MissingSources);
                };
                let inserted = target
                    .import(quads.iter().cloned().collect::<ResultStream<_>>())
                    .await?;
                tracing::debug!("Inserted {inserted} quads.");
            }
            Update::Delete(quads) => {
                for source in &self.sources {
                    let removed = source
                        .remove(quads.iter().cloned().collect::<ResultStream<_>>())
                        .await?;
                    tracing::debug!("Deleted {removed} quads.");
                }
            }
            Update::Clear(graph) => {
                for source in &self.sources {
                    let removed = source.delete_graph(graph.clone()).await?;
                    tracing::debug!("Cleared {removed} quads of graph {graph}.");
                }
            }
        }
        Ok(())
    }
}
