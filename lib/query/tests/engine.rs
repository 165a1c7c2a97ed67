#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use futures::StreamExt;
use rdf_interop_dataset::MemoryStore;
use rdf_interop_model::{GraphName, Literal, NamedNode, Quad, QuadPattern, Term, Variable};
use rdf_interop_query::{
    Algebra, BasicGraphPattern, CardinalityType, DefaultExpressionFactory, Expression,
    ExpressionFactory, MetadataRequest, MetadataSupport, OrderTerm, PatternEngine, QueryContext,
    QueryError, QueryExecuteOptions, QueryInput, QueryOperationCost, QueryOperationOrder,
    QueryResultCardinality, QueryResultType, Queryable, QueryableBindings, QueryableBoolean,
    QueryableQuads, QueryableVoid, SortDirection,
};
use rdf_interop_stream::{Sink, Source, Store};
use std::error::Error;
use std::sync::Arc;

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

async fn people() -> Result<Arc<dyn Store>, Box<dyn Error>> {
    let store = MemoryStore::new();
    store
        .import(
            [
                Quad::in_default_graph(ex("alice"), ex("knows"), ex("bob")),
                Quad::in_default_graph(ex("bob"), ex("knows"), ex("carol")),
                Quad::in_default_graph(ex("alice"), ex("age"), Literal::from(42_i64)),
                Quad::in_default_graph(ex("bob"), ex("age"), Literal::from(17_i64)),
                Quad::new(ex("carol"), ex("age"), Literal::from(30_i64), ex("g")),
            ]
            .into_iter()
            .collect(),
        )
        .await?;
    Ok(Arc::new(store))
}

fn context(store: &Arc<dyn Store>) -> QueryContext<Arc<dyn Store>> {
    QueryContext::new().with_source(Arc::clone(store))
}

fn select(patterns: impl IntoIterator<Item = QuadPattern>) -> QueryInput<Algebra> {
    QueryInput::Algebra(Algebra::Select {
        pattern: BasicGraphPattern::new(patterns),
        projection: None,
    })
}

fn at_least(variable: &str, value: i64) -> Expression {
    let factory = DefaultExpressionFactory;
    factory.operator_expression(
        ">=",
        vec![
            factory.term_expression(var(variable).into()),
            factory.term_expression(Literal::from(value).into()),
        ],
    )
}

#[tokio::test]
async fn select_joins_patterns_on_shared_variables() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let query = select([
        QuadPattern::any()
            .with_subject(var("x"))
            .with_predicate(ex("knows"))
            .with_object(var("y")),
        QuadPattern::any()
            .with_subject(var("y"))
            .with_predicate(ex("knows"))
            .with_object(var("z")),
    ]);

    let solutions = PatternEngine::default()
        .query_bindings(query, context(&store))
        .await?
        .try_collect_to_vec()
        .await?;

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("x"), Some(&Term::from(ex("alice"))));
    assert_eq!(solutions[0].get("?y"), Some(&Term::from(ex("bob"))));
    assert_eq!(solutions[0].get("z"), Some(&Term::from(ex("carol"))));
    Ok(())
}

#[tokio::test]
async fn empty_pattern_has_one_empty_solution() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let solutions = PatternEngine::default()
        .query_bindings(select([]), context(&store))
        .await?
        .try_collect_to_vec()
        .await?;
    assert_eq!(solutions.len(), 1);
    assert!(solutions[0].is_empty());
    Ok(())
}

#[tokio::test]
async fn projection_and_filter_restrict_solutions() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let pattern = BasicGraphPattern::new([QuadPattern::any()
        .with_subject(var("person"))
        .with_predicate(ex("age"))
        .with_object(var("age"))])
    .with_filter(at_least("age", 18));
    let query = QueryInput::Algebra(Algebra::Select {
        pattern,
        projection: Some(vec![var("person")]),
    });

    let prepared = PatternEngine::default()
        .query(query, context(&store))
        .await?
        .into_bindings()?;
    assert_eq!(prepared.variables().await?, [var("person")]);

    let mut people = prepared
        .execute(QueryExecuteOptions::default())
        .await?
        .map_items(|solution| solution.get("person").map(Term::to_string))
        .try_collect_to_vec()
        .await?;
    people.sort();
    assert_eq!(
        people,
        [
            Some("<http://example.com/alice>".to_owned()),
            Some("<http://example.com/carol>".to_owned()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn ask_reports_whether_a_solution_exists() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let engine = PatternEngine::default();
    let ask = |subject: NamedNode| {
        QueryInput::Algebra(Algebra::Ask(BasicGraphPattern::new([QuadPattern::any()
            .with_subject(subject)
            .with_predicate(ex("knows"))])))
    };

    assert!(engine.query_boolean(ask(ex("alice")), context(&store)).await?);
    assert!(!engine.query_boolean(ask(ex("carol")), context(&store)).await?);
    Ok(())
}

#[test]
fn evaluation_needs_a_tokio_runtime() -> Result<(), Box<dyn Error>> {
    futures::executor::block_on(async {
        let store = people().await?;
        let engine = PatternEngine::default();

        let solutions = engine
            .query_bindings(select([QuadPattern::any()]), context(&store))
            .await;
        assert!(matches!(solutions, Err(QueryError::MissingRuntime)));
        let ask = QueryInput::Algebra(Algebra::Ask(BasicGraphPattern::new([QuadPattern::any()])));
        assert!(matches!(
            engine.query_boolean(ask, context(&store)).await,
            Err(QueryError::MissingRuntime)
        ));
        Ok(())
    })
}

#[tokio::test]
async fn construct_instantiates_the_template_without_duplicates() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let query = QueryInput::Algebra(Algebra::Construct {
        template: vec![Quad::in_default_graph(var("x"), ex("type"), ex("Person"))],
        pattern: BasicGraphPattern::new([QuadPattern::any()
            .with_subject(var("x"))
            .with_predicate(ex("age"))]),
    });

    let quads = PatternEngine::default()
        .query_quads(query, context(&store))
        .await?
        .try_collect_to_vec()
        .await?;
    assert_eq!(quads.len(), 3);
    assert!(quads.contains(&Quad::in_default_graph(
        ex("carol"),
        ex("type"),
        ex("Person")
    )));
    Ok(())
}

#[tokio::test]
async fn updates_modify_the_sources() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let engine = PatternEngine::default();
    let dave = Quad::in_default_graph(ex("dave"), ex("knows"), ex("alice"));

    engine
        .query_void(
            QueryInput::Algebra(Algebra::InsertData(vec![dave.clone()])),
            context(&store),
        )
        .await?;
    let pattern = QuadPattern::from(&dave);
    assert_eq!(store.match_quads(&pattern).try_collect_to_vec().await?, [dave.clone()]);

    engine
        .query_void(
            QueryInput::Algebra(Algebra::DeleteData(vec![dave])),
            context(&store),
        )
        .await?;
    assert!(store.match_quads(&pattern).try_collect_to_vec().await?.is_empty());

    engine
        .query_void(
            QueryInput::Algebra(Algebra::ClearGraph(GraphName::DefaultGraph)),
            context(&store),
        )
        .await?;
    let remaining = store.match_quads(&QuadPattern::any()).try_collect_to_vec().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].graph, GraphName::from(ex("g")));
    Ok(())
}

#[tokio::test]
async fn data_operations_reject_variables() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let insert = Algebra::InsertData(vec![Quad::in_default_graph(
        var("x"),
        ex("p"),
        ex("o"),
    )]);
    let result = PatternEngine::default()
        .query(QueryInput::Algebra(insert), context(&store))
        .await;
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
    Ok(())
}

#[tokio::test]
async fn query_rejects_what_it_cannot_evaluate() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let engine = PatternEngine::default();

    let text = engine
        .query("SELECT * WHERE { ?s ?p ?o }".into(), context(&store))
        .await;
    assert!(matches!(text, Err(QueryError::UnsupportedFormat(_))));

    let without_sources = engine.query(select([]), QueryContext::new()).await;
    assert!(matches!(without_sources, Err(QueryError::MissingSources)));

    let factory = DefaultExpressionFactory;
    let regex = Algebra::Ask(
        BasicGraphPattern::new([QuadPattern::any()])
            .with_filter(factory.operator_expression("regex", Vec::new())),
    );
    let unsupported = engine
        .query(QueryInput::Algebra(regex), context(&store))
        .await;
    assert!(matches!(
        unsupported,
        Err(QueryError::UnsupportedOperator(name)) if name == "regex"
    ));
    Ok(())
}

#[tokio::test]
async fn result_types_are_checked() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let result = PatternEngine::default()
        .query_boolean(select([QuadPattern::any()]), context(&store))
        .await;
    assert!(matches!(
        result,
        Err(QueryError::UnexpectedResultType {
            expected: QueryResultType::Boolean,
            actual: QueryResultType::Bindings,
        })
    ));
    Ok(())
}

#[tokio::test]
async fn metadata_provides_exact_cardinality_but_no_order() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let query = PatternEngine::default()
        .query(
            select([QuadPattern::any().with_predicate(ex("age"))]),
            context(&store),
        )
        .await?
        .into_bindings()?;

    let support = query.metadata_support();
    assert!(support.supports(MetadataSupport::CARDINALITY.with(MetadataSupport::VARIABLES)));
    assert!(!support.supports(MetadataSupport::ORDER));

    let metadata = query.metadata(MetadataRequest::all()).await?;
    assert_eq!(metadata.cardinality, Some(QueryResultCardinality::exact(3)));
    assert_eq!(
        metadata.cardinality.map(|cardinality| cardinality.cardinality_type),
        Some(CardinalityType::Exact)
    );
    assert!(metadata.order.is_none());

    let ordered = QueryExecuteOptions {
        order: Some(QueryOperationOrder {
            cost: QueryOperationCost::default(),
            terms: vec![OrderTerm {
                term: var("s"),
                direction: SortDirection::Ascending,
            }],
        }),
    };
    assert!(matches!(
        query.execute(ordered).await,
        Err(QueryError::UnsupportedOrder)
    ));
    Ok(())
}

#[tokio::test]
async fn dropping_the_stream_stops_the_evaluation() -> Result<(), Box<dyn Error>> {
    let store = people().await?;
    let mut solutions = PatternEngine::default()
        .query_bindings(select([QuadPattern::any()]), context(&store))
        .await?;
    assert!(solutions.next().await.transpose()?.is_some());
    drop(solutions);

    // The store is still usable afterwards.
    assert_eq!(store.match_quads(&QuadPattern::any()).try_collect_to_vec().await?.len(), 5);
    Ok(())
}
