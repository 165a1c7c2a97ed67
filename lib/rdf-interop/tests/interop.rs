#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use rdf_interop::dataset::{Dataset, MemoryStore};
use rdf_interop::model::{
    BlankNode, DataFactory, DefaultDataFactory, NamedNode, Quad, QuadPattern, Term, Variable,
};
use rdf_interop::query::{
    Algebra, BasicGraphPattern, DefaultExpressionFactory, ExpressionFactory, FilterableSource,
    MatchRange, PatternEngine, QueryContext, QueryExecuteOptions, QueryInput, QueryableQuads,
    SourceFilter,
};
use rdf_interop::stream::{Sink, Store};
use std::error::Error;
use std::sync::Arc;

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

async fn store_with(quads: Vec<Quad>) -> Result<Arc<dyn Store>, Box<dyn Error>> {
    let store = MemoryStore::new();
    store.import(quads.into_iter().collect()).await?;
    Ok(Arc::new(store))
}

#[tokio::test]
async fn constructed_quads_are_isomorphic_to_the_expected_dataset() -> Result<(), Box<dyn Error>> {
    let factory = DefaultDataFactory::new();
    let store = store_with(vec![
        factory.quad(
            ex("alice").into(),
            ex("knows").into(),
            ex("bob").into(),
            None,
        )?,
        factory.quad(
            ex("bob").into(),
            ex("knows").into(),
            ex("carol").into(),
            None,
        )?,
    ])
    .await?;

    let x = Variable::new("x")?;
    let y = Variable::new("y")?;
    let link = BlankNode::new("link")?;
    let query = Algebra::Construct {
        template: vec![
            Quad::in_default_graph(link.clone(), ex("from"), x.clone()),
            Quad::in_default_graph(link, ex("to"), y.clone()),
        ],
        pattern: BasicGraphPattern::new([QuadPattern::any()
            .with_subject(x)
            .with_predicate(ex("knows"))
            .with_object(y)]),
    };
    let mut constructed = Dataset::new();
    constructed
        .import(
            PatternEngine::default()
                .query_quads(
                    QueryInput::Algebra(query),
                    QueryContext::new().with_source(store),
                )
                .await?,
        )
        .await?;

    let first = BlankNode::new("first")?;
    let second = BlankNode::new("second")?;
    let expected = [
        Quad::in_default_graph(first.clone(), ex("from"), ex("alice")),
        Quad::in_default_graph(first, ex("to"), ex("bob")),
        Quad::in_default_graph(second.clone(), ex("from"), ex("bob")),
        Quad::in_default_graph(second, ex("to"), ex("carol")),
    ]
    .into_iter()
    .collect::<Dataset>();

    assert_eq!(constructed.len(), 4);
    assert!(constructed.equals(&expected));
    assert_eq!(constructed.to_canonical()?, expected.to_canonical()?);
    Ok(())
}

#[tokio::test]
async fn stores_are_filterable_sources() -> Result<(), Box<dyn Error>> {
    let store = store_with(vec![
        Quad::in_default_graph(ex("a"), ex("p"), ex("b")),
        Quad::new(ex("a"), ex("p"), ex("c"), ex("g")),
    ])
    .await?;

    let expressions = DefaultExpressionFactory;
    let object = Variable::new("o")?;
    let is_b = expressions.operator_expression(
        "sameTerm",
        vec![
            expressions.term_expression(object.clone().into()),
            expressions.term_expression(ex("b").into()),
        ],
    );
    let pattern = QuadPattern::any().with_subject(ex("a")).with_object(object);

    let quads = SourceFilter::new(store)
        .match_expression(&pattern, Some(&is_b), MatchRange::all())
        .await?
        .execute(QueryExecuteOptions::default())
        .await?
        .try_collect_to_vec()
        .await?;
    assert_eq!(quads.len(), 1);
    assert_eq!(Term::from(quads[0].object.clone()), Term::from(ex("b")));
    Ok(())
}
