#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use rdf_interop_dataset::Dataset;
use rdf_interop_model::{BlankNode, Literal, NamedNode, Quad, QuadPattern, TermType, Variable};
use rdf_interop_query::{
    DefaultExpressionFactory, Expression, ExpressionFactory, FilterableSource, MatchRange,
    MetadataRequest, QueryError, QueryExecuteOptions, QueryResultCardinality, SourceFilter,
};
use std::error::Error;
use std::sync::Arc;

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn var(name: &str) -> Expression {
    Expression::Term(Variable::new_unchecked(name).into())
}

fn source() -> SourceFilter<Dataset> {
    let dataset = [
        Quad::in_default_graph(ex("a"), ex("label"), Literal::from("apple")),
        Quad::in_default_graph(
            ex("b"),
            ex("label"),
            Literal::new_language_tagged_literal_unchecked("Birne", "de"),
        ),
        Quad::in_default_graph(ex("c"), ex("label"), ex("cherry")),
        Quad::in_default_graph(BlankNode::new_unchecked("d"), ex("label"), Literal::from(4_i64)),
    ]
    .into_iter()
    .collect::<Dataset>();
    SourceFilter::new(Arc::new(dataset))
}

fn labels() -> QuadPattern {
    QuadPattern::any()
        .with_subject(Variable::new_unchecked("s"))
        .with_predicate(ex("label"))
        .with_object(Variable::new_unchecked("o"))
}

async fn matching(
    expression: Option<&Expression>,
    range: MatchRange,
) -> Result<Vec<Quad>, Box<dyn Error>> {
    let query = source().match_expression(&labels(), expression, range).await?;
    let mut quads = query
        .execute(QueryExecuteOptions::default())
        .await?
        .try_collect_to_vec()
        .await?;
    quads.sort_by_key(ToString::to_string);
    Ok(quads)
}

#[tokio::test]
async fn without_expression_all_matches_are_returned() -> Result<(), Box<dyn Error>> {
    assert_eq!(matching(None, MatchRange::all()).await?.len(), 4);
    Ok(())
}

#[tokio::test]
async fn term_type_tests() -> Result<(), Box<dyn Error>> {
    let factory = DefaultExpressionFactory;

    let literals = factory.operator_expression("isLiteral", vec![var("o")]);
    assert_eq!(matching(Some(&literals), MatchRange::all()).await?.len(), 3);

    let iris = factory.operator_expression("isIRI", vec![var("o")]);
    let quads = matching(Some(&iris), MatchRange::all()).await?;
    assert_eq!(quads.len(), 1);
    assert_eq!(quads[0].object.value(), "http://example.com/cherry");

    let blank = factory.operator_expression("isBlank", vec![var("s")]);
    assert_eq!(matching(Some(&blank), MatchRange::all()).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn language_tags_can_be_filtered() -> Result<(), Box<dyn Error>> {
    let factory = DefaultExpressionFactory;
    let german = factory.operator_expression(
        "=",
        vec![
            factory.operator_expression("lang", vec![var("o")]),
            factory.term_expression(Literal::new_simple_literal("de").into()),
        ],
    );
    let quads = matching(Some(&german), MatchRange::all()).await?;
    assert_eq!(quads.len(), 1);
    assert_eq!(quads[0].subject.value(), "http://example.com/b");
    Ok(())
}

#[tokio::test]
async fn errors_in_the_expression_reject_the_quad() -> Result<(), Box<dyn Error>> {
    let factory = DefaultExpressionFactory;
    // Only the numeric literal can be compared with a number.
    let small = factory.operator_expression(
        "<",
        vec![
            var("o"),
            factory.term_expression(Literal::from(10_i64).into()),
        ],
    );
    let quads = matching(Some(&small), MatchRange::all()).await?;
    assert_eq!(quads.len(), 1);
    assert_eq!(quads[0].subject.term_type(), TermType::BlankNode);
    Ok(())
}

#[tokio::test]
async fn unsupported_operators_are_rejected_before_matching() {
    let factory = DefaultExpressionFactory;
    let expression = factory.operator_expression("contains", vec![var("o"), var("s")]);
    let result = source()
        .match_expression(&labels(), Some(&expression), MatchRange::all())
        .await;
    assert!(matches!(
        result,
        Err(QueryError::UnsupportedOperator(name)) if name == "contains"
    ));
}

#[tokio::test]
async fn range_and_cardinality() -> Result<(), Box<dyn Error>> {
    let query = source()
        .match_expression(&labels(), None, MatchRange::new(1, 2))
        .await?;
    let metadata = query.metadata(MetadataRequest::all()).await?;
    assert_eq!(metadata.cardinality, Some(QueryResultCardinality::exact(2)));

    assert_eq!(matching(None, MatchRange::new(3, 10)).await?.len(), 1);
    Ok(())
}
