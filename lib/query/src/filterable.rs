//! Sources that evaluate filter expressions close to the data.

use crate::{
    Bindings, Expression, Filter, MetadataRequest, MetadataSupport, QuadsQuery, QueryError,
    QueryExecuteOptions, QueryResultCardinality, QueryResultMetadata,
};
use async_trait::async_trait;
use futures::StreamExt;
use rdf_interop_model::{Quad, QuadPattern, QuadTermName, VariableMatchingMode};
use rdf_interop_stream::{ResultStream, Source};
use std::sync::Arc;

/// Selects a window of a result stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatchRange {
    /// The number of results to skip. [None] skips nothing.
    pub start: Option<usize>,
    /// The maximum number of results. [None] is unbounded.
    pub length: Option<usize>,
}

impl MatchRange {
    /// A range covering every result.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: usize, length: usize) -> Self {
        Self {
            start: Some(start),
            length: Some(length),
        }
    }

    /// Restricts `stream` to the range. Errors are passed through and do not count as results.
    pub fn apply<T: Send + 'static>(self, stream: ResultStream<T>) -> ResultStream<T> {
        if self == Self::all() {
            return stream;
        }
        let start = self.start.unwrap_or(0);
        let end = self.length.map(|length| start.saturating_add(length));
        if end == Some(start) {
            return ResultStream::empty();
        }

        let windowed = stream
            .scan(0_usize, move |position, item| {
                let next = match item {
                    Err(error) => Some(Some(Err(error))),
                    Ok(_) if end.is_some_and(|end| *position >= end) => None,
                    Ok(item) => {
                        let current = *position;
                        *position += 1;
                        Some((current >= start).then_some(Ok(item)))
                    }
                };
                futures::future::ready(next)
            })
            .filter_map(futures::future::ready);
        ResultStream::from_stream(windowed)
    }
}

/// A source that can evaluate a filter [Expression] while matching quads.
///
/// Unlike [Source::match_quads], matching is lazy: the returned [QuadsQuery] only reads the
/// source once it is executed.
#[async_trait]
pub trait FilterableSource: Send + Sync {
    /// Prepares a query for the quads that match `pattern` and for which `expression` evaluates
    /// to true. Variables in `expression` refer to the variables of `pattern`.
    ///
    /// Fails with [QueryError::UnsupportedOperator] if `expression` uses an operator the source
    /// cannot evaluate.
    async fn match_expression(
        &self,
        pattern: &QuadPattern,
        expression: Option<&Expression>,
        range: MatchRange,
    ) -> Result<Box<dyn QuadsQuery>, QueryError>;
}

/// Makes any [Source] filterable by evaluating expressions on the matched quads.
///
/// ```
/// use rdf_interop_dataset::Dataset;
/// use rdf_interop_model::*;
/// use rdf_interop_query::*;
/// use std::sync::Arc;
///
/// let ex = |name: &str| NamedNode::new_unchecked(format!("http://example.com/{name}"));
/// let dataset: Dataset = [
///     Quad::in_default_graph(ex("alice"), ex("age"), Literal::from(42_i64)),
///     Quad::in_default_graph(ex("bob"), ex("age"), Literal::from(17_i64)),
/// ]
/// .into_iter()
/// .collect();
///
/// let age = Variable::new("age")?;
/// let factory = DefaultExpressionFactory;
/// let adult = factory.operator_expression(
///     ">=",
///     vec![
///         factory.term_expression(age.clone().into()),
///         factory.term_expression(Literal::from(18_i64).into()),
///     ],
/// );
/// let pattern = QuadPattern::any().with_predicate(ex("age")).with_object(age);
///
/// let source = SourceFilter::new(Arc::new(dataset));
/// let quads = tokio_test::block_on(async {
///     let query = source
///         .match_expression(&pattern, Some(&adult), MatchRange::all())
///         .await?;
///     Ok::<_, QueryError>(query.execute(QueryExecuteOptions::default()).await?.try_collect_to_vec().await?)
/// })?;
/// assert_eq!(quads.len(), 1);
/// assert_eq!(quads[0].subject.value(), "http://example.com/alice");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct SourceFilter<S: ?Sized> {
    source: Arc<S>,
}

impl<S: ?Sized> SourceFilter<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

impl<S: ?Sized> Clone for SourceFilter<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

#[async_trait]
impl<S: Source + ?Sized + 'static> FilterableSource for SourceFilter<S> {
    async fn match_expression(
        &self,
        pattern: &QuadPattern,
        expression: Option<&Expression>,
        range: MatchRange,
    ) -> Result<Box<dyn QuadsQuery>, QueryError> {
        let filter = expression.map(Expression::compile).transpose()?;
        Ok(Box::new(FilteredQuads {
            source: Arc::clone(&self.source),
            pattern: pattern.clone(),
            filter,
            range,
        }))
    }
}

struct FilteredQuads<S: ?Sized> {
    source: Arc<S>,
    pattern: QuadPattern,
    filter: Option<Filter>,
    range: MatchRange,
}

impl<S: Source + ?Sized> FilteredQuads<S> {
    fn stream(&self) -> ResultStream<Quad> {
        let matched = self.source.match_quads(&self.pattern);
        let filtered = match self.filter.clone() {
            None => matched,
            Some(filter) => {
                let pattern = self.pattern.clone();
                matched.filter_items(move |quad| {
                    pattern
                        .bind(quad, VariableMatchingMode::Wildcard)
                        .is_some_and(|bound| filter.test(&bound.into_iter().collect::<Bindings>()))
                })
            }
        };
        self.range.apply(filtered)
    }
}

#[async_trait]
impl<S: Source + ?Sized + 'static> QuadsQuery for FilteredQuads<S> {
    async fn execute(
        &self,
        options: QueryExecuteOptions<QuadTermName>,
    ) -> Result<ResultStream<Quad>, QueryError> {
        if options.order.is_some() {
            return Err(QueryError::UnsupportedOrder);
        }
        Ok(self.stream())
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
            self.stream().for_each_item(|_| count += 1).await?;
            metadata.cardinality = Some(QueryResultCardinality::exact(count));
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn range_skips_and_limits() -> Result<(), Box<dyn std::error::Error>> {
        let stream = (0..10).collect::<ResultStream<_>>();
        let window = MatchRange::new(2, 3).apply(stream).try_collect_to_vec().await?;
        assert_eq!(window, [2, 3, 4]);

        let open_ended = MatchRange {
            start: Some(8),
            length: None,
        };
        let tail = open_ended
            .apply((0..10).collect::<ResultStream<_>>())
            .try_collect_to_vec()
            .await?;
        assert_eq!(tail, [8, 9]);

        let empty = MatchRange::new(0, 0)
            .apply((0..10).collect::<ResultStream<_>>())
            .try_collect_to_vec()
            .await?;
        assert!(empty.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn range_passes_errors_through() {
        let stream = ResultStream::from_results(vec![
            Ok(1),
            Err(rdf_interop_stream::StreamError::msg("broken")),
        ]);
        let result = MatchRange::new(5, 1).apply(stream).try_collect_to_vec().await;
        assert!(result.is_err());
    }
}
