use crate::StreamError;
use futures::stream::BoxStream;
use futures::{FutureExt, Stream, StreamExt};
use std::fmt::{Debug, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// A one-pass, single-consumer stream of items that may fail.
///
/// A [ResultStream] is terminal: once it has returned its end or its first error, every further
/// poll returns [None]. An error is therefore observed exactly once. Items that were read before
/// the error are not affected by it.
///
/// ```
/// use futures::StreamExt;
/// use rdf_interop_stream::{ResultStream, StreamError};
///
/// let mut stream = ResultStream::from_results(vec![
///     Ok(1),
///     Err(StreamError::msg("parse error")),
///     Ok(2),
/// ]);
/// tokio_test::block_on(async {
///     assert_eq!(stream.next().await.transpose()?, Some(1));
///     assert!(stream.next().await.is_some_and(|item| item.is_err()));
///     assert!(stream.next().await.is_none());
///     Result::<_, StreamError>::Ok(())
/// })?;
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct ResultStream<T> {
    inner: Option<BoxStream<'static, Result<T, StreamError>>>,
}

impl<T: Send + 'static> ResultStream<T> {
    /// Wraps an arbitrary stream.
    pub fn from_stream(
        stream: impl Stream<Item = Result<T, StreamError>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Some(stream.boxed()),
        }
    }

    /// Creates a stream that yields the given items and errors in order.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Result<T, StreamError>>,
        I::IntoIter: Send + 'static,
    {
        Self::from_stream(futures::stream::iter(results))
    }

    /// Creates a stream that ends immediately.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Creates a stream that fails immediately with `error`.
    pub fn failed(error: StreamError) -> Self {
        Self::from_stream(futures::stream::once(async move { Err(error) }))
    }

    /// Creates a bounded channel. Items pushed into the returned [StreamSender] are delivered by
    /// the returned [ResultStream]. Dropping the sender ends the stream.
    ///
    /// A `capacity` of zero is treated as one.
    pub fn channel(capacity: usize) -> (StreamSender<T>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let stream = futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|item| (item, receiver))
        });
        (StreamSender { sender }, Self::from_stream(stream))
    }

    /// Returns the next item if one is available without waiting.
    ///
    /// Returns [None] if nothing is buffered right now or if the stream has ended. Use
    /// [ResultStream::is_terminated] to tell both cases apart.
    pub fn read(&mut self) -> Option<Result<T, StreamError>> {
        self.next().now_or_never().flatten()
    }

    /// Returns whether the stream has delivered its end or its error.
    pub fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }

    /// Drains the stream into a [Vec], failing with the first error.
    pub async fn try_collect_to_vec(mut self) -> Result<Vec<T>, StreamError> {
        let mut result = Vec::new();
        while let Some(element) = self.next().await {
            result.push(element?);
        }
        Ok(result)
    }

    /// Calls `action` for every item until the stream ends or fails.
    pub async fn for_each_item(mut self, mut action: impl FnMut(T)) -> Result<(), StreamError> {
        while let Some(element) = self.next().await {
            action(element?);
        }
        Ok(())
    }

    /// Transforms every item. Errors are passed through.
    pub fn map_items<U: Send + 'static>(
        self,
        mut mapper: impl FnMut(T) -> U + Send + 'static,
    ) -> ResultStream<U> {
        ResultStream::from_stream(self.map(move |item| item.map(&mut mapper)))
    }

    /// Only keeps the items for which `predicate` returns true. Errors are passed through.
    pub fn filter_items(
        self,
        mut predicate: impl FnMut(&T) -> bool + Send + 'static,
    ) -> ResultStream<T> {
        ResultStream::from_stream(self.filter(move |item| {
            let keep = match item {
                Ok(item) => predicate(item),
                Err(_) => true,
            };
            futures::future::ready(keep)
        }))
    }
}

impl<T: Send + 'static> FromIterator<T> for ResultStream<T> {
    /// Creates a stream that yields the items of `iter` in order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items = iter.into_iter().map(Ok).collect::<Vec<_>>();
        Self::from_results(items)
    }
}

impl<T> Stream for ResultStream<T> {
    type Item = Result<T, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(item))) => Poll::Ready(Some(Ok(item))),
            Poll::Ready(Some(Err(error))) => {
                self.inner = None;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                self.inner = None;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), |inner| inner.size_hint())
    }
}

impl<T> futures::stream::FusedStream for ResultStream<T> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<T> Debug for ResultStream<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream")
            .field("terminated", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}

/// The producing side of [ResultStream::channel].
///
/// The stream ends once the sender is dropped. [StreamSender::fail] ends it with an error.
#[derive(Debug)]
pub struct StreamSender<T> {
    sender: mpsc::Sender<Result<T, StreamError>>,
}

impl<T> Clone for StreamSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send + 'static> StreamSender<T> {
    /// Pushes an item, waiting while the buffer is full.
    ///
    /// Returns [StreamError::Closed] if the consumer has been dropped. Producers should stop in
    /// that case.
    pub async fn send(&self, item: T) -> Result<(), StreamError> {
        self.sender
            .send(Ok(item))
            .await
            .map_err(|_| StreamError::Closed)
    }

    /// Ends the stream with `error`.
    pub async fn fail(self, error: StreamError) {
        if self.sender.send(Err(error)).await.is_err() {
            tracing::trace!("Dropped stream error as the consumer is gone.");
        }
    }

    /// Returns whether the consumer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
