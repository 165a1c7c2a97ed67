use rdf_interop_model::TermError;
use std::error::Error;
use std::io;

/// An error delivered by a [ResultStream](crate::ResultStream).
///
/// The error is the terminal signal of a stream. It is delivered exactly once, after which the
/// stream ends.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StreamError {
    /// Error from the OS I/O layer, for example raised by a parser reading a file.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The consuming side of a channel was dropped before the producer finished.
    #[error("The consumer of the stream has been dropped")]
    Closed,
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StreamError {
    /// Builds an error from a foreign error.
    #[inline]
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }

    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self::Msg(msg.into())
    }
}

impl From<StreamError> for io::Error {
    #[inline]
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::Io(error) => error,
            error => Self::other(error),
        }
    }
}

/// An error related to [Store](crate::Store) and [Sink](crate::Sink) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The stream that was imported or removed failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A term handed to the store was invalid.
    #[error(transparent)]
    Term(#[from] TermError),
    #[error("{0}")]
    Msg(String),
}

impl StoreError {
    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self::Msg(msg.into())
    }
}

impl From<StoreError> for io::Error {
    #[inline]
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Stream(error) => error.into(),
            error => Self::other(error),
        }
    }
}
