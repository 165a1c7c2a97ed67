use rdf_interop_stream::StreamError;

/// An error raised by [Dataset](crate::Dataset) operations that can fail.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// The canonicalization of the blank nodes exceeded the configured work budget.
    ///
    /// This happens for highly symmetric blank node structures. See
    /// [CanonicalizationOptions](crate::CanonicalizationOptions).
    #[error("Canonicalization exceeded its budget of {limit} {unit}")]
    CanonicalizationTooComplex { limit: usize, unit: &'static str },
    /// The stream that was imported failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
