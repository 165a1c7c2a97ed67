use crate::Dataset;
use rdf_interop_model::Quad;

/// Creates datasets.
///
/// Components that build datasets take a factory rather than a concrete type, which allows
/// callers to substitute their own dataset implementation.
pub trait DatasetFactory {
    type Dataset;

    /// Returns a new dataset holding `quads`. Pass an empty iterator for an empty dataset.
    fn dataset<I: IntoIterator<Item = Quad>>(&self, quads: I) -> Self::Dataset;
}

/// Creates [Dataset] instances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultDatasetFactory;

impl DatasetFactory for DefaultDatasetFactory {
    type Dataset = Dataset;

    fn dataset<I: IntoIterator<Item = Quad>>(&self, quads: I) -> Dataset {
        quads.into_iter().collect()
    }
}
