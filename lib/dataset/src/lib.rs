//! Datasets of quads and an in-memory [Store](rdf_interop_stream::Store).
//!
//! A [Dataset] is a set of quads with indexes on every quad position. Besides the usual set
//! operations, it can compare datasets modulo blank node renaming ([Dataset::equals],
//! [Dataset::contains]) and serialize them in a canonical form ([Dataset::to_canonical]) that is
//! identical for isomorphic datasets.
//!
//! [MemoryStore] shares a [Dataset] between tasks and exposes it through the asynchronous
//! [Source](rdf_interop_stream::Source) and [Store](rdf_interop_stream::Store) contracts.

mod canonical;
mod dataset;
mod error;
mod factory;
mod index;
mod isomorphism;
mod memory_store;

pub use canonical::CanonicalizationOptions;
pub use dataset::Dataset;
pub use error::DatasetError;
pub use factory::{DatasetFactory, DefaultDatasetFactory};
pub use memory_store::{MemoryStore, MemoryStoreConfig};
