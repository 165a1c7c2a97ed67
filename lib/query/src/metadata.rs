//! Metadata that a query result may expose besides its items.
//!
//! Every kind of metadata is optional. A query announces what it can provide through
//! [MetadataSupport]. Fields that are not supported or were not requested stay [None].

use std::fmt::{Display, Formatter};

/// Whether a cardinality is counted or estimated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardinalityType {
    Estimate,
    Exact,
}

impl Display for CardinalityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CardinalityType::Estimate => "estimate",
            CardinalityType::Exact => "exact",
        })
    }
}

/// The number of results of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryResultCardinality {
    pub cardinality_type: CardinalityType,
    pub value: u64,
}

impl QueryResultCardinality {
    pub fn exact(value: u64) -> Self {
        Self {
            cardinality_type: CardinalityType::Exact,
            value,
        }
    }

    pub fn estimate(value: u64) -> Self {
        Self {
            cardinality_type: CardinalityType::Estimate,
            value,
        }
    }
}

/// The estimated cost of a query operation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueryOperationCost {
    /// How many items are iterated. Determines the CPU cost.
    pub iterations: f64,
    /// How many items are kept in memory.
    pub persisted_items: f64,
    /// How many items block the stream from progressing.
    pub blocking_items: f64,
    /// The time spent requesting items from sources. Determines the I/O cost.
    pub request_time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a [QueryOperationOrder].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderTerm<T> {
    pub term: T,
    pub direction: SortDirection,
}

/// An ordering of the results of a query together with the cost of producing it.
///
/// Quad results are ordered by [QuadTermName](rdf_interop_model::QuadTermName), bindings by
/// [Variable](rdf_interop_model::Variable).
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOperationOrder<T> {
    pub cost: QueryOperationCost,
    pub terms: Vec<OrderTerm<T>>,
}

/// The set of metadata kinds that a query can provide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetadataSupport {
    bits: u8,
}

impl MetadataSupport {
    pub const NONE: Self = Self { bits: 0 };
    pub const CARDINALITY: Self = Self { bits: 1 };
    pub const ORDER: Self = Self { bits: 1 << 1 };
    pub const AVAILABLE_ORDERS: Self = Self { bits: 1 << 2 };
    /// Only meaningful for queries producing bindings.
    pub const VARIABLES: Self = Self { bits: 1 << 3 };

    /// Returns the union of both sets.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns whether every kind in `other` is supported.
    pub const fn supports(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

/// Selects the metadata to compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetadataRequest {
    /// Requests the cardinality with the given precision. An exact count satisfies a request for
    /// an estimate.
    pub cardinality: Option<CardinalityType>,
    pub order: bool,
    pub available_orders: bool,
}

impl MetadataRequest {
    /// Requests every kind of metadata, with an exact cardinality.
    pub fn all() -> Self {
        Self {
            cardinality: Some(CardinalityType::Exact),
            order: true,
            available_orders: true,
        }
    }
}

/// The metadata of a query result.
///
/// A field is [None] if the query does not support it or if it was not requested.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResultMetadata<T> {
    pub cardinality: Option<QueryResultCardinality>,
    pub order: Option<Vec<QueryOperationOrder<T>>>,
    pub available_orders: Option<Vec<QueryOperationOrder<T>>>,
}

impl<T> Default for QueryResultMetadata<T> {
    fn default() -> Self {
        Self {
            cardinality: None,
            order: None,
            available_orders: None,
        }
    }
}

/// Options for executing a query.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryExecuteOptions<T> {
    /// The order the results must have.
    pub order: Option<QueryOperationOrder<T>>,
}

impl<T> Default for QueryExecuteOptions<T> {
    fn default() -> Self {
        Self { order: None }
    }
}
