//! Bindings and the contracts between query engines, their queries and their results.
//!
//! A [Queryable] engine turns a query and a [QueryContext] into a [Query]. Executing the query
//! yields a [QueryResult] whose kind is given by [QueryResultType]. Engines that only support
//! some result types implement the matching capability traits, such as [QueryableBoolean].
//!
//! [PatternEngine] is a small engine that evaluates basic graph patterns over
//! [Store](rdf_interop_stream::Store)s. [SourceFilter] makes any
//! [Source](rdf_interop_stream::Source) a [FilterableSource].

mod bindings;
mod context;
mod engine;
mod error;
mod expression;
mod filterable;
mod metadata;
mod query;
mod queryable;
mod typed_value;

pub use bindings::*;
pub use context::*;
pub use engine::*;
pub use error::*;
pub use expression::*;
pub use filterable::*;
pub use metadata::*;
pub use query::*;
pub use queryable::*;
pub use typed_value::*;
